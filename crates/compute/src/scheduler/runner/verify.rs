use crate::scheduler::error::ScheduleError;
use crate::scheduler::metrics::ChunkClaim;

/// Check that `claims` tile `[0, iterations)` exactly once.
pub fn verify_partition(claims: &[ChunkClaim], iterations: usize) -> Result<(), ScheduleError> {
    let mut ranges: Vec<_> = claims.iter().map(|c| c.range.clone()).collect();
    ranges.sort_by_key(|r| r.start);

    let mut next = 0;
    for range in ranges {
        if range.start < next {
            return Err(ScheduleError::DuplicateIteration(range.start));
        }
        if range.start > next {
            return Err(ScheduleError::MissingIteration(next));
        }
        next = range.end;
    }
    if next != iterations {
        return Err(ScheduleError::MissingIteration(next));
    }
    Ok(())
}
