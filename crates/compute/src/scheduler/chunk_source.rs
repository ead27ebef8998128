use std::ops::Range;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use iterdist_core::{RunConfig, SchedulePolicy};

/// Range worker `worker` owns under the balanced block partition of
/// `iterations` over `workers`.
///
/// The first `iterations % workers` workers get one extra iteration, so every
/// worker gets work whenever `iterations >= workers`.
pub fn block_range(iterations: usize, workers: usize, worker: usize) -> Range<usize> {
    let base = iterations / workers;
    let extra = iterations % workers;
    let start = worker * base + worker.min(extra);
    let len = base + usize::from(worker < extra);
    start..start + len
}

/// Source of chunks for one run. Shared by reference between all workers.
#[derive(Debug)]
pub enum ChunkSource {
    /// One precomputed block per worker.
    Block {
        iterations: usize,
        workers: usize,
        issued: Vec<AtomicBool>,
    },
    /// Chunk `k` belongs to worker `k % workers`. Each worker walks its own
    /// sequence; the counters are atomics only so the source is `Sync`.
    Static {
        iterations: usize,
        workers: usize,
        chunk: usize,
        taken: Vec<AtomicUsize>,
    },
    /// First come, first served over equal chunks.
    Dynamic {
        iterations: usize,
        chunk: usize,
        cursor: AtomicUsize,
    },
    /// First come, first served over chunks of `ceil(remaining / workers)`,
    /// floored at `min_chunk`.
    Guided {
        iterations: usize,
        workers: usize,
        min_chunk: usize,
        cursor: AtomicUsize,
    },
}

impl ChunkSource {
    pub fn new(config: &RunConfig) -> Self {
        let iterations = config.iterations();
        let workers = config.workers();
        match config.policy() {
            SchedulePolicy::Default => ChunkSource::Block {
                iterations,
                workers,
                issued: (0..workers).map(|_| AtomicBool::new(false)).collect(),
            },
            SchedulePolicy::Static { chunk } => ChunkSource::Static {
                iterations,
                workers,
                chunk: chunk.get(),
                taken: (0..workers).map(|_| AtomicUsize::new(0)).collect(),
            },
            SchedulePolicy::Dynamic { chunk } => ChunkSource::Dynamic {
                iterations,
                chunk: chunk.get(),
                cursor: AtomicUsize::new(0),
            },
            SchedulePolicy::Guided { chunk } => ChunkSource::Guided {
                iterations,
                workers,
                min_chunk: chunk.get(),
                cursor: AtomicUsize::new(0),
            },
        }
    }

    /// Whether the index-to-worker mapping is fixed before execution.
    pub fn is_precomputed(&self) -> bool {
        matches!(self, ChunkSource::Block { .. } | ChunkSource::Static { .. })
    }

    /// Next chunk for `worker`, or `None` once it has nothing left to do.
    ///
    /// For the shared-cursor variants each returned range is claimed by
    /// exactly one caller; ranges never overlap and together tile `[0, N)`.
    pub fn next_chunk(&self, worker: usize) -> Option<Range<usize>> {
        match self {
            ChunkSource::Block {
                iterations,
                workers,
                issued,
            } => {
                let flag = issued.get(worker)?;
                if flag.swap(true, Ordering::Relaxed) {
                    return None;
                }
                Some(block_range(*iterations, *workers, worker)).filter(|r| !r.is_empty())
            }
            ChunkSource::Static {
                iterations,
                workers,
                chunk,
                taken,
            } => {
                let k = taken.get(worker)?.fetch_add(1, Ordering::Relaxed);
                let start = k
                    .checked_mul(*workers)
                    .and_then(|seq| seq.checked_add(worker))
                    .and_then(|seq| seq.checked_mul(*chunk))
                    .filter(|start| start < iterations)?;
                Some(start..(start + chunk).min(*iterations))
            }
            ChunkSource::Dynamic {
                iterations,
                chunk,
                cursor,
            } => {
                let start = cursor.fetch_add(*chunk, Ordering::AcqRel);
                if start >= *iterations {
                    return None;
                }
                Some(start..(start + chunk).min(*iterations))
            }
            ChunkSource::Guided {
                iterations,
                workers,
                min_chunk,
                cursor,
            } => {
                let mut start = cursor.load(Ordering::Acquire);
                loop {
                    if start >= *iterations {
                        return None;
                    }
                    let remaining = iterations - start;
                    let size = remaining
                        .div_ceil(*workers)
                        .max(*min_chunk)
                        .min(remaining);
                    match cursor.compare_exchange_weak(
                        start,
                        start + size,
                        Ordering::AcqRel,
                        Ordering::Acquire,
                    ) {
                        Ok(_) => return Some(start..start + size),
                        Err(current) => start = current,
                    }
                }
            }
        }
    }
}

/// Index-to-worker mapping of a precomputed policy, without running anything.
///
/// Returns `None` for Dynamic and Guided, whose mapping depends on timing.
pub fn static_assignment(config: &RunConfig) -> Option<Vec<usize>> {
    let source = ChunkSource::new(config);
    if !source.is_precomputed() {
        return None;
    }
    let mut owner = vec![usize::MAX; config.iterations()];
    for worker in 0..config.workers() {
        while let Some(range) = source.next_chunk(worker) {
            for i in range {
                owner[i] = worker;
            }
        }
    }
    Some(owner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use iterdist_core::PolicyKind;

    fn config(n: usize, w: usize, kind: PolicyKind, chunk: Option<usize>) -> RunConfig {
        RunConfig::new(n, w, SchedulePolicy::new(kind, chunk).unwrap()).unwrap()
    }

    fn drain(source: &ChunkSource, worker: usize) -> Vec<Range<usize>> {
        std::iter::from_fn(|| source.next_chunk(worker)).collect()
    }

    #[test]
    fn block_partition_is_balanced() {
        let ranges: Vec<_> = (0..4).map(|w| block_range(10, 4, w)).collect();
        assert_eq!(ranges, vec![0..3, 3..6, 6..8, 8..10]);

        let ranges: Vec<_> = (0..5).map(|w| block_range(3, 5, w)).collect();
        assert_eq!(ranges, vec![0..1, 1..2, 2..3, 3..3, 3..3]);
    }

    #[test]
    fn block_source_issues_once() {
        let source = ChunkSource::new(&config(10, 4, PolicyKind::Default, None));
        assert_eq!(drain(&source, 2), vec![6..8]);
        assert_eq!(source.next_chunk(2), None);
        assert_eq!(source.next_chunk(9), None);
    }

    #[test]
    fn static_round_robin() {
        let source = ChunkSource::new(&config(10, 3, PolicyKind::Static, Some(2)));
        assert_eq!(drain(&source, 0), vec![0..2, 6..8]);
        assert_eq!(drain(&source, 1), vec![2..4, 8..10]);
        assert_eq!(drain(&source, 2), vec![4..6]);
    }

    #[test]
    fn static_short_last_chunk() {
        let source = ChunkSource::new(&config(9, 2, PolicyKind::Static, Some(4)));
        assert_eq!(drain(&source, 0), vec![0..4, 8..9]);
        assert_eq!(drain(&source, 1), vec![4..8]);
    }

    #[test]
    fn dynamic_hands_out_in_index_order() {
        let source = ChunkSource::new(&config(10, 2, PolicyKind::Dynamic, Some(4)));
        assert_eq!(source.next_chunk(1), Some(0..4));
        assert_eq!(source.next_chunk(0), Some(4..8));
        assert_eq!(source.next_chunk(1), Some(8..10));
        assert_eq!(source.next_chunk(0), None);
        assert_eq!(source.next_chunk(1), None);
    }

    #[test]
    fn guided_shrinks_to_floor() {
        let source = ChunkSource::new(&config(100, 4, PolicyKind::Guided, Some(5)));
        let sizes: Vec<usize> = drain(&source, 0).iter().map(|r| r.len()).collect();
        assert_eq!(sizes.iter().sum::<usize>(), 100);
        assert_eq!(&sizes[..4], &[25, 19, 14, 11]);
        let (last, body) = sizes.split_last().unwrap();
        assert!(body.windows(2).all(|w| w[0] >= w[1]));
        assert!(body.iter().all(|&s| s >= 5));
        assert!(*last <= 5);
    }

    #[test]
    fn static_assignment_only_for_precomputed() {
        let owners = static_assignment(&config(7, 2, PolicyKind::Static, Some(2))).unwrap();
        assert_eq!(owners, vec![0, 0, 1, 1, 0, 0, 1]);
        assert!(static_assignment(&config(7, 2, PolicyKind::Dynamic, Some(2))).is_none());
        assert!(static_assignment(&config(7, 2, PolicyKind::Guided, Some(2))).is_none());
    }
}
