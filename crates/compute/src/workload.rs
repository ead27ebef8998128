//! Per-iteration payload executed by the scheduler's workers.

use std::hint::black_box;

use iterdist_core::config::DEFAULT_PAYLOAD_SCALE;

/// A unit of work run once per iteration index.
///
/// Implementations must be pure: the same index always yields the same value
/// and no state is shared between calls. The scheduler never inspects the
/// result, it only needs the call to cost something.
pub trait Workload: Send + Sync {
    fn compute(&self, iteration: usize) -> f64;
}

/// `sin(scale / i)`, the classic demo payload.
///
/// The quotient is undefined at `i = 0`; that index yields `0.0` instead of
/// propagating a NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SineWorkload {
    pub scale: f64,
}

impl Default for SineWorkload {
    fn default() -> Self {
        Self {
            scale: DEFAULT_PAYLOAD_SCALE,
        }
    }
}

impl SineWorkload {
    pub fn new(scale: f64) -> Self {
        Self { scale }
    }
}

impl Workload for SineWorkload {
    fn compute(&self, iteration: usize) -> f64 {
        if iteration == 0 {
            return 0.0;
        }
        black_box((black_box(self.scale) / iteration as f64).sin())
    }
}
