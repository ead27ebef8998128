use std::sync::Arc;

use crate::workload::{SineWorkload, Workload};

/// Distributes the iterations of `[0, N)` over a pool of `W` workers
/// according to a schedule policy, running `workload` once per iteration.
///
/// The scheduler itself holds no per-run state: every call to
/// [`IterationScheduler::run`] builds its own pool and chunk source and tears
/// them down before returning.
pub struct IterationScheduler {
    pub(super) workload: Arc<dyn Workload>,
}

impl IterationScheduler {
    pub fn new(workload: Arc<dyn Workload>) -> Self {
        Self { workload }
    }

    /// Scheduler running the default sine payload.
    pub fn with_sine(scale: f64) -> Self {
        Self::new(Arc::new(SineWorkload::new(scale)))
    }

    pub fn workload(&self) -> Arc<dyn Workload> {
        Arc::clone(&self.workload)
    }
}

impl Default for IterationScheduler {
    fn default() -> Self {
        Self::new(Arc::new(SineWorkload::default()))
    }
}
