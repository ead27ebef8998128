use std::ops::Range;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use iterdist_core::SchedulePolicy;

/// Per-worker totals for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WorkerStats {
    pub worker: usize,
    /// Iterations executed.
    pub iterations: usize,
    /// Chunks claimed.
    pub chunks: usize,
    /// Time spent inside chunks (payload plus event emission).
    pub busy: Duration,
}

impl WorkerStats {
    pub fn new(worker: usize) -> Self {
        Self {
            worker,
            ..Self::default()
        }
    }
}

/// A chunk handed to a worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkClaim {
    pub worker: usize,
    pub range: Range<usize>,
}

/// Outcome of one scheduling run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub policy: SchedulePolicy,
    pub iterations: usize,
    pub workers: usize,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
    /// Indexed by worker id.
    pub worker_stats: Vec<WorkerStats>,
    /// Every claim made during the run, grouped by worker.
    pub claims: Vec<ChunkClaim>,
}

impl RunSummary {
    /// Claims sorted by start index. Shared-cursor policies hand out chunks
    /// in index order, so for them this is also the claim order.
    pub fn claims_in_order(&self) -> Vec<ChunkClaim> {
        let mut claims = self.claims.clone();
        claims.sort_by_key(|c| c.range.start);
        claims
    }

    /// Worker id of every iteration, indexed by iteration.
    pub fn owners(&self) -> Vec<usize> {
        let mut owners = vec![usize::MAX; self.iterations];
        for claim in &self.claims {
            for i in claim.range.clone() {
                if let Some(slot) = owners.get_mut(i) {
                    *slot = claim.worker;
                }
            }
        }
        owners
    }

    /// Busiest worker's iteration count over the ideal `N / W`.
    /// 1.0 is a perfect split.
    pub fn imbalance(&self) -> f64 {
        let max = self
            .worker_stats
            .iter()
            .map(|s| s.iterations)
            .max()
            .unwrap_or(0);
        let mean = self.iterations as f64 / self.workers as f64;
        max as f64 / mean
    }

    /// Workers that executed no iteration at all.
    pub fn idle_workers(&self) -> usize {
        self.worker_stats.iter().filter(|s| s.iterations == 0).count()
    }

    /// One-line text rendering for terminal output.
    pub fn one_line(&self) -> String {
        let counts: Vec<String> = self
            .worker_stats
            .iter()
            .map(|s| format!("{}:{}", s.worker, s.iterations))
            .collect();
        format!(
            "{:<28} chunks={:<4} imbalance={:.2} per-worker=[{}] elapsed={:?}",
            self.policy.label(),
            self.claims.len(),
            self.imbalance(),
            counts.join(" "),
            self.elapsed
        )
    }
}
