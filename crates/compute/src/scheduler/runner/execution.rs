use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use iterdist_core::{AssignmentEvent, RunConfig, SchedulePolicy};

use crate::scheduler::chunk_source::ChunkSource;
use crate::scheduler::error::{ScheduleError, SinkError};
use crate::scheduler::metrics::{ChunkClaim, RunSummary, WorkerStats};
use crate::scheduler::sink::{EventSink, MemorySink};

use super::verify::verify_partition;
use super::IterationScheduler;

/// What one worker did during a run.
struct WorkerOutcome {
    stats: WorkerStats,
    claims: Vec<ChunkClaim>,
}

impl IterationScheduler {
    /// Execute one run and report every iteration to `sink`.
    ///
    /// Builds a pool of exactly `config.workers()` threads and runs the
    /// worker loop once on each of them; the broadcast index is the worker
    /// id. Returns only after every worker has finished.
    pub fn run(
        &self,
        config: &RunConfig,
        sink: &dyn EventSink,
    ) -> Result<RunSummary, ScheduleError> {
        let policy = config.policy();
        let workers = config.workers();
        info!(
            policy = %policy,
            iterations = config.iterations(),
            workers,
            "Starting scheduling run"
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("iterdist-worker-{}", i))
            .build()
            .map_err(|e| ScheduleError::ThreadPool(e.to_string()))?;

        let source = ChunkSource::new(config);
        let abort = AtomicBool::new(false);
        let started_at = Utc::now();
        let clock = Instant::now();

        let outcomes = pool.broadcast(|ctx| self.work(ctx.index(), &source, sink, &abort));
        let elapsed = clock.elapsed();

        let mut worker_stats = Vec::with_capacity(workers);
        let mut claims = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(outcome) => {
                    worker_stats.push(outcome.stats);
                    claims.extend(outcome.claims);
                }
                Err(e) => {
                    error!(policy = %policy, error = %e, "Run aborted by sink failure");
                    return Err(ScheduleError::Sink(e));
                }
            }
        }
        worker_stats.sort_by_key(|s| s.worker);

        verify_partition(&claims, config.iterations()).inspect_err(|e| {
            error!(policy = %policy, error = %e, "Partition check failed");
        })?;

        let summary = RunSummary {
            policy,
            iterations: config.iterations(),
            workers,
            started_at,
            elapsed,
            worker_stats,
            claims,
        };
        info!(
            policy = %policy,
            chunks = summary.claims.len(),
            imbalance = summary.imbalance(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Scheduling run complete"
        );
        Ok(summary)
    }

    /// Run into a [`MemorySink`] and return the events in execution order.
    pub fn run_collect(
        &self,
        config: &RunConfig,
    ) -> Result<(Vec<AssignmentEvent>, RunSummary), ScheduleError> {
        let sink = MemorySink::new();
        let summary = self.run(config, &sink)?;
        Ok((sink.into_events(), summary))
    }

    /// Run each policy in order over the same iteration space and pool size,
    /// opening a sink section before each run and flushing at the end.
    ///
    /// Runs are independent; the first failing run stops the sequence.
    pub fn run_all(
        &self,
        iterations: usize,
        workers: usize,
        policies: &[SchedulePolicy],
        sink: &dyn EventSink,
    ) -> Result<Vec<RunSummary>, ScheduleError> {
        let configs = policies
            .iter()
            .map(|&policy| RunConfig::new(iterations, workers, policy))
            .collect::<Result<Vec<_>, _>>()?;

        let mut summaries = Vec::with_capacity(configs.len());
        for config in &configs {
            sink.begin_section(&config.policy())?;
            summaries.push(self.run(config, sink)?);
        }
        sink.flush()?;
        Ok(summaries)
    }

    /// Worker loop: claim, execute in ascending order, emit, repeat.
    fn work(
        &self,
        worker: usize,
        source: &ChunkSource,
        sink: &dyn EventSink,
        abort: &AtomicBool,
    ) -> Result<WorkerOutcome, SinkError> {
        let mut stats = WorkerStats::new(worker);
        let mut claims = Vec::new();

        while !abort.load(Ordering::Acquire) {
            let Some(range) = source.next_chunk(worker) else {
                break;
            };
            debug!(worker, start = range.start, end = range.end, "Claimed chunk");
            claims.push(ChunkClaim {
                worker,
                range: range.clone(),
            });
            stats.chunks += 1;

            let begun = Instant::now();
            for iteration in range {
                self.workload.compute(iteration);
                if let Err(e) = sink.record(AssignmentEvent::new(iteration, worker)) {
                    warn!(worker, iteration, error = %e, "Sink rejected event, aborting run");
                    abort.store(true, Ordering::Release);
                    return Err(e);
                }
                stats.iterations += 1;
            }
            stats.busy += begun.elapsed();
        }

        Ok(WorkerOutcome { stats, claims })
    }
}
