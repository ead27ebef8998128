//! Iteration-distribution scheduler.
//!
//! A run splits `[0, N)` into chunks according to a [`SchedulePolicy`],
//! hands them to a fixed pool of `W` workers and reports every executed
//! iteration to an [`EventSink`]. Static and Default runs decide the whole
//! assignment up front; Dynamic and Guided runs claim chunks lazily from a
//! shared atomic cursor.
//!
//! [`SchedulePolicy`]: iterdist_core::SchedulePolicy

pub mod chunk_source;
pub mod error;
pub mod metrics;
pub mod runner;
pub mod sink;

pub use chunk_source::{block_range, static_assignment, ChunkSource};
pub use error::{ScheduleError, SinkError};
pub use metrics::{ChunkClaim, RunSummary, WorkerStats};
pub use runner::IterationScheduler;
pub use sink::{ChannelSink, EventSink, LogFileSink, MemorySink};
