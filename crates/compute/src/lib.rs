pub mod scheduler;
pub mod workload;

pub use scheduler::{
    ChunkClaim, ChunkSource, ChannelSink, EventSink, IterationScheduler, LogFileSink, MemorySink,
    RunSummary, ScheduleError, SinkError, WorkerStats,
};
pub use workload::{SineWorkload, Workload};
