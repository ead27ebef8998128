use iterdist_core::ConfigError;

/// Failure to append an event to a sink.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Sink closed: receiver dropped")]
    Closed,
    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Error type for a scheduling run. Any of these aborts the run; there are
/// no partial results.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Thread pool: {0}")]
    ThreadPool(String),
    #[error("Event sink failed: {0}")]
    Sink(#[from] SinkError),
    /// An iteration was handed out by more than one claim.
    #[error("Claim race: iteration {0} claimed twice")]
    DuplicateIteration(usize),
    /// An iteration was never handed out.
    #[error("Claim race: iteration {0} never claimed")]
    MissingIteration(usize),
}
