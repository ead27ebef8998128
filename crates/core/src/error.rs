use thiserror::Error;

/// Invalid run or driver configuration. Always reported before any work starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("expected {expected} arguments, got {got}")]
    ArgumentCount { expected: usize, got: usize },

    #[error("iteration count must be positive")]
    ZeroIterations,

    #[error("worker count must be positive")]
    ZeroWorkers,

    #[error("{0} schedule requires a chunk size")]
    MissingChunk(&'static str),

    #[error("chunk size must be at least 1, got {0}")]
    InvalidChunk(usize),

    #[error("unknown schedule kind: {0}")]
    UnknownPolicy(String),
}

/// Failure to read back a persisted assignment log.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LogParseError {
    #[error("malformed event line: {0:?}")]
    MalformedEvent(String),

    #[error("malformed section header: {0:?}")]
    MalformedHeader(String),

    #[error("events found before any section header")]
    OrphanEvents,
}
