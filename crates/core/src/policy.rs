use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CHUNK_ONE: NonZeroUsize = NonZeroUsize::MIN;
const CHUNK_FOUR: NonZeroUsize = match NonZeroUsize::new(4) {
    Some(n) => n,
    None => unreachable!(),
};

/// Policy family without its chunk parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyKind {
    Default,
    Static,
    Dynamic,
    Guided,
}

impl PolicyKind {
    pub fn name(self) -> &'static str {
        match self {
            PolicyKind::Default => "Default",
            PolicyKind::Static => "Static",
            PolicyKind::Dynamic => "Dynamic",
            PolicyKind::Guided => "Guided",
        }
    }
}

impl FromStr for PolicyKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(PolicyKind::Default),
            "static" => Ok(PolicyKind::Static),
            "dynamic" => Ok(PolicyKind::Dynamic),
            "guided" => Ok(PolicyKind::Guided),
            _ => Err(ConfigError::UnknownPolicy(s.to_string())),
        }
    }
}

/// Rule set deciding how iterations are cut into chunks and handed to workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SchedulePolicy {
    /// Balanced block partition, one contiguous range per worker.
    Default,
    /// Fixed-size chunks dealt round-robin before execution starts.
    Static { chunk: NonZeroUsize },
    /// Fixed-size chunks claimed from a shared cursor on demand.
    Dynamic { chunk: NonZeroUsize },
    /// Shrinking chunks claimed on demand, never smaller than `chunk`
    /// except for the final remainder.
    Guided { chunk: NonZeroUsize },
}

fn require_chunk(kind: PolicyKind, chunk: Option<usize>) -> Result<NonZeroUsize, ConfigError> {
    let raw = chunk.ok_or(ConfigError::MissingChunk(kind.name()))?;
    NonZeroUsize::new(raw).ok_or(ConfigError::InvalidChunk(raw))
}

impl SchedulePolicy {
    /// Build a policy, validating the chunk size. A chunk given with
    /// `Default` is ignored.
    pub fn new(kind: PolicyKind, chunk: Option<usize>) -> Result<Self, ConfigError> {
        match kind {
            PolicyKind::Default => Ok(SchedulePolicy::Default),
            PolicyKind::Static => Ok(SchedulePolicy::Static {
                chunk: require_chunk(kind, chunk)?,
            }),
            PolicyKind::Dynamic => Ok(SchedulePolicy::Dynamic {
                chunk: require_chunk(kind, chunk)?,
            }),
            PolicyKind::Guided => Ok(SchedulePolicy::Guided {
                chunk: require_chunk(kind, chunk)?,
            }),
        }
    }

    pub fn kind(&self) -> PolicyKind {
        match self {
            SchedulePolicy::Default => PolicyKind::Default,
            SchedulePolicy::Static { .. } => PolicyKind::Static,
            SchedulePolicy::Dynamic { .. } => PolicyKind::Dynamic,
            SchedulePolicy::Guided { .. } => PolicyKind::Guided,
        }
    }

    pub fn chunk(&self) -> Option<NonZeroUsize> {
        match self {
            SchedulePolicy::Default => None,
            SchedulePolicy::Static { chunk }
            | SchedulePolicy::Dynamic { chunk }
            | SchedulePolicy::Guided { chunk } => Some(*chunk),
        }
    }

    /// The seven configurations compared by the driver, in log order.
    pub fn comparison_set() -> Vec<SchedulePolicy> {
        vec![
            SchedulePolicy::Default,
            SchedulePolicy::Static { chunk: CHUNK_ONE },
            SchedulePolicy::Static { chunk: CHUNK_FOUR },
            SchedulePolicy::Dynamic { chunk: CHUNK_ONE },
            SchedulePolicy::Dynamic { chunk: CHUNK_FOUR },
            SchedulePolicy::Guided { chunk: CHUNK_ONE },
            SchedulePolicy::Guided { chunk: CHUNK_FOUR },
        ]
    }

    /// Human-readable section label, e.g. `Static schedule, chunk=4`.
    pub fn label(&self) -> String {
        match self.chunk() {
            None => format!("{} schedule", self.kind().name()),
            Some(chunk) => format!("{} schedule, chunk={}", self.kind().name(), chunk),
        }
    }

    /// Inverse of [`SchedulePolicy::label`]. Surrounding whitespace and a
    /// trailing colon are tolerated.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().trim_end_matches(':');
        let (name, rest) = label.split_once("schedule")?;
        let kind: PolicyKind = name.parse().ok()?;
        let chunk = match rest.trim().strip_prefix(',') {
            Some(tail) => Some(tail.trim().strip_prefix("chunk=")?.trim().parse().ok()?),
            None if rest.trim().is_empty() => None,
            None => return None,
        };
        SchedulePolicy::new(kind, chunk).ok()
    }
}

impl fmt::Display for SchedulePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.kind().name().to_ascii_lowercase();
        match self.chunk() {
            None => write!(f, "{}", name),
            Some(chunk) => write!(f, "{},{}", name, chunk),
        }
    }
}

/// Parses the `kind[,chunk]` form, e.g. `guided,4` or `default`.
impl FromStr for SchedulePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, chunk) = match s.split_once(',') {
            Some((kind, chunk)) => {
                let chunk: usize = chunk
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::UnknownPolicy(s.to_string()))?;
                (kind, Some(chunk))
            }
            None => (s, None),
        };
        SchedulePolicy::new(kind.parse()?, chunk)
    }
}

/// Immutable parameters of one scheduling run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunConfig {
    iterations: usize,
    workers: usize,
    policy: SchedulePolicy,
}

impl RunConfig {
    pub fn new(
        iterations: usize,
        workers: usize,
        policy: SchedulePolicy,
    ) -> Result<Self, ConfigError> {
        if iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        if workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        Ok(Self {
            iterations,
            workers,
            policy,
        })
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn policy(&self) -> SchedulePolicy {
        self.policy
    }
}
