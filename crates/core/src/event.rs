use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LogParseError;

/// Separator between iteration index and worker id in the text log.
pub const EVENT_SEPARATOR: &str = "<->";

/// Record that `iteration` was executed by `worker`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssignmentEvent {
    pub iteration: usize,
    pub worker: usize,
}

impl AssignmentEvent {
    pub fn new(iteration: usize, worker: usize) -> Self {
        Self { iteration, worker }
    }
}

impl fmt::Display for AssignmentEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.iteration, EVENT_SEPARATOR, self.worker)
    }
}

impl FromStr for AssignmentEvent {
    type Err = LogParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || LogParseError::MalformedEvent(s.to_string());
        let (iteration, worker) = s.trim().split_once(EVENT_SEPARATOR).ok_or_else(malformed)?;
        Ok(Self {
            iteration: iteration.trim().parse().map_err(|_| malformed())?,
            worker: worker.trim().parse().map_err(|_| malformed())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_log_line() {
        assert_eq!(AssignmentEvent::new(12, 3).to_string(), "12<->3");
    }

    #[test]
    fn parses_log_line() {
        assert_eq!("7<->0".parse(), Ok(AssignmentEvent::new(7, 0)));
        assert_eq!(" 7<->0 ".parse(), Ok(AssignmentEvent::new(7, 0)));
        assert!("7<-0".parse::<AssignmentEvent>().is_err());
        assert!("a<->0".parse::<AssignmentEvent>().is_err());
        assert!("-1<->0".parse::<AssignmentEvent>().is_err());
    }
}
