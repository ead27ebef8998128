use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::mpsc::Sender;
use std::sync::Mutex;

use iterdist_core::log_format::{event_line, section_header};
use iterdist_core::{AssignmentEvent, SchedulePolicy};

use super::error::SinkError;

/// Consumer of assignment events, shared by all workers of a run.
///
/// Each `record` call is one atomic append: concurrent calls may interleave
/// with each other but never within a single event.
pub trait EventSink: Send + Sync {
    fn record(&self, event: AssignmentEvent) -> Result<(), SinkError>;

    /// Called before each run of a multi-policy sequence.
    fn begin_section(&self, _policy: &SchedulePolicy) -> Result<(), SinkError> {
        Ok(())
    }

    fn flush(&self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Keeps every event in memory, in arrival order.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<AssignmentEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far.
    pub fn events(&self) -> Vec<AssignmentEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn into_events(self) -> Vec<AssignmentEvent> {
        self.events
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl EventSink for MemorySink {
    fn record(&self, event: AssignmentEvent) -> Result<(), SinkError> {
        self.events
            .lock()
            .map_err(|e| SinkError::LockPoisoned(format!("MemorySink: {}", e)))?
            .push(event);
        Ok(())
    }
}

struct LogState {
    writer: BufWriter<File>,
    sections: usize,
}

/// Writes the sectioned text log, one `<i><-><w>` line per event.
pub struct LogFileSink {
    state: Mutex<LogState>,
}

impl LogFileSink {
    /// Create (or truncate) the log file at `path`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let file = File::create(path)?;
        Ok(Self {
            state: Mutex::new(LogState {
                writer: BufWriter::new(file),
                sections: 0,
            }),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, LogState>, SinkError> {
        self.state
            .lock()
            .map_err(|e| SinkError::LockPoisoned(format!("LogFileSink: {}", e)))
    }
}

impl EventSink for LogFileSink {
    fn record(&self, event: AssignmentEvent) -> Result<(), SinkError> {
        self.lock()?.writer.write_all(event_line(&event).as_bytes())?;
        Ok(())
    }

    fn begin_section(&self, policy: &SchedulePolicy) -> Result<(), SinkError> {
        let mut state = self.lock()?;
        let header = section_header(policy, state.sections == 0);
        state.writer.write_all(header.as_bytes())?;
        state.sections += 1;
        Ok(())
    }

    fn flush(&self) -> Result<(), SinkError> {
        self.lock()?.writer.flush()?;
        Ok(())
    }
}

/// Forwards events to a channel for streaming consumers.
pub struct ChannelSink {
    tx: Sender<AssignmentEvent>,
}

impl ChannelSink {
    pub fn new(tx: Sender<AssignmentEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelSink {
    fn record(&self, event: AssignmentEvent) -> Result<(), SinkError> {
        self.tx.send(event).map_err(|_| SinkError::Closed)
    }
}
