pub mod args;
pub mod config;
pub mod error;
pub mod event;
pub mod log_format;
pub mod policy;

pub use args::{DriverArgs, Fallback, Parsed, DEFAULT_ITERATIONS, DEFAULT_THREADS};
pub use config::Config;
pub use error::*;
pub use event::AssignmentEvent;
pub use log_format::{parse_log, Section, SectionBalance};
pub use policy::{PolicyKind, RunConfig, SchedulePolicy};
