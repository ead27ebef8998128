//! Iteration scheduler runner -- drives a worker pool over one iteration space.
//!
//! Split into focused submodules:
//! - `core`: IterationScheduler struct, constructor, and accessors
//! - `execution`: worker loop, single runs, and multi-policy sequences
//! - `verify`: post-run partition check over the recorded claims

mod core;
mod execution;
mod verify;

pub use self::core::IterationScheduler;
pub use self::verify::verify_partition;
