//! Bounded-concurrency request dispatch

pub mod executor;
pub mod outcome;

pub use executor::{DispatchOptions, ProgressFn, QueueExecutor};
pub use outcome::QueueOutcome;
