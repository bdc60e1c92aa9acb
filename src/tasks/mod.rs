//! Background tasks
//!
//! - `access_tracker`: queued last-access updates off the redirect path
//! - `retention`: periodic deletion of idle aliases

pub mod access_tracker;
pub mod retention;

pub use access_tracker::{AccessTracker, AccessTrackerWorker};
pub use retention::{RetentionSweeper, SweeperHandle};
