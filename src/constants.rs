//! # Engine Constants
//!
//! Defaults and event names shared by the batch engine, its configuration layer
//! and its structured logging.

use serde::{Deserialize, Serialize};

/// Default number of items per batch
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Default number of attempts per item in retrying mode (first attempt included)
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default fixed delay between retry attempts
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

/// Progress is never reported more often than every this many items
pub const PROGRESS_MIN_INTERVAL: usize = 100;

/// Progress is reported roughly every `1 / PROGRESS_DIVISOR` of the run
pub const PROGRESS_DIVISOR: usize = 10;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "TASKER_BATCH";

/// Message prefix attached to errors produced by a batch-level fault
pub const BATCH_LEVEL_FAILURE_PREFIX: &str = "batch-level failure";

/// Run lifecycle events, used as the `operation` field of structured logs
pub mod events {
    pub const RUN_SUBMITTED: &str = "batch.run_submitted";
    pub const RUN_COMPLETED: &str = "batch.run_completed";
    pub const RUN_CANCELLED: &str = "batch.run_cancelled";
    pub const BATCH_FAILED: &str = "batch.batch_failed";
    pub const ITEM_RETRY_EXHAUSTED: &str = "batch.item_retry_exhausted";
}

/// Lifecycle of a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Submitted,
    Partitioning,
    Executing,
    Aggregating,
    Completed,
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunState::Submitted => write!(f, "submitted"),
            RunState::Partitioning => write!(f, "partitioning"),
            RunState::Executing => write!(f, "executing"),
            RunState::Aggregating => write!(f, "aggregating"),
            RunState::Completed => write!(f, "completed"),
        }
    }
}
