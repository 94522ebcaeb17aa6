//! # Engine Errors
//!
//! Run-level failures only. Per-item failures are data, carried in
//! [`BatchError`](crate::batch::BatchError) entries of the aggregate result, and never
//! surface through this type.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchEngineError {
    #[error("Invalid batch size {0}: batch size must be a positive integer")]
    InvalidBatchSize(usize),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Runtime unavailable: {0}")]
    RuntimeUnavailable(String),

    #[error("Worker pool closed")]
    WorkerPoolClosed,

    #[error("Run aborted: {0}")]
    RunAborted(String),
}

impl From<::config::ConfigError> for BatchEngineError {
    fn from(err: ::config::ConfigError) -> Self {
        BatchEngineError::Configuration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BatchEngineError>;
