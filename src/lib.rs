#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Tasker Batch
//!
//! Generic batch task-processing engine for the Tasker backend services.
//!
//! ## Overview
//!
//! Domain services hand the engine a collection of work items and an async unit of
//! work. The engine partitions the items into fixed-size batches, executes batches
//! concurrently on a bounded worker pool, executes the items of each batch in order,
//! and resolves a handle with the aggregated successes and per-item errors.
//!
//! ## Execution Modes
//!
//! - **Plain** - transform each item once ([`BatchRunner::process`])
//! - **Side effect** - run for effect, return counts only ([`BatchRunner::for_each`])
//! - **Retrying** - bounded fixed-delay retries per item ([`BatchRunner::process_with_retry`])
//! - **Progress** - throttled progress callbacks ([`BatchRunner::process_with_progress`])
//!
//! ## Module Organization
//!
//! - [`batch`] - partitioning, retries, aggregation, progress and the runner
//! - [`config`] - layered configuration (defaults, file, environment)
//! - [`error`] - run-level errors
//! - [`logging`] - structured logging setup
//! - [`constants`] - defaults, event names and run states
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tasker_batch::{BatchConfig, BatchRunner, RetryPolicy};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! tasker_batch::logging::init_structured_logging();
//!
//! let runner = BatchRunner::new(BatchConfig::from_env()?)?;
//! let policy = RetryPolicy::new(3, Duration::from_millis(500))?;
//!
//! let result = runner
//!     .process_with_retry(vec![101u64, 102, 103], |claim_id: u64| async move {
//!         // submit the claim to the clearing house
//!         Ok::<_, String>(claim_id)
//!     }, policy)
//!     .await?;
//!
//! println!("{} of {} claims submitted", result.success_count, result.total_count);
//! for error in &result.errors {
//!     println!("claim {} failed: {}", error.item_identifier, error.message);
//! }
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;

pub use batch::{
    partition, BatchError, BatchErrorKind, BatchHandle, BatchResult, BatchRunner, BatchSummary,
    ExecutionMode, ProgressUpdate, RetryPolicy, UnitOfWork,
};
pub use config::BatchConfig;
pub use constants::RunState;
pub use error::{BatchEngineError, Result};
