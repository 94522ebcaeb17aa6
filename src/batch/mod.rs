//! # Batch Processing Engine
//!
//! Type-agnostic batch execution: partition a collection of work items, run the
//! partitions concurrently, and collect per-item successes and failures.
//!
//! ## Components
//!
//! - [`partition`] - contiguous fixed-size batches
//! - [`retry`] - bounded fixed-delay retries for a single item
//! - [`aggregator`] - concurrency-safe accumulation of outcomes
//! - [`progress`] - throttled progress callbacks
//! - [`runner`] - orchestration of a run and its four execution modes
//! - [`handle`] - the future a caller awaits for the aggregate result
//!
//! ## Failure isolation
//!
//! A failing item never affects its siblings or other batches. Errors and panics
//! raised by the unit of work become [`BatchError`] entries; only run-level
//! infrastructure failures resolve the [`BatchHandle`] to `Err`.

pub mod aggregator;
pub mod handle;
pub mod partition;
pub mod progress;
pub mod retry;
pub mod runner;
pub mod types;
pub mod unit_of_work;

pub use aggregator::{AggregateSnapshot, BatchOutcome, ResultAggregator};
pub use handle::BatchHandle;
pub use partition::partition;
pub use progress::{reporting_threshold, ProgressCallback, ProgressReporter};
pub use retry::{execute_with_retry, ItemFailure, RetryExhausted, RetryPolicy};
pub use runner::{BatchRunner, ExecutionMode};
pub use types::{BatchError, BatchErrorKind, BatchResult, BatchSummary, ProgressUpdate};
pub use unit_of_work::UnitOfWork;
