//! Value types produced by a batch run.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// Why an item ended up in the error list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum BatchErrorKind {
    /// The unit of work returned an error or panicked
    Item,
    /// Every retry attempt failed; the message is the last attempt's
    RetryExhausted { attempts: u32 },
    /// The unit of work did not finish within the item timeout
    TimedOut,
    /// The run was cancelled before the item was processed
    Cancelled,
    /// The batch containing the item faulted outside any single item
    Batch,
}

impl fmt::Display for BatchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchErrorKind::Item => write!(f, "item"),
            BatchErrorKind::RetryExhausted { attempts } => {
                write!(f, "retry exhausted after {attempts} attempts")
            }
            BatchErrorKind::TimedOut => write!(f, "timed out"),
            BatchErrorKind::Cancelled => write!(f, "cancelled"),
            BatchErrorKind::Batch => write!(f, "batch"),
        }
    }
}

/// A single failed item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchError {
    pub item_identifier: String,
    pub message: String,
    pub kind: BatchErrorKind,
}

impl BatchError {
    pub fn new(item_identifier: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_kind(item_identifier, message, BatchErrorKind::Item)
    }

    pub fn with_kind(
        item_identifier: impl Into<String>,
        message: impl Into<String>,
        kind: BatchErrorKind,
    ) -> Self {
        Self {
            item_identifier: item_identifier.into(),
            message: message.into(),
            kind,
        }
    }
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.item_identifier, self.kind, self.message)
    }
}

fn success_rate(success_count: usize, total_count: usize) -> f64 {
    if total_count == 0 {
        0.0
    } else {
        success_count as f64 / total_count as f64 * 100.0
    }
}

/// Aggregate result of a transform run (plain, retrying or progress-tracked)
///
/// `results` carries no ordering relationship to the input.
#[derive(Debug, Clone, Serialize)]
pub struct BatchResult<R> {
    pub run_id: Uuid,
    pub results: Vec<R>,
    pub errors: Vec<BatchError>,
    pub success_count: usize,
    pub total_count: usize,
    #[serde(with = "duration_millis")]
    pub elapsed: Duration,
}

impl<R> BatchResult<R> {
    pub fn failure_count(&self) -> usize {
        self.errors.len()
    }

    /// Percentage of items that succeeded, `0.0` for an empty run
    pub fn success_rate(&self) -> f64 {
        success_rate(self.success_count, self.total_count)
    }

    pub fn is_complete_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Aggregate result of a side-effect run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub run_id: Uuid,
    pub total_count: usize,
    pub success_count: usize,
    pub failure_count: usize,
    pub errors: Vec<BatchError>,
    #[serde(with = "duration_millis")]
    pub elapsed: Duration,
}

impl BatchSummary {
    pub fn success_rate(&self) -> f64 {
        success_rate(self.success_count, self.total_count)
    }
}

impl From<BatchResult<()>> for BatchSummary {
    fn from(result: BatchResult<()>) -> Self {
        Self {
            run_id: result.run_id,
            total_count: result.total_count,
            success_count: result.success_count,
            failure_count: result.errors.len(),
            errors: result.errors,
            elapsed: result.elapsed,
        }
    }
}

/// Snapshot handed to a progress callback
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgressUpdate {
    pub processed_count: usize,
    pub total_count: usize,
    pub progress_percentage: f64,
    pub error_count: usize,
}

impl ProgressUpdate {
    pub fn new(processed_count: usize, total_count: usize, error_count: usize) -> Self {
        let progress_percentage = if total_count == 0 {
            100.0
        } else {
            processed_count as f64 / total_count as f64 * 100.0
        };
        Self {
            processed_count,
            total_count,
            progress_percentage,
            error_count,
        }
    }
}

mod duration_millis {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }
}
