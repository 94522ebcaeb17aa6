//! # Result Aggregator
//!
//! Concurrency-safe accumulation of per-item outcomes for one run. Batch workers
//! collect outcomes locally in a [`BatchOutcome`] and merge it once when the batch
//! finishes, so the shared lock is taken once per batch rather than once per item.

use super::types::{BatchError, BatchResult};
use parking_lot::Mutex;
use std::time::Duration;
use uuid::Uuid;

/// Outcomes collected by a single batch before merging
#[derive(Debug)]
pub struct BatchOutcome<R> {
    pub results: Vec<R>,
    pub errors: Vec<BatchError>,
}

impl<R> BatchOutcome<R> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            results: Vec::with_capacity(capacity),
            errors: Vec::new(),
        }
    }

    pub fn processed(&self) -> usize {
        self.results.len() + self.errors.len()
    }
}

impl<R> Default for BatchOutcome<R> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

/// Point-in-time copy of the accumulated state
#[derive(Debug, Clone)]
pub struct AggregateSnapshot<R> {
    pub results: Vec<R>,
    pub errors: Vec<BatchError>,
    pub success_count: usize,
}

#[derive(Debug)]
struct AggregatorState<R> {
    results: Vec<R>,
    errors: Vec<BatchError>,
}

#[derive(Debug)]
pub struct ResultAggregator<R> {
    state: Mutex<AggregatorState<R>>,
}

impl<R> ResultAggregator<R> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: Mutex::new(AggregatorState {
                results: Vec::with_capacity(capacity),
                errors: Vec::new(),
            }),
        }
    }

    pub fn record_success(&self, result: R) {
        self.state.lock().results.push(result);
    }

    pub fn record_error(&self, error: BatchError) {
        self.state.lock().errors.push(error);
    }

    pub fn record_error_parts(&self, item_identifier: impl Into<String>, message: impl Into<String>) {
        self.record_error(BatchError::new(item_identifier, message));
    }

    /// Append everything a batch collected under a single lock acquisition
    pub fn merge(&self, outcome: BatchOutcome<R>) {
        let mut state = self.state.lock();
        state.results.extend(outcome.results);
        state.errors.extend(outcome.errors);
    }

    pub fn success_count(&self) -> usize {
        self.state.lock().results.len()
    }

    pub fn error_count(&self) -> usize {
        self.state.lock().errors.len()
    }

    pub fn snapshot(&self) -> AggregateSnapshot<R>
    where
        R: Clone,
    {
        let state = self.state.lock();
        AggregateSnapshot {
            results: state.results.clone(),
            errors: state.errors.clone(),
            success_count: state.results.len(),
        }
    }

    /// Move the accumulated state out into the run's final result
    pub fn take_result(&self, run_id: Uuid, total_count: usize, elapsed: Duration) -> BatchResult<R> {
        let state = std::mem::replace(
            &mut *self.state.lock(),
            AggregatorState {
                results: Vec::new(),
                errors: Vec::new(),
            },
        );
        BatchResult {
            run_id,
            success_count: state.results.len(),
            results: state.results,
            errors: state.errors,
            total_count,
            elapsed,
        }
    }
}

impl<R> Default for ResultAggregator<R> {
    fn default() -> Self {
        Self::new()
    }
}
