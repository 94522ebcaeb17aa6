//! # Progress Reporter
//!
//! Throttled progress notifications for a run. The callback fires each time the
//! processed count reaches a multiple of `max(total / 10, 100)`, and once more with
//! 100% when the run finishes.
//!
//! Counting happens under the state lock; the callback runs after that lock is released,
//! under a separate delivery lock that drops any report older than one already delivered.
//! A slow callback therefore delays only workers that crossed a threshold, and a callback
//! may read [`ProgressReporter::processed`] without deadlocking.

use super::retry::panic_message;
use super::types::ProgressUpdate;
use crate::constants::{PROGRESS_DIVISOR, PROGRESS_MIN_INTERVAL};
use parking_lot::Mutex;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::warn;

/// Caller-supplied progress sink.
///
/// Invocations are serialized, so the callback never runs concurrently with itself, and
/// it should return quickly.
pub type ProgressCallback = Arc<dyn Fn(ProgressUpdate) + Send + Sync>;

#[derive(Debug, Default)]
struct ProgressState {
    processed: usize,
    errors: usize,
    last_reported: Option<usize>,
}

pub struct ProgressReporter {
    total: usize,
    threshold: usize,
    callback: ProgressCallback,
    state: Mutex<ProgressState>,
    // processed_count of the last delivered report
    delivered: Mutex<Option<usize>>,
}

impl std::fmt::Debug for ProgressReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("total", &self.total)
            .field("threshold", &self.threshold)
            .field("state", &*self.state.lock())
            .finish()
    }
}

/// Items between two natural reports for a run of `total` items
pub fn reporting_threshold(total: usize) -> usize {
    (total / PROGRESS_DIVISOR).max(PROGRESS_MIN_INTERVAL)
}

impl ProgressReporter {
    pub fn new(total: usize, callback: ProgressCallback) -> Self {
        Self {
            total,
            threshold: reporting_threshold(total),
            callback,
            state: Mutex::new(ProgressState::default()),
            delivered: Mutex::new(None),
        }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Count one processed item, reporting if a threshold was crossed
    pub fn record(&self, succeeded: bool) {
        self.record_many(1, usize::from(!succeeded));
    }

    /// Count several processed items at once (used when a whole batch is failed)
    pub fn record_many(&self, processed: usize, errors: usize) {
        if processed == 0 {
            return;
        }
        let update = {
            let mut state = self.state.lock();
            let before = state.processed;
            state.processed += processed;
            state.errors += errors;

            if state.processed / self.threshold > before / self.threshold {
                state.last_reported = Some(state.processed);
                Some(ProgressUpdate::new(state.processed, self.total, state.errors))
            } else {
                None
            }
        };

        if let Some(update) = update {
            self.deliver(update);
        }
    }

    /// Emit the final 100% report unless the last report already covered it
    pub fn finish(&self) {
        let update = {
            let mut state = self.state.lock();
            if state.last_reported == Some(self.total) && state.processed >= self.total {
                return;
            }
            // items skipped by a fault are already counted; force the final figure
            state.processed = state.processed.max(self.total);
            state.last_reported = Some(state.processed);
            ProgressUpdate {
                processed_count: state.processed,
                total_count: self.total,
                progress_percentage: 100.0,
                error_count: state.errors,
            }
        };
        self.deliver(update);
    }

    pub fn processed(&self) -> usize {
        self.state.lock().processed
    }

    fn deliver(&self, update: ProgressUpdate) {
        let mut delivered = self.delivered.lock();
        if delivered.is_some_and(|last| update.processed_count < last) {
            // a later report overtook this one between the two locks
            return;
        }
        *delivered = Some(update.processed_count);
        self.invoke(update);
    }

    fn invoke(&self, update: ProgressUpdate) {
        if let Err(payload) = catch_unwind(AssertUnwindSafe(|| (self.callback)(update))) {
            warn!(
                processed = update.processed_count,
                total = update.total_count,
                panic = %panic_message(payload.as_ref()),
                "Progress callback panicked"
            );
        }
    }
}
