//! Shared builders for batch engine integration tests

use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tasker_batch::{BatchConfig, BatchRunner, ProgressUpdate};

/// Runner on the current runtime with the given shape
pub fn test_runner(batch_size: usize, worker_count: usize) -> BatchRunner {
    BatchRunner::new(
        BatchConfig::default()
            .with_batch_size(batch_size)
            .with_worker_count(worker_count),
    )
    .expect("test runner configuration is valid")
}

/// Progress callback that records every update it receives
#[derive(Clone, Default)]
pub struct ProgressRecorder {
    updates: Arc<Mutex<Vec<ProgressUpdate>>>,
}

impl ProgressRecorder {
    pub fn callback(&self) -> impl Fn(ProgressUpdate) + Send + Sync + 'static {
        let updates = self.updates.clone();
        move |update| updates.lock().push(update)
    }

    pub fn updates(&self) -> Vec<ProgressUpdate> {
        self.updates.lock().clone()
    }
}

/// Per-item call counter for units of work that fail a fixed number of times
#[derive(Clone, Default)]
pub struct CallCounter {
    calls: Arc<Mutex<std::collections::HashMap<String, usize>>>,
    total: Arc<AtomicUsize>,
}

impl CallCounter {
    /// Record a call for `item` and return how many calls it has had so far
    pub fn hit(&self, item: &str) -> usize {
        self.total.fetch_add(1, Ordering::SeqCst);
        let mut calls = self.calls.lock();
        let count = calls.entry(item.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    pub fn calls_for(&self, item: &str) -> usize {
        self.calls.lock().get(item).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }
}
