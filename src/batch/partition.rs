//! Splitting a run's input into contiguous batches.

use crate::error::{BatchEngineError, Result};

/// Split `items` into contiguous chunks of `batch_size`, the last possibly shorter.
///
/// Empty input yields no batches. A zero `batch_size` is rejected.
pub fn partition<T>(items: Vec<T>, batch_size: usize) -> Result<Vec<Vec<T>>> {
    if batch_size == 0 {
        return Err(BatchEngineError::InvalidBatchSize(batch_size));
    }

    let mut batches = Vec::with_capacity(items.len().div_ceil(batch_size));
    let mut items = items.into_iter().peekable();
    while items.peek().is_some() {
        batches.push(items.by_ref().take(batch_size).collect());
    }
    Ok(batches)
}
