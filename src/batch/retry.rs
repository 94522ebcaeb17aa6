//! # Retry Executor
//!
//! Applies a unit of work to one item with a bounded number of attempts and a fixed
//! delay between them. The delay is an async sleep on the item's own task, so it
//! suspends only that item; sibling items and other batches keep running.

use super::types::{BatchError, BatchErrorKind};
use super::unit_of_work::UnitOfWork;
use crate::constants::events;
use crate::error::{BatchEngineError, Result};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Bounded, fixed-delay retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// `max_attempts` counts the first attempt and must be at least 1
    pub fn new(max_attempts: u32, delay: Duration) -> Result<Self> {
        if max_attempts == 0 {
            return Err(BatchEngineError::Configuration(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            max_attempts,
            delay,
        })
    }

    /// Single attempt, no delay
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            delay: Duration::ZERO,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

/// Failure of one invocation of the unit of work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    pub message: String,
    pub kind: BatchErrorKind,
}

impl ItemFailure {
    pub fn into_batch_error(self, item_identifier: impl Into<String>) -> BatchError {
        BatchError::with_kind(item_identifier, self.message, self.kind)
    }
}

/// Every attempt failed; only the last failure is kept
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("retry exhausted after {attempts} attempts: {}", last_failure.message)]
pub struct RetryExhausted {
    pub attempts: u32,
    pub last_failure: ItemFailure,
}

impl RetryExhausted {
    pub fn into_batch_error(self, item_identifier: impl Into<String>) -> BatchError {
        BatchError::with_kind(
            item_identifier,
            self.last_failure.message,
            BatchErrorKind::RetryExhausted {
                attempts: self.attempts,
            },
        )
    }
}

/// Invoke the unit of work once, converting errors, panics and timeouts into
/// an [`ItemFailure`]
pub async fn run_attempt<T, R, U>(
    unit: &U,
    item: T,
    timeout: Option<Duration>,
) -> std::result::Result<R, ItemFailure>
where
    T: Send + 'static,
    R: Send + 'static,
    U: UnitOfWork<T, R> + ?Sized,
{
    let guarded = AssertUnwindSafe(unit.execute(item)).catch_unwind();

    let outcome = match timeout {
        Some(limit) => match tokio::time::timeout(limit, guarded).await {
            Ok(outcome) => outcome,
            Err(_) => {
                return Err(ItemFailure {
                    message: format!("unit of work timed out after {}ms", limit.as_millis()),
                    kind: BatchErrorKind::TimedOut,
                })
            }
        },
        None => guarded.await,
    };

    match outcome {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(ItemFailure {
            message: err.to_string(),
            kind: BatchErrorKind::Item,
        }),
        Err(payload) => Err(ItemFailure {
            message: format!("unit of work panicked: {}", panic_message(payload.as_ref())),
            kind: BatchErrorKind::Item,
        }),
    }
}

/// Run `unit` against `item` up to `policy.max_attempts()` times.
///
/// Returns the first success. After the last failed attempt the most recent failure is
/// surfaced as [`RetryExhausted`]. Cancelling `cancel` interrupts a pending delay and
/// stops further attempts.
pub async fn execute_with_retry<T, R, U>(
    item: &T,
    item_identifier: &str,
    unit: &U,
    policy: &RetryPolicy,
    timeout: Option<Duration>,
    cancel: &CancellationToken,
) -> std::result::Result<R, RetryExhausted>
where
    T: Clone + Send + 'static,
    R: Send + 'static,
    U: UnitOfWork<T, R> + ?Sized,
{
    let mut attempt = 1;
    loop {
        let failure = match run_attempt(unit, item.clone(), timeout).await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(item = %item_identifier, attempt, "Item succeeded after retry");
                }
                return Ok(value);
            }
            Err(failure) => failure,
        };

        if attempt >= policy.max_attempts {
            warn!(
                operation = events::ITEM_RETRY_EXHAUSTED,
                item = %item_identifier,
                attempts = attempt,
                error = %failure.message,
                "Retry attempts exhausted"
            );
            return Err(RetryExhausted {
                attempts: attempt,
                last_failure: failure,
            });
        }

        debug!(
            item = %item_identifier,
            attempt,
            max_attempts = policy.max_attempts,
            delay_ms = policy.delay.as_millis() as u64,
            error = %failure.message,
            "Attempt failed, retrying"
        );

        tokio::select! {
            _ = cancel.cancelled() => {
                warn!(item = %item_identifier, attempts = attempt, "Retry interrupted by cancellation");
                return Err(RetryExhausted {
                    attempts: attempt,
                    last_failure: failure,
                });
            }
            _ = tokio::time::sleep(policy.delay) => {}
        }

        attempt += 1;
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
