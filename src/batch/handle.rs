//! Future-like handle to a submitted run.

use crate::error::{BatchEngineError, Result};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Resolves to the aggregate outcome of a run once every batch has finished.
///
/// Dropping the handle does not stop the run; call [`BatchHandle::cancel`] for that.
/// The handle only resolves to `Err` for run-level failures; per-item failures are
/// reported inside the aggregate.
#[derive(Debug)]
pub struct BatchHandle<O> {
    run_id: Uuid,
    cancel: CancellationToken,
    inner: JoinHandle<Result<O>>,
}

impl<O> BatchHandle<O> {
    pub(crate) fn new(run_id: Uuid, cancel: CancellationToken, inner: JoinHandle<Result<O>>) -> Self {
        Self {
            run_id,
            cancel,
            inner,
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Stop starting new items. Items already executing finish normally; items not yet
    /// started are reported as cancelled errors.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Token observed by the run, for units of work that want to stop early themselves
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }
}

impl<O> Future for BatchHandle<O> {
    type Output = Result<O>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.inner).poll(cx) {
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            Poll::Ready(Err(join_error)) => Poll::Ready(Err(BatchEngineError::RunAborted(
                join_error.to_string(),
            ))),
            Poll::Pending => Poll::Pending,
        }
    }
}
