//! The per-item work a caller hands to the engine.

use async_trait::async_trait;
use std::fmt::Display;
use std::future::Future;

/// Work applied to each item of a run.
///
/// Any async closure `Fn(T) -> impl Future<Output = Result<R, E>>` with a displayable
/// error implements this trait. Implementations must tolerate concurrent invocation:
/// the engine calls `execute` from several batches at once.
#[async_trait]
pub trait UnitOfWork<T, R>: Send + Sync
where
    T: Send + 'static,
    R: Send + 'static,
{
    type Error: Display + Send + 'static;

    async fn execute(&self, item: T) -> Result<R, Self::Error>;
}

#[async_trait]
impl<T, R, E, F, Fut> UnitOfWork<T, R> for F
where
    F: Fn(T) -> Fut + Send + Sync,
    Fut: Future<Output = Result<R, E>> + Send + 'static,
    T: Send + 'static,
    R: Send + 'static,
    E: Display + Send + 'static,
{
    type Error = E;

    async fn execute(&self, item: T) -> Result<R, E> {
        self(item).await
    }
}
