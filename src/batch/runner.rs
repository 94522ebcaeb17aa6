//! # Batch Runner
//!
//! Orchestrates a run: partitions the input, executes batches concurrently on the
//! Tokio runtime (bounded by the runner's worker pool), executes the items of a batch
//! sequentially, and aggregates per-item outcomes into a single result.
//!
//! ```text
//! submit ─▶ Partitioning ─▶ Executing ─┬─▶ batch 0: item, item, item ─┐
//!                                       ├─▶ batch 1: item, item, item ─┼─▶ Aggregating ─▶ Completed
//!                                       └─▶ batch n: item, item       ─┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tasker_batch::{BatchConfig, BatchRunner};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let runner = BatchRunner::new(BatchConfig::default().with_batch_size(2))?;
//!
//! let result = runner
//!     .process(vec![1u64, 2, 3, 4, 5], |x: u64| async move { Ok::<_, String>(x * x) })
//!     .await?;
//!
//! assert_eq!(result.success_count, 5);
//! # Ok(())
//! # }
//! ```

use super::aggregator::{BatchOutcome, ResultAggregator};
use super::handle::BatchHandle;
use super::partition::partition;
use super::progress::{ProgressCallback, ProgressReporter};
use super::retry::{execute_with_retry, run_attempt, RetryPolicy};
use super::types::{BatchError, BatchErrorKind, BatchResult, BatchSummary, ProgressUpdate};
use super::unit_of_work::UnitOfWork;
use crate::config::BatchConfig;
use crate::constants::{events, RunState, BATCH_LEVEL_FAILURE_PREFIX};
use crate::error::{BatchEngineError, Result};
use crate::logging::log_batch_operation;
use std::fmt;
use std::fmt::Display;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn, Instrument};
use uuid::Uuid;

/// What happens to each item of a transform run
#[derive(Clone)]
pub enum ExecutionMode {
    /// Invoke the unit of work once per item
    Plain,
    /// Invoke the unit of work through the retry executor
    Retrying(RetryPolicy),
    /// Invoke once per item and report progress to the callback
    Progress(ProgressCallback),
}

impl fmt::Debug for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::Plain => write!(f, "Plain"),
            ExecutionMode::Retrying(policy) => f.debug_tuple("Retrying").field(policy).finish(),
            ExecutionMode::Progress(_) => write!(f, "Progress(<callback>)"),
        }
    }
}

impl ExecutionMode {
    fn name(&self) -> &'static str {
        match self {
            ExecutionMode::Plain => "plain",
            ExecutionMode::Retrying(_) => "retrying",
            ExecutionMode::Progress(_) => "progress",
        }
    }
}

/// Entry point of the engine.
///
/// Items must be `Display`, which renders the identifier carried by a `BatchError`, and
/// `Clone`, because the mode is chosen per run and a retrying run re-submits each attempt
/// with a fresh copy of the item. Plain and side-effect runs never clone an item.
///
/// Cloning is cheap; clones share the worker pool and the shutdown token, so the
/// `worker_count` bound holds across every run submitted through any clone.
#[derive(Debug, Clone)]
pub struct BatchRunner {
    config: Arc<BatchConfig>,
    permits: Arc<Semaphore>,
    runtime: Handle,
    shutdown: CancellationToken,
}

impl BatchRunner {
    /// Create a runner on the current Tokio runtime
    pub fn new(config: BatchConfig) -> Result<Self> {
        let runtime = Handle::try_current()
            .map_err(|e| BatchEngineError::RuntimeUnavailable(e.to_string()))?;
        Self::with_runtime(config, runtime)
    }

    /// Create a runner that schedules its work on `runtime`
    pub fn with_runtime(config: BatchConfig, runtime: Handle) -> Result<Self> {
        config.validate()?;
        info!(
            batch_size = config.batch_size,
            worker_count = config.worker_count,
            item_timeout_ms = config.item_timeout_ms,
            "Batch runner initialized"
        );
        Ok(Self {
            permits: Arc::new(Semaphore::new(config.worker_count)),
            config: Arc::new(config),
            runtime,
            shutdown: CancellationToken::new(),
        })
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Workers not currently executing a batch
    pub fn available_workers(&self) -> usize {
        self.permits.available_permits()
    }

    /// Retry policy derived from the runner's configuration
    pub fn default_retry_policy(&self) -> Result<RetryPolicy> {
        self.config.retry_policy()
    }

    /// Submit a transform run.
    ///
    /// Returns immediately; the run executes on the runtime and the handle resolves
    /// once every batch has finished all of its items.
    pub fn submit<T, R, U>(
        &self,
        items: Vec<T>,
        unit: U,
        mode: ExecutionMode,
    ) -> BatchHandle<BatchResult<R>>
    where
        T: Clone + Display + Send + Sync + 'static,
        R: Send + 'static,
        U: UnitOfWork<T, R> + 'static,
    {
        self.spawn_run(items, unit, mode, |result| result)
    }

    /// Transform every item once
    pub fn process<T, R, U>(&self, items: Vec<T>, unit: U) -> BatchHandle<BatchResult<R>>
    where
        T: Clone + Display + Send + Sync + 'static,
        R: Send + 'static,
        U: UnitOfWork<T, R> + 'static,
    {
        self.submit(items, unit, ExecutionMode::Plain)
    }

    /// Transform every item, retrying failures according to `policy`
    pub fn process_with_retry<T, R, U>(
        &self,
        items: Vec<T>,
        unit: U,
        policy: RetryPolicy,
    ) -> BatchHandle<BatchResult<R>>
    where
        T: Clone + Display + Send + Sync + 'static,
        R: Send + 'static,
        U: UnitOfWork<T, R> + 'static,
    {
        self.submit(items, unit, ExecutionMode::Retrying(policy))
    }

    /// Transform every item, reporting throttled progress to `callback`
    pub fn process_with_progress<T, R, U, F>(
        &self,
        items: Vec<T>,
        unit: U,
        callback: F,
    ) -> BatchHandle<BatchResult<R>>
    where
        T: Clone + Display + Send + Sync + 'static,
        R: Send + 'static,
        U: UnitOfWork<T, R> + 'static,
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.submit(items, unit, ExecutionMode::Progress(Arc::new(callback)))
    }

    /// Run a side-effect-only unit of work over every item
    pub fn for_each<T, U>(&self, items: Vec<T>, unit: U) -> BatchHandle<BatchSummary>
    where
        T: Clone + Display + Send + Sync + 'static,
        U: UnitOfWork<T, ()> + 'static,
    {
        self.for_each_with_mode(items, unit, ExecutionMode::Plain)
    }

    /// Side-effect run with retrying or progress tracking
    pub fn for_each_with_mode<T, U>(
        &self,
        items: Vec<T>,
        unit: U,
        mode: ExecutionMode,
    ) -> BatchHandle<BatchSummary>
    where
        T: Clone + Display + Send + Sync + 'static,
        U: UnitOfWork<T, ()> + 'static,
    {
        self.spawn_run(items, unit, mode, BatchSummary::from)
    }

    fn spawn_run<T, R, U, O, F>(
        &self,
        items: Vec<T>,
        unit: U,
        mode: ExecutionMode,
        finish: F,
    ) -> BatchHandle<O>
    where
        T: Clone + Display + Send + Sync + 'static,
        R: Send + 'static,
        U: UnitOfWork<T, R> + 'static,
        O: Send + 'static,
        F: FnOnce(BatchResult<R>) -> O + Send + 'static,
    {
        let run_id = Uuid::new_v4();
        let cancel = self.shutdown.child_token();
        let run = RunContext {
            run_id,
            cancel: cancel.clone(),
            batch_size: self.config.batch_size,
            item_timeout: self.config.item_timeout(),
            permits: self.permits.clone(),
            runtime: self.runtime.clone(),
        };

        log_batch_operation(
            events::RUN_SUBMITTED,
            run_id,
            items.len(),
            None,
            None,
            Some(mode.name()),
        );

        let task = self.runtime.spawn(async move {
            execute_run(run, items, Arc::new(unit), mode)
                .await
                .map(finish)
        });
        BatchHandle::new(run_id, cancel, task)
    }

    /// Cancel every in-flight run and refuse further batches
    pub fn shutdown(&self) {
        warn!("Batch runner shutting down");
        self.shutdown.cancel();
        self.permits.close();
    }

    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }
}

/// Everything a run needs from its runner
struct RunContext {
    run_id: Uuid,
    cancel: CancellationToken,
    batch_size: usize,
    item_timeout: Option<Duration>,
    permits: Arc<Semaphore>,
    runtime: Handle,
}

#[instrument(skip_all, fields(run_id = %run.run_id, mode = mode.name(), total = items.len()))]
async fn execute_run<T, R, U>(
    run: RunContext,
    items: Vec<T>,
    unit: Arc<U>,
    mode: ExecutionMode,
) -> Result<BatchResult<R>>
where
    T: Clone + Display + Send + Sync + 'static,
    R: Send + 'static,
    U: UnitOfWork<T, R> + 'static,
{
    let started = Instant::now();
    let total = items.len();
    debug!(state = %RunState::Submitted, "Run state transition");

    if run.permits.is_closed() {
        return Err(BatchEngineError::WorkerPoolClosed);
    }

    debug!(state = %RunState::Partitioning, "Run state transition");
    let batches = partition(items, run.batch_size)?;

    let (retry, progress) = match mode {
        ExecutionMode::Plain => (None, None),
        ExecutionMode::Retrying(policy) => (Some(policy), None),
        ExecutionMode::Progress(callback) => {
            (None, Some(Arc::new(ProgressReporter::new(total, callback))))
        }
    };
    let aggregator = Arc::new(ResultAggregator::with_capacity(total));

    debug!(state = %RunState::Executing, batches = batches.len(), "Run state transition");
    let mut tasks = Vec::with_capacity(batches.len());
    for (batch_index, batch) in batches.into_iter().enumerate() {
        let identifiers: Arc<[String]> = batch.iter().map(ToString::to_string).collect();
        let worker = BatchWorker {
            batch_index,
            unit: unit.clone(),
            retry,
            item_timeout: run.item_timeout,
            progress: progress.clone(),
            cancel: run.cancel.clone(),
            aggregator: aggregator.clone(),
        };
        let permits = run.permits.clone();
        let worker_identifiers = identifiers.clone();

        let task = run.runtime.spawn(
            async move {
                let _permit = match permits.acquire_owned().await {
                    Ok(permit) => permit,
                    // pool closed by a shutdown that also cancelled this run
                    Err(_) if worker.cancel.is_cancelled() => {
                        worker.abandon(&worker_identifiers);
                        return Ok(());
                    }
                    Err(_) => return Err(BatchEngineError::WorkerPoolClosed),
                };
                worker.run(batch, worker_identifiers).await;
                Ok(())
            }
            .in_current_span(),
        );
        tasks.push((batch_index, identifiers, task));
    }

    for (batch_index, identifiers, task) in tasks {
        match task.await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                error!(batch_index, error = %err, "Worker pool unavailable");
                return Err(err);
            }
            Err(join_error) => {
                error!(
                    batch_index,
                    items = identifiers.len(),
                    error = %join_error,
                    "Batch faulted, failing every item in the batch"
                );
                log_batch_operation(
                    events::BATCH_FAILED,
                    run.run_id,
                    identifiers.len(),
                    Some(0),
                    Some(identifiers.len()),
                    Some(&join_error.to_string()),
                );
                for identifier in identifiers.iter() {
                    aggregator.record_error(BatchError::with_kind(
                        identifier.clone(),
                        format!("{BATCH_LEVEL_FAILURE_PREFIX}: {join_error}"),
                        BatchErrorKind::Batch,
                    ));
                }
            }
        }
    }

    debug!(state = %RunState::Aggregating, "Run state transition");
    if let Some(progress) = &progress {
        progress.finish();
    }
    let result = aggregator.take_result(run.run_id, total, started.elapsed());

    let operation = if run.cancel.is_cancelled() {
        events::RUN_CANCELLED
    } else {
        events::RUN_COMPLETED
    };
    log_batch_operation(
        operation,
        run.run_id,
        total,
        Some(result.success_count),
        Some(result.failure_count()),
        None,
    );
    debug!(
        state = %RunState::Completed,
        elapsed_ms = result.elapsed.as_millis() as u64,
        success_rate = result.success_rate(),
        "Run state transition"
    );

    Ok(result)
}

/// Executes the items of one batch in order
struct BatchWorker<U, R> {
    batch_index: usize,
    unit: Arc<U>,
    retry: Option<RetryPolicy>,
    item_timeout: Option<Duration>,
    progress: Option<Arc<ProgressReporter>>,
    cancel: CancellationToken,
    aggregator: Arc<ResultAggregator<R>>,
}

impl<U, R> BatchWorker<U, R>
where
    R: Send + 'static,
{
    async fn run<T>(self, items: Vec<T>, identifiers: Arc<[String]>)
    where
        T: Clone + Send + Sync + 'static,
        U: UnitOfWork<T, R>,
    {
        let batch_len = items.len();
        let mut outcome = BatchOutcome::with_capacity(batch_len);

        for (position, item) in items.into_iter().enumerate() {
            if self.cancel.is_cancelled() {
                self.skip_remaining(&identifiers[position..], &mut outcome);
                break;
            }

            let identifier = identifiers[position].as_str();
            let result = match &self.retry {
                Some(policy) => execute_with_retry(
                    &item,
                    identifier,
                    self.unit.as_ref(),
                    policy,
                    self.item_timeout,
                    &self.cancel,
                )
                .await
                .map_err(|exhausted| exhausted.into_batch_error(identifier)),
                None => run_attempt(self.unit.as_ref(), item, self.item_timeout)
                    .await
                    .map_err(|failure| failure.into_batch_error(identifier)),
            };

            let succeeded = result.is_ok();
            match result {
                Ok(value) => outcome.results.push(value),
                Err(err) => {
                    debug!(
                        batch_index = self.batch_index,
                        item = %identifier,
                        kind = %err.kind,
                        error = %err.message,
                        "Item failed"
                    );
                    outcome.errors.push(err);
                }
            }
            if let Some(progress) = &self.progress {
                progress.record(succeeded);
            }
        }

        debug!(
            batch_index = self.batch_index,
            processed = outcome.processed(),
            failed = outcome.errors.len(),
            "Batch finished"
        );
        self.aggregator.merge(outcome);
    }

    /// Fail the whole batch as cancelled without executing anything
    fn abandon(self, identifiers: &[String]) {
        let mut outcome = BatchOutcome::with_capacity(0);
        self.skip_remaining(identifiers, &mut outcome);
        self.aggregator.merge(outcome);
    }

    fn skip_remaining(&self, identifiers: &[String], outcome: &mut BatchOutcome<R>) {
        debug!(
            batch_index = self.batch_index,
            skipped = identifiers.len(),
            "Run cancelled, skipping remaining items"
        );
        outcome.errors.extend(identifiers.iter().map(|identifier| {
            BatchError::with_kind(
                identifier.clone(),
                "run cancelled before item was processed",
                BatchErrorKind::Cancelled,
            )
        }));
        if let Some(progress) = &self.progress {
            progress.record_many(identifiers.len(), identifiers.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn runner(batch_size: usize, worker_count: usize) -> BatchRunner {
        BatchRunner::new(
            BatchConfig::default()
                .with_batch_size(batch_size)
                .with_worker_count(worker_count),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_plain_transform() {
        let result = runner(2, 4)
            .process(vec![1, 2, 3, 4, 5], |x: i32| async move { Ok::<_, String>(x * x) })
            .await
            .unwrap();

        let squares: HashSet<i32> = result.results.iter().copied().collect();
        assert_eq!(squares, HashSet::from([1, 4, 9, 16, 25]));
        assert!(result.errors.is_empty());
        assert_eq!(result.success_count, 5);
        assert_eq!(result.total_count, 5);
    }

    #[tokio::test]
    async fn test_partial_failure_isolated_to_item() {
        let result = runner(2, 2)
            .process(vec!["a", "b", "c"], |s: &'static str| async move {
                if s == "b" {
                    Err(format!("cannot process {s}"))
                } else {
                    Ok(s.to_uppercase())
                }
            })
            .await
            .unwrap();

        let values: HashSet<String> = result.results.into_iter().collect();
        assert_eq!(values, HashSet::from(["A".to_string(), "C".to_string()]));
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].item_identifier, "b");
        assert_eq!(result.errors[0].message, "cannot process b");
        assert_eq!(result.errors[0].kind, BatchErrorKind::Item);
    }

    #[tokio::test]
    async fn test_retry_exhaustion_counts_invocations() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let policy = RetryPolicy::new(3, Duration::from_millis(1)).unwrap();

        let result = runner(10, 2)
            .process_with_retry(
                vec!["x"],
                move |_item: &'static str| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    async move { Err::<(), _>("gateway unavailable") }
                },
                policy,
            )
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].item_identifier, "x");
        assert_eq!(result.errors[0].message, "gateway unavailable");
        assert_eq!(
            result.errors[0].kind,
            BatchErrorKind::RetryExhausted { attempts: 3 }
        );
    }

    #[tokio::test]
    async fn test_side_effect_summary() {
        let written = Arc::new(AtomicUsize::new(0));
        let sink = written.clone();

        let summary = runner(3, 2)
            .for_each((0..10).collect(), move |id: u32| {
                let sink = sink.clone();
                async move {
                    if id % 5 == 0 {
                        return Err(format!("record {id} locked"));
                    }
                    sink.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            })
            .await
            .unwrap();

        assert_eq!(summary.total_count, 10);
        assert_eq!(summary.success_count, 8);
        assert_eq!(summary.failure_count, 2);
        assert_eq!(summary.success_count + summary.failure_count, summary.total_count);
        assert_eq!(written.load(Ordering::SeqCst), 8);
    }

    #[tokio::test]
    async fn test_empty_input_completes() {
        let result = runner(4, 1)
            .process(Vec::<u8>::new(), |x: u8| async move { Ok::<_, String>(x) })
            .await
            .unwrap();

        assert_eq!(result.total_count, 0);
        assert_eq!(result.success_rate(), 0.0);
    }

    #[tokio::test]
    async fn test_panicking_item_does_not_affect_siblings() {
        let result = runner(4, 1)
            .process(vec![1u32, 0, 2, 4], |x: u32| async move {
                if x == 0 {
                    panic!("unexpected zero");
                }
                Ok::<_, String>(8 / x)
            })
            .await
            .unwrap();

        assert_eq!(result.success_count, 3);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].item_identifier, "0");
        assert!(result.errors[0].message.contains("unexpected zero"));
    }

    #[tokio::test]
    async fn test_concurrent_batches_bounded_by_worker_count() {
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let (active_in, peak_in) = (active.clone(), peak.clone());

        let result = runner(2, 3)
            .process((0..40).collect(), move |x: u32| {
                let active = active_in.clone();
                let peak = peak_in.clone();
                async move {
                    let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(2)).await;
                    active.fetch_sub(1, Ordering::SeqCst);
                    Ok::<_, String>(x)
                }
            })
            .await
            .unwrap();

        assert_eq!(result.success_count, 40);
        assert!(peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn test_cancel_before_start_marks_items_cancelled() {
        let handle = runner(2, 2).process(vec![1, 2, 3, 4, 5], |x: i32| async move {
            Ok::<_, String>(x)
        });
        handle.cancel();

        let result = handle.await.unwrap();
        assert_eq!(result.success_count + result.errors.len(), 5);
        assert!(result
            .errors
            .iter()
            .all(|error| error.kind == BatchErrorKind::Cancelled));
    }

    #[tokio::test]
    async fn test_item_timeout() {
        let runner = BatchRunner::new(
            BatchConfig::default()
                .with_batch_size(2)
                .with_worker_count(2)
                .with_item_timeout(Duration::from_millis(20)),
        )
        .unwrap();

        let result = runner
            .process(vec![0u64, 5_000], |delay: u64| async move {
                tokio::time::sleep(Duration::from_millis(delay)).await;
                Ok::<_, String>(delay)
            })
            .await
            .unwrap();

        assert_eq!(result.results, vec![0]);
        assert_eq!(result.errors[0].item_identifier, "5000");
        assert_eq!(result.errors[0].kind, BatchErrorKind::TimedOut);
    }

    #[tokio::test]
    async fn test_shutdown_fails_new_runs() {
        let runner = runner(2, 2);
        runner.shutdown();
        assert!(runner.is_shut_down());

        let outcome = runner
            .process(vec![1, 2], |x: i32| async move { Ok::<_, String>(x) })
            .await;
        assert_eq!(outcome.unwrap_err(), BatchEngineError::WorkerPoolClosed);
    }

    #[tokio::test]
    async fn test_shutdown_mid_run_cancels_waiting_batches() {
        let runner = runner(1, 1);
        let started = Arc::new(AtomicUsize::new(0));
        let seen = started.clone();

        let handle = runner.process((0..20u32).collect(), move |x: u32| {
            seen.fetch_add(1, Ordering::SeqCst);
            async move {
                tokio::time::sleep(Duration::from_millis(5)).await;
                Ok::<_, String>(x)
            }
        });
        while started.load(Ordering::SeqCst) < 2 {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        runner.shutdown();

        let result = handle.await.unwrap();
        assert_eq!(result.success_count + result.errors.len(), 20);
        assert!(result
            .errors
            .iter()
            .all(|error| error.kind == BatchErrorKind::Cancelled));
        assert!(!result.errors.is_empty());
    }

    /// Item whose `Clone` panics for one poisoned value
    #[derive(Debug)]
    struct FragileRecord(u32);

    impl Clone for FragileRecord {
        fn clone(&self) -> Self {
            if self.0 == 3 {
                panic!("record {} cannot be copied", self.0);
            }
            FragileRecord(self.0)
        }
    }

    impl Display for FragileRecord {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    #[tokio::test]
    async fn test_batch_fault_fails_every_item_of_that_batch() {
        let policy = RetryPolicy::new(2, Duration::from_millis(1)).unwrap();
        let items = (0..6).map(FragileRecord).collect();

        let result = runner(2, 2)
            .process_with_retry(
                items,
                |record: FragileRecord| async move { Ok::<_, String>(record.0 * 2) },
                policy,
            )
            .await
            .unwrap();

        assert_eq!(result.total_count, 6);
        assert_eq!(result.success_count + result.errors.len(), 6);

        // item "2" succeeded before the fault but its batch merges nothing partial
        let values: HashSet<u32> = result.results.iter().copied().collect();
        assert_eq!(values, HashSet::from([0, 2, 8, 10]));

        let failed: HashSet<&str> = result
            .errors
            .iter()
            .map(|error| error.item_identifier.as_str())
            .collect();
        assert_eq!(failed, HashSet::from(["2", "3"]));
        for error in &result.errors {
            assert_eq!(error.kind, BatchErrorKind::Batch);
            assert!(error.message.starts_with(BATCH_LEVEL_FAILURE_PREFIX));
        }
    }

    #[test]
    fn test_new_without_runtime_is_run_level_failure() {
        let result = BatchRunner::new(BatchConfig::default());
        assert!(matches!(
            result,
            Err(BatchEngineError::RuntimeUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_zero_batch_size_rejected() {
        let result = BatchRunner::new(BatchConfig::default().with_batch_size(0));
        assert!(matches!(result, Err(BatchEngineError::InvalidBatchSize(0))));
    }
}
