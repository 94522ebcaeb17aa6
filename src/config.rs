//! # Batch Engine Configuration
//!
//! Layered configuration for the batch engine: built-in defaults, then an optional
//! configuration file (TOML, YAML or JSON, detected from the extension), then
//! `TASKER_BATCH_*` environment variables.
//!
//! ```rust,no_run
//! use tasker_batch::config::BatchConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = BatchConfig::load(Some("config/batch.toml"))?;
//! println!("batch size: {}", config.batch_size);
//! # Ok(())
//! # }
//! ```

use crate::batch::RetryPolicy;
use crate::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY_MS, ENV_PREFIX,
};
use crate::error::{BatchEngineError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Items per batch; every batch but the last has exactly this many items
    pub batch_size: usize,
    /// Maximum number of batches executing at the same time
    pub worker_count: usize,
    /// Attempts per item in retrying mode, first attempt included
    pub max_attempts: u32,
    /// Fixed delay between attempts in retrying mode
    pub retry_delay_ms: u64,
    /// Optional upper bound on a single unit-of-work invocation
    #[serde(default)]
    pub item_timeout_ms: Option<u64>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            worker_count: default_worker_count(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            item_timeout_ms: None,
        }
    }
}

fn default_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

impl BatchConfig {
    /// Load defaults overlaid with `TASKER_BATCH_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::load(None::<&Path>)
    }

    /// Load defaults, then the optional file, then environment overrides
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let defaults = Self::default();

        let mut builder = ::config::Config::builder()
            .set_default("batch_size", defaults.batch_size as i64)?
            .set_default("worker_count", defaults.worker_count as i64)?
            .set_default("max_attempts", i64::from(defaults.max_attempts))?
            .set_default("retry_delay_ms", defaults.retry_delay_ms as i64)?;

        if let Some(path) = path {
            let path = path.as_ref();
            debug!(path = %path.display(), "Loading batch configuration file");
            builder = builder.add_source(::config::File::from(path).required(true));
        }

        let loaded: BatchConfig = builder
            .add_source(::config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        loaded.validate()?;
        Ok(loaded)
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(BatchEngineError::InvalidBatchSize(self.batch_size));
        }
        if self.worker_count == 0 {
            return Err(BatchEngineError::Configuration(
                "worker_count must be a positive integer".to_string(),
            ));
        }
        if self.worker_count > Semaphore::MAX_PERMITS {
            return Err(BatchEngineError::Configuration(format!(
                "worker_count {} exceeds the maximum of {}",
                self.worker_count,
                Semaphore::MAX_PERMITS
            )));
        }
        if self.max_attempts == 0 {
            return Err(BatchEngineError::Configuration(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        if self.item_timeout_ms == Some(0) {
            return Err(BatchEngineError::Configuration(
                "item_timeout_ms must be positive when set".to_string(),
            ));
        }
        Ok(())
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn item_timeout(&self) -> Option<Duration> {
        self.item_timeout_ms.map(Duration::from_millis)
    }

    /// Retry policy built from `max_attempts` and `retry_delay_ms`
    pub fn retry_policy(&self) -> Result<RetryPolicy> {
        RetryPolicy::new(self.max_attempts, self.retry_delay())
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    pub fn with_item_timeout(mut self, timeout: Duration) -> Self {
        self.item_timeout_ms = Some(timeout.as_millis() as u64);
        self
    }
}
