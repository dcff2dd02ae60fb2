use std::time::Duration;

use epochval_utils::config::{
    Config, DEFAULT_BATCH_SIZE, DEFAULT_FETCH_TIMEOUT_MS, DEFAULT_INTER_BATCH_DELAY_MS,
};

use crate::AggregatorError;

/// Tunables of the aggregation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    /// Addresses per batch, which is also the peak number of in-flight
    /// lookups.
    pub batch_size: usize,
    /// Fixed pause between two consecutive batches.
    pub inter_batch_delay: Duration,
    /// Upper bound for a single balance lookup.
    pub fetch_timeout: Duration,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            inter_batch_delay: Duration::from_millis(DEFAULT_INTER_BATCH_DELAY_MS),
            fetch_timeout: Duration::from_millis(DEFAULT_FETCH_TIMEOUT_MS),
        }
    }
}

impl PipelineSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            batch_size: config.batch_size,
            inter_batch_delay: Duration::from_millis(config.inter_batch_delay_ms),
            fetch_timeout: config.fetch_timeout(),
        }
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.batch_size == 0 {
            return Err(AggregatorError::ZeroBatchSize);
        }
        if self.fetch_timeout.is_zero() {
            return Err(AggregatorError::ZeroFetchTimeout);
        }
        Ok(())
    }

    /// Number of batches needed for `address_count` addresses.
    pub fn batch_count(&self, address_count: usize) -> usize {
        address_count.div_ceil(self.batch_size.max(1))
    }
}
