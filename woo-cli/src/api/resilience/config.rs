//! Resilience configuration with builder pattern
//!
//! Bundles the three tuning knobs of a connection (attempts per request,
//! operations per batch request, concurrent requests) together with backoff
//! and timeout settings.

use std::time::Duration;

use super::retry::{RetryConfig, RetryMode};
use crate::api::error::{Result, WooError};

/// Global resilience configuration for a connection
#[derive(Debug, Clone)]
pub struct ResilienceConfig {
    pub retry: RetryConfig,
    pub concurrency: ConcurrencyConfig,
    pub batching: BatchConfig,
    /// Per-exchange timeout handed to the HTTP transport
    pub request_timeout: Duration,
}

/// Dispatcher worker pool sizing
#[derive(Debug, Clone)]
pub struct ConcurrencyConfig {
    /// Number of requests in flight at once (worker count)
    pub max_concurrent_requests: usize,
}

/// Chunking and paging defaults used by the resource operations
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Maximum create/update/delete operations per batch request
    pub batch_stride_size: usize,
    /// Items requested per page when fetching whole collections
    pub page_size: u64,
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            retry: RetryConfig::default(),
            concurrency: ConcurrencyConfig::default(),
            batching: BatchConfig::default(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: 8,
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            // Well under the REST API's cap of 100 objects per batch call
            batch_stride_size: 16,
            page_size: 100,
        }
    }
}

impl ResilienceConfig {
    pub fn builder() -> ResilienceConfigBuilder {
        ResilienceConfigBuilder::new()
    }

    pub fn max_retries(&self) -> u32 {
        self.retry.max_attempts
    }

    pub fn batch_stride_size(&self) -> usize {
        self.batching.batch_stride_size
    }

    pub fn max_concurrent_requests(&self) -> usize {
        self.concurrency.max_concurrent_requests
    }

    /// Reject tuning values the dispatcher cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.retry.max_attempts == 0 {
            return Err(WooError::Configuration("max_retries must be at least 1".into()));
        }
        if self.batching.batch_stride_size == 0 {
            return Err(WooError::Configuration(
                "batch_stride_size must be at least 1".into(),
            ));
        }
        if self.concurrency.max_concurrent_requests == 0 {
            return Err(WooError::Configuration(
                "max_concurrent_requests must be at least 1".into(),
            ));
        }
        if self.batching.page_size == 0 {
            return Err(WooError::Configuration("page_size must be at least 1".into()));
        }
        if !self.retry.backoff_multiplier.is_finite() || self.retry.backoff_multiplier < 1.0 {
            return Err(WooError::Configuration(
                "backoff_multiplier must be a finite value >= 1.0".into(),
            ));
        }
        Ok(())
    }
}

/// Builder for ResilienceConfig
#[derive(Debug)]
pub struct ResilienceConfigBuilder {
    config: ResilienceConfig,
}

impl ResilienceConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ResilienceConfig::default(),
        }
    }

    /// Configure retry behavior
    pub fn retry_config(mut self, retry: RetryConfig) -> Self {
        self.config.retry = retry;
        self
    }

    /// Set attempts per request (initial try included)
    pub fn max_retries(mut self, attempts: u32) -> Self {
        self.config.retry.max_attempts = attempts;
        self
    }

    pub fn retry_mode(mut self, mode: RetryMode) -> Self {
        self.config.retry.mode = mode;
        self
    }

    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.config.retry.base_delay = delay;
        self
    }

    pub fn max_concurrent_requests(mut self, max: usize) -> Self {
        self.config.concurrency.max_concurrent_requests = max;
        self
    }

    pub fn batch_stride_size(mut self, size: usize) -> Self {
        self.config.batching.batch_stride_size = size;
        self
    }

    pub fn page_size(mut self, size: u64) -> Self {
        self.config.batching.page_size = size;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> ResilienceConfig {
        self.config
    }
}

impl Default for ResilienceConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
