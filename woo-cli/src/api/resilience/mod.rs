//! Retry policies and tuning configuration
//!
//! Provides the per-request retry loop and the connection-wide tuning knobs
//! (attempts, batch stride, concurrency) consumed by the dispatcher.

pub mod config;
pub mod retry;

pub use config::{BatchConfig, ConcurrencyConfig, ResilienceConfig, ResilienceConfigBuilder};
pub use retry::{RetryConfig, RetryMode, RetryPolicy};
