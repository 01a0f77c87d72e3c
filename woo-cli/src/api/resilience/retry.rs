//! Per-request retry policy
//!
//! Every request variant runs its single attempt through [`RetryPolicy::execute`].
//! The loop stops at the first success; once attempts run out (or a permanent
//! error is seen under [`RetryMode::Transient`]) the last error is wrapped in
//! [`WooError::RequestExhausted`].

use std::future::Future;
use std::time::Duration;

use log::{debug, warn};
use tokio_util::sync::CancellationToken;

use crate::api::error::{Result, WooError};

/// Which failures earn another attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryMode {
    /// Transport failures, 5xx, 408 and 429 only; everything else fails fast
    #[default]
    Transient,
    /// Any error is retried until attempts run out
    Always,
}

#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts per request (initial try included), at least 1
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
    pub mode: RetryMode,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 2.0,
            mode: RetryMode::Transient,
        }
    }
}

impl RetryConfig {
    /// Retries without any sleeping in between
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            backoff_multiplier: 1.0,
            mode: RetryMode::Always,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    fn should_retry(&self, err: &WooError) -> bool {
        match self.config.mode {
            RetryMode::Always => !matches!(err, WooError::Cancelled),
            RetryMode::Transient => err.is_transient(),
        }
    }

    /// Delay slept after the `attempt`-th failure (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        if self.config.base_delay.is_zero() {
            return Duration::ZERO;
        }

        let exponent = attempt.saturating_sub(1).min(16) as i32;
        let secs = self.config.base_delay.as_secs_f64()
            * self.config.backoff_multiplier.max(1.0).powi(exponent);
        let capped = secs.min(self.config.max_delay.as_secs_f64());

        if capped.is_finite() && capped > 0.0 {
            Duration::from_secs_f64(capped)
        } else {
            self.config.max_delay
        }
    }

    /// Run `attempt` until it succeeds or the policy gives up
    ///
    /// The cancellation token is checked before each attempt and while
    /// sleeping between attempts; an attempt already in flight runs to completion.
    pub async fn execute<F, Fut>(
        &self,
        endpoint: &str,
        cancel: Option<&CancellationToken>,
        mut attempt: F,
    ) -> Result<Vec<u8>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Vec<u8>>>,
    {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt_no = 0;

        loop {
            attempt_no += 1;
            if cancel.is_some_and(|token| token.is_cancelled()) {
                return Err(WooError::Cancelled);
            }

            let err = match attempt().await {
                Ok(bytes) => {
                    if attempt_no > 1 {
                        debug!("{} succeeded on attempt {}", endpoint, attempt_no);
                    }
                    return Ok(bytes);
                }
                Err(err) => err,
            };

            if attempt_no >= max_attempts || !self.should_retry(&err) {
                return Err(WooError::RequestExhausted {
                    endpoint: endpoint.to_string(),
                    attempts: attempt_no,
                    last_error: Box::new(err),
                });
            }

            warn!(
                "Attempt {}/{} for {} failed: {}",
                attempt_no, max_attempts, endpoint, err
            );

            let delay = self.delay_for(attempt_no);
            if delay.is_zero() {
                continue;
            }
            match cancel {
                Some(token) => {
                    tokio::select! {
                        _ = token.cancelled() => return Err(WooError::Cancelled),
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
                None => tokio::time::sleep(delay).await,
            }
        }
    }
}
