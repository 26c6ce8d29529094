//! Deadline-bounded sending with retry on transport failure.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::{HttpClientError, HttpExecutor, HttpRequest, HttpResponse};
use crate::core::config::OutboundConfig;

/// How many times to retry, how long to wait between attempts, and how long
/// a single attempt may take.
///
/// The delay before retry `k` (0-indexed) is `backoff_base * 2^k`, with no
/// jitter. Every attempt gets a fresh deadline of `attempt_timeout`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff_base: Duration,
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&OutboundConfig::default())
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff_base: Duration, attempt_timeout: Duration) -> Self {
        Self {
            max_retries,
            backoff_base,
            attempt_timeout,
        }
    }

    pub fn from_config(config: &OutboundConfig) -> Self {
        Self::new(
            config.max_retries,
            config.backoff_base(),
            config.attempt_timeout(),
        )
    }

    /// Retries without waiting between attempts (for tests).
    pub fn immediate(max_retries: u32) -> Self {
        Self::new(max_retries, Duration::ZERO, Duration::from_secs(30))
    }

    /// One attempt, no retries.
    pub fn single_attempt(attempt_timeout: Duration) -> Self {
        Self::new(0, Duration::ZERO, attempt_timeout)
    }

    /// Same policy with a different per-attempt deadline.
    pub fn with_attempt_timeout(mut self, attempt_timeout: Duration) -> Self {
        self.attempt_timeout = attempt_timeout;
        self
    }

    /// Delay before retry number `retry` (0 for the first retry).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 2u32.checked_pow(retry).unwrap_or(u32::MAX);
        self.backoff_base.saturating_mul(factor)
    }
}

/// Sends requests through an [`HttpExecutor`] under a [`RetryPolicy`].
#[derive(Clone)]
pub struct ResilientTransport {
    executor: Arc<dyn HttpExecutor>,
    policy: RetryPolicy,
}

impl ResilientTransport {
    pub fn new(executor: Arc<dyn HttpExecutor>, policy: RetryPolicy) -> Self {
        Self { executor, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Send `request`, retrying only when no response was received.
    ///
    /// Returns the first received response as-is, error statuses included.
    /// When every attempt fails, returns the last attempt's error unchanged.
    pub async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, HttpClientError> {
        let attempts = self.policy.max_retries.saturating_add(1);
        let mut last_error = HttpClientError::network("No request attempted");

        for attempt in 0..attempts {
            if attempt > 0 {
                let delay = self.policy.delay_for(attempt - 1);
                warn!(
                    "Retrying {} {} (attempt {}/{}) after {}ms: {}",
                    request.method,
                    request.url,
                    attempt + 1,
                    attempts,
                    delay.as_millis(),
                    last_error
                );
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }

            let outcome =
                tokio::time::timeout(self.policy.attempt_timeout, self.executor.execute(request))
                    .await;

            match outcome {
                Ok(Ok(response)) => {
                    debug!("Received HTTP {} on attempt {}", response.status, attempt + 1);
                    return Ok(response);
                }
                Ok(Err(e)) if !e.is_retryable() => {
                    warn!("{} {} failed after a response arrived: {}", request.method, request.url, e);
                    return Err(e);
                }
                Ok(Err(e)) => last_error = e,
                Err(_) => last_error = HttpClientError::Timeout(self.policy.attempt_timeout),
            }
        }

        Err(last_error)
    }
}
