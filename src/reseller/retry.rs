// Retry layer for reseller API calls: bounded exponential backoff,
// transient failures only.

use std::future::Future;
use std::time::Duration;
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_retry::RetryIf;
use tracing::warn;

use super::errors::ApiError;
use crate::config;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(50),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl From<&config::RetryConfig> for RetryPolicy {
    fn from(cfg: &config::RetryConfig) -> Self {
        Self {
            max_attempts: cfg.max_attempts,
            base_delay: Duration::from_millis(cfg.base_delay_ms),
            max_delay: Duration::from_millis(cfg.max_delay_ms),
        }
    }
}

impl RetryPolicy {
    /// Run `operation`, retrying on retryable `ApiError`s with exponential
    /// backoff. Non-retryable errors (NotFound, Conflict, 4xx) surface
    /// immediately so callers can classify them.
    pub async fn run<T, F, Fut>(&self, operation_name: &str, mut operation: F) -> Result<T, ApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let strategy = ExponentialBackoff::from_millis(self.base_delay.as_millis() as u64)
            .max_delay(self.max_delay)
            .take(self.max_attempts as usize)
            .map(jitter);

        RetryIf::spawn(
            strategy,
            || operation(),
            |error: &ApiError| {
                let retryable = error.is_retryable();
                if retryable {
                    warn!(operation = operation_name, %error, "transient API failure, retrying");
                }
                retryable
            },
        )
        .await
    }
}
