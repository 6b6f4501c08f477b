//! Bounded retries for index reads.
//!
//! Each attempt runs under its own timeout. Transient failures
//! (timeouts, transport errors) are retried with exponential backoff;
//! anything else is returned immediately.

use crate::core::config::BackendConfig;
use crate::core::error::{Result, VitrineError};
use backon::{ExponentialBuilder, Retryable};
use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub timeout: Duration,
    pub max_retries: usize,
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &BackendConfig) -> Self {
        Self {
            timeout: Duration::from_millis(config.request_timeout_ms),
            max_retries: config.max_retries,
            min_delay: Duration::from_millis(config.retry_min_delay_ms),
            max_delay: Duration::from_millis(config.retry_max_delay_ms),
        }
    }

    /// Run `operation`, retrying transient failures
    ///
    /// Returns `ServiceUnavailable` once retries are exhausted.
    pub async fn run<T, F, Fut>(&self, name: &str, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let timeout = self.timeout;
        let timeout_ms = timeout.as_millis() as u64;

        let attempt = || {
            let fut = operation();
            async move {
                match tokio::time::timeout(timeout, fut).await {
                    Ok(result) => result,
                    Err(_) => Err(VitrineError::Timeout(timeout_ms)),
                }
            }
        };

        let backoff = ExponentialBuilder::default()
            .with_min_delay(self.min_delay)
            .with_max_delay(self.max_delay)
            .with_max_times(self.max_retries);

        let result = attempt
            .retry(backoff)
            .sleep(tokio::time::sleep)
            .when(|e: &VitrineError| e.is_transient())
            .notify(|e: &VitrineError, delay: Duration| {
                tracing::warn!(operation = name, error = %e, delay_ms = delay.as_millis() as u64, "Retrying index request");
            })
            .await;

        match result {
            Err(e) if e.is_transient() => {
                tracing::error!(operation = name, error = %e, "Index request failed after retries");
                Err(VitrineError::ServiceUnavailable(format!(
                    "{name} failed after {} attempts: {e}",
                    self.max_retries + 1
                )))
            }
            other => other,
        }
    }
}
