use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use super::error::OracleApiError;

/// Retry policy with exponential backoff for oracle requests.
///
/// Backoff doubles with each retry and is capped at `max_backoff_ms`.
/// Only transient errors are retried; permanent ones return immediately.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts
    max_retries: u32,

    /// Initial backoff duration in milliseconds
    initial_backoff_ms: u64,

    /// Maximum backoff duration in milliseconds
    max_backoff_ms: u64,
}

impl RetryPolicy {
    /// Create a new retry policy.
    pub fn new(max_retries: u32, initial_backoff_ms: u64, max_backoff_ms: u64) -> Self {
        Self {
            max_retries,
            initial_backoff_ms,
            max_backoff_ms,
        }
    }

    /// Execute an operation with exponential backoff retry logic.
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T, OracleApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, OracleApiError>>,
    {
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(result) => {
                    if attempt > 0 {
                        debug!(attempt, "operation succeeded after retries");
                    }
                    return Ok(result);
                }
                Err(err) => {
                    if err.is_transient() && attempt < self.max_retries {
                        let backoff = self.calculate_backoff(attempt);
                        warn!(
                            attempt = attempt + 1,
                            error = %err,
                            backoff_ms = backoff.as_millis() as u64,
                            "transient oracle error; retrying"
                        );
                        sleep(backoff).await;
                        attempt += 1;
                    } else {
                        if attempt >= self.max_retries {
                            warn!(attempts = attempt + 1, error = %err, "giving up after retries");
                        } else {
                            debug!(error = %err, "permanent error; not retrying");
                        }
                        return Err(err);
                    }
                }
            }
        }
    }

    fn calculate_backoff(&self, attempt: u32) -> Duration {
        let exp = self
            .initial_backoff_ms
            .saturating_mul(1_u64 << attempt.min(16));
        Duration::from_millis(exp.min(self.max_backoff_ms))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_backoff_ms: 500,
            max_backoff_ms: 10_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_succeeds_first_try() {
        let policy = RetryPolicy::new(3, 1, 10);
        let result: Result<u32, _> = policy.execute(|| async { Ok(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_retries_transient_until_success() {
        let policy = RetryPolicy::new(3, 1, 10);
        let calls = AtomicU32::new(0);

        let result = policy
            .execute(|| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(OracleApiError::ServerError("flaky".to_string()))
                    } else {
                        Ok("steady")
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "steady");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_permanent_error_fails_fast() {
        let policy = RetryPolicy::new(3, 1, 10);
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = policy
            .execute(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(OracleApiError::ModelNotFound("gone".to_string())) }
            })
            .await;

        assert!(matches!(result, Err(OracleApiError::ModelNotFound(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1, "no retry on permanent error");
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let policy = RetryPolicy::new(2, 1, 10);
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = policy
            .execute(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(OracleApiError::Timeout) }
            })
            .await;

        assert!(matches!(result, Err(OracleApiError::Timeout)));
        assert_eq!(calls.load(Ordering::SeqCst), 3, "initial try plus two retries");
    }

    #[test]
    fn test_backoff_is_capped() {
        let policy = RetryPolicy::new(10, 1000, 4000);
        assert_eq!(policy.calculate_backoff(0), Duration::from_millis(1000));
        assert_eq!(policy.calculate_backoff(1), Duration::from_millis(2000));
        assert_eq!(policy.calculate_backoff(5), Duration::from_millis(4000));
    }
}
