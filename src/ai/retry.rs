//! Retry with Exponential Backoff
//!
//! Reusable retry loop for any fallible async operation.
//!
//! Attempts are numbered `1..=max_attempts`. After a failed attempt `i` with
//! attempts remaining, the loop sleeps `backoff(base_delay, i)` before trying
//! again; the default backoff is `base_delay * 2^(i-1)` with no jitter. Every
//! error is retried the same way. When attempts run out the last error is
//! wrapped in `DeckError::Generation`.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::RetryConfig;
use crate::constants::retry as retry_constants;
use crate::types::{DeckError, Result};

/// Delay to wait after failed attempt `attempt` (1-based)
pub type BackoffFn = fn(base: Duration, attempt: u32) -> Duration;

/// `base * 2^(attempt-1)`
pub fn exponential_backoff(base: Duration, attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(31);
    base.saturating_mul(1u32 << exponent)
}

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    backoff: BackoffFn,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            retry_constants::MAX_ATTEMPTS,
            Duration::from_millis(retry_constants::BASE_DELAY_MS),
        )
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            backoff: exponential_backoff,
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(config.max_attempts, config.base_delay())
    }

    /// Replace the backoff function
    pub fn with_backoff(mut self, backoff: BackoffFn) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay_after(&self, attempt: u32) -> Duration {
        (self.backoff)(self.base_delay, attempt)
    }

    /// Run `op` until it succeeds or attempts are exhausted.
    ///
    /// `op` receives the 1-based attempt number.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut op: F) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1;
        loop {
            match op(attempt).await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(operation, attempt, "Succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(err) => {
                    warn!(
                        operation,
                        attempt,
                        max_attempts = self.max_attempts,
                        category = %err.category(),
                        error = %err,
                        "Attempt failed"
                    );

                    if attempt >= self.max_attempts {
                        return Err(DeckError::Generation {
                            attempts: attempt,
                            source: Box::new(err),
                        });
                    }

                    let delay = self.delay_after(attempt);
                    debug!(operation, delay_ms = delay.as_millis() as u64, "Waiting before next attempt");
                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Instant;

    #[test]
    fn test_exponential_schedule() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_after(1), Duration::from_millis(1000));
        assert_eq!(policy.delay_after(2), Duration::from_millis(2000));
        assert_eq!(policy.delay_after(3), Duration::from_millis(4000));
    }

    #[test]
    fn test_custom_backoff() {
        fn constant(base: Duration, _attempt: u32) -> Duration {
            base
        }
        let policy = RetryPolicy::new(3, Duration::from_millis(7)).with_backoff(constant);
        assert_eq!(policy.delay_after(1), Duration::from_millis(7));
        assert_eq!(policy.delay_after(5), Duration::from_millis(7));
    }

    #[test]
    fn test_zero_attempts_clamped() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts(), 1);
    }

    #[tokio::test]
    async fn test_always_failing_runs_every_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::new(3, Duration::from_millis(5));
        let start = Instant::now();

        let counter = calls.clone();
        let result: Result<()> = policy
            .run("always-fails", |attempt| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(DeckError::Config(format!("boom {}", attempt)))
                }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // 5ms after attempt 1, 10ms after attempt 2
        assert!(start.elapsed() >= Duration::from_millis(15));

        match result {
            Err(DeckError::Generation { attempts, source }) => {
                assert_eq!(attempts, 3);
                assert_eq!(source.to_string(), "Config error: boom 3");
            }
            other => panic!("expected generation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_succeeds_after_two_failures() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::new(3, Duration::from_millis(1));

        let counter = calls.clone();
        let result = policy
            .run("flaky", |attempt| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    if attempt < 3 {
                        Err(DeckError::parse("not yet", ""))
                    } else {
                        Ok(attempt * 10)
                    }
                }
            })
            .await
            .unwrap();

        assert_eq!(result, 30);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_first_success_does_not_retry() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::new(3, Duration::from_secs(60));

        let counter = calls.clone();
        let value = policy
            .run("ok", |_| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok("done")
                }
            })
            .await
            .unwrap();

        assert_eq!(value, "done");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
