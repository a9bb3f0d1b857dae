//! Retry loop shared by every store operation.
//!
//! An operation is attempted up to `max_attempts` times. Only transient
//! failures (see [`ApiError::is_transient`]) are retried; the delay between
//! attempts doubles from `backoff_base` with a little jitter.

use crate::api::ApiError;
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, warn};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BACKOFF_BASE: Duration = Duration::from_millis(250);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff_base: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_BACKOFF_BASE)
    }
}

impl RetryPolicy {
    /// `max_attempts` is clamped to at least one attempt.
    #[must_use]
    pub fn new(max_attempts: u32, backoff_base: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff_base,
        }
    }

    /// Retries immediately, without sleeping between attempts.
    #[must_use]
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO)
    }

    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    #[must_use]
    pub fn backoff_base(&self) -> Duration {
        self.backoff_base
    }

    /// Delay after the failed `attempt` (1-based): base * 2^(attempt-1), scaled
    /// by a random 80-100%.
    fn backoff(&self, attempt: u32) -> Duration {
        if self.backoff_base.is_zero() {
            return Duration::ZERO;
        }
        let factor = rand::thread_rng().gen_range(80..=100);
        let exponential = self
            .backoff_base
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)));
        exponential.saturating_mul(factor) / 100
    }
}

/// Runs `operation` until it succeeds, fails terminally, or the policy runs out
/// of attempts. The last error is returned.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    name: &str,
    mut operation: F,
) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),

            Err(e) if e.is_transient() && attempt < policy.max_attempts => {
                let delay = policy.backoff(attempt);
                warn!(
                    operation = name,
                    attempt,
                    backoff_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "Request failed, retrying: {}",
                    e
                );
                if !delay.is_zero() {
                    sleep(delay).await;
                }
                attempt += 1;
            }

            Err(e) => {
                error!(
                    operation = name,
                    attempt, "Request failed after {} attempt(s): {}", attempt, e
                );
                return Err(e);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn unavailable() -> ApiError {
        ApiError::Http {
            status: 503,
            message: "unavailable".to_string(),
        }
    }

    #[tokio::test]
    async fn stops_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<(), ApiError> = with_retry(&RetryPolicy::immediate(3), "test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(unavailable()) }
        })
        .await;

        assert_eq!(result, Err(unavailable()));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let result = with_retry(&RetryPolicy::immediate(3), "test", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(ApiError::Network("reset".to_string()))
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn terminal_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<(), ApiError> = with_retry(&RetryPolicy::immediate(3), "test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(ApiError::Http {
                    status: 400,
                    message: "bad".to_string(),
                })
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn zero_attempts_still_tries_once() {
        assert_eq!(RetryPolicy::immediate(0).max_attempts(), 1);
    }

    #[test]
    fn backoff_doubles_within_jitter() {
        let policy = RetryPolicy::new(3, Duration::from_millis(100));
        let first = policy.backoff(1);
        let second = policy.backoff(2);
        assert!(first >= Duration::from_millis(80) && first <= Duration::from_millis(100));
        assert!(second >= Duration::from_millis(160) && second <= Duration::from_millis(200));
        assert_eq!(RetryPolicy::immediate(3).backoff(2), Duration::ZERO);
    }
}
