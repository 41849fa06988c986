//! Shared retry policy for upstream API calls.
//!
//! Every upstream call site (video platform, LLM) retries through the same
//! policy object instead of an ad-hoc loop: a bounded number of attempts
//! with a doubling delay, retrying only errors the caller's predicate
//! marks as transient.

use std::future::Future;
use std::time::Duration;

/// Bounded exponential back-off: `base_delay_ms`, then double per attempt.
///
/// With the default policy the schedule is 1000 ms, 2000 ms, 4000 ms.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1_000,
        }
    }
}

impl RetryPolicy {
    /// Runs `operation`, retrying errors for which `is_retryable` returns
    /// `true` until the attempt budget is exhausted. Non-retryable errors
    /// are returned immediately.
    ///
    /// # Errors
    ///
    /// Returns the last error once retries are exhausted, or the first
    /// non-retryable error.
    pub async fn run<T, E, F, Fut, P>(&self, mut is_retryable: P, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: FnMut(&E) -> bool,
        E: std::fmt::Display,
    {
        let mut attempt = 0u32;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if !is_retryable(&err) || attempt >= self.max_retries {
                        return Err(err);
                    }
                    let delay_ms = self.base_delay_ms << attempt.min(10);
                    attempt += 1;
                    tracing::warn!(
                        attempt,
                        max_retries = self.max_retries,
                        delay_ms,
                        error = %err,
                        "transient upstream error, retrying after back-off"
                    );
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
            }
        }
    }
}
