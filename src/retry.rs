//! Bounded exponential-backoff retry loop for async operations
//!
//! Wraps an arbitrary async operation in a retry loop driven by a
//! [`RetryPolicy`]. Failures are classified via [`ApiError`] to decide
//! retry eligibility; when the policy is exhausted (or the error is not
//! worth retrying) the *original* error is returned, never the classified
//! wrapper, so callers keep access to the native error shape.

use std::future::Future;
use std::time::Duration;

use crate::error::{ApiError, Classify};

/// Configuration for the retry loop
///
/// A pure configuration value; construct once and share by reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Number of retries after the initial attempt
    pub max_retries: u32,
    /// Delay before the first retry, in milliseconds
    pub initial_delay_ms: u64,
    /// Upper bound on any single delay, in milliseconds
    pub max_delay_ms: u64,
    /// Growth factor applied per attempt
    pub backoff_multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 1000,
            max_delay_ms: 10_000,
            backoff_multiplier: 2,
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with the given retry count and default delays.
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// Computes the backoff delay for a (0-based) attempt number.
    ///
    /// `min(initial_delay * multiplier^attempt, max_delay)`, saturating on
    /// overflow. Deliberately jitter-free so delays are deterministic;
    /// callers that fan out many concurrent loops against one rate limit
    /// may want to add their own jitter on top, the cap still applies.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = self
            .backoff_multiplier
            .checked_pow(attempt)
            .map(u64::from)
            .unwrap_or(u64::MAX);
        let delay_ms = self
            .initial_delay_ms
            .saturating_mul(factor)
            .min(self.max_delay_ms);
        Duration::from_millis(delay_ms)
    }
}

/// Decides whether a classified error warrants another attempt.
///
/// Network and server errors are transient by assumption. HTTP 429 is a
/// client error but also transient (the rate limit will clear), so it is
/// retried too. Every other client error would fail identically on a
/// retry, so it is not.
pub fn should_retry(error: &ApiError, attempt: u32, max_retries: u32) -> bool {
    if attempt >= max_retries {
        return false;
    }
    error.is_network_error || error.is_server_error || error.status == Some(429)
}

/// Runs `operation`, retrying per `policy`.
///
/// See [`with_retry_notify`] for the full contract; this variant simply
/// drops the per-retry notification.
pub async fn with_retry<T, E, F, Fut>(policy: &RetryPolicy, operation: F) -> Result<T, E>
where
    E: Classify,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    with_retry_notify(policy, operation, |_, _| {}).await
}

/// Runs `operation`, retrying per `policy`, reporting each retry.
///
/// The first attempt runs immediately with no delay. On failure the error
/// is classified and checked against [`should_retry`]; if eligible,
/// `notify` is invoked with the 1-based retry number and the classified
/// error (the hook behind "retrying..." notifications), the loop sleeps
/// for the backoff delay, and the operation runs again. Attempts are
/// strictly sequential; a total of `max_retries + 1` invocations happen
/// before giving up.
///
/// # Arguments
/// * `policy` - Retry count and backoff shape
/// * `operation` - Closure producing a fresh future per attempt
/// * `notify` - Called once per retry, before the backoff sleep
///
/// # Returns
/// * `Ok(value)` from the first successful attempt
/// * `Err(original)` - the last raw error, unwrapped, once the policy is
///   exhausted or the error is classified as not retryable
pub async fn with_retry_notify<T, E, F, Fut, N>(
    policy: &RetryPolicy,
    mut operation: F,
    mut notify: N,
) -> Result<T, E>
where
    E: Classify,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    N: FnMut(u32, &ApiError),
{
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(raw) => {
                let classified = ApiError::classify(&raw);
                log::warn!(
                    "attempt {} of {} failed: {}",
                    attempt + 1,
                    policy.max_retries + 1,
                    classified
                );

                if !should_retry(&classified, attempt, policy.max_retries) {
                    return Err(raw);
                }

                notify(attempt + 1, &classified);
                tokio::time::sleep(policy.delay_for(attempt)).await;
                attempt += 1;
            }
        }
    }
}
