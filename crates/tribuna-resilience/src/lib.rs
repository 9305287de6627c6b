// SPDX-FileCopyrightText: 2026 Tribuna Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic exponential backoff for upstream calls.
//!
//! [`execute`] wraps an async operation in an explicit retry loop: attempt,
//! check the error against an injected predicate, wait, attempt again. Delays
//! double from a base up to a cap and carry no jitter, so tests under a
//! paused clock see exact timings. The wait is a plain [`tokio::time::sleep`];
//! dropping the future (a disconnected caller) cancels a pending wait and no
//! further attempt runs.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// Retry policy for one class of upstream calls.
///
/// Immutable for the life of the process; built from configuration at
/// startup. The set of retryable failures is not part of the policy - the
/// caller passes a predicate to [`execute`], which keeps this crate free of
/// any particular error type.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. Never zero.
    pub max_attempts: u32,
    /// Delay before the second attempt. Doubles per subsequent attempt.
    pub base_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Builds a policy, normalizing degenerate values: at least one attempt
    /// always runs, and the cap is never below the base delay.
    pub fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay: max_delay.max(base_delay),
        }
    }

    /// Delay to wait after `completed_attempts` failed attempts:
    /// `min(base * 2^(n-1), cap)`.
    fn delay_for(&self, completed_attempts: u32) -> Duration {
        let exp = completed_attempts.saturating_sub(1).min(31);
        let delay = self.base_delay.saturating_mul(1u32 << exp);
        delay.min(self.max_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(500), Duration::from_millis(8000))
    }
}

/// Runs `operation` under the retry policy.
///
/// The first success returns immediately. An error that `is_retryable`
/// rejects, or the error of the final attempt, is returned unchanged - this
/// wrapper is transparent and never substitutes its own error type.
pub async fn execute<T, E, Op, Fut, R>(
    policy: &RetryPolicy,
    mut operation: Op,
    is_retryable: R,
) -> Result<T, E>
where
    Op: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    R: Fn(&E) -> bool,
{
    let mut attempt = 1u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if attempt >= policy.max_attempts || !is_retryable(&err) {
                    return Err(err);
                }
                let delay = policy.delay_for(attempt);
                warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "retrying after transient upstream failure"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
