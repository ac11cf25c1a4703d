//! Retry with exponential backoff for descriptor fetches.

use std::future::Future;
use std::time::Duration;

use fieldform_core::{FormResult, Settings};

/// Upper bound on a single backoff delay.
pub const MAX_DELAY: Duration = Duration::from_secs(30);

/// How many times to retry a failed operation, and how long to wait.
///
/// The delay before retry `n` (zero-based) is `base_delay * 2^n`, capped at
/// [`MAX_DELAY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub retries: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 2,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Builds a policy from the store settings.
    pub const fn from_settings(settings: &Settings) -> Self {
        Self {
            retries: settings.fetch_retries,
            base_delay: settings.retry_delay(),
        }
    }

    /// A policy that tries once and never waits.
    pub const fn none() -> Self {
        Self {
            retries: 0,
            base_delay: Duration::ZERO,
        }
    }

    /// Returns the delay before retry number `attempt` (zero-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2_u32.saturating_pow(attempt);
        self.base_delay.saturating_mul(factor).min(MAX_DELAY)
    }

    /// Runs `op` until it succeeds or the retries are used up, returning the
    /// last error.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> FormResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = FormResult<T>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < self.retries => {
                    let delay = self.delay_for(attempt);
                    tracing::warn!(
                        attempt = attempt + 1,
                        retries = self.retries,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
