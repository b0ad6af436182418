//! Bounded retry with exponential backoff
//!
//! Every network call site wraps its request in [`with_retry`]. Delays are
//! deterministic (no jitter) so the schedule is reproducible in tests.

use crate::error::{DigestError, Result};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

/// Retry budget and backoff schedule for a call site
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts including the first (at least 1)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry, in milliseconds
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Multiplier applied to the delay after each failed attempt
    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            backoff_factor: default_backoff_factor(),
        }
    }
}

impl RetryPolicy {
    /// Delay scheduled after the given 1-based failed attempt
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1) as i32;
        let millis = self.base_delay_ms as f64 * self.backoff_factor.powi(exponent);
        Duration::from_millis(millis as u64)
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_backoff_factor() -> f64 {
    2.0
}

/// Run a fallible async operation under a retry budget.
///
/// Per-attempt failures are logged with their detail; the error returned on
/// exhaustion carries only the label and attempt count, never the underlying
/// cause.
pub async fn with_retry<T, F, Fut>(label: &str, policy: &RetryPolicy, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let budget = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < budget => {
                let delay = policy.delay_after(attempt);
                tracing::warn!(
                    "{} attempt {}/{} failed: {}. Retrying in {}ms",
                    label,
                    attempt,
                    budget,
                    err,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => {
                tracing::error!("{} failed after {} attempts: {}", label, attempt, err);
                return Err(DigestError::RetryExhausted {
                    label: label.to_string(),
                    attempts: attempt,
                });
            }
        }
    }
}
