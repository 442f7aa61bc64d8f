//! Retry policy for page requests.
//!
//! - Max 5 attempts per page
//! - Exponential backoff for transient failures: 500ms -> 1s -> 2s ..., capped at 30s
//! - Rate-limit waits use the server's `retry_after`, 3s when it is missing

use std::time::Duration;

use super::types::RateLimitBody;

/// Configuration for retry behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of attempts per page (default: 5)
    pub max_attempts: usize,
    /// Initial backoff delay in milliseconds (default: 500)
    pub initial_delay_ms: u64,
    /// Backoff multiplier (default: 2.0)
    pub backoff_multiplier: f64,
    /// Maximum backoff delay in milliseconds (default: 30000)
    pub max_delay_ms: u64,
    /// Wait used when a 429 carries no usable `retry_after` (default: 3000)
    pub default_retry_after_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay_ms: 500,
            backoff_multiplier: 2.0,
            max_delay_ms: 30_000,
            default_retry_after_ms: 3_000,
        }
    }
}

impl RetryPolicy {
    /// Default policy with a different attempt ceiling.
    pub fn with_max_attempts(max_attempts: usize) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    /// Calculate backoff for a given attempt number (0-indexed).
    ///
    /// delay = initial * (multiplier ^ attempt), capped at max_delay_ms.
    pub fn delay_for_attempt(&self, attempt: usize) -> Duration {
        let delay_ms = self.initial_delay_ms as f64 * self.backoff_multiplier.powi(attempt as i32);
        let capped = delay_ms.min(self.max_delay_ms as f64) as u64;
        Duration::from_millis(capped)
    }

    /// Check if another attempt is allowed.
    pub fn should_retry(&self, attempt: usize) -> bool {
        attempt < self.max_attempts
    }

    /// Wait requested by a 429 response body.
    ///
    /// Falls back to `default_retry_after_ms` when the body is not JSON,
    /// lacks `retry_after`, or carries a non-positive value.
    pub fn rate_limit_wait(&self, body: &str) -> Duration {
        let fallback = Duration::from_millis(self.default_retry_after_ms);
        match serde_json::from_str::<RateLimitBody>(body) {
            Ok(parsed) if parsed.retry_after.is_finite() && parsed.retry_after > 0.0 => {
                Duration::try_from_secs_f64(parsed.retry_after).unwrap_or(fallback)
            }
            _ => fallback,
        }
    }
}
