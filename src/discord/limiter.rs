//! Client-side request spacing.

use std::thread;
use std::time::{Duration, Instant};

/// Enforces a minimum interval between outbound requests.
///
/// Owned by a single client; the last-request mark is plain state, so
/// sharing one limiter across threads needs external serialization.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    min_interval: Option<Duration>,
    last_request: Option<Instant>,
}

impl RateLimiter {
    /// Create a limiter allowing at most `requests_per_second` requests.
    ///
    /// A non-positive (or non-finite) rate disables throttling.
    pub fn new(requests_per_second: f64) -> Self {
        let min_interval = if requests_per_second.is_finite() && requests_per_second > 0.0 {
            Some(Duration::from_secs_f64(1.0 / requests_per_second))
        } else {
            None
        };
        Self {
            min_interval,
            last_request: None,
        }
    }

    /// A limiter that never waits.
    pub fn disabled() -> Self {
        Self::new(0.0)
    }

    /// Minimum spacing between requests, if throttling is enabled.
    pub fn min_interval(&self) -> Option<Duration> {
        self.min_interval
    }

    /// How long the next request would have to wait right now.
    pub fn pending_wait(&self) -> Duration {
        match (self.min_interval, self.last_request) {
            (Some(interval), Some(last)) => interval.saturating_sub(last.elapsed()),
            _ => Duration::ZERO,
        }
    }

    /// Block until the next request is allowed, then mark it as sent.
    pub fn throttle(&mut self) {
        if self.min_interval.is_none() {
            return;
        }
        let wait = self.pending_wait();
        if !wait.is_zero() {
            thread::sleep(wait);
        }
        self.last_request = Some(Instant::now());
    }
}
