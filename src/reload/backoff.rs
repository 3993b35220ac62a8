//! Reconnect Backoff
//!
//! Tracks consecutive disconnects and derives the wait before the next
//! connection attempt:
//!
//! ```text
//! delay(k) = base_delay * 1.5^k      k = 1, 2, ..., max_attempts
//! ```
//!
//! The counter resets on every successful open. Once `max_attempts`
//! reconnects have been scheduled without an open in between, no further
//! delay is handed out until a manual reconnect succeeds.

use std::time::Duration;

/// Growth factor between consecutive reconnect delays.
pub const GROWTH_FACTOR: f64 = 1.5;

/// Default number of automatic reconnects before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Default base delay.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

/// Reconnect attempt counter with exponential delay.
#[derive(Debug, Clone)]
pub struct Backoff {
    attempts: u32,
    max_attempts: u32,
    base_delay: Duration,
}

impl Backoff {
    pub const fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            attempts: 0,
            max_attempts,
            base_delay,
        }
    }

    /// Register a disconnect and return the delay before the next attempt.
    ///
    /// Returns `None` once the attempt budget is spent. The counter is not
    /// touched in that case.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.attempts >= self.max_attempts {
            return None;
        }
        self.attempts += 1;
        Some(self.delay_for(self.attempts))
    }

    /// Delay used before attempt `attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        self.base_delay.mul_f64(GROWTH_FACTOR.powi(exponent))
    }

    /// Clear the counter after a successful connect.
    pub fn reset(&mut self) {
        self.attempts = 0;
    }

    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub const fn is_exhausted(&self) -> bool {
        self.attempts >= self.max_attempts
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_BASE_DELAY)
    }
}
