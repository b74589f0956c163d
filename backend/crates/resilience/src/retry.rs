//! Exponential backoff schedule for transient failures.

use std::time::Duration;

use rand::Rng;

use crate::RetryConfig;

/// Computes how many attempts to make and how long to wait between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    /// Create a policy from its configuration.
    #[must_use]
    pub const fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Total attempts permitted, never less than one.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.config.max_attempts.max(1)
    }

    /// Whether another attempt may follow the 1-based `attempt`.
    #[must_use]
    pub fn allows_retry_after(&self, attempt: u32) -> bool {
        attempt < self.max_attempts()
    }

    /// Backoff before the attempt that follows the 1-based `attempt`,
    /// excluding jitter.
    #[must_use]
    pub fn base_delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1);
        let factor = self
            .config
            .multiplier
            .max(1)
            .checked_pow(exponent)
            .unwrap_or(u32::MAX);
        self.config
            .initial_backoff
            .saturating_mul(factor)
            .min(self.config.max_backoff)
    }

    /// Backoff including a random jitter in `0..=jitter`.
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        let base = self.base_delay(attempt);
        let jitter_ms = u64::try_from(self.config.jitter.as_millis()).unwrap_or(u64::MAX);
        if jitter_ms == 0 {
            return base;
        }
        let extra = rand::thread_rng().gen_range(0..=jitter_ms);
        base.saturating_add(Duration::from_millis(extra))
    }
}
