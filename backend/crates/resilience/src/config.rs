//! Tunables for breakers, retries and timeouts.

use std::time::Duration;

/// Circuit breaker thresholds.
///
/// The breaker keeps the outcomes of the last `sliding_window_size` calls and
/// opens once `failure_threshold` of them failed. With a window at least as
/// large as the threshold, `failure_threshold` consecutive failures always
/// open the circuit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitBreakerConfig {
    /// Failures within the window that open the circuit.
    pub failure_threshold: u32,
    /// Number of most recent outcomes retained.
    pub sliding_window_size: u32,
    /// Time spent open before trial calls are admitted.
    pub open_cooldown: Duration,
    /// Trial calls admitted while half-open; all must succeed to close.
    pub half_open_permits: u32,
}

impl CircuitBreakerConfig {
    /// Clamp values that would wedge or disable the breaker.
    ///
    /// The threshold and permit count are at least one, and the window is
    /// widened to hold `failure_threshold` outcomes.
    ///
    /// ```
    /// use std::time::Duration;
    /// use resilience::CircuitBreakerConfig;
    ///
    /// let config = CircuitBreakerConfig {
    ///     failure_threshold: 20,
    ///     sliding_window_size: 10,
    ///     open_cooldown: Duration::from_secs(30),
    ///     half_open_permits: 0,
    /// }
    /// .normalized();
    /// assert_eq!(config.sliding_window_size, 20);
    /// assert_eq!(config.half_open_permits, 1);
    /// ```
    #[must_use]
    pub fn normalized(self) -> Self {
        let failure_threshold = self.failure_threshold.max(1);
        Self {
            failure_threshold,
            sliding_window_size: self.sliding_window_size.max(failure_threshold),
            half_open_permits: self.half_open_permits.max(1),
            ..self
        }
    }
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            sliding_window_size: 10,
            open_cooldown: Duration::from_secs(30),
            half_open_permits: 2,
        }
    }
}

/// Retry schedule applied to transient failures.
///
/// Attempt `n` (1-based) that fails transiently waits
/// `min(initial_backoff * multiplier^(n-1), max_backoff)` plus a random
/// jitter of up to `jitter` before attempt `n + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total attempts including the first call; `1` disables retries.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_backoff: Duration,
    /// Growth factor applied per retry.
    pub multiplier: u32,
    /// Upper bound for the exponential part of the delay.
    pub max_backoff: Duration,
    /// Upper bound for the random jitter added to each delay.
    pub jitter: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(100),
            multiplier: 2,
            max_backoff: Duration::from_secs(2),
            jitter: Duration::from_millis(50),
        }
    }
}

/// Full configuration for one resilience policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResilienceConfig {
    /// Breaker thresholds.
    pub circuit_breaker: CircuitBreakerConfig,
    /// Retry schedule.
    pub retry: RetryConfig,
    /// Deadline for each individual attempt.
    pub call_timeout: Duration,
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            circuit_breaker: CircuitBreakerConfig::default(),
            retry: RetryConfig::default(),
            call_timeout: Duration::from_secs(2),
        }
    }
}

impl ResilienceConfig {
    /// Replace the breaker thresholds.
    #[must_use]
    pub fn with_circuit_breaker(mut self, circuit_breaker: CircuitBreakerConfig) -> Self {
        self.circuit_breaker = circuit_breaker;
        self
    }

    /// Replace the retry schedule.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Replace the per-attempt deadline.
    #[must_use]
    pub const fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }
}
