//! Count-based circuit breaker with half-open trial calls.
//!
//! ```text
//! Closed --(threshold failures in window)--> Open
//! Open --(cooldown elapsed, next admission)--> HalfOpen
//! HalfOpen --(all trial permits succeed)--> Closed
//! HalfOpen --(any trial fails)--> Open
//! ```
//!
//! Every transition happens under one mutex so concurrent callers observe a
//! single consistent state. The lock is never held across an `.await`.
//! Admissions are [`Permit`] guards; a cancelled caller's permit releases
//! its trial slot on drop.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::CircuitBreakerConfig;

/// Externally visible breaker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Calls pass through and outcomes are recorded.
    Closed,
    /// Calls are rejected until the cooldown elapses.
    Open,
    /// A bounded number of trial calls probe the dependency.
    HalfOpen,
}

impl std::fmt::Display for CircuitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Closed => f.write_str("closed"),
            Self::Open => f.write_str("open"),
            Self::HalfOpen => f.write_str("half_open"),
        }
    }
}

/// Kind of call a [`Permit`] admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Admitted while closed.
    Normal,
    /// Admitted as a half-open trial.
    Trial,
}

/// Ticket for one admitted call.
///
/// Settle it with [`Permit::succeed`] or [`Permit::fail`]. Outcomes only
/// apply to the state the call was admitted under, so a slow call admitted
/// while closed cannot close a circuit that has since opened. A permit
/// dropped unsettled (its caller was cancelled) records nothing and hands a
/// trial slot back, so the next caller can probe the dependency.
#[derive(Debug)]
#[must_use = "settle the permit with succeed or fail"]
pub struct Permit<'a> {
    breaker: &'a CircuitBreaker,
    admission: Admission,
    settled: bool,
}

impl Permit<'_> {
    /// Kind of call this permit admitted.
    #[must_use]
    pub const fn admission(&self) -> Admission {
        self.admission
    }

    /// Report a successful call.
    pub fn succeed(mut self) {
        self.settled = true;
        self.breaker.on_success(self.admission);
    }

    /// Report a failed call.
    pub fn fail(mut self) {
        self.settled = true;
        self.breaker.on_failure(self.admission);
    }
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.breaker.on_abandon(self.admission);
        }
    }
}

#[derive(Debug)]
struct BreakerState {
    state: CircuitState,
    // `true` marks a failed call.
    window: VecDeque<bool>,
    opened_at: Option<Instant>,
    trials_issued: u32,
    trials_succeeded: u32,
}

impl BreakerState {
    fn closed() -> Self {
        Self {
            state: CircuitState::Closed,
            window: VecDeque::new(),
            opened_at: None,
            trials_issued: 0,
            trials_succeeded: 0,
        }
    }

    fn failures(&self) -> usize {
        self.window.iter().filter(|failed| **failed).count()
    }
}

/// Shared breaker guarding one named operation.
#[derive(Debug)]
pub struct CircuitBreaker {
    operation: String,
    config: CircuitBreakerConfig,
    inner: Mutex<BreakerState>,
}

impl CircuitBreaker {
    /// Create a closed breaker for `operation`.
    ///
    /// The configuration is [normalized](CircuitBreakerConfig::normalized)
    /// first.
    #[must_use]
    pub fn new(operation: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        let operation = operation.into();
        let normalized = config.clone().normalized();
        if normalized != config {
            warn!(
                operation = %operation,
                failure_threshold = normalized.failure_threshold,
                sliding_window_size = normalized.sliding_window_size,
                half_open_permits = normalized.half_open_permits,
                "circuit breaker settings adjusted"
            );
        }
        Self {
            operation,
            config: normalized,
            inner: Mutex::new(BreakerState::closed()),
        }
    }

    /// Name of the guarded operation.
    #[must_use]
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Effective configuration after normalization.
    #[must_use]
    pub const fn config(&self) -> &CircuitBreakerConfig {
        &self.config
    }

    /// Current state.
    ///
    /// An open breaker whose cooldown has elapsed still reports
    /// [`CircuitState::Open`] until the next admission moves it to
    /// half-open.
    #[must_use]
    pub fn state(&self) -> CircuitState {
        self.lock().state
    }

    /// Failures currently held in the sliding window.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.lock().failures()
    }

    /// Ask to run one call.
    ///
    /// Returns `None` when the call must be short-circuited.
    pub fn try_acquire(&self) -> Option<Permit<'_>> {
        let mut guard = self.lock();
        if guard.state == CircuitState::Open {
            let cooled_down = guard
                .opened_at
                .is_none_or(|opened| opened.elapsed() >= self.config.open_cooldown);
            if !cooled_down {
                return None;
            }
            guard.state = CircuitState::HalfOpen;
            guard.trials_issued = 0;
            guard.trials_succeeded = 0;
            info!(operation = %self.operation, "circuit breaker half-open");
        }

        let admission = match guard.state {
            CircuitState::Closed => Admission::Normal,
            CircuitState::HalfOpen if guard.trials_issued < self.config.half_open_permits => {
                guard.trials_issued = guard.trials_issued.saturating_add(1);
                Admission::Trial
            }
            CircuitState::HalfOpen | CircuitState::Open => return None,
        };
        Some(Permit {
            breaker: self,
            admission,
            settled: false,
        })
    }

    /// Force the breaker back to closed with an empty window.
    pub fn reset(&self) {
        *self.lock() = BreakerState::closed();
    }

    fn on_success(&self, admission: Admission) {
        let mut guard = self.lock();
        match (admission, guard.state) {
            (Admission::Normal, CircuitState::Closed) => self.push_outcome(&mut guard, false),
            (Admission::Trial, CircuitState::HalfOpen) => {
                guard.trials_succeeded = guard.trials_succeeded.saturating_add(1);
                if guard.trials_succeeded >= self.config.half_open_permits {
                    *guard = BreakerState::closed();
                    info!(operation = %self.operation, "circuit breaker closed");
                }
            }
            _ => {}
        }
    }

    fn on_failure(&self, admission: Admission) {
        let mut guard = self.lock();
        match (admission, guard.state) {
            (Admission::Normal, CircuitState::Closed) => {
                self.push_outcome(&mut guard, true);
                let threshold = usize::try_from(self.config.failure_threshold).unwrap_or(usize::MAX);
                if guard.failures() >= threshold {
                    let failures = guard.failures();
                    self.trip(&mut guard);
                    warn!(
                        operation = %self.operation,
                        failures,
                        cooldown = ?self.config.open_cooldown,
                        "circuit breaker opened"
                    );
                }
            }
            (Admission::Trial, CircuitState::HalfOpen) => {
                self.trip(&mut guard);
                warn!(operation = %self.operation, "circuit breaker re-opened after failed trial");
            }
            _ => {}
        }
    }

    fn on_abandon(&self, admission: Admission) {
        let mut guard = self.lock();
        if admission == Admission::Trial && guard.state == CircuitState::HalfOpen {
            guard.trials_issued = guard.trials_issued.saturating_sub(1);
            debug!(operation = %self.operation, "half-open trial abandoned");
        }
    }

    fn push_outcome(&self, state: &mut BreakerState, failed: bool) {
        state.window.push_back(failed);
        let capacity = usize::try_from(self.config.sliding_window_size).unwrap_or(usize::MAX);
        while state.window.len() > capacity {
            state.window.pop_front();
        }
    }

    fn trip(&self, state: &mut BreakerState) {
        state.state = CircuitState::Open;
        state.opened_at = Some(Instant::now());
        state.window.clear();
        state.trials_issued = 0;
        state.trials_succeeded = 0;
    }

    fn lock(&self) -> MutexGuard<'_, BreakerState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    //! State machine transitions under paused Tokio time.

    use std::time::Duration;

    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn config() -> CircuitBreakerConfig {
        CircuitBreakerConfig {
            failure_threshold: 3,
            sliding_window_size: 5,
            open_cooldown: Duration::from_secs(10),
            half_open_permits: 2,
        }
    }

    fn fail_times(breaker: &CircuitBreaker, times: usize) {
        for _ in 0..times {
            breaker.try_acquire().expect("admitted while closed").fail();
        }
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn opens_after_threshold_consecutive_failures(config: CircuitBreakerConfig) {
        let breaker = CircuitBreaker::new("getBookById", config);

        fail_times(&breaker, 2);
        assert_eq!(breaker.state(), CircuitState::Closed);

        fail_times(&breaker, 1);
        assert_eq!(breaker.state(), CircuitState::Open);
        assert!(breaker.try_acquire().is_none());
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn successes_age_failures_out_of_the_window(config: CircuitBreakerConfig) {
        let breaker = CircuitBreaker::new("getBookById", config);

        fail_times(&breaker, 2);
        for _ in 0..5 {
            breaker.try_acquire().expect("admitted").succeed();
        }
        assert_eq!(breaker.failure_count(), 0);

        fail_times(&breaker, 2);
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn half_opens_after_cooldown_and_closes_on_trial_success(
        config: CircuitBreakerConfig,
    ) {
        let breaker = CircuitBreaker::new("saveBook", config);
        fail_times(&breaker, 3);

        tokio::time::advance(Duration::from_secs(9)).await;
        assert!(breaker.try_acquire().is_none());

        tokio::time::advance(Duration::from_secs(1)).await;
        let first = breaker.try_acquire().expect("first trial admitted");
        let second = breaker.try_acquire().expect("second trial admitted");
        assert_eq!(first.admission(), Admission::Trial);
        assert_eq!(breaker.state(), CircuitState::HalfOpen);
        assert!(breaker.try_acquire().is_none(), "trial permits exhausted");

        first.succeed();
        assert_eq!(breaker.state(), CircuitState::HalfOpen);
        second.succeed();
        assert_eq!(breaker.state(), CircuitState::Closed);
        assert_eq!(
            breaker.try_acquire().map(|permit| permit.admission()),
            Some(Admission::Normal)
        );
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn failed_trial_reopens(config: CircuitBreakerConfig) {
        let breaker = CircuitBreaker::new("saveBook", config);
        fail_times(&breaker, 3);
        tokio::time::advance(Duration::from_secs(10)).await;

        breaker.try_acquire().expect("trial admitted").fail();

        assert_eq!(breaker.state(), CircuitState::Open);
        assert!(breaker.try_acquire().is_none());
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn stale_normal_outcome_does_not_touch_open_circuit(config: CircuitBreakerConfig) {
        let breaker = CircuitBreaker::new("deleteAll", config);
        let slow = breaker.try_acquire().expect("admitted");
        fail_times(&breaker, 3);

        slow.succeed();
        assert_eq!(breaker.state(), CircuitState::Open);
    }

    #[rstest]
    fn reset_closes_the_circuit(config: CircuitBreakerConfig) {
        let breaker = CircuitBreaker::new("deleteAll", config);
        breaker.try_acquire().expect("admitted").fail();
        breaker.reset();
        assert_eq!(breaker.failure_count(), 0);
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn dropped_trial_returns_its_slot(config: CircuitBreakerConfig) {
        let breaker = CircuitBreaker::new("getBookById", config);
        fail_times(&breaker, 3);
        tokio::time::advance(Duration::from_secs(10)).await;

        let kept = breaker.try_acquire().expect("first trial admitted");
        drop(breaker.try_acquire().expect("second trial admitted"));
        assert_eq!(breaker.state(), CircuitState::HalfOpen);

        let retried = breaker.try_acquire().expect("released slot is reissued");
        kept.succeed();
        retried.succeed();
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[rstest]
    fn dropped_normal_permit_records_nothing(config: CircuitBreakerConfig) {
        let breaker = CircuitBreaker::new("getBookById", config);
        fail_times(&breaker, 2);
        drop(breaker.try_acquire().expect("admitted"));
        assert_eq!(breaker.failure_count(), 2);
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn threshold_wider_than_window_still_opens() {
        let breaker = CircuitBreaker::new(
            "getAllBooks",
            CircuitBreakerConfig {
                failure_threshold: 20,
                sliding_window_size: 10,
                open_cooldown: Duration::from_secs(10),
                half_open_permits: 1,
            },
        );
        assert_eq!(breaker.config().sliding_window_size, 20);

        fail_times(&breaker, 19);
        assert_eq!(breaker.state(), CircuitState::Closed);
        fail_times(&breaker, 1);
        assert_eq!(breaker.state(), CircuitState::Open);
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn zero_trial_permits_still_admit_one_trial() {
        let breaker = CircuitBreaker::new(
            "saveBook",
            CircuitBreakerConfig {
                failure_threshold: 1,
                sliding_window_size: 1,
                open_cooldown: Duration::from_secs(10),
                half_open_permits: 0,
            },
        );
        fail_times(&breaker, 1);
        tokio::time::advance(Duration::from_secs(10)).await;

        let trial = breaker.try_acquire().expect("one trial admitted");
        assert_eq!(trial.admission(), Admission::Trial);
        trial.succeed();
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[rstest]
    fn state_displays_snake_case() {
        assert_eq!(CircuitState::HalfOpen.to_string(), "half_open");
    }
}
