//! Breaker, retry and timeout composed around one named operation.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::{CircuitBreaker, ResilienceConfig, ResilienceError, RetryPolicy, Transient};

/// Failure of a single attempt.
enum AttemptFailure<E> {
    Operation(E),
    TimedOut,
}

impl<E: Transient> AttemptFailure<E> {
    fn is_transient(&self) -> bool {
        match self {
            Self::Operation(err) => err.is_transient(),
            Self::TimedOut => true,
        }
    }
}

/// Resilience decorator for one logical operation.
///
/// The breaker sees one outcome per [`ResiliencePolicy::execute`] call, after
/// retries are exhausted.
#[derive(Debug)]
pub struct ResiliencePolicy {
    operation: String,
    breaker: CircuitBreaker,
    retry: RetryPolicy,
    call_timeout: Duration,
}

impl ResiliencePolicy {
    /// Build a policy for `operation`.
    #[must_use]
    pub fn new(operation: impl Into<String>, config: ResilienceConfig) -> Self {
        let operation = operation.into();
        Self {
            breaker: CircuitBreaker::new(operation.clone(), config.circuit_breaker),
            retry: RetryPolicy::new(config.retry),
            call_timeout: config.call_timeout,
            operation,
        }
    }

    /// Name of the guarded operation.
    #[must_use]
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Breaker shared by every caller of this operation.
    #[must_use]
    pub const fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    /// Run `call` under the breaker, retrying transient failures.
    ///
    /// `call` is invoked once per attempt, so it must be able to rebuild its
    /// future.
    ///
    /// # Errors
    ///
    /// Returns [`ResilienceError::CircuitOpen`] without invoking `call` while
    /// the breaker rejects calls, [`ResilienceError::TimedOut`] when the final
    /// attempt exceeded the deadline, and [`ResilienceError::Failed`] with the
    /// last error otherwise.
    pub async fn execute<T, E, F, Fut>(&self, mut call: F) -> Result<T, ResilienceError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Transient + std::fmt::Display,
    {
        let Some(permit) = self.breaker.try_acquire() else {
            debug!(operation = %self.operation, "call short-circuited by open breaker");
            return Err(ResilienceError::CircuitOpen {
                operation: self.operation.clone(),
            });
        };

        // Dropping this future mid-call drops `permit` unsettled, which
        // returns any half-open trial slot to the breaker.
        let outcome = self.run_attempts(&mut call).await;
        match outcome {
            Ok(_) => permit.succeed(),
            Err(_) => permit.fail(),
        }
        outcome
    }

    async fn run_attempts<T, E, F, Fut>(&self, call: &mut F) -> Result<T, ResilienceError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Transient + std::fmt::Display,
    {
        let mut attempt: u32 = 1;
        loop {
            let failure = match tokio::time::timeout(self.call_timeout, call()).await {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(err)) => AttemptFailure::Operation(err),
                Err(_) => AttemptFailure::TimedOut,
            };

            if !failure.is_transient() || !self.retry.allows_retry_after(attempt) {
                return Err(self.give_up(failure, attempt));
            }

            let delay = self.retry.delay(attempt);
            match &failure {
                AttemptFailure::Operation(err) => debug!(
                    operation = %self.operation,
                    attempt,
                    error = %err,
                    ?delay,
                    "retrying transient failure"
                ),
                AttemptFailure::TimedOut => debug!(
                    operation = %self.operation,
                    attempt,
                    ?delay,
                    "retrying timed out attempt"
                ),
            }
            tokio::time::sleep(delay).await;
            attempt = attempt.saturating_add(1);
        }
    }

    fn give_up<E>(&self, failure: AttemptFailure<E>, attempts: u32) -> ResilienceError<E> {
        match failure {
            AttemptFailure::Operation(source) => ResilienceError::Failed {
                operation: self.operation.clone(),
                attempts,
                source,
            },
            AttemptFailure::TimedOut => ResilienceError::TimedOut {
                operation: self.operation.clone(),
                timeout: self.call_timeout,
                attempts,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    //! Composition of breaker, retry and timeout.

    use std::sync::atomic::{AtomicU32, Ordering};

    use rstest::{fixture, rstest};

    use super::*;
    use crate::{CircuitBreakerConfig, CircuitState, RetryConfig};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum StoreError {
        Connection,
        Query,
    }

    impl std::fmt::Display for StoreError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Self::Connection => f.write_str("connection refused"),
                Self::Query => f.write_str("syntax error"),
            }
        }
    }

    impl Transient for StoreError {
        fn is_transient(&self) -> bool {
            matches!(self, Self::Connection)
        }
    }

    #[fixture]
    fn config() -> ResilienceConfig {
        ResilienceConfig::default()
            .with_circuit_breaker(CircuitBreakerConfig {
                failure_threshold: 2,
                sliding_window_size: 4,
                open_cooldown: Duration::from_secs(5),
                half_open_permits: 1,
            })
            .with_retry(RetryConfig {
                max_attempts: 3,
                initial_backoff: Duration::from_millis(10),
                multiplier: 2,
                max_backoff: Duration::from_millis(100),
                jitter: Duration::ZERO,
            })
            .with_call_timeout(Duration::from_millis(50))
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn transient_failures_are_retried_until_success(config: ResilienceConfig) {
        let policy = ResiliencePolicy::new("getBookById", config);
        let calls = AtomicU32::new(0);

        let result = policy
            .execute(|| async {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(StoreError::Connection)
                } else {
                    Ok(n)
                }
            })
            .await;

        assert_eq!(result, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(policy.breaker().failure_count(), 0);
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn permanent_failures_are_not_retried(config: ResilienceConfig) {
        let policy = ResiliencePolicy::new("getBookById", config);
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = policy
            .execute(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(StoreError::Query)
            })
            .await;

        assert_eq!(
            result,
            Err(ResilienceError::Failed {
                operation: "getBookById".to_owned(),
                attempts: 1,
                source: StoreError::Query,
            })
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(policy.breaker().failure_count(), 1);
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn slow_attempts_time_out(config: ResilienceConfig) {
        let policy = ResiliencePolicy::new("countBooks", config);

        let result: Result<u32, ResilienceError<StoreError>> = policy
            .execute(|| async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                Ok(1)
            })
            .await;

        let err = result.expect_err("every attempt exceeds the deadline");
        assert!(matches!(err, ResilienceError::TimedOut { attempts: 3, .. }));
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn open_breaker_short_circuits_without_calling(config: ResilienceConfig) {
        let policy = ResiliencePolicy::new("saveBook", config);
        let calls = AtomicU32::new(0);
        let failing = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>(StoreError::Connection)
        };

        assert!(policy.execute(failing).await.is_err());
        assert!(policy.execute(failing).await.is_err());
        assert_eq!(policy.breaker().state(), CircuitState::Open);
        let before = calls.load(Ordering::SeqCst);
        assert_eq!(before, 6);

        let rejected = policy.execute(failing).await.expect_err("short-circuited");
        assert!(rejected.is_short_circuit());
        assert_eq!(rejected.attempts(), 0);
        assert_eq!(calls.load(Ordering::SeqCst), before);
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn recovers_through_half_open_trial(config: ResilienceConfig) {
        let policy = ResiliencePolicy::new("deleteById", config);
        for _ in 0..2 {
            let _ = policy
                .execute(|| async { Err::<(), _>(StoreError::Query) })
                .await;
        }
        assert_eq!(policy.breaker().state(), CircuitState::Open);

        tokio::time::advance(Duration::from_secs(5)).await;
        let result = policy
            .execute(|| async { Ok::<_, StoreError>("recovered") })
            .await;

        assert_eq!(result, Ok("recovered"));
        assert_eq!(policy.breaker().state(), CircuitState::Closed);
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn cancelled_trial_does_not_wedge_half_open(config: ResilienceConfig) {
        let policy = ResiliencePolicy::new("getBookById", config);
        for _ in 0..2 {
            let _ = policy
                .execute(|| async { Err::<(), _>(StoreError::Query) })
                .await;
        }
        tokio::time::advance(Duration::from_secs(5)).await;

        let cancelled = tokio::time::timeout(
            Duration::from_millis(10),
            policy.execute(|| std::future::pending::<Result<(), StoreError>>()),
        )
        .await;
        assert!(cancelled.is_err(), "caller gave up before the trial settled");
        assert_eq!(policy.breaker().state(), CircuitState::HalfOpen);

        let result = policy
            .execute(|| async { Ok::<_, StoreError>("recovered") })
            .await;
        assert_eq!(result, Ok("recovered"));
        assert_eq!(policy.breaker().state(), CircuitState::Closed);
    }
}
