//! Failure outcomes surfaced by resilience policies.

use std::time::Duration;

/// Classifies whether a failure is worth retrying.
pub trait Transient {
    /// Return `true` when a later attempt may succeed.
    fn is_transient(&self) -> bool;
}

/// Why a policy gave up on a call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResilienceError<E> {
    /// The breaker was open; the wrapped call never ran.
    #[error("circuit breaker for `{operation}` is open")]
    CircuitOpen {
        /// Operation the breaker guards.
        operation: String,
    },
    /// The final attempt exceeded the per-attempt deadline.
    #[error("`{operation}` timed out after {timeout:?} on attempt {attempts}")]
    TimedOut {
        /// Operation that timed out.
        operation: String,
        /// Deadline applied to each attempt.
        timeout: Duration,
        /// Attempts made, including the one that timed out.
        attempts: u32,
    },
    /// The wrapped call failed and was not retried further.
    #[error("`{operation}` failed after {attempts} attempt(s): {source}")]
    Failed {
        /// Operation that failed.
        operation: String,
        /// Attempts made.
        attempts: u32,
        /// Error returned by the last attempt.
        #[source]
        source: E,
    },
}

impl<E> ResilienceError<E> {
    /// Whether the call was rejected without reaching the dependency.
    #[must_use]
    pub const fn is_short_circuit(&self) -> bool {
        matches!(self, Self::CircuitOpen { .. })
    }

    /// Attempts made before giving up; `0` for short-circuited calls.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        match self {
            Self::CircuitOpen { .. } => 0,
            Self::TimedOut { attempts, .. } | Self::Failed { attempts, .. } => *attempts,
        }
    }
}
