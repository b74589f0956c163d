//! Explicit resilience decorators for fallible async calls.
//!
//! Each logical operation owns one [`ResiliencePolicy`], obtained from a
//! shared [`ResilienceRegistry`] by name. A policy composes three guards
//! around the wrapped call, outermost first:
//!
//! 1. a [`CircuitBreaker`] that short-circuits while open and admits a
//!    bounded number of trial calls once its cooldown elapses;
//! 2. a [`RetryPolicy`] that re-invokes transient failures with exponential
//!    backoff before the breaker sees a single failure;
//! 3. a per-attempt timeout treated as a transient failure.
//!
//! ```
//! use resilience::{ResilienceConfig, ResilienceRegistry, Transient};
//!
//! #[derive(Debug)]
//! struct Flaky;
//!
//! impl std::fmt::Display for Flaky {
//!     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
//!         f.write_str("flaky")
//!     }
//! }
//!
//! impl std::error::Error for Flaky {}
//!
//! impl Transient for Flaky {
//!     fn is_transient(&self) -> bool {
//!         true
//!     }
//! }
//!
//! # tokio_test_block_on(async {
//! let registry = ResilienceRegistry::new(ResilienceConfig::default());
//! let policy = registry.policy("lookup");
//! let value = policy.execute(|| async { Ok::<_, Flaky>(7) }).await;
//! assert_eq!(value.ok(), Some(7));
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(fut: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread()
//! #         .enable_time()
//! #         .build()
//! #         .expect("runtime")
//! #         .block_on(fut)
//! # }
//! ```

mod circuit_breaker;
mod config;
mod error;
mod policy;
mod registry;
mod retry;

pub use circuit_breaker::{Admission, CircuitBreaker, CircuitState, Permit};
pub use config::{CircuitBreakerConfig, ResilienceConfig, RetryConfig};
pub use error::{ResilienceError, Transient};
pub use policy::ResiliencePolicy;
pub use registry::ResilienceRegistry;
pub use retry::RetryPolicy;
