//! Service configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `BOOKSHELF_*` environment variables and an
//! optional configuration file. Every field is optional; accessors supply
//! the defaults.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use resilience::{CircuitBreakerConfig, ResilienceConfig, RetryConfig};
use serde::Deserialize;

use crate::outbound::persistence::PoolConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// `bind_addr` is not a `host:port` socket address.
    #[error("invalid bind address {value:?}: {message}")]
    InvalidBindAddr {
        /// Raw configured value.
        value: String,
        /// Parser diagnostic.
        message: String,
    },
}

/// Configuration values for the HTTP server, store and resilience policies.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BOOKSHELF")]
pub struct BookshelfSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; the in-memory store is used when unset.
    pub database_url: Option<String>,
    /// Maximum number of pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Failures within the sliding window that open a circuit.
    pub failure_threshold: Option<u32>,
    /// Number of recent outcomes each breaker retains.
    pub sliding_window_size: Option<u32>,
    /// Milliseconds a circuit stays open before admitting trial calls.
    pub open_cooldown_ms: Option<u64>,
    /// Trial calls admitted while half-open.
    pub half_open_calls: Option<u32>,
    /// Attempts per call, including the first.
    pub max_attempts: Option<u32>,
    /// Delay in milliseconds before the first retry.
    pub retry_backoff_ms: Option<u64>,
    /// Per-attempt deadline in milliseconds.
    pub call_timeout_ms: Option<u64>,
}

impl BookshelfSettings {
    /// Parse the configured bind address, falling back to `0.0.0.0:8080`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidBindAddr`] when the value is not a
    /// socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value
            .parse()
            .map_err(|err: std::net::AddrParseError| SettingsError::InvalidBindAddr {
                value: value.to_owned(),
                message: err.to_string(),
            })
    }

    /// Pool configuration when a database URL is configured.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        self.database_url.as_deref().map(|url| {
            PoolConfig::new(url)
                .with_max_size(self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE))
        })
    }

    /// Resilience configuration shared by every book operation.
    pub fn resilience_config(&self) -> ResilienceConfig {
        let defaults = ResilienceConfig::default();
        let breaker = defaults.circuit_breaker.clone();
        let retry = defaults.retry.clone();

        ResilienceConfig {
            circuit_breaker: CircuitBreakerConfig {
                failure_threshold: self.failure_threshold.unwrap_or(breaker.failure_threshold),
                sliding_window_size: self
                    .sliding_window_size
                    .unwrap_or(breaker.sliding_window_size),
                open_cooldown: self
                    .open_cooldown_ms
                    .map_or(breaker.open_cooldown, Duration::from_millis),
                half_open_permits: self.half_open_calls.unwrap_or(breaker.half_open_permits),
            },
            retry: RetryConfig {
                max_attempts: self.max_attempts.unwrap_or(retry.max_attempts),
                initial_backoff: self
                    .retry_backoff_ms
                    .map_or(retry.initial_backoff, Duration::from_millis),
                ..retry
            },
            call_timeout: self
                .call_timeout_ms
                .map_or(defaults.call_timeout, Duration::from_millis),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const KEYS: [&str; 10] = [
        "BOOKSHELF_BIND_ADDR",
        "BOOKSHELF_DATABASE_URL",
        "BOOKSHELF_POOL_MAX_SIZE",
        "BOOKSHELF_FAILURE_THRESHOLD",
        "BOOKSHELF_SLIDING_WINDOW_SIZE",
        "BOOKSHELF_OPEN_COOLDOWN_MS",
        "BOOKSHELF_HALF_OPEN_CALLS",
        "BOOKSHELF_MAX_ATTEMPTS",
        "BOOKSHELF_RETRY_BACKOFF_MS",
        "BOOKSHELF_CALL_TIMEOUT_MS",
    ];

    fn load_from_empty_args() -> BookshelfSettings {
        BookshelfSettings::load_from_iter([OsString::from("bookshelf")])
            .expect("config should load")
    }

    fn cleared_env_with(overrides: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
        KEYS.iter()
            .map(|key| {
                let value = overrides
                    .iter()
                    .find(|(name, _)| name == key)
                    .map(|(_, value)| (*value).to_owned());
                (*key, value)
            })
            .collect()
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(cleared_env_with(&[]));

        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr().expect("default parses"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("literal parses")
        );
        assert!(settings.pool_config().is_none());
        assert_eq!(settings.resilience_config(), ResilienceConfig::default());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(cleared_env_with(&[
            ("BOOKSHELF_BIND_ADDR", "127.0.0.1:9090"),
            ("BOOKSHELF_DATABASE_URL", "postgres://books@localhost/shelf"),
            ("BOOKSHELF_POOL_MAX_SIZE", "4"),
            ("BOOKSHELF_FAILURE_THRESHOLD", "3"),
            ("BOOKSHELF_SLIDING_WINDOW_SIZE", "6"),
            ("BOOKSHELF_OPEN_COOLDOWN_MS", "1500"),
            ("BOOKSHELF_HALF_OPEN_CALLS", "1"),
            ("BOOKSHELF_MAX_ATTEMPTS", "5"),
            ("BOOKSHELF_RETRY_BACKOFF_MS", "20"),
            ("BOOKSHELF_CALL_TIMEOUT_MS", "750"),
        ]));

        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr().expect("override parses").port(),
            9090
        );
        let pool = settings.pool_config().expect("database configured");
        assert_eq!(pool.database_url(), "postgres://books@localhost/shelf");
        assert_eq!(pool.max_size(), 4);

        let resilience = settings.resilience_config();
        assert_eq!(resilience.circuit_breaker.failure_threshold, 3);
        assert_eq!(resilience.circuit_breaker.sliding_window_size, 6);
        assert_eq!(
            resilience.circuit_breaker.open_cooldown,
            Duration::from_millis(1500)
        );
        assert_eq!(resilience.circuit_breaker.half_open_permits, 1);
        assert_eq!(resilience.retry.max_attempts, 5);
        assert_eq!(resilience.retry.initial_backoff, Duration::from_millis(20));
        assert_eq!(resilience.retry.multiplier, 2);
        assert_eq!(resilience.call_timeout, Duration::from_millis(750));
    }

    #[rstest]
    fn invalid_bind_addr_is_rejected() {
        let _guard = lock_env(cleared_env_with(&[("BOOKSHELF_BIND_ADDR", "localhost")]));

        let settings = load_from_empty_args();

        assert!(matches!(
            settings.bind_addr(),
            Err(SettingsError::InvalidBindAddr { .. })
        ));
    }
}
