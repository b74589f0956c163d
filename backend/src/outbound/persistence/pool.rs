//! bb8 pool of `diesel-async` PostgreSQL connections for the book store.
//!
//! A checkout waits at most [`PoolConfig::with_checkout_timeout`]; callers
//! treat every [`PoolError`] as a connectivity failure.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};
use tracing::debug;

const DEFAULT_MAX_SIZE: u32 = 10;
const DEFAULT_MIN_IDLE: Option<u32> = Some(1);
const DEFAULT_CHECKOUT_TIMEOUT: Duration = Duration::from_secs(5);

/// Pool construction or checkout failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// The pool could not be created, usually a bad URL or unreachable host.
    #[error("book store pool could not be built: {reason}")]
    Build {
        /// Driver diagnostic.
        reason: String,
    },
    /// No connection became available before the checkout timeout.
    #[error("book store connection checkout failed: {reason}")]
    Checkout {
        /// Driver diagnostic.
        reason: String,
    },
}

impl PoolError {
    /// Driver diagnostic without the variant prefix.
    #[must_use]
    pub fn reason(&self) -> &str {
        match self {
            Self::Build { reason } | Self::Checkout { reason } => reason,
        }
    }
}

/// Sizing and timeout settings for [`DbPool`].
///
/// ```
/// use std::time::Duration;
/// use bookshelf::outbound::persistence::PoolConfig;
///
/// let config = PoolConfig::new("postgres://books@localhost/bookshelf")
///     .with_max_size(0)
///     .with_checkout_timeout(Duration::from_millis(750));
/// assert_eq!(config.max_size(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    min_idle: Option<u32>,
    checkout_timeout: Duration,
}

impl PoolConfig {
    /// Ten connections, one kept idle, five second checkout timeout.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: DEFAULT_MAX_SIZE,
            min_idle: DEFAULT_MIN_IDLE,
            checkout_timeout: DEFAULT_CHECKOUT_TIMEOUT,
        }
    }

    /// Upper bound on open connections; zero is raised to one.
    #[must_use]
    pub fn with_max_size(self, max_size: u32) -> Self {
        Self {
            max_size: max_size.max(1),
            ..self
        }
    }

    /// Connections kept open while idle; `None` lets the pool drain.
    #[must_use]
    pub fn with_min_idle(self, min_idle: Option<u32>) -> Self {
        Self { min_idle, ..self }
    }

    /// Longest a caller waits for a free connection.
    #[must_use]
    pub fn with_checkout_timeout(self, checkout_timeout: Duration) -> Self {
        Self {
            checkout_timeout,
            ..self
        }
    }

    /// PostgreSQL connection URL.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Upper bound on open connections.
    #[must_use]
    pub const fn max_size(&self) -> u32 {
        self.max_size
    }
}

/// Cloneable handle to the shared connection pool.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Build the pool and open its idle connections.
    ///
    /// # Errors
    ///
    /// [`PoolError::Build`] when the manager rejects the URL or the initial
    /// connections fail.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let PoolConfig {
            database_url,
            max_size,
            min_idle,
            checkout_timeout,
        } = config;
        debug!(max_size, ?min_idle, ?checkout_timeout, "building book store pool");

        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
        let inner = Pool::builder()
            .max_size(max_size)
            .min_idle(min_idle)
            .connection_timeout(checkout_timeout)
            .build(manager)
            .await
            .map_err(|err| PoolError::Build {
                reason: err.to_string(),
            })?;
        Ok(Self { inner })
    }

    /// Borrow a connection until the guard drops.
    ///
    /// # Errors
    ///
    /// [`PoolError::Checkout`] when none frees up within the timeout.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner.get().await.map_err(|err| PoolError::Checkout {
            reason: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const URL: &str = "postgres://books@localhost/bookshelf";

    #[rstest]
    fn new_applies_defaults() {
        let config = PoolConfig::new(URL);
        assert_eq!(config.database_url(), URL);
        assert_eq!(config.max_size(), DEFAULT_MAX_SIZE);
        assert_eq!(config.min_idle, DEFAULT_MIN_IDLE);
        assert_eq!(config.checkout_timeout, DEFAULT_CHECKOUT_TIMEOUT);
    }

    #[rstest]
    #[case(0, 1)]
    #[case(1, 1)]
    #[case(32, 32)]
    fn max_size_has_floor_of_one(#[case] requested: u32, #[case] expected: u32) {
        assert_eq!(PoolConfig::new(URL).with_max_size(requested).max_size(), expected);
    }

    #[rstest]
    fn builders_keep_other_fields() {
        let config = PoolConfig::new(URL)
            .with_min_idle(None)
            .with_checkout_timeout(Duration::from_millis(250))
            .with_max_size(3);
        assert_eq!(config.min_idle, None);
        assert_eq!(config.checkout_timeout, Duration::from_millis(250));
        assert_eq!(config.max_size(), 3);
    }

    #[rstest]
    fn reason_strips_prefix() {
        let err = PoolError::Checkout {
            reason: "timed out".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "book store connection checkout failed: timed out"
        );
        assert_eq!(err.reason(), "timed out");
    }
}
