//! Port for probing the backing book store.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised when the store cannot be reached.
    pub enum StoreHealthError {
        /// The store did not hand out a usable connection.
        Unavailable => "book store unavailable: {message}",
    }
}

/// Readiness check for the book store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoreHealth: Send + Sync {
    /// Succeed when the store can serve requests.
    async fn check(&self) -> Result<(), StoreHealthError>;
}

/// Always-healthy store, used with in-process adapters.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureStoreHealth;

#[async_trait]
impl StoreHealth for FixtureStoreHealth {
    async fn check(&self) -> Result<(), StoreHealthError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_is_healthy() {
        assert!(FixtureStoreHealth.check().await.is_ok());
    }

    #[test]
    fn unavailable_formats_message() {
        let err = StoreHealthError::unavailable("timed out");
        assert_eq!(err.to_string(), "book store unavailable: timed out");
    }
}
