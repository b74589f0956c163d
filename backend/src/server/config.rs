//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use bookshelf::outbound::persistence::DbPool;
use prometheus::Registry;
use resilience::ResilienceConfig;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) resilience: ResilienceConfig,
    pub(crate) registry: Registry,
}

impl ServerConfig {
    /// Construct a server configuration bound to `bind_addr`.
    ///
    /// Book metrics are registered with `registry`, which the `metrics`
    /// feature also serves at `/metrics`. Without a database pool the
    /// in-memory store is used.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, resilience: ResilienceConfig, registry: Registry) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            resilience,
            registry,
        }
    }

    /// Attach a database connection pool for the PostgreSQL adapters.
    #[must_use]
    pub fn with_db_pool(mut self, pool: Option<DbPool>) -> Self {
        self.db_pool = pool;
        self
    }
}
