//! Readiness probe for the PostgreSQL book store.

use async_trait::async_trait;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{StoreHealth, StoreHealthError};

use super::pool::DbPool;

/// Checks out a pooled connection and runs a trivial query.
#[derive(Clone)]
pub struct DieselStoreHealth {
    pool: DbPool,
}

impl DieselStoreHealth {
    /// Create a probe over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StoreHealth for DieselStoreHealth {
    async fn check(&self) -> Result<(), StoreHealthError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| StoreHealthError::unavailable(err.reason()))?;

        diesel::sql_query("SELECT 1")
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| StoreHealthError::unavailable(err.to_string()))
    }
}
