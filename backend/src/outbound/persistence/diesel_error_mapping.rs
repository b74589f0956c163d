//! Diesel and pool error mapping shared by book adapters.
//!
//! Connectivity failures map to the transient `Connection` variant so the
//! retry policy re-attempts them; everything else is a permanent `Query`
//! failure.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::BookRepositoryError;

use super::pool::PoolError;

/// Map pool errors into a repository connection error.
pub(crate) fn map_pool_error(error: PoolError) -> BookRepositoryError {
    BookRepositoryError::connection(error.reason())
}

/// Map Diesel errors into repository errors.
pub(crate) fn map_diesel_error(error: DieselError) -> BookRepositoryError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(error = %error, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => BookRepositoryError::query("record not found"),
        DieselError::QueryBuilderError(_) => BookRepositoryError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _)
        | DieselError::BrokenTransactionManager => {
            BookRepositoryError::connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::SerializationFailure, _) => {
            BookRepositoryError::connection("database serialization failure")
        }
        _ => BookRepositoryError::query("database error"),
    }
}
