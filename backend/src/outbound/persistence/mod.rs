//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! - `DbPool`: async connection pool built on `diesel-async` and `bb8`.
//! - `DieselBookRepository`: the `BookRepository` port over the `books`
//!   table.
//! - `DieselStoreHealth`: readiness probe used by `/health/ready`.
//!
//! Row structs and the Diesel schema stay private to this module.

mod diesel_book_repository;
mod diesel_error_mapping;
mod diesel_store_health;
mod models;
mod pool;
mod schema;

pub use diesel_book_repository::DieselBookRepository;
pub use diesel_store_health::DieselStoreHealth;
pub use pool::{DbPool, PoolConfig, PoolError};
