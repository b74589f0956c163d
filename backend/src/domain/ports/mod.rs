//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`BookRepository`, `BookMetrics`, `StoreHealth`) are
//! implemented by outbound adapters. Driving ports (`BookQuery`,
//! `BookCommand`) are implemented by the domain service and consumed by
//! inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod book_command;
mod book_metrics;
mod book_query;
mod book_repository;
mod store_health;

#[cfg(test)]
pub use book_command::MockBookCommand;
pub use book_command::{BookCommand, FixtureBookCommand};
#[cfg(test)]
pub use book_metrics::MockBookMetrics;
pub use book_metrics::{BookMetrics, BookMetricsError, NoOpBookMetrics};
#[cfg(test)]
pub use book_query::MockBookQuery;
pub use book_query::{BookQuery, FixtureBookQuery};
#[cfg(test)]
pub use book_repository::MockBookRepository;
pub use book_repository::{BookRepository, BookRepositoryError, FixtureBookRepository};
#[cfg(test)]
pub use store_health::MockStoreHealth;
pub use store_health::{FixtureStoreHealth, StoreHealth, StoreHealthError};
