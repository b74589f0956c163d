//! Bookshelf library modules.
//!
//! Hexagonal layout: `domain` owns books, ports and the resilient
//! `BookService`; `inbound` adapts HTTP onto the driving ports; `outbound`
//! implements the driven ports over PostgreSQL, process memory and
//! Prometheus.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
