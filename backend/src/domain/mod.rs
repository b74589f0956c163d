//! Domain primitives, ports and services.
//!
//! Purpose: define the book aggregate and the orchestration that wraps every
//! store call in resilience and metrics. Types here stay free of HTTP and
//! SQL concerns; adapters translate at the edges.
//!
//! Public surface:
//! - `Book`, `BookId`, `BookDraft`: the aggregate and its parts.
//! - `BookOperation`: the named operations guarded by resilience policies.
//! - `BookService`: implementation of the `BookQuery` and `BookCommand`
//!   driving ports.
//! - `Error`, `ErrorCode`: transport-agnostic failures.
//! - `TraceId`: request correlation identifier.

mod book;
mod book_service;
pub mod error;
mod operation;
pub mod ports;
mod trace_id;

pub use self::book::{Book, BookDraft, BookId};
pub use self::book_service::BookService;
pub use self::error::{Error, ErrorCode};
pub use self::operation::BookOperation;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
