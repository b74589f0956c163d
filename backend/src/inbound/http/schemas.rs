//! OpenAPI schema definitions for types that are not documented in place.
//!
//! `Page<T>` lives in the framework-free `pagination` crate, so its schema is
//! mirrored here for the book listing.

use utoipa::ToSchema;

use crate::inbound::http::books::BookResponse;

/// OpenAPI schema for the failure envelope.
#[derive(ToSchema)]
#[schema(as = ErrorEnvelope)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorEnvelopeSchema {
    /// Always `false`.
    #[schema(example = false)]
    success: bool,
    /// Human-readable failure description.
    #[schema(example = "page size must be greater than zero")]
    message: String,
}

/// OpenAPI schema for a page of books.
#[derive(ToSchema)]
#[schema(as = BookPage, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct BookPageSchema {
    /// Books on this page in ascending id order.
    content: Vec<BookResponse>,
    /// Zero-based page number.
    #[schema(example = 0)]
    page: u32,
    /// Requested page size.
    #[schema(example = 20)]
    size: u32,
    /// Number of stored books.
    #[schema(example = 2)]
    total_elements: u64,
    /// `ceil(totalElements / size)`.
    #[schema(example = 1)]
    total_pages: u64,
}
