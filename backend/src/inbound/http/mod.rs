//! HTTP inbound adapter exposing REST endpoints.

pub mod books;
pub mod error;
pub mod health;
pub mod schemas;
pub mod state;

use actix_web::{Scope, web};

pub use error::{ApiResult, ErrorEnvelope};

/// Build the `/api/v1` scope with every book endpoint registered.
///
/// Malformed query strings and JSON bodies are answered with the failure
/// envelope. `/books/search` is registered ahead of `/books/{id}`.
pub fn api_scope() -> Scope {
    web::scope("/api/v1")
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .service(books::list_books)
        .service(books::search_books)
        .service(books::get_book)
        .service(books::create_book)
        .service(books::update_book)
        .service(books::delete_book)
        .service(books::delete_all_books)
}
