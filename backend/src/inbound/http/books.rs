//! Book HTTP handlers.
//!
//! ```text
//! GET    /api/v1/books?page=0&size=20
//! GET    /api/v1/books/search?title=..|description=..
//! GET    /api/v1/books/{id}
//! POST   /api/v1/books
//! PUT    /api/v1/books/{id}
//! DELETE /api/v1/books/{id}
//! DELETE /api/v1/books
//! ```
//!
//! Reads and deletes never report a degraded store: the service substitutes
//! an empty result, so a 404 or 204 here can mean either "absent" or
//! "suppressed by the circuit breaker". Only create surfaces store failure,
//! as 503.

use actix_web::http::header;
use actix_web::{HttpResponse, delete, get, post, put, web};
use pagination::{DEFAULT_PAGE_SIZE, PageRequest};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Book, BookDraft, BookId, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{BookPageSchema, ErrorEnvelopeSchema};
use crate::inbound::http::state::HttpState;

/// Path prefix used in the `Location` header of created books.
pub const BOOK_LOCATION_PREFIX: &str = "/api/books";

/// Request payload for creating or replacing a book.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    #[schema(example = "The Rust Programming Language")]
    pub title: String,
    #[schema(example = "An introduction to Rust")]
    pub description: String,
}

impl From<BookRequest> for BookDraft {
    fn from(value: BookRequest) -> Self {
        BookDraft::new(value.title, value.description)
    }
}

/// Book representation returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookResponse {
    #[schema(example = 1)]
    pub id: i32,
    pub title: String,
    pub description: String,
}

impl From<Book> for BookResponse {
    fn from(value: Book) -> Self {
        Self {
            id: value.id().get(),
            title: value.title().to_owned(),
            description: value.description().to_owned(),
        }
    }
}

/// Paging parameters for the listing endpoint.
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Zero-based page number. Defaults to 0.
    pub page: Option<u32>,
    /// Page size in `1..=100`. Defaults to 20.
    pub size: Option<u32>,
}

impl PageParams {
    fn into_request(self) -> Result<PageRequest, Error> {
        PageRequest::new(
            self.page.unwrap_or(0),
            self.size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
        .map_err(|err| Error::invalid_request(err.to_string()))
    }
}

/// Search parameters; exactly one must be supplied.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Case-sensitive fragment matched anywhere in the title.
    pub title: Option<String>,
    /// Exact description; the lowest-id match is returned.
    pub description: Option<String>,
}

enum Search {
    Title(String),
    Description(String),
}

impl TryFrom<SearchParams> for Search {
    type Error = Error;

    fn try_from(value: SearchParams) -> Result<Self, Self::Error> {
        match (value.title, value.description) {
            (Some(title), None) => Ok(Self::Title(title)),
            (None, Some(description)) => Ok(Self::Description(description)),
            _ => Err(Error::invalid_request(
                "exactly one of title or description is required",
            )),
        }
    }
}

fn book_location(id: BookId) -> String {
    format!("{BOOK_LOCATION_PREFIX}/{id}")
}

/// List one page of books.
///
/// Returns 204 when the page has no content, including when the store is
/// degraded.
#[utoipa::path(
    get,
    path = "/api/v1/books",
    params(PageParams),
    responses(
        (status = 200, description = "Page of books", body = BookPageSchema),
        (status = 204, description = "No books on this page"),
        (status = 400, description = "Invalid paging parameters", body = ErrorEnvelopeSchema)
    ),
    tags = ["books"],
    operation_id = "listBooks"
)]
#[get("/books")]
pub async fn list_books(
    state: web::Data<HttpState>,
    params: web::Query<PageParams>,
) -> ApiResult<HttpResponse> {
    let request = params.into_inner().into_request()?;
    let page = state.books.list_books(request).await?;

    if page.is_empty() {
        return Ok(HttpResponse::NoContent().finish());
    }
    Ok(HttpResponse::Ok().json(page.map(BookResponse::from)))
}

/// Search books by title fragment or exact description.
#[utoipa::path(
    get,
    path = "/api/v1/books/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching books", body = [BookResponse]),
        (status = 400, description = "Missing or conflicting parameters", body = ErrorEnvelopeSchema)
    ),
    tags = ["books"],
    operation_id = "searchBooks"
)]
#[get("/books/search")]
pub async fn search_books(
    state: web::Data<HttpState>,
    params: web::Query<SearchParams>,
) -> ApiResult<web::Json<Vec<BookResponse>>> {
    let books = match Search::try_from(params.into_inner())? {
        Search::Title(fragment) => state.books.find_by_title(&fragment).await?,
        Search::Description(description) => state
            .books
            .find_by_description(&description)
            .await?
            .into_iter()
            .collect(),
    };

    Ok(web::Json(books.into_iter().map(BookResponse::from).collect()))
}

/// Fetch one book.
#[utoipa::path(
    get,
    path = "/api/v1/books/{id}",
    params(("id" = i32, Path, description = "Book identifier")),
    responses(
        (status = 200, description = "Book found", body = BookResponse),
        (status = 404, description = "Book absent or store degraded")
    ),
    tags = ["books"],
    operation_id = "getBook"
)]
#[get("/books/{id}")]
pub async fn get_book(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let id = BookId::new(path.into_inner());
    Ok(match state.books.get_book(id).await? {
        Some(book) => HttpResponse::Ok().json(BookResponse::from(book)),
        None => HttpResponse::NotFound().finish(),
    })
}

/// Create a book.
#[utoipa::path(
    post,
    path = "/api/v1/books",
    request_body = BookRequest,
    responses(
        (status = 201, description = "Book created", body = BookResponse,
            headers(("Location" = String, description = "Path of the created book"))),
        (status = 400, description = "Malformed body", body = ErrorEnvelopeSchema),
        (status = 503, description = "Book store unavailable", body = ErrorEnvelopeSchema)
    ),
    tags = ["books"],
    operation_id = "createBook"
)]
#[post("/books")]
pub async fn create_book(
    state: web::Data<HttpState>,
    payload: web::Json<BookRequest>,
) -> ApiResult<HttpResponse> {
    let book = state
        .book_commands
        .create_book(payload.into_inner().into())
        .await?;

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, book_location(book.id())))
        .json(BookResponse::from(book)))
}

/// Replace the title and description of a book.
#[utoipa::path(
    put,
    path = "/api/v1/books/{id}",
    params(("id" = i32, Path, description = "Book identifier")),
    request_body = BookRequest,
    responses(
        (status = 200, description = "Book updated", body = BookResponse),
        (status = 400, description = "Malformed body", body = ErrorEnvelopeSchema),
        (status = 404, description = "Book absent or store degraded")
    ),
    tags = ["books"],
    operation_id = "updateBook"
)]
#[put("/books/{id}")]
pub async fn update_book(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
    payload: web::Json<BookRequest>,
) -> ApiResult<HttpResponse> {
    let id = BookId::new(path.into_inner());
    let updated = state
        .book_commands
        .update_book(id, payload.into_inner().into())
        .await?;

    Ok(match updated {
        Some(book) => HttpResponse::Ok().json(BookResponse::from(book)),
        None => HttpResponse::NotFound().finish(),
    })
}

/// Delete one book. Deleting an absent book also returns 204.
#[utoipa::path(
    delete,
    path = "/api/v1/books/{id}",
    params(("id" = i32, Path, description = "Book identifier")),
    responses((status = 204, description = "Book deleted or already absent")),
    tags = ["books"],
    operation_id = "deleteBook"
)]
#[delete("/books/{id}")]
pub async fn delete_book(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    state
        .book_commands
        .delete_book(BookId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Delete every book.
#[utoipa::path(
    delete,
    path = "/api/v1/books",
    responses((status = 204, description = "All books deleted")),
    tags = ["books"],
    operation_id = "deleteAllBooks"
)]
#[delete("/books")]
pub async fn delete_all_books(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    state.book_commands.delete_all_books().await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "books_tests.rs"]
mod tests;
