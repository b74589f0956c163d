//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every book endpoint, the health probes and the
//! schemas they reference. The document is served by Swagger UI in debug
//! builds and exported via `cargo run --bin openapi-dump`.

use utoipa::OpenApi;

use crate::inbound::http::books::{BookRequest, BookResponse};
use crate::inbound::http::health::HealthStatus;
use crate::inbound::http::schemas::{BookPageSchema, ErrorEnvelopeSchema};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookshelf API",
        description = "Paginated book catalogue guarded by per-operation circuit breakers."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::books::list_books,
        crate::inbound::http::books::search_books,
        crate::inbound::http::books::get_book,
        crate::inbound::http::books::create_book,
        crate::inbound::http::books::update_book,
        crate::inbound::http::books::delete_book,
        crate::inbound::http::books::delete_all_books,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        BookRequest,
        BookResponse,
        BookPageSchema,
        ErrorEnvelopeSchema,
        HealthStatus
    )),
    tags(
        (name = "books", description = "Book catalogue operations"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI schema field structure.

    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    use super::*;

    /// Assert that an Object schema contains a field with the given name.
    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn error_envelope_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let envelope = schemas.get("ErrorEnvelope").expect("ErrorEnvelope schema");

        assert_object_schema_has_field(envelope, "success");
        assert_object_schema_has_field(envelope, "message");
    }

    #[test]
    fn book_page_schema_uses_camel_case() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let page = schemas.get("BookPage").expect("BookPage schema");

        assert_object_schema_has_field(page, "content");
        assert_object_schema_has_field(page, "totalElements");
        assert_object_schema_has_field(page, "totalPages");
    }

    #[test]
    fn every_book_path_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/books",
            "/api/v1/books/search",
            "/api/v1/books/{id}",
            "/health/ready",
            "/health/live",
        ] {
            assert!(doc.paths.paths.contains_key(path), "{path} missing");
        }
    }
}
