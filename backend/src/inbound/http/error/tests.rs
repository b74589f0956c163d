//! Tests for HTTP error mapping.

use super::*;
use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::{fixture, rstest};

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::service_unavailable("down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

async fn envelope_of(error: &Error) -> (StatusCode, Option<String>, ErrorEnvelope) {
    let response = ResponseError::error_response(error);
    let status = response.status();
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .map(|value| value.to_str().expect("trace id is ASCII").to_owned());
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    let envelope = serde_json::from_slice(&bytes).expect("envelope deserialises");
    (status, header, envelope)
}

#[rstest]
#[actix_rt::test]
async fn internal_errors_carry_prefixed_message(expected_trace_id: String) {
    let error = Error::internal("disk on fire").with_trace_id(expected_trace_id.clone());

    let (status, header, envelope) = envelope_of(&error).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(header.as_deref(), Some(expected_trace_id.as_str()));
    assert_eq!(
        envelope,
        ErrorEnvelope {
            success: false,
            message: "An unexpected error occurred: disk on fire".to_owned(),
        }
    );
}

#[rstest]
#[actix_rt::test]
async fn client_errors_keep_message_verbatim() {
    let (status, header, envelope) = envelope_of(&Error::invalid_request("size too big")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(header.is_none());
    assert!(!envelope.success);
    assert_eq!(envelope.message, "size too big");
}

#[rstest]
fn actix_errors_become_internal() {
    let actix_err = actix_web::error::ErrorBadGateway("upstream");
    let error = Error::from(actix_err);

    assert_eq!(error.code(), ErrorCode::InternalError);
    assert_eq!(error.message(), "upstream");
}
