//! Tracing middleware attaching a request-scoped trace identifier.
//!
//! Each incoming request receives a UUID trace id stored in task-local
//! storage for correlation across logs and error responses. A caller-supplied
//! `trace-id` header is reused when it parses as a UUID.
//!
//! Tokio task-local variables are not inherited across spawned tasks. Use
//! [`TraceId::scope`] when spawning new tasks.

use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{Instrument, error, info_span};

use crate::domain::{TRACE_ID_HEADER, TraceId};

fn request_trace_id(req: &ServiceRequest) -> TraceId {
    TraceId::resolve(
        req.headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok()),
    )
}

/// Tracing middleware attaching a request-scoped UUID and
/// adding a `trace-id` header to every response.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use bookshelf::Trace;
///
/// let app = App::new().wrap(Trace);
/// ```
#[derive(Clone)]
pub struct Trace;

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceMiddleware { service }))
    }
}

/// Service wrapper produced by [`Trace`].
pub struct TraceMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for TraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = request_trace_id(&req);
        let span = info_span!(
            "request",
            trace_id = %trace_id,
            method = %req.method(),
            path = %req.path()
        );
        let header_value = trace_id.to_string();
        let fut = self.service.call(req);
        Box::pin(TraceId::scope(
            trace_id,
            async move {
                let mut res = fut.await?;
                match HeaderValue::from_str(&header_value) {
                    Ok(value) => {
                        res.response_mut()
                            .headers_mut()
                            .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
                    }
                    Err(error) => {
                        error!(
                            %error,
                            trace_id = %trace_id,
                            "failed to encode trace identifier header"
                        );
                    }
                }
                Ok(res)
            }
            .instrument(span),
        ))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};
    use rstest::rstest;
    use serde_json::Value;

    use super::*;
    use crate::domain::Error as DomainError;
    use crate::inbound::http::ApiResult;

    const CALLER_ID: &str = "6f1c2a38-51f6-4f7e-9d8b-2a7c0f3b9e11";

    async fn echo_current() -> HttpResponse {
        match TraceId::current() {
            Some(id) => HttpResponse::Ok().body(id.to_string()),
            None => HttpResponse::InternalServerError().finish(),
        }
    }

    async fn missing_book() -> ApiResult<HttpResponse> {
        Err(DomainError::not_found("book 9 not found"))
    }

    async fn send(path: &str, inbound: Option<&str>) -> (StatusCode, Option<String>, Vec<u8>) {
        let app = test::init_service(
            App::new()
                .wrap(Trace)
                .route("/echo", web::get().to(echo_current))
                .route("/missing", web::get().to(missing_book)),
        )
        .await;
        let mut req = test::TestRequest::get().uri(path);
        if let Some(value) = inbound {
            req = req.insert_header((TRACE_ID_HEADER, value));
        }
        let res = test::call_service(&app, req.to_request()).await;
        let status = res.status();
        let header = res
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        (status, header, test::read_body(res).await.to_vec())
    }

    #[actix_web::test]
    async fn handler_sees_the_echoed_trace_id() {
        let (status, header, body) = send("/echo", None).await;
        assert_eq!(status, StatusCode::OK);
        let header = header.expect("trace id header");
        assert!(header.parse::<TraceId>().is_ok());
        assert_eq!(String::from_utf8(body).expect("utf8 body"), header);
    }

    #[rstest]
    #[case(Some(CALLER_ID), true)]
    #[case(Some("book-9"), false)]
    #[case(None, false)]
    #[actix_web::test]
    async fn caller_trace_id_reused_only_when_valid(
        #[case] inbound: Option<&str>,
        #[case] reused: bool,
    ) {
        let (_, header, _) = send("/echo", inbound).await;
        let header = header.expect("trace id header");
        assert_eq!(header == CALLER_ID, reused);
        assert!(header.parse::<TraceId>().is_ok());
    }

    #[actix_web::test]
    async fn error_envelope_carries_trace_header() {
        let (status, header, body) = send("/missing", Some(CALLER_ID)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(header.as_deref(), Some(CALLER_ID));
        let envelope: Value = serde_json::from_slice(&body).expect("json envelope");
        assert_eq!(envelope["success"], false);
        assert_eq!(envelope["message"], "book 9 not found");
    }
}
