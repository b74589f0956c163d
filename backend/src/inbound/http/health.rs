//! Health endpoints: liveness & readiness probes for orchestration and load balancers.
//!
//! ```text
//! GET /health/ready  {"status":"UP"} or 503 {"status":"DOWN","error":"..."}
//! GET /health/live   {"status":"UP"} or 503 {"status":"DOWN"}
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, http::header, web};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

use crate::inbound::http::state::HttpState;

/// Shared health state for readiness and liveness checks.
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
        }
    }
}

impl HealthState {
    /// Create a new health state starting as not ready but live.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the service as ready.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Flag the service as unhealthy so liveness checks fail fast during shutdown.
    pub fn mark_unhealthy(&self) {
        self.live.store(false, Ordering::Release);
    }

    /// Return readiness state.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Return liveness state.
    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }
}

/// Probe response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthStatus {
    /// `UP` or `DOWN`.
    #[schema(example = "UP")]
    pub status: String,
    /// Reason the probe failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthStatus {
    fn up() -> Self {
        Self {
            status: "UP".to_owned(),
            error: None,
        }
    }

    fn down(error: Option<String>) -> Self {
        Self {
            status: "DOWN".to_owned(),
            error,
        }
    }
}

fn probe_response(status: HealthStatus) -> HttpResponse {
    let mut response = if status.status == "UP" {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };

    response
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(status)
}

/// Readiness probe. Return 200 when the server has started and the book
/// store answers; return 503 otherwise.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    responses(
        (status = 200, description = "Server is ready to handle traffic", body = HealthStatus),
        (status = 503, description = "Server or book store is not ready", body = HealthStatus)
    )
)]
#[get("/health/ready")]
pub async fn ready(health: web::Data<HealthState>, state: web::Data<HttpState>) -> HttpResponse {
    if !health.is_ready() {
        return probe_response(HealthStatus::down(Some("server starting".to_owned())));
    }

    match state.store_health.check().await {
        Ok(()) => probe_response(HealthStatus::up()),
        Err(err) => {
            warn!(error = %err, "readiness probe failed");
            probe_response(HealthStatus::down(Some(err.to_string())))
        }
    }
}

/// Liveness probe. Return 200 while the process is marked alive and 503 once draining.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    responses(
        (status = 200, description = "Server is alive", body = HealthStatus),
        (status = 503, description = "Server is shutting down", body = HealthStatus)
    )
)]
#[get("/health/live")]
pub async fn live(health: web::Data<HealthState>) -> HttpResponse {
    if health.is_alive() {
        probe_response(HealthStatus::up())
    } else {
        probe_response(HealthStatus::down(None))
    }
}
