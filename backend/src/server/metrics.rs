//! Prometheus HTTP middleware sharing the book metrics registry.

use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use prometheus::Registry;

/// Build the HTTP exporter over the registry shared with book metrics.
///
/// Request metrics are prefixed `bookshelf_http_` and the whole registry,
/// book operation series included, is served at `/metrics`.
///
/// # Errors
///
/// Returns [`std::io::Error`] when the HTTP metrics cannot be registered.
pub(crate) fn make_metrics(registry: &Registry) -> std::io::Result<PrometheusMetrics> {
    PrometheusMetricsBuilder::new("bookshelf")
        .registry(registry.clone())
        .endpoint("/metrics")
        .build()
        .map_err(|e| std::io::Error::other(format!("configure Prometheus metrics: {e}")))
}
