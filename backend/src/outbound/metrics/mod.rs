//! Outbound adapters for metrics exporting.
//!
//! Prometheus-backed implementations of domain metrics ports. The HTTP
//! exposition endpoint is feature-gated behind `metrics`; recording is not.

mod prometheus_book_metrics;

pub use prometheus_book_metrics::PrometheusBookMetrics;
