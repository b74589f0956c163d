//! Prometheus adapter for book operation metrics.
//!
//! Metrics are registered with a provided registry and exposed via the
//! `/metrics` endpoint when the `metrics` feature is enabled.

use std::time::Duration;

use async_trait::async_trait;
use prometheus::{CounterVec, HistogramOpts, HistogramVec, Opts, Registry};

use crate::domain::BookOperation;
use crate::domain::ports::{BookMetrics, BookMetricsError};

const OPERATION_LABEL: &str = "operation";

/// Prometheus-backed book metrics recorder.
///
/// # Metric Specification
///
/// - `bookshelf_book_operation_calls_total` (counter): invocations, including
///   short-circuited ones.
/// - `bookshelf_book_operation_errors_total` (counter): failures observed
///   before a fallback applied.
/// - `bookshelf_book_operation_duration_seconds` (histogram): wall-clock
///   time per invocation.
///
/// Every metric carries an `operation` label such as `getAllBooks`.
pub struct PrometheusBookMetrics {
    calls_total: CounterVec,
    errors_total: CounterVec,
    duration_seconds: HistogramVec,
}

impl PrometheusBookMetrics {
    /// Create and register metrics with the given registry.
    ///
    /// # Errors
    ///
    /// Returns an error if a metric cannot be registered (e.g., if a metric
    /// with the same name already exists in the registry).
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let calls_total = CounterVec::new(
            Opts::new(
                "bookshelf_book_operation_calls_total",
                "Total book operation invocations",
            ),
            &[OPERATION_LABEL],
        )?;
        let errors_total = CounterVec::new(
            Opts::new(
                "bookshelf_book_operation_errors_total",
                "Total failed book operation invocations",
            ),
            &[OPERATION_LABEL],
        )?;
        let duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "bookshelf_book_operation_duration_seconds",
                "Book operation duration in seconds",
            ),
            &[OPERATION_LABEL],
        )?;

        registry.register(Box::new(calls_total.clone()))?;
        registry.register(Box::new(errors_total.clone()))?;
        registry.register(Box::new(duration_seconds.clone()))?;

        Ok(Self {
            calls_total,
            errors_total,
            duration_seconds,
        })
    }
}

fn export_error(err: prometheus::Error) -> BookMetricsError {
    BookMetricsError::export(err.to_string())
}

#[async_trait]
impl BookMetrics for PrometheusBookMetrics {
    async fn record_call(&self, operation: BookOperation) -> Result<(), BookMetricsError> {
        self.calls_total
            .get_metric_with_label_values(&[operation.name()])
            .map_err(export_error)?
            .inc();
        Ok(())
    }

    async fn record_error(&self, operation: BookOperation) -> Result<(), BookMetricsError> {
        self.errors_total
            .get_metric_with_label_values(&[operation.name()])
            .map_err(export_error)?
            .inc();
        Ok(())
    }

    async fn record_duration(
        &self,
        operation: BookOperation,
        elapsed: Duration,
    ) -> Result<(), BookMetricsError> {
        self.duration_seconds
            .get_metric_with_label_values(&[operation.name()])
            .map_err(export_error)?
            .observe(elapsed.as_secs_f64());
        Ok(())
    }
}
