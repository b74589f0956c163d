//! Domain port surface for recording per-operation book metrics.
//!
//! Every resilience-wrapped book operation reports one call, at most one
//! error and one duration sample. Recording is a side effect only: a failing
//! exporter never changes the result of the operation.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::BookOperation;

use super::define_port_error;

define_port_error! {
    /// Errors exposed when recording book metrics.
    pub enum BookMetricsError {
        /// Metric exporter rejected the write.
        Export => "book metrics exporter failed: {message}",
    }
}

/// Metrics recording port for book operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookMetrics: Send + Sync {
    /// Record that `operation` was invoked.
    async fn record_call(&self, operation: BookOperation) -> Result<(), BookMetricsError>;

    /// Record that `operation` failed before any fallback applied.
    async fn record_error(&self, operation: BookOperation) -> Result<(), BookMetricsError>;

    /// Record the wall-clock time `operation` took, fallback included.
    async fn record_duration(
        &self,
        operation: BookOperation,
        elapsed: Duration,
    ) -> Result<(), BookMetricsError>;
}

/// No-op implementation for when metrics are disabled or in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpBookMetrics;

#[async_trait]
impl BookMetrics for NoOpBookMetrics {
    async fn record_call(&self, _operation: BookOperation) -> Result<(), BookMetricsError> {
        Ok(())
    }

    async fn record_error(&self, _operation: BookOperation) -> Result<(), BookMetricsError> {
        Ok(())
    }

    async fn record_duration(
        &self,
        _operation: BookOperation,
        _elapsed: Duration,
    ) -> Result<(), BookMetricsError> {
        Ok(())
    }
}
