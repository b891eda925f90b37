//! Observability for the forecast API.
//!
//! - **Logging**: structured JSON or pretty output via `tracing-subscriber`
//! - **Metrics**: Prometheus text format via the `metrics` facade
//!
//! # Example
//!
//! ```rust,ignore
//! use forecast_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let config = TelemetryConfig::builder()
//!     .service_name("forecast-api")
//!     .environment("development")
//!     .build();
//!
//! let registry = init_telemetry(&config)?;
//! ```
//!
//! # Metrics Endpoint
//!
//! ```text
//! # TYPE forecast_requests_total counter
//! forecast_requests_total{operation="getForecasts",status="200"} 12
//! forecast_documents_served_total{revision="2.0"} 3
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;

pub use config::{TelemetryConfig, TelemetryConfigBuilder};
pub use error::TelemetryError;
pub use logging::{init_logging, LogConfig};
pub use crate::metrics::{
    decrement_in_flight, increment_in_flight, init_metrics, record_document_served,
    record_request, render_metrics, MetricsConfig, MetricsRegistry,
};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Initializes logging, then metrics.
///
/// Returns the metrics registry when metrics are enabled.
///
/// # Errors
///
/// Returns `TelemetryError` if either subsystem fails to initialize.
pub fn init_telemetry(config: &TelemetryConfig) -> TelemetryResult<Option<MetricsRegistry>> {
    init_logging(&config.logging)?;
    let registry = init_metrics(&config.metrics)?;

    tracing::info!(
        service.name = %config.service_name,
        environment = %config.environment,
        metrics = registry.is_some(),
        "Telemetry initialized"
    );

    Ok(registry)
}
