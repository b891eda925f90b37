//! Typed configuration for the forecast API host.
//!
//! - TOML and JSON configuration files
//! - `.env` files and environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → env)
//!
//! # Example
//!
//! ```no_run
//! use forecast_config::{ConfigLoader, DEFAULT_ENV_PREFIX};
//!
//! # fn main() -> Result<(), forecast_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_defaults()
//!     .with_optional_file("forecast.toml")?
//!     .with_dotenv()
//!     .with_env_prefix(DEFAULT_ENV_PREFIX)
//!     .load()?;
//!
//! println!("Server will listen on: {}", config.server.http_addr);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [server]
//! http_addr = "0.0.0.0:8080"
//! shutdown_timeout_secs = 30
//! request_timeout_ms = 30000
//!
//! [api]
//! path_prefix = "/api"
//! default_revision = "1.0"
//! revisions = ["1.0", "2.0"]
//! title = "Weather Forecast API"
//!
//! [docs]
//! enabled = true
//! base_path = "/swagger"
//! trust_forwarded_headers = true
//!
//! [cors]
//! allow_any_origin = true
//!
//! [telemetry]
//! service_name = "forecast-api"
//! environment = "development"
//!
//! [telemetry.metrics]
//! enabled = true
//!
//! [telemetry.logging]
//! level = "info"
//! format = "json"
//! ```
//!
//! # Environment Variable Overrides
//!
//! Every value can be overridden with `PREFIX__SECTION__KEY`:
//!
//! - `FORECAST__SERVER__HTTP_ADDR=0.0.0.0:9000`
//! - `FORECAST__API__REVISIONS=1.0,2.0,2.1`
//! - `FORECAST__TELEMETRY__LOGGING__LEVEL=debug`
//!
//! `FORECAST_ENVIRONMENT=production` is shorthand for
//! `FORECAST__TELEMETRY__ENVIRONMENT`. Documentation endpoints are never
//! mounted in production.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::{ForecastConfig, ForecastConfigBuilder, PRODUCTION_ENVIRONMENT};
pub use error::ConfigError;
pub use loader::{ConfigLoader, DEFAULT_ENV_PREFIX};
pub use schema::{
    ApiConfig, CorsConfig, DocsConfig, LogFormat, LoggingConfig, MetricsConfig, ServerConfig,
    TelemetryConfigSection,
};
