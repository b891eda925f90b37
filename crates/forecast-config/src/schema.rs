//! Configuration schema types.
//!
//! This module defines the structure of all configuration sections.

use serde::{Deserialize, Serialize};

/// Server configuration section.
///
/// Controls the HTTP listener, graceful shutdown and per-request timeouts.
///
/// # Example
///
/// ```
/// use forecast_config::ServerConfig;
///
/// let config = ServerConfig {
///     http_addr: "0.0.0.0:8080".to_string(),
///     shutdown_timeout_secs: 30,
///     request_timeout_ms: 30000,
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// HTTP server bind address (e.g., "0.0.0.0:8080").
    #[serde(default = "default_http_addr")]
    pub http_addr: String,

    /// Graceful shutdown timeout in seconds.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,

    /// Request timeout in milliseconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: default_http_addr(),
            shutdown_timeout_secs: default_shutdown_timeout(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

fn default_http_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_shutdown_timeout() -> u64 {
    30
}

fn default_request_timeout() -> u64 {
    30_000
}

/// API surface configuration: prefix, declared revisions and document metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Path prefix in front of the revision segment (e.g., "/api").
    #[serde(default = "default_path_prefix")]
    pub path_prefix: String,

    /// Revision served when a request omits the revision segment.
    #[serde(default = "default_revision")]
    pub default_revision: String,

    /// Every revision the service declares, e.g. `["1.0", "2.0"]`.
    #[serde(default = "default_revisions")]
    pub revisions: Vec<String>,

    /// Document title.
    #[serde(default = "default_title")]
    pub title: String,

    /// Document description.
    #[serde(default)]
    pub description: Option<String>,

    /// Contact name shown in documents.
    #[serde(default)]
    pub contact_name: Option<String>,

    /// Contact email shown in documents.
    #[serde(default)]
    pub contact_email: Option<String>,

    /// Contact URL shown in documents.
    #[serde(default)]
    pub contact_url: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            path_prefix: default_path_prefix(),
            default_revision: default_revision(),
            revisions: default_revisions(),
            title: default_title(),
            description: None,
            contact_name: None,
            contact_email: None,
            contact_url: None,
        }
    }
}

fn default_path_prefix() -> String {
    "/api".to_string()
}

fn default_revision() -> String {
    "1.0".to_string()
}

fn default_revisions() -> Vec<String> {
    vec!["1.0".to_string(), "2.0".to_string()]
}

fn default_title() -> String {
    "Weather Forecast API".to_string()
}

/// Documentation endpoint configuration.
///
/// Documentation is never mounted in the production environment, whatever
/// `enabled` says.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DocsConfig {
    /// Serve documents and the viewer outside production.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Base path of the viewer and documents.
    #[serde(default = "default_docs_base_path")]
    pub base_path: String,

    /// Honour `X-Forwarded-Proto` / `X-Forwarded-Host` when computing the
    /// serving origin.
    #[serde(default = "default_true")]
    pub trust_forwarded_headers: bool,

    /// Servers listed when no request origin is available.
    #[serde(default)]
    pub static_servers: Vec<String>,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_path: default_docs_base_path(),
            trust_forwarded_headers: true,
            static_servers: Vec::new(),
        }
    }
}

fn default_docs_base_path() -> String {
    "/swagger".to_string()
}

/// Cross-origin resource sharing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CorsConfig {
    /// Allow any origin, header and method.
    #[serde(default = "default_true")]
    pub allow_any_origin: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_any_origin: true,
        }
    }
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MetricsConfig {
    /// Install the Prometheus recorder and expose `/metrics`.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON formatted logs (production).
    #[default]
    Json,
    /// Human-readable pretty format (development).
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level or filter directive (e.g., "info", "forecast_server=debug").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include ANSI color codes in output.
    #[serde(default)]
    pub ansi_enabled: bool,

    /// Include source file and line in logs.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            ansi_enabled: false,
            include_location: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Telemetry configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TelemetryConfigSection {
    /// Service name for telemetry identification.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Deployment environment ("development", "staging" or "production").
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Metrics configuration.
    #[serde(default)]
    pub metrics: MetricsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for TelemetryConfigSection {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            environment: default_environment(),
            metrics: MetricsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_service_name() -> String {
    "forecast-api".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_true() -> bool {
    true
}
