//! Main configuration types.
//!
//! This module provides the top-level [`ForecastConfig`] struct and its builder.

use forecast_core::{Revision, RevisionSet};
use serde::{Deserialize, Serialize};

use crate::{ApiConfig, ConfigError, CorsConfig, DocsConfig, ServerConfig, TelemetryConfigSection};

/// Environment name that disables documentation endpoints.
pub const PRODUCTION_ENVIRONMENT: &str = "production";

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Complete forecast API configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load configuration from files
/// and environment variables.
///
/// # Example
///
/// ```
/// use forecast_config::ForecastConfig;
///
/// let config = ForecastConfig::default();
/// assert_eq!(config.server.http_addr, "0.0.0.0:8080");
/// assert!(config.docs_enabled());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct ForecastConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Revisions, path prefix and document metadata.
    #[serde(default)]
    pub api: ApiConfig,

    /// Documentation endpoints.
    #[serde(default)]
    pub docs: DocsConfig,

    /// CORS policy.
    #[serde(default)]
    pub cors: CorsConfig,

    /// Telemetry configuration (metrics, logging).
    #[serde(default)]
    pub telemetry: TelemetryConfigSection,
}

impl ForecastConfig {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```
    /// use forecast_config::{ForecastConfig, ServerConfig};
    ///
    /// let config = ForecastConfig::builder()
    ///     .server(ServerConfig {
    ///         http_addr: "127.0.0.1:3000".to_string(),
    ///         ..Default::default()
    ///     })
    ///     .build();
    ///
    /// assert_eq!(config.server.http_addr, "127.0.0.1:3000");
    /// ```
    #[must_use]
    pub fn builder() -> ForecastConfigBuilder {
        ForecastConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - Server address is invalid
    /// - The revision list is empty or holds an unparseable revision
    /// - The default revision is not among the declared revisions
    /// - The path prefix or docs base path does not start with `/`
    /// - The log level is unknown
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self
            .server
            .http_addr
            .parse::<std::net::SocketAddr>()
            .is_err()
        {
            return Err(ConfigError::invalid_value(
                "server.http_addr",
                format!("invalid socket address: {}", self.server.http_addr),
            ));
        }

        if self.server.request_timeout_ms == 0 {
            return Err(ConfigError::invalid_value(
                "server.request_timeout_ms",
                "must be greater than zero",
            ));
        }

        let declared = self.revision_set()?;
        let default = self.default_revision()?;
        if !declared.contains(&default) {
            return Err(ConfigError::invalid_value(
                "api.default_revision",
                format!(
                    "{default} is not one of the declared revisions ({})",
                    declared.to_header_value()
                ),
            ));
        }

        if !self.api.path_prefix.is_empty() && !self.api.path_prefix.starts_with('/') {
            return Err(ConfigError::invalid_value(
                "api.path_prefix",
                "must be empty or start with '/'",
            ));
        }

        if !self.docs.base_path.starts_with('/') || self.docs.base_path.len() < 2 {
            return Err(ConfigError::invalid_value(
                "docs.base_path",
                "must start with '/' and name a path",
            ));
        }

        let level = self.telemetry.logging.level.to_lowercase();
        let plain_level = !level.contains('=') && !level.contains(',');
        if plain_level && !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::invalid_value(
                "telemetry.logging.level",
                format!("unknown log level: {}", self.telemetry.logging.level),
            ));
        }

        Ok(())
    }

    /// Parses the declared revisions.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the list is empty and
    /// `ConfigError::InvalidRevision` if an entry does not parse.
    pub fn revision_set(&self) -> Result<RevisionSet, ConfigError> {
        if self.api.revisions.is_empty() {
            return Err(ConfigError::invalid_value(
                "api.revisions",
                "at least one revision must be declared",
            ));
        }
        self.api
            .revisions
            .iter()
            .map(|raw| {
                raw.parse::<Revision>()
                    .map_err(|source| ConfigError::InvalidRevision {
                        field: "api.revisions",
                        source,
                    })
            })
            .collect()
    }

    /// Parses the default revision.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidRevision` if it does not parse.
    pub fn default_revision(&self) -> Result<Revision, ConfigError> {
        self.api
            .default_revision
            .parse::<Revision>()
            .map_err(|source| ConfigError::InvalidRevision {
                field: "api.default_revision",
                source,
            })
    }

    /// True when running in the production environment.
    #[must_use]
    pub fn is_production(&self) -> bool {
        self.telemetry
            .environment
            .eq_ignore_ascii_case(PRODUCTION_ENVIRONMENT)
    }

    /// True when documentation endpoints should be mounted.
    #[must_use]
    pub fn docs_enabled(&self) -> bool {
        self.docs.enabled && !self.is_production()
    }

    /// Create a development configuration preset.
    ///
    /// This preset is optimized for local development with:
    /// - Pretty log formatting with ANSI colors
    /// - Debug log level
    /// - Documentation enabled
    ///
    /// # Example
    ///
    /// ```
    /// use forecast_config::ForecastConfig;
    ///
    /// let config = ForecastConfig::development();
    /// assert_eq!(config.telemetry.logging.level, "debug");
    /// assert!(config.docs_enabled());
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();

        config.telemetry.logging.level = "debug".to_string();
        config.telemetry.logging.format = crate::LogFormat::Pretty;
        config.telemetry.logging.ansi_enabled = true;
        config.telemetry.logging.include_location = true;
        config.telemetry.environment = "development".to_string();

        config.docs.enabled = true;

        config
    }

    /// Create a production configuration preset.
    ///
    /// JSON logs at info level; documentation is not served.
    ///
    /// # Example
    ///
    /// ```
    /// use forecast_config::ForecastConfig;
    ///
    /// let config = ForecastConfig::production();
    /// assert_eq!(config.telemetry.logging.format, forecast_config::LogFormat::Json);
    /// assert!(!config.docs_enabled());
    /// ```
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();

        config.telemetry.logging.level = "info".to_string();
        config.telemetry.logging.format = crate::LogFormat::Json;
        config.telemetry.logging.ansi_enabled = false;
        config.telemetry.environment = PRODUCTION_ENVIRONMENT.to_string();

        config
    }
}

/// Builder for [`ForecastConfig`].
#[derive(Debug, Default)]
pub struct ForecastConfigBuilder {
    config: ForecastConfig,
}

impl ForecastConfigBuilder {
    /// Create a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the server configuration.
    #[must_use]
    pub fn server(mut self, server: ServerConfig) -> Self {
        self.config.server = server;
        self
    }

    /// Set the API configuration.
    #[must_use]
    pub fn api(mut self, api: ApiConfig) -> Self {
        self.config.api = api;
        self
    }

    /// Set the documentation configuration.
    #[must_use]
    pub fn docs(mut self, docs: DocsConfig) -> Self {
        self.config.docs = docs;
        self
    }

    /// Set the CORS configuration.
    #[must_use]
    pub fn cors(mut self, cors: CorsConfig) -> Self {
        self.config.cors = cors;
        self
    }

    /// Set the telemetry configuration.
    #[must_use]
    pub fn telemetry(mut self, telemetry: TelemetryConfigSection) -> Self {
        self.config.telemetry = telemetry;
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> ForecastConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ForecastConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.is_production());
    }

    #[test]
    fn test_invalid_http_addr() {
        let mut config = ForecastConfig::default();
        config.server.http_addr = "not-an-address".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("server.http_addr"));
    }

    #[test]
    fn test_empty_revisions_rejected() {
        let mut config = ForecastConfig::default();
        config.api.revisions.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("api.revisions"));
    }

    #[test]
    fn test_unparseable_revision_rejected() {
        let mut config = ForecastConfig::default();
        config.api.revisions.push("latest".to_string());
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidRevision { field: "api.revisions", .. }
        ));
    }

    #[test]
    fn test_default_revision_must_be_declared() {
        let mut config = ForecastConfig::default();
        config.api.default_revision = "3.0".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("api.default_revision"));
    }

    #[test]
    fn test_revision_set_accepts_prefixed_forms() {
        let mut config = ForecastConfig::default();
        config.api.revisions = vec!["v1".to_string(), "2".to_string(), "2.1".to_string()];
        let set = config.revision_set().unwrap();
        assert_eq!(set.to_header_value(), "1.0, 2.0, 2.1");
    }

    #[test]
    fn test_docs_base_path_validated() {
        let mut config = ForecastConfig::default();
        config.docs.base_path = "swagger".to_string();
        assert!(config.validate().is_err());
        config.docs.base_path = "/".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_log_level_validated() {
        let mut config = ForecastConfig::default();
        config.telemetry.logging.level = "chatty".to_string();
        assert!(config.validate().is_err());
        config.telemetry.logging.level = "forecast_server=debug,info".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_production_disables_docs() {
        let mut config = ForecastConfig::production();
        config.docs.enabled = true;
        assert!(config.is_production());
        assert!(!config.docs_enabled());
    }

    #[test]
    fn test_docs_can_be_disabled_in_development() {
        let mut config = ForecastConfig::development();
        config.docs.enabled = false;
        assert!(!config.docs_enabled());
    }

    #[test]
    fn test_builder() {
        let config = ForecastConfig::builder()
            .cors(CorsConfig {
                allow_any_origin: false,
            })
            .build();
        assert!(!config.cors.allow_any_origin);
    }
}
