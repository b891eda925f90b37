//! Configuration error types.

use std::path::PathBuf;

use forecast_core::RevisionParseError;
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found.
    #[error("configuration file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// Failed to read configuration file.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error.
    #[error("failed to parse TOML configuration: {0}")]
    TomlError(#[from] toml::de::Error),

    /// JSON parsing error.
    #[error("failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration value.
    #[error("invalid configuration value for {field}: {reason}")]
    InvalidValue {
        /// The field with the invalid value.
        field: String,
        /// Explanation of why the value is invalid.
        reason: String,
    },

    /// A revision entry in `[api]` does not parse.
    #[error("invalid revision in {field}")]
    InvalidRevision {
        /// `api.revisions` or `api.default_revision`.
        field: &'static str,
        /// The parse failure, naming the rejected input.
        #[source]
        source: RevisionParseError,
    },

    /// Environment variable parsing error.
    #[error("failed to parse environment variable {var}: {reason}")]
    EnvParseError {
        /// The environment variable name.
        var: String,
        /// Explanation of the parsing error.
        reason: String,
    },

    /// Validation error after loading.
    #[error("configuration validation failed: {0}")]
    ValidationError(String),
}

impl ConfigError {
    /// Create a new file not found error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a new read error.
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Create a new invalid value error.
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a new environment variable parse error.
    pub fn env_parse_error(var: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::EnvParseError {
            var: var.into(),
            reason: reason.into(),
        }
    }

    /// Create a new validation error.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_not_found_error() {
        let err = ConfigError::file_not_found("/path/to/forecast.toml");
        assert!(err.to_string().contains("/path/to/forecast.toml"));
    }

    #[test]
    fn test_invalid_value_error() {
        let err = ConfigError::invalid_value("api.default_revision", "not declared");
        let message = err.to_string();
        assert!(message.contains("api.default_revision"));
        assert!(message.contains("not declared"));
    }

    #[test]
    fn test_env_parse_error() {
        let err = ConfigError::env_parse_error("FORECAST__SERVER__REQUEST_TIMEOUT_MS", "expected integer");
        assert!(err.to_string().contains("FORECAST__SERVER__REQUEST_TIMEOUT_MS"));
    }

    #[test]
    fn test_invalid_revision_keeps_input() {
        let source = "one".parse::<forecast_core::Revision>().unwrap_err();
        let err = ConfigError::InvalidRevision {
            field: "api.revisions",
            source,
        };
        assert!(err.to_string().contains("api.revisions"));
        let inner = std::error::Error::source(&err).unwrap().to_string();
        assert!(inner.contains("'one'"));
    }

    #[test]
    fn test_read_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ConfigError::read_error("/etc/forecast.toml", io);
        assert!(std::error::Error::source(&err).is_some());
    }
}
