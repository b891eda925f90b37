//! Error types for the forecast API.
//!
//! [`ApiError`] is the single error type shared by the resolver, the route
//! table and the resource handlers. Every variant maps to an HTTP status and
//! a machine-readable code, and renders into the uniform JSON envelope:
//!
//! ```json
//! {"error": {"code": "NOT_FOUND", "message": "...", "category": "not_found"}}
//! ```
//!
//! Server-side failures (`5xx`) never expose their message. The envelope for
//! them always carries [`GENERIC_INTERNAL_MESSAGE`].

use std::collections::BTreeMap;

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::revision::Revision;

/// Result type alias using [`ApiError`].
pub type ApiResult<T> = Result<T, ApiError>;

/// Message sent to clients for every server-side failure.
pub const GENERIC_INTERNAL_MESSAGE: &str = "An unexpected error occurred.";

/// Categories of errors for classification and handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// The request addressed a revision that is not declared.
    Revision,
    /// Request validation errors (invalid input, missing fields).
    Validation,
    /// Resource or route not found.
    NotFound,
    /// Startup configuration errors (route declarations).
    Configuration,
    /// Internal server errors.
    Internal,
}

impl ErrorCategory {
    /// Returns the default HTTP status code for this error category.
    #[must_use]
    pub const fn default_status_code(&self) -> StatusCode {
        match self {
            Self::Revision | Self::Validation => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Configuration | Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Standard error type for the forecast API.
///
/// # Example
///
/// ```
/// use forecast_core::{ApiError, Revision};
/// use http::StatusCode;
///
/// let err = ApiError::unsupported_revision("9.9", [Revision::new(1, 0), Revision::new(2, 0)]);
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// ```
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request named a revision that is unparseable or not declared.
    #[error("API revision '{requested}' is not supported")]
    UnsupportedRevision {
        /// The revision token as it appeared in the request.
        requested: String,
        /// Every declared revision, ascending.
        supported: Vec<Revision>,
    },

    /// No route matches the method and path for the resolved revision.
    #[error("No route matches {method} {path}")]
    NoMatchingRoute {
        /// Request method.
        method: String,
        /// Request path.
        path: String,
    },

    /// A route declaration lists revisions that are not declared globally.
    #[error("Route '{template}' lists undeclared revisions: {}", join_revisions(.undeclared))]
    InvalidRevisionSet {
        /// The offending route template.
        template: String,
        /// Revisions named by the route but absent from the declared set.
        undeclared: Vec<Revision>,
    },

    /// A route template is malformed or conflicts with an existing route.
    #[error("Invalid route template '{template}': {reason}")]
    InvalidRouteTemplate {
        /// The offending route template.
        template: String,
        /// Why the template was rejected.
        reason: String,
    },

    /// Request validation failed.
    #[error("Validation error: {message}")]
    Validation {
        /// Human-readable error message.
        message: String,
        /// Field-specific validation errors.
        #[source]
        field_errors: Option<FieldErrors>,
    },

    /// Resource not found.
    #[error("Not found: {message}")]
    NotFound {
        /// Human-readable error message.
        message: String,
        /// The type of resource that was not found.
        resource_type: Option<String>,
        /// The identifier of the resource.
        resource_id: Option<String>,
    },

    /// Internal server error. The message is logged, never sent.
    #[error("Internal error: {message}")]
    Internal {
        /// Human-readable error message.
        message: String,
    },
}

fn join_revisions(revisions: &[Revision]) -> String {
    revisions
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl ApiError {
    /// Creates an unsupported-revision error.
    pub fn unsupported_revision(
        requested: impl Into<String>,
        supported: impl IntoIterator<Item = Revision>,
    ) -> Self {
        Self::UnsupportedRevision {
            requested: requested.into(),
            supported: supported.into_iter().collect(),
        }
    }

    /// Creates a no-matching-route error.
    #[must_use]
    pub fn no_matching_route(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self::NoMatchingRoute {
            method: method.into(),
            path: path.into(),
        }
    }

    /// Creates an invalid-route-template error.
    #[must_use]
    pub fn invalid_route_template(template: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRouteTemplate {
            template: template.into(),
            reason: reason.into(),
        }
    }

    /// Creates a validation error with a message.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field_errors: None,
        }
    }

    /// Creates a validation error with field-specific errors.
    #[must_use]
    pub fn validation_with_fields(message: impl Into<String>, field_errors: FieldErrors) -> Self {
        Self::Validation {
            message: message.into(),
            field_errors: Some(field_errors),
        }
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            resource_type: None,
            resource_id: None,
        }
    }

    /// Creates a not found error with resource context.
    #[must_use]
    pub fn not_found_resource(
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
    ) -> Self {
        let resource_type = resource_type.into();
        let resource_id = resource_id.into();
        Self::NotFound {
            message: format!("{resource_type} with ID '{resource_id}' not found"),
            resource_type: Some(resource_type),
            resource_id: Some(resource_id),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns the error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::UnsupportedRevision { .. } => ErrorCategory::Revision,
            Self::Validation { .. } => ErrorCategory::Validation,
            Self::NoMatchingRoute { .. } | Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::InvalidRevisionSet { .. } | Self::InvalidRouteTemplate { .. } => {
                ErrorCategory::Configuration
            }
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        self.category().default_status_code()
    }

    /// Returns `true` for errors whose detail must stay on the server.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedRevision { .. } => "UNSUPPORTED_REVISION",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::NoMatchingRoute { .. } | Self::NotFound { .. } => "NOT_FOUND",
            Self::InvalidRevisionSet { .. }
            | Self::InvalidRouteTemplate { .. }
            | Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Converts this error to a serializable error envelope.
    ///
    /// Server-side errors collapse to [`ErrorEnvelope::internal`].
    #[must_use]
    pub fn to_envelope(&self, request_id: Option<&str>) -> ErrorEnvelope {
        if self.is_server_error() {
            return ErrorEnvelope::internal(request_id);
        }
        ErrorEnvelope {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
                category: self.category(),
                details: self.error_details(),
            },
            request_id: request_id.map(ToString::to_string),
        }
    }

    fn error_details(&self) -> Option<serde_json::Value> {
        match self {
            Self::UnsupportedRevision { supported, .. } => Some(serde_json::json!({
                "supportedRevisions": supported,
            })),
            Self::Validation {
                field_errors: Some(errors),
                ..
            } => Some(serde_json::json!({ "errors": errors.fields })),
            Self::NotFound {
                resource_type: Some(rt),
                resource_id: Some(rid),
                ..
            } => Some(serde_json::json!({
                "resource_type": rt,
                "resource_id": rid
            })),
            _ => None,
        }
    }
}

/// Field-specific validation errors, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("Field validation errors")]
pub struct FieldErrors {
    /// Map of field name to list of error messages.
    pub fields: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    /// Creates a new empty `FieldErrors`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an error for a field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Returns `true` if there are no field errors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the number of fields with errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

/// Serializable error envelope for HTTP responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// The error details.
    pub error: ErrorDetail,
    /// The request ID for correlation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ErrorEnvelope {
    /// The envelope sent for every server-side failure.
    #[must_use]
    pub fn internal(request_id: Option<&str>) -> Self {
        Self {
            error: ErrorDetail {
                code: "INTERNAL_ERROR".to_string(),
                message: GENERIC_INTERNAL_MESSAGE.to_string(),
                category: ErrorCategory::Internal,
                details: None,
            },
            request_id: request_id.map(ToString::to_string),
        }
    }
}

/// Error detail within an envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Error category.
    pub category: ErrorCategory,
    /// Additional error details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_revision() {
        let error =
            ApiError::unsupported_revision("9.9", [Revision::new(1, 0), Revision::new(2, 0)]);
        assert_eq!(error.category(), ErrorCategory::Revision);
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);

        let envelope = error.to_envelope(None);
        assert_eq!(envelope.error.code, "UNSUPPORTED_REVISION");
        let details = envelope.error.details.unwrap();
        assert_eq!(details["supportedRevisions"], serde_json::json!(["1.0", "2.0"]));
    }

    #[test]
    fn test_no_matching_route() {
        let error = ApiError::no_matching_route("GET", "/api/v1/nothing");
        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(error.error_code(), "NOT_FOUND");
        assert!(error.to_string().contains("/api/v1/nothing"));
    }

    #[test]
    fn test_validation_error_with_fields() {
        let mut field_errors = FieldErrors::new();
        field_errors.add("Date", "The Date field is required.");
        field_errors.add("TemperatureC", "The TemperatureC field is required.");

        let error = ApiError::validation_with_fields("One or more validation errors occurred.", field_errors);
        assert_eq!(error.category(), ErrorCategory::Validation);

        let envelope = error.to_envelope(Some("req-123"));
        let details = envelope.error.details.unwrap();
        assert_eq!(
            details["errors"]["Date"][0],
            "The Date field is required."
        );
    }

    #[test]
    fn test_not_found_resource() {
        let error = ApiError::not_found_resource("WeatherForecast", "2030-01-01");
        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
        assert!(error.to_string().contains("2030-01-01"));
    }

    #[test]
    fn test_configuration_errors_are_server_errors() {
        let error = ApiError::InvalidRevisionSet {
            template: "/api/v{revision}/x".to_string(),
            undeclared: vec![Revision::new(3, 0)],
        };
        assert!(error.is_server_error());
        assert!(error.to_string().contains("3.0"));

        let error = ApiError::invalid_route_template("/x", "missing placeholder");
        assert_eq!(error.category(), ErrorCategory::Configuration);
    }

    #[test]
    fn test_internal_error_hides_message() {
        let error = ApiError::internal("database password is hunter2");
        let envelope = error.to_envelope(Some("req-9"));
        assert_eq!(envelope.error.code, "INTERNAL_ERROR");
        assert_eq!(envelope.error.message, GENERIC_INTERNAL_MESSAGE);
        assert!(envelope.error.details.is_none());

        let json = serde_json::to_string(&envelope).unwrap();
        assert!(!json.contains("hunter2"));
        assert!(json.contains("\"request_id\":\"req-9\""));
    }

    #[test]
    fn test_error_envelope_serialization() {
        let error = ApiError::not_found("Resource not found");
        let envelope = error.to_envelope(Some("req-456"));

        let json = serde_json::to_string(&envelope).expect("serialization should work");
        assert!(json.contains("\"code\":\"NOT_FOUND\""));
        assert!(json.contains("\"category\":\"not_found\""));
    }

    #[test]
    fn test_field_errors() {
        let mut errors = FieldErrors::new();
        assert!(errors.is_empty());

        errors.add("Date", "Invalid format");
        assert_eq!(errors.len(), 1);

        errors.add("Date", "Required");
        assert_eq!(errors.fields["Date"].len(), 2);
    }
}
