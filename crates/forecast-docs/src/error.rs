//! Error types for the documentation crate.
//!
//! This module defines errors that can occur during synthesis, filtering
//! and serving of revision documents.

use thiserror::Error;

/// Errors that can occur during documentation generation.
#[derive(Debug, Error)]
pub enum DocsError {
    /// Failed to serialize the OpenAPI document to JSON.
    #[error("Failed to serialize OpenAPI document: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// A document was requested for a revision that is not declared.
    #[error("No document exists for revision '{revision}'")]
    UnsupportedRevision {
        /// The requested revision or group name.
        revision: String,
    },

    /// The document's `info.version` does not name a revision.
    #[error("Document version '{version}' is not a revision")]
    MissingRevision {
        /// The offending `info.version` value.
        version: String,
    },

    /// Two path templates collapsed onto one concrete path.
    #[error("Paths '{first}' and '{second}' both literalize to '{path}'")]
    PathCollision {
        /// The concrete path both templates produce.
        path: String,
        /// The template that claimed the path first.
        first: String,
        /// The template that collided with it.
        second: String,
    },

    /// A route declaration cannot be expressed in the document.
    #[error("Invalid operation '{operation_id}': {reason}")]
    InvalidOperation {
        /// The operation ID that is invalid.
        operation_id: String,
        /// The reason the operation is invalid.
        reason: String,
    },

    /// A declared schema is not valid JSON Schema for the document model.
    #[error("Failed to convert schema: {reason}")]
    SchemaConversionError {
        /// The reason for the conversion failure.
        reason: String,
    },
}

/// Result type for documentation operations.
pub type DocsResult<T> = Result<T, DocsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_error() {
        let err: DocsError = serde_json::from_str::<String>("invalid")
            .unwrap_err()
            .into();
        assert!(matches!(err, DocsError::SerializationError(_)));
        assert!(err.to_string().contains("serialize"));
    }

    #[test]
    fn test_path_collision_error() {
        let err = DocsError::PathCollision {
            path: "/api/v1.0/items".to_string(),
            first: "/api/v{revision}/items".to_string(),
            second: "/api/v{revision}/Items".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("/api/v1.0/items"));
        assert!(message.contains("/api/v{revision}/Items"));
    }

    #[test]
    fn test_missing_revision_error() {
        let err = DocsError::MissingRevision {
            version: "latest".to_string(),
        };
        assert!(err.to_string().contains("latest"));
    }

    #[test]
    fn test_invalid_operation_error() {
        let err = DocsError::InvalidOperation {
            operation_id: "getWeatherForecast".to_string(),
            reason: "unknown HTTP method".to_string(),
        };
        assert!(err.to_string().contains("getWeatherForecast"));
        assert!(err.to_string().contains("unknown HTTP method"));
    }
}
