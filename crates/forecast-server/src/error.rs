//! Server error types.

use thiserror::Error;

/// Errors raised while building or running the server.
///
/// Request-level failures never surface here; they become error envelopes.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind to the configured address.
    #[error("Bind error: {0}")]
    BindError(String),

    /// I/O error during server operation.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The server was assembled from inconsistent parts.
    #[error("Invalid server configuration: {0}")]
    Configuration(String),

    /// A registered route has no handler.
    #[error("No handler registered for operation '{operation_id}'")]
    MissingHandler {
        /// Operation without a handler.
        operation_id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_display() {
        let bind_err = ServerError::BindError("Address in use".to_string());
        assert!(bind_err.to_string().contains("Bind error"));

        let missing = ServerError::MissingHandler {
            operation_id: "getWeatherForecasts".to_string(),
        };
        assert!(missing.to_string().contains("getWeatherForecasts"));

        let io = ServerError::from(std::io::Error::new(std::io::ErrorKind::Other, "reset"));
        assert!(io.to_string().contains("I/O error"));
    }
}
