//! Response construction shared by the API and documentation paths.

use bytes::Bytes;
use forecast_core::{ApiError, ErrorCategory, ErrorDetail, ErrorEnvelope};
use http::{header, HeaderValue, Response, StatusCode};
use http_body_util::Full;

/// Type alias for HTTP response body.
pub type ResponseBody = Full<Bytes>;

/// Type alias for the HTTP response.
pub type HttpResponse = Response<ResponseBody>;

/// Response header listing the declared revisions.
pub const SUPPORTED_VERSIONS_HEADER: &str = "api-supported-versions";

/// Response header echoing the request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const JSON: &str = "application/json; charset=utf-8";
const FALLBACK_INTERNAL: &str =
    r#"{"error":{"code":"INTERNAL_ERROR","message":"An unexpected error occurred.","category":"internal"}}"#;

/// Builds a response with a body and content type.
pub fn with_body(status: StatusCode, content_type: &'static str, body: impl Into<Bytes>) -> HttpResponse {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, HeaderValue::from_static(content_type))
        .body(Full::new(body.into()))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::new())))
}

/// Builds a JSON response.
pub fn json(status: StatusCode, body: impl Into<Bytes>) -> HttpResponse {
    with_body(status, JSON, body)
}

/// Builds an empty response.
pub fn empty(status: StatusCode) -> HttpResponse {
    let mut response = Response::new(Full::new(Bytes::new()));
    *response.status_mut() = status;
    response
}

/// Renders an error as its envelope.
///
/// Every 5xx is reported with the generic internal envelope; the detail
/// goes to the log only.
pub fn error(err: &ApiError, request_id: Option<&str>) -> HttpResponse {
    let status = err.status_code();
    let envelope = if err.is_server_error() {
        tracing::error!(request_id = request_id.unwrap_or("-"), error = %err, "Internal error");
        ErrorEnvelope::internal(request_id)
    } else {
        err.to_envelope(request_id)
    };
    envelope_response(status, &envelope)
}

/// Renders the generic internal envelope under `status`.
pub fn internal(status: StatusCode, request_id: Option<&str>) -> HttpResponse {
    envelope_response(status, &ErrorEnvelope::internal(request_id))
}

/// `408 Request Timeout` for a body that did not arrive in time.
pub fn request_timeout(request_id: Option<&str>) -> HttpResponse {
    let envelope = ErrorEnvelope {
        error: ErrorDetail {
            code: "REQUEST_TIMEOUT".to_string(),
            message: "The request body was not received in time.".to_string(),
            category: ErrorCategory::Validation,
            details: None,
        },
        request_id: request_id.map(ToString::to_string),
    };
    envelope_response(StatusCode::REQUEST_TIMEOUT, &envelope)
}

fn envelope_response(status: StatusCode, envelope: &ErrorEnvelope) -> HttpResponse {
    match serde_json::to_vec(envelope) {
        Ok(body) => json(status, body),
        Err(_) => json(status, FALLBACK_INTERNAL),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_json(response: HttpResponse) -> serde_json::Value {
        let bytes = tokio_test::block_on(http_body_util::BodyExt::collect(response.into_body()))
            .unwrap()
            .to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_client_error_keeps_detail() {
        let err = ApiError::not_found("Forecast not found");
        let response = error(&err, Some("req-1"));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response);
        assert_eq!(body["error"]["message"], "Forecast not found");
        assert_eq!(body["request_id"], "req-1");
    }

    #[test]
    fn test_server_error_is_generic() {
        let err = ApiError::internal("database password is hunter2");
        let response = error(&err, None);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response);
        assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
        assert_eq!(body["error"]["message"], "An unexpected error occurred.");
        assert!(!body.to_string().contains("hunter2"));
    }

    #[test]
    fn test_internal_keeps_status() {
        let response = internal(StatusCode::GATEWAY_TIMEOUT, Some("req-2"));
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body_json(response)["error"]["category"], "internal");
    }

    #[test]
    fn test_request_timeout_envelope() {
        let response = request_timeout(None);
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(body_json(response)["error"]["code"], "REQUEST_TIMEOUT");
    }

    #[test]
    fn test_fallback_is_valid_envelope() {
        let parsed: serde_json::Value = serde_json::from_str(FALLBACK_INTERNAL).unwrap();
        assert_eq!(parsed["error"]["message"], forecast_core::GENERIC_INTERNAL_MESSAGE);
    }

    #[test]
    fn test_empty_response() {
        let response = empty(StatusCode::NO_CONTENT);
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(response.headers().get(header::CONTENT_TYPE).is_none());
    }
}
