//! Cross-origin resource sharing.
//!
//! The API runs an allow-all policy: any origin, any method and any request
//! header. Preflight requests are answered directly with `204 No Content`
//! and never reach the resolver.

use http::{header, HeaderMap, HeaderValue, Method, Request, StatusCode};

use crate::response::{self, HttpResponse};

/// CORS header names.
pub mod headers {
    /// `Access-Control-Allow-Origin` header.
    pub const ALLOW_ORIGIN: &str = "access-control-allow-origin";
    /// `Access-Control-Allow-Methods` header.
    pub const ALLOW_METHODS: &str = "access-control-allow-methods";
    /// `Access-Control-Allow-Headers` header.
    pub const ALLOW_HEADERS: &str = "access-control-allow-headers";
    /// `Access-Control-Max-Age` header.
    pub const MAX_AGE: &str = "access-control-max-age";
    /// `Access-Control-Expose-Headers` header.
    pub const EXPOSE_HEADERS: &str = "access-control-expose-headers";
    /// `Access-Control-Request-Method` header (preflight).
    pub const REQUEST_METHOD: &str = "access-control-request-method";
    /// `Access-Control-Request-Headers` header (preflight).
    pub const REQUEST_HEADERS: &str = "access-control-request-headers";
}

const ANY_METHOD: &str = "GET, HEAD, POST, PUT, DELETE, PATCH, OPTIONS";

// Mirrors the header constants in `response`.
const EXPOSED_HEADERS: &str = "api-supported-versions, x-request-id, location";

/// Allow-all CORS policy.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    max_age_secs: u64,
    expose: HeaderValue,
}

impl Default for CorsPolicy {
    fn default() -> Self {
        Self::allow_any()
    }
}

impl CorsPolicy {
    /// Any origin, method and header; preflights cached for a day.
    #[must_use]
    pub fn allow_any() -> Self {
        Self {
            max_age_secs: 86_400,
            expose: HeaderValue::from_static(EXPOSED_HEADERS),
        }
    }

    /// Checks if a request is a CORS preflight.
    pub fn is_preflight<B>(&self, request: &Request<B>) -> bool {
        request.method() == Method::OPTIONS
            && request.headers().contains_key(headers::REQUEST_METHOD)
    }

    /// Builds the `204` answer to a preflight.
    ///
    /// Requested headers are echoed back; without any the wildcard is sent.
    pub fn preflight<B>(&self, request: &Request<B>) -> HttpResponse {
        let mut response = response::empty(StatusCode::NO_CONTENT);
        let out = response.headers_mut();
        out.insert(headers::ALLOW_ORIGIN, HeaderValue::from_static("*"));

        let methods = request
            .headers()
            .get(headers::REQUEST_METHOD)
            .filter(|v| !v.is_empty())
            .cloned()
            .unwrap_or_else(|| HeaderValue::from_static(ANY_METHOD));
        out.insert(headers::ALLOW_METHODS, methods);

        let allowed_headers = request
            .headers()
            .get(headers::REQUEST_HEADERS)
            .filter(|v| !v.is_empty())
            .cloned()
            .unwrap_or_else(|| HeaderValue::from_static("*"));
        out.insert(headers::ALLOW_HEADERS, allowed_headers);

        out.insert(headers::MAX_AGE, HeaderValue::from(self.max_age_secs));
        out.insert(
            header::VARY,
            HeaderValue::from_static(
                "Origin, Access-Control-Request-Method, Access-Control-Request-Headers",
            ),
        );
        response
    }

    /// Adds the CORS headers to a regular response.
    pub fn apply(&self, out: &mut HeaderMap) {
        out.insert(headers::ALLOW_ORIGIN, HeaderValue::from_static("*"));
        out.insert(headers::EXPOSE_HEADERS, self.expose.clone());
    }
}
