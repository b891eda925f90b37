//! Handler registration and dispatch.
//!
//! Resource handlers are bound to the `operationId` of their route. The
//! registry erases their types so the server can invoke any of them with a
//! [`RequestContext`] and the raw request body.
//!
//! # Example
//!
//! ```rust
//! use forecast_core::RequestContext;
//! use forecast_server::{HandlerRegistry, HandlerResponse};
//!
//! let mut registry = HandlerRegistry::new();
//! registry.register_no_body("ping", |_ctx: RequestContext| async {
//!     Ok(HandlerResponse::no_content())
//! });
//! assert!(registry.contains("ping"));
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use forecast_core::{ApiError, ApiResult, RequestContext};
use http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Type alias for a boxed handler future.
pub type HandlerFuture = Pin<Box<dyn Future<Output = ApiResult<HandlerResponse>> + Send>>;

/// A type-erased handler function.
pub type ErasedHandler = Arc<dyn Fn(RequestContext, Bytes) -> HandlerFuture + Send + Sync>;

/// What a handler hands back to the server.
#[derive(Debug, Clone)]
pub struct HandlerResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl HandlerResponse {
    /// A response with `status` and no body.
    #[must_use]
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// Serializes `value` as the JSON body.
    ///
    /// # Errors
    ///
    /// Returns an internal error if `value` cannot be serialized.
    pub fn json<T: Serialize>(status: StatusCode, value: &T) -> ApiResult<Self> {
        let body = serde_json::to_vec(value)
            .map_err(|e| ApiError::internal(format!("Response serialization failed: {e}")))?;
        let mut response = Self::new(status);
        response.headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        response.body = Bytes::from(body);
        Ok(response)
    }

    /// `200 OK` with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an internal error if `value` cannot be serialized.
    pub fn ok<T: Serialize>(value: &T) -> ApiResult<Self> {
        Self::json(StatusCode::OK, value)
    }

    /// `201 Created` with a `Location` header and a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an internal error if `value` cannot be serialized or
    /// `location` is not a valid header value.
    pub fn created<T: Serialize>(location: &str, value: &T) -> ApiResult<Self> {
        let location = HeaderValue::from_str(location)
            .map_err(|_| ApiError::internal(format!("Invalid Location header: {location}")))?;
        Ok(Self::json(StatusCode::CREATED, value)?.with_header(header::LOCATION, location))
    }

    /// `204 No Content`.
    #[must_use]
    pub fn no_content() -> Self {
        Self::new(StatusCode::NO_CONTENT)
    }

    /// Adds a response header.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Returns the status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the body.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Splits the response into status, headers and body.
    #[must_use]
    pub fn into_parts(self) -> (StatusCode, HeaderMap, Bytes) {
        (self.status, self.headers, self.body)
    }
}

/// Failure to invoke a registered operation.
#[derive(Debug, Error)]
pub enum InvokeError {
    /// No handler is registered under the operation id.
    #[error("No handler registered for operation '{0}'")]
    HandlerNotFound(String),

    /// The handler ran and returned an error.
    #[error(transparent)]
    Handler(#[from] ApiError),
}

/// Registry for operation handlers.
///
/// Maps operation ids to type-erased handler functions.
#[derive(Default, Clone)]
pub struct HandlerRegistry {
    handlers: HashMap<String, ErasedHandler>,
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("operations", &self.operation_ids().collect::<Vec<_>>())
            .finish()
    }
}

impl HandlerRegistry {
    /// Creates a new empty handler registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Registers a handler that receives the raw body.
    pub fn register<F, Fut>(&mut self, operation_id: impl Into<String>, handler: F)
    where
        F: Fn(RequestContext, Bytes) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ApiResult<HandlerResponse>> + Send + 'static,
    {
        let erased: ErasedHandler =
            Arc::new(move |ctx: RequestContext, body: Bytes| Box::pin(handler(ctx, body)));
        self.handlers.insert(operation_id.into(), erased);
    }

    /// Registers a handler whose body is decoded from JSON as `Req`.
    ///
    /// A body that does not decode is rejected with a validation error
    /// before the handler runs.
    pub fn register_json<Req, F, Fut>(&mut self, operation_id: impl Into<String>, handler: F)
    where
        Req: DeserializeOwned + Send + 'static,
        F: Fn(RequestContext, Req) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ApiResult<HandlerResponse>> + Send + 'static,
    {
        let handler = Arc::new(handler);
        let erased: ErasedHandler = Arc::new(move |ctx: RequestContext, body: Bytes| {
            let handler = Arc::clone(&handler);
            Box::pin(async move {
                let request: Req = serde_json::from_slice(&body)
                    .map_err(|e| ApiError::validation(format!("Invalid request body: {e}")))?;
                handler(ctx, request).await
            })
        });
        self.handlers.insert(operation_id.into(), erased);
    }

    /// Registers a handler that ignores the request body.
    pub fn register_no_body<F, Fut>(&mut self, operation_id: impl Into<String>, handler: F)
    where
        F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ApiResult<HandlerResponse>> + Send + 'static,
    {
        let erased: ErasedHandler =
            Arc::new(move |ctx: RequestContext, _body: Bytes| Box::pin(handler(ctx)));
        self.handlers.insert(operation_id.into(), erased);
    }

    /// Looks up a handler by operation id.
    #[must_use]
    pub fn get(&self, operation_id: &str) -> Option<&ErasedHandler> {
        self.handlers.get(operation_id)
    }

    /// Checks if a handler is registered for an operation.
    #[must_use]
    pub fn contains(&self, operation_id: &str) -> bool {
        self.handlers.contains_key(operation_id)
    }

    /// Invokes the handler registered under `operation_id`.
    ///
    /// # Errors
    ///
    /// [`InvokeError::HandlerNotFound`] if nothing is registered, otherwise
    /// whatever the handler returns.
    pub async fn invoke(
        &self,
        operation_id: &str,
        ctx: RequestContext,
        body: Bytes,
    ) -> Result<HandlerResponse, InvokeError> {
        let handler = self
            .get(operation_id)
            .ok_or_else(|| InvokeError::HandlerNotFound(operation_id.to_string()))?;
        Ok(handler(ctx, body).await?)
    }

    /// Returns the number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` if no handlers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Returns an iterator over registered operation ids.
    pub fn operation_ids(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }
}
