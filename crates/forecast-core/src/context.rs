//! Request context types.
//!
//! The [`RequestContext`] carries per-request state from dispatch into
//! handlers: the request id, the resolved revision, and the captured path
//! parameters.

use std::collections::HashMap;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::revision::Revision;

/// A unique identifier for each request, using UUID v7.
///
/// UUID v7 is time-ordered, which keeps request ids sortable in logs.
///
/// # Example
///
/// ```
/// use forecast_core::RequestId;
///
/// let id = RequestId::new();
/// println!("Request ID: {}", id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new unique request ID using UUID v7.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RequestId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Per-request context handed to every handler.
///
/// # Example
///
/// ```
/// use forecast_core::{RequestContext, Revision};
///
/// let ctx = RequestContext::new(Revision::new(2, 0))
///     .with_operation_id("getWeatherForecast")
///     .with_path_param("date", "2030-01-01");
/// assert_eq!(ctx.path_param("date"), Some("2030-01-01"));
/// ```
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: RequestId,
    revision: Revision,
    explicit_revision: bool,
    operation_id: Option<String>,
    path_params: HashMap<String, String>,
    query: Option<String>,
    started_at: Instant,
}

impl RequestContext {
    /// Creates a context for a request addressing `revision` explicitly.
    #[must_use]
    pub fn new(revision: Revision) -> Self {
        Self::with_request_id(RequestId::new(), revision)
    }

    /// Creates a context with the specified request ID.
    #[must_use]
    pub fn with_request_id(request_id: RequestId, revision: Revision) -> Self {
        Self {
            request_id,
            revision,
            explicit_revision: true,
            operation_id: None,
            path_params: HashMap::new(),
            query: None,
            started_at: Instant::now(),
        }
    }

    /// Returns the request ID.
    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns the revision the request was resolved to.
    #[must_use]
    pub const fn revision(&self) -> Revision {
        self.revision
    }

    /// Returns `false` when the revision was defaulted.
    #[must_use]
    pub const fn is_explicit_revision(&self) -> bool {
        self.explicit_revision
    }

    /// Marks whether the revision segment was present in the path.
    #[must_use]
    pub fn with_explicit_revision(mut self, explicit: bool) -> Self {
        self.explicit_revision = explicit;
        self
    }

    /// Returns the operation ID if set.
    #[must_use]
    pub fn operation_id(&self) -> Option<&str> {
        self.operation_id.as_deref()
    }

    /// Returns a new context with the specified operation ID.
    #[must_use]
    pub fn with_operation_id(mut self, operation_id: impl Into<String>) -> Self {
        self.operation_id = Some(operation_id.into());
        self
    }

    /// Returns a captured path parameter.
    #[must_use]
    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name).map(String::as_str)
    }

    /// Returns all captured path parameters.
    #[must_use]
    pub const fn path_params(&self) -> &HashMap<String, String> {
        &self.path_params
    }

    /// Returns a new context with an additional path parameter.
    #[must_use]
    pub fn with_path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.insert(name.into(), value.into());
        self
    }

    /// Replaces the captured path parameters.
    #[must_use]
    pub fn with_path_params(mut self, params: HashMap<String, String>) -> Self {
        self.path_params = params;
        self
    }

    /// Returns the raw query string, if any.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Sets the raw query string.
    #[must_use]
    pub fn with_query(mut self, query: Option<impl Into<String>>) -> Self {
        self.query = query.map(Into::into);
        self
    }

    /// Returns the elapsed time since the request started.
    #[must_use]
    pub fn elapsed(&self) -> std::time::Duration {
        self.started_at.elapsed()
    }
}
