//! Route declarations.
//!
//! A [`RouteDescriptor`] binds a method and a path template to an operation
//! for a set of revisions. Descriptors carry everything the documentation
//! pipeline needs (summary, tags, parameters, payloads, responses) so the
//! route table is the single source of truth for both dispatch and docs.
//!
//! Schemas are kept as raw JSON Schema values (`{"type": "string"}` or
//! `{"$ref": "#/components/schemas/WeatherForecast"}`); the documentation
//! crate turns them into typed OpenAPI objects.

use std::collections::BTreeSet;

use forecast_core::{ApiError, ApiResult, Revision, REVISION_PARAMETER, REVISION_PLACEHOLDER};
use http::Method;
use serde_json::Value;

/// Where a parameter is carried in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterLocation {
    /// A `{name}` segment of the path.
    Path,
    /// A query-string entry.
    Query,
    /// A request header.
    Header,
}

impl ParameterLocation {
    /// Returns the OpenAPI `in` value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Header => "header",
        }
    }
}

/// A declared operation parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    /// Parameter name.
    pub name: String,
    /// Where the parameter lives.
    pub location: ParameterLocation,
    /// Human-readable description.
    pub description: Option<String>,
    /// Whether the parameter must be present.
    pub required: bool,
    /// JSON Schema of the value.
    pub schema: Value,
}

impl ParameterSpec {
    /// Creates a required path parameter of type string.
    #[must_use]
    pub fn path(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: ParameterLocation::Path,
            description: None,
            required: true,
            schema: serde_json::json!({ "type": "string" }),
        }
    }

    /// Creates an optional query parameter of type string.
    #[must_use]
    pub fn query(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: ParameterLocation::Query,
            description: None,
            required: false,
            schema: serde_json::json!({ "type": "string" }),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets whether the parameter is required.
    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets the value schema.
    #[must_use]
    pub fn schema(mut self, schema: Value) -> Self {
        self.schema = schema;
        self
    }
}

/// A request or response payload.
#[derive(Debug, Clone, PartialEq)]
pub struct PayloadSpec {
    /// Media type, usually `application/json`.
    pub content_type: String,
    /// JSON Schema of the body.
    pub schema: Value,
    /// Whether a body must be sent (request payloads only).
    pub required: bool,
}

impl PayloadSpec {
    /// A JSON payload with the given schema.
    #[must_use]
    pub fn json(schema: Value) -> Self {
        Self {
            content_type: "application/json".to_string(),
            schema,
            required: true,
        }
    }
}

/// One entry of an operation's response catalogue.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseSpec {
    /// HTTP status code.
    pub status: u16,
    /// Human-readable description.
    pub description: String,
    /// Response body, if any.
    pub payload: Option<PayloadSpec>,
}

impl ResponseSpec {
    /// A response with no body.
    #[must_use]
    pub fn new(status: u16, description: impl Into<String>) -> Self {
        Self {
            status,
            description: description.into(),
            payload: None,
        }
    }

    /// A response with a JSON body.
    #[must_use]
    pub fn json(status: u16, description: impl Into<String>, schema: Value) -> Self {
        Self {
            status,
            description: description.into(),
            payload: Some(PayloadSpec::json(schema)),
        }
    }
}

/// A segment of a parsed route template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PathSegment {
    /// A literal segment (e.g., "weatherforecast").
    Literal(String),
    /// A parameter segment (e.g., "{date}").
    Param(String),
    /// The revision segment; `prefix` is the literal before the placeholder.
    Revision {
        /// Literal text preceding `{revision}`, usually `v`.
        prefix: String,
    },
}

/// Parses a template into segments, enforcing the placeholder rules.
pub(crate) fn parse_template(template: &str) -> ApiResult<Vec<PathSegment>> {
    let occurrences = template.matches(REVISION_PLACEHOLDER).count();
    if occurrences != 1 {
        return Err(ApiError::invalid_route_template(
            template,
            format!("expected the {REVISION_PLACEHOLDER} placeholder exactly once, found {occurrences}"),
        ));
    }
    if !template.starts_with('/') {
        return Err(ApiError::invalid_route_template(
            template,
            "template must start with '/'",
        ));
    }

    let mut segments = Vec::new();
    for raw in template.split('/').filter(|s| !s.is_empty()) {
        if let Some(prefix) = raw.strip_suffix(REVISION_PLACEHOLDER) {
            if prefix.contains(['{', '}']) {
                return Err(ApiError::invalid_route_template(
                    template,
                    format!("revision segment '{raw}' mixes parameters"),
                ));
            }
            segments.push(PathSegment::Revision {
                prefix: prefix.to_string(),
            });
        } else if raw.contains(REVISION_PLACEHOLDER) {
            return Err(ApiError::invalid_route_template(
                template,
                format!("{REVISION_PLACEHOLDER} must end its segment, found '{raw}'"),
            ));
        } else if raw.starts_with('{') && raw.ends_with('}') {
            let name = &raw[1..raw.len() - 1];
            if name.is_empty() || name.contains(['{', '}']) {
                return Err(ApiError::invalid_route_template(
                    template,
                    format!("malformed parameter segment '{raw}'"),
                ));
            }
            if name == REVISION_PARAMETER {
                return Err(ApiError::invalid_route_template(
                    template,
                    "the revision parameter name is reserved",
                ));
            }
            segments.push(PathSegment::Param(name.to_string()));
        } else if raw.contains(['{', '}']) {
            return Err(ApiError::invalid_route_template(
                template,
                format!("malformed segment '{raw}'"),
            ));
        } else {
            segments.push(PathSegment::Literal(raw.to_string()));
        }
    }
    Ok(segments)
}

/// A route declaration.
///
/// # Example
///
/// ```rust
/// use forecast_core::Revision;
/// use forecast_router::RouteDescriptor;
/// use http::Method;
///
/// let route = RouteDescriptor::new(
///     Method::GET,
///     "/api/v{revision}/weatherforecast/summaries",
///     "getWeatherSummaries",
/// )
/// .summary("Lists the summary vocabulary")
/// .tag("WeatherForecast")
/// .revisions([Revision::new(2, 0)]);
///
/// assert_eq!(route.operation_id(), "getWeatherSummaries");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RouteDescriptor {
    method: Method,
    template: String,
    operation_id: String,
    revisions: BTreeSet<Revision>,
    summary: Option<String>,
    description: Option<String>,
    tags: Vec<String>,
    parameters: Vec<ParameterSpec>,
    request_body: Option<PayloadSpec>,
    responses: Vec<ResponseSpec>,
}

impl RouteDescriptor {
    /// Creates a descriptor. With no revisions listed it applies to all
    /// declared revisions once registered.
    #[must_use]
    pub fn new(method: Method, template: impl Into<String>, operation_id: impl Into<String>) -> Self {
        Self {
            method,
            template: template.into(),
            operation_id: operation_id.into(),
            revisions: BTreeSet::new(),
            summary: None,
            description: None,
            tags: Vec::new(),
            parameters: Vec::new(),
            request_body: None,
            responses: Vec::new(),
        }
    }

    /// Restricts the route to the given revisions.
    #[must_use]
    pub fn revisions(mut self, revisions: impl IntoIterator<Item = Revision>) -> Self {
        self.revisions.extend(revisions);
        self
    }

    /// Sets the summary.
    #[must_use]
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a tag.
    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Adds a parameter. Path parameters named in the template need not be
    /// declared; declaring one overrides the default string schema.
    #[must_use]
    pub fn parameter(mut self, parameter: ParameterSpec) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Sets the request payload.
    #[must_use]
    pub fn request_body(mut self, payload: PayloadSpec) -> Self {
        self.request_body = Some(payload);
        self
    }

    /// Adds a response to the catalogue.
    #[must_use]
    pub fn response(mut self, response: ResponseSpec) -> Self {
        self.responses.push(response);
        self
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the path template, still carrying the placeholder.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Returns the operation id.
    #[must_use]
    pub fn operation_id(&self) -> &str {
        &self.operation_id
    }

    /// Returns the revisions this route serves.
    ///
    /// Empty before registration means "all declared".
    #[must_use]
    pub fn revision_set(&self) -> &BTreeSet<Revision> {
        &self.revisions
    }

    /// Returns `true` if the route serves `revision`.
    #[must_use]
    pub fn serves(&self, revision: &Revision) -> bool {
        self.revisions.contains(revision)
    }

    /// Returns the summary.
    #[must_use]
    pub fn summary_text(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// Returns the description.
    #[must_use]
    pub fn description_text(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the tags.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Returns the declared parameters.
    #[must_use]
    pub fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }

    /// Returns the request payload.
    #[must_use]
    pub fn request_payload(&self) -> Option<&PayloadSpec> {
        self.request_body.as_ref()
    }

    /// Returns the response catalogue.
    #[must_use]
    pub fn responses(&self) -> &[ResponseSpec] {
        &self.responses
    }

    /// Returns the `{name}` parameters of the template in order, excluding
    /// the revision placeholder.
    #[must_use]
    pub fn template_parameters(&self) -> Vec<String> {
        self.template
            .split('/')
            .filter(|s| s.starts_with('{') && s.ends_with('}') && s.len() > 2)
            .map(|s| s[1..s.len() - 1].to_string())
            .filter(|name| name != REVISION_PARAMETER)
            .collect()
    }

    pub(crate) fn fill_revisions(&mut self, revisions: impl IntoIterator<Item = Revision>) {
        self.revisions.extend(revisions);
    }
}
