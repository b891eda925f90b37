//! The revision-gated route table.
//!
//! Routes are registered once at startup and read-only afterwards. Each
//! registered route keeps its parsed template so dispatch is a segment-wise
//! comparison with no allocation beyond the captured parameters.

use std::collections::HashMap;

use forecast_core::{ApiError, ApiResult, Revision, RevisionSet};
use http::Method;

use crate::route::{parse_template, PathSegment, RouteDescriptor};

/// A matched route with extracted path parameters.
///
/// Returned by [`RouteTable::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    operation_id: String,
    template: String,
    params: HashMap<String, String>,
}

impl RouteMatch {
    /// Returns the operation ID for this route.
    #[must_use]
    pub fn operation_id(&self) -> &str {
        &self.operation_id
    }

    /// Returns the template that matched.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Returns the extracted path parameters.
    #[must_use]
    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    /// Returns a specific path parameter by name.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Consumes the match, returning the captured parameters.
    #[must_use]
    pub fn into_params(self) -> HashMap<String, String> {
        self.params
    }
}

#[derive(Debug, Clone)]
struct RegisteredRoute {
    descriptor: RouteDescriptor,
    segments: Vec<PathSegment>,
}

impl RegisteredRoute {
    /// Attempts to match this route against the segments of a path.
    fn match_segments(&self, revision: Revision, path: &[&str]) -> Option<HashMap<String, String>> {
        if path.len() == self.segments.len() {
            self.match_aligned(revision, path, false)
        } else if path.len() + 1 == self.segments.len() {
            self.match_aligned(revision, path, true)
        } else {
            None
        }
    }

    fn match_aligned(
        &self,
        revision: Revision,
        path: &[&str],
        elided: bool,
    ) -> Option<HashMap<String, String>> {
        let mut params = HashMap::new();
        let mut actual = path.iter();

        for pattern in &self.segments {
            if elided && matches!(pattern, PathSegment::Revision { .. }) {
                continue;
            }
            let segment = actual.next()?;
            match pattern {
                PathSegment::Literal(expected) => {
                    if !expected.eq_ignore_ascii_case(segment) {
                        return None;
                    }
                }
                PathSegment::Param(name) => {
                    params.insert(name.clone(), (*segment).to_string());
                }
                PathSegment::Revision { prefix } => {
                    let body = strip_prefix_ignore_case(segment, prefix)?;
                    if Revision::parse_numeric(body).ok()? != revision {
                        return None;
                    }
                }
            }
        }

        Some(params)
    }
}

fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    let head = value.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &value[prefix.len()..])
}

/// The global route table.
///
/// # Example
///
/// ```rust
/// use forecast_core::{Revision, RevisionSet};
/// use forecast_router::{RouteDescriptor, RouteTable};
/// use http::Method;
///
/// let v1 = Revision::new(1, 0);
/// let v2 = Revision::new(2, 0);
/// let mut table = RouteTable::new(RevisionSet::new([v1, v2]));
///
/// table
///     .register(RouteDescriptor::new(Method::GET, "/api/v{revision}/weatherforecast", "list"))
///     .unwrap();
/// table
///     .register(
///         RouteDescriptor::new(Method::GET, "/api/v{revision}/weatherforecast/summaries", "summaries")
///             .revisions([v2]),
///     )
///     .unwrap();
///
/// assert_eq!(table.routes_for(v1).len(), 1);
/// assert_eq!(table.routes_for(v2).len(), 2);
///
/// let m = table.dispatch(v2, &Method::GET, "/api/v2/weatherforecast/summaries").unwrap();
/// assert_eq!(m.operation_id(), "summaries");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    declared: RevisionSet,
    routes: Vec<RegisteredRoute>,
}

impl RouteTable {
    /// Creates an empty table over the declared revisions.
    #[must_use]
    pub fn new(declared: RevisionSet) -> Self {
        Self {
            declared,
            routes: Vec::new(),
        }
    }

    /// Registers a route.
    ///
    /// A descriptor without revisions is bound to every declared revision.
    ///
    /// # Errors
    ///
    /// - [`ApiError::InvalidRevisionSet`] if the descriptor lists a revision
    ///   that is not declared.
    /// - [`ApiError::InvalidRouteTemplate`] if the template is malformed or
    ///   the same method and template already serve an overlapping revision.
    pub fn register(&mut self, mut descriptor: RouteDescriptor) -> ApiResult<()> {
        let undeclared = self.declared.undeclared(descriptor.revision_set());
        if !undeclared.is_empty() {
            return Err(ApiError::InvalidRevisionSet {
                template: descriptor.template().to_string(),
                undeclared,
            });
        }

        let segments = parse_template(descriptor.template())?;

        if descriptor.revision_set().is_empty() {
            descriptor.fill_revisions(self.declared.iter().copied());
        }

        if let Some(existing) = self.routes.iter().find(|r| {
            r.descriptor.method() == descriptor.method()
                && r.descriptor.template() == descriptor.template()
                && !r
                    .descriptor
                    .revision_set()
                    .is_disjoint(descriptor.revision_set())
        }) {
            return Err(ApiError::invalid_route_template(
                descriptor.template(),
                format!(
                    "{} is already bound to operation '{}' for an overlapping revision",
                    descriptor.method(),
                    existing.descriptor.operation_id()
                ),
            ));
        }

        tracing::debug!(
            method = %descriptor.method(),
            template = descriptor.template(),
            operation_id = descriptor.operation_id(),
            revisions = ?descriptor.revision_set(),
            "Registered route"
        );

        self.routes.push(RegisteredRoute {
            descriptor,
            segments,
        });
        Ok(())
    }

    /// Returns the routes serving `revision`, in declaration order.
    #[must_use]
    pub fn routes_for(&self, revision: Revision) -> Vec<&RouteDescriptor> {
        self.routes
            .iter()
            .map(|r| &r.descriptor)
            .filter(|d| d.serves(&revision))
            .collect()
    }

    /// Matches a concrete path for a resolved revision.
    ///
    /// Literal segments compare case-insensitively. The revision segment
    /// must name `revision` or be absent altogether. Routes are checked in
    /// declaration order; first match wins.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NoMatchingRoute`] when nothing matches.
    pub fn dispatch(&self, revision: Revision, method: &Method, path: &str) -> ApiResult<RouteMatch> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        self.routes
            .iter()
            .filter(|r| r.descriptor.method() == method && r.descriptor.serves(&revision))
            .find_map(|r| {
                r.match_segments(revision, &segments).map(|params| RouteMatch {
                    operation_id: r.descriptor.operation_id().to_string(),
                    template: r.descriptor.template().to_string(),
                    params,
                })
            })
            .ok_or_else(|| ApiError::no_matching_route(method.as_str(), path))
    }

    /// Returns the declared revisions.
    #[must_use]
    pub const fn supported_revisions(&self) -> &RevisionSet {
        &self.declared
    }

    /// Iterates all registered descriptors in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &RouteDescriptor> {
        self.routes.iter().map(|r| &r.descriptor)
    }

    /// Returns the number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const V1: Revision = Revision::new(1, 0);
    const V2: Revision = Revision::new(2, 0);

    fn table() -> RouteTable {
        let mut table = RouteTable::new(RevisionSet::new([V1, V2]));
        table
            .register(RouteDescriptor::new(
                Method::GET,
                "/api/v{revision}/weatherforecast",
                "getWeatherForecast",
            ))
            .unwrap();
        table
            .register(
                RouteDescriptor::new(
                    Method::GET,
                    "/api/v{revision}/weatherforecast/summaries",
                    "getWeatherSummaries",
                )
                .revisions([V2]),
            )
            .unwrap();
        table
            .register(RouteDescriptor::new(
                Method::PUT,
                "/api/v{revision}/weatherforecast/{date}",
                "updateWeatherForecast",
            ))
            .unwrap();
        table
    }

    #[test]
    fn test_routes_for_respects_revisions() {
        let table = table();
        let v1: Vec<_> = table.routes_for(V1).iter().map(|r| r.operation_id()).collect();
        let v2: Vec<_> = table.routes_for(V2).iter().map(|r| r.operation_id()).collect();
        assert_eq!(v1, vec!["getWeatherForecast", "updateWeatherForecast"]);
        assert_eq!(
            v2,
            vec!["getWeatherForecast", "getWeatherSummaries", "updateWeatherForecast"]
        );
        assert!(table.routes_for(Revision::new(9, 9)).is_empty());
    }

    #[test]
    fn test_register_rejects_undeclared_revision() {
        let mut table = table();
        let err = table
            .register(
                RouteDescriptor::new(Method::GET, "/api/v{revision}/other", "other")
                    .revisions([Revision::new(3, 0)]),
            )
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidRevisionSet { ref undeclared, .. } if undeclared == &[Revision::new(3, 0)]));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_register_rejects_missing_placeholder() {
        let mut table = table();
        let err = table
            .register(RouteDescriptor::new(Method::GET, "/api/weatherforecast", "x"))
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidRouteTemplate { .. }));
    }

    #[test]
    fn test_register_rejects_overlapping_duplicate() {
        let mut table = table();
        let err = table
            .register(
                RouteDescriptor::new(Method::GET, "/api/v{revision}/weatherforecast", "again")
                    .revisions([V2]),
            )
            .unwrap_err();
        assert!(err.to_string().contains("getWeatherForecast"));
    }

    #[test]
    fn test_register_allows_disjoint_duplicate() {
        let mut table = RouteTable::new(RevisionSet::new([V1, V2]));
        table
            .register(
                RouteDescriptor::new(Method::GET, "/api/v{revision}/items", "itemsV1")
                    .revisions([V1]),
            )
            .unwrap();
        table
            .register(
                RouteDescriptor::new(Method::GET, "/api/v{revision}/items", "itemsV2")
                    .revisions([V2]),
            )
            .unwrap();

        assert_eq!(
            table.dispatch(V1, &Method::GET, "/api/v1/items").unwrap().operation_id(),
            "itemsV1"
        );
        assert_eq!(
            table.dispatch(V2, &Method::GET, "/api/v2/items").unwrap().operation_id(),
            "itemsV2"
        );
    }

    #[test]
    fn test_dispatch_with_param() {
        let table = table();
        let m = table
            .dispatch(V1, &Method::PUT, "/api/v1.0/weatherforecast/2030-01-01")
            .unwrap();
        assert_eq!(m.operation_id(), "updateWeatherForecast");
        assert_eq!(m.param("date"), Some("2030-01-01"));
    }

    #[test]
    fn test_dispatch_case_insensitive_literals() {
        let table = table();
        let m = table.dispatch(V1, &Method::GET, "/API/V1/WeatherForecast").unwrap();
        assert_eq!(m.operation_id(), "getWeatherForecast");
    }

    #[test]
    fn test_dispatch_elided_revision() {
        let table = table();
        let m = table.dispatch(V1, &Method::GET, "/api/weatherforecast").unwrap();
        assert_eq!(m.operation_id(), "getWeatherForecast");
    }

    #[test]
    fn test_dispatch_revision_mismatch() {
        let table = table();
        let err = table
            .dispatch(V1, &Method::GET, "/api/v2/weatherforecast")
            .unwrap_err();
        assert!(matches!(err, ApiError::NoMatchingRoute { .. }));
    }

    #[test]
    fn test_dispatch_revision_gated_route() {
        let table = table();
        assert!(table
            .dispatch(V1, &Method::GET, "/api/v1/weatherforecast/summaries")
            .is_err());
        assert!(table
            .dispatch(V2, &Method::GET, "/api/v2/weatherforecast/summaries")
            .is_ok());
    }

    #[test]
    fn test_dispatch_method_mismatch() {
        let table = table();
        let err = table
            .dispatch(V1, &Method::DELETE, "/api/v1/weatherforecast")
            .unwrap_err();
        assert_eq!(err.status_code(), http::StatusCode::NOT_FOUND);
    }
}
