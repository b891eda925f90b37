//! Document post-processing.
//!
//! A raw document from the synthesizer still describes templates. The
//! [`FilterChain`] turns it into the document a client actually uses:
//!
//! 1. [`DocumentFilter::PruneRevisionParameter`] drops the synthetic
//!    `revision` parameter everywhere.
//! 2. [`DocumentFilter::LiteralizePaths`] substitutes the document's
//!    revision into every path key.
//! 3. [`DocumentFilter::InjectServerOrigin`] points `servers` at the host
//!    that served the document.
//!
//! Every step is idempotent, so applying the chain twice yields the same
//! document as applying it once.

use forecast_core::{Revision, REVISION_PARAMETER, REVISION_PLACEHOLDER};
use indexmap::IndexMap;

use crate::error::{DocsError, DocsResult};
use crate::openapi::{OpenApi, PathItem, Server};

/// Scheme and host of an inbound documentation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOrigin {
    /// URL scheme, e.g. `https`.
    pub scheme: String,
    /// Host with optional port, e.g. `api.example.com:8443`.
    pub host: String,
}

impl RequestOrigin {
    /// Creates an origin.
    #[must_use]
    pub fn new(scheme: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
        }
    }

    /// Returns `{scheme}://{host}`.
    #[must_use]
    pub fn url(&self) -> String {
        format!("{}://{}", self.scheme, self.host)
    }
}

/// One document rewriting step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFilter {
    /// Remove every parameter named `revision`.
    PruneRevisionParameter,
    /// Replace `{revision}` in path keys with `info.version`.
    LiteralizePaths,
    /// Set `servers` to the request origin.
    InjectServerOrigin,
}

impl DocumentFilter {
    /// Applies this step to `doc`.
    ///
    /// # Errors
    ///
    /// [`LiteralizePaths`](Self::LiteralizePaths) fails with
    /// [`DocsError::MissingRevision`] or [`DocsError::PathCollision`].
    pub fn apply(self, doc: &mut OpenApi, origin: Option<&RequestOrigin>) -> DocsResult<()> {
        match self {
            Self::PruneRevisionParameter => {
                prune_revision_parameter(doc);
                Ok(())
            }
            Self::LiteralizePaths => literalize_paths(doc),
            Self::InjectServerOrigin => {
                if let Some(origin) = origin {
                    doc.servers = vec![Server::new(origin.url())];
                }
                Ok(())
            }
        }
    }
}

fn prune_revision_parameter(doc: &mut OpenApi) {
    for item in doc.paths.values_mut() {
        item.parameters.retain(|p| p.name != REVISION_PARAMETER);
        for operation in item.operations_mut() {
            operation.parameters.retain(|p| p.name != REVISION_PARAMETER);
        }
    }
}

fn literalize_paths(doc: &mut OpenApi) -> DocsResult<()> {
    let revision: Revision = doc
        .info
        .version
        .parse()
        .map_err(|_| DocsError::MissingRevision {
            version: doc.info.version.clone(),
        })?;
    let literal = revision.to_string();

    let mut literalized: IndexMap<String, PathItem> = IndexMap::with_capacity(doc.paths.len());
    let mut sources: IndexMap<String, String> = IndexMap::with_capacity(doc.paths.len());

    for (template, item) in std::mem::take(&mut doc.paths) {
        let path = template.replace(REVISION_PLACEHOLDER, &literal);
        if let Some(first) = sources.get(&path) {
            tracing::error!(
                path = %path,
                first = %first,
                second = %template,
                revision = %revision,
                "Two routes literalize to the same path"
            );
            return Err(DocsError::PathCollision {
                path,
                first: first.clone(),
                second: template,
            });
        }
        sources.insert(path.clone(), template);
        literalized.insert(path, item);
    }

    doc.paths = literalized;
    Ok(())
}

/// An ordered list of [`DocumentFilter`]s.
///
/// # Example
///
/// ```rust
/// use forecast_docs::{FilterChain, RequestOrigin};
/// # use forecast_docs::{Info, OpenApi};
/// # let raw = OpenApi {
/// #     openapi: "3.1.0".into(),
/// #     info: Info { title: "T".into(), version: "1.0".into(), description: None, contact: None, license: None },
/// #     servers: vec![],
/// #     paths: Default::default(),
/// #     components: None,
/// #     tags: vec![],
/// # };
///
/// let origin = RequestOrigin::new("https", "api.example.com");
/// let doc = FilterChain::standard().apply(raw, Some(&origin)).unwrap();
/// assert_eq!(doc.servers[0].url, "https://api.example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterChain {
    filters: Vec<DocumentFilter>,
}

impl Default for FilterChain {
    fn default() -> Self {
        Self::standard()
    }
}

impl FilterChain {
    /// An empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Prune, then literalize, then inject the origin.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            filters: vec![
                DocumentFilter::PruneRevisionParameter,
                DocumentFilter::LiteralizePaths,
                DocumentFilter::InjectServerOrigin,
            ],
        }
    }

    /// Appends a step.
    #[must_use]
    pub fn with(mut self, filter: DocumentFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Returns the steps in order.
    #[must_use]
    pub fn filters(&self) -> &[DocumentFilter] {
        &self.filters
    }

    /// Runs every step over `doc` in order.
    ///
    /// # Errors
    ///
    /// Returns the first step failure; the document is discarded.
    pub fn apply(&self, mut doc: OpenApi, origin: Option<&RequestOrigin>) -> DocsResult<OpenApi> {
        for filter in &self.filters {
            filter.apply(&mut doc, origin)?;
        }
        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openapi::{Info, Operation, Parameter, ParameterIn, Schema};

    fn param(name: &str) -> Parameter {
        Parameter {
            name: name.to_string(),
            location: ParameterIn::Path,
            description: None,
            required: true,
            schema: Some(Schema::string()),
        }
    }

    fn raw_doc(version: &str, templates: &[&str]) -> OpenApi {
        let mut paths = IndexMap::new();
        for (i, template) in templates.iter().enumerate() {
            let mut item = PathItem::default();
            item.parameters.push(param("revision"));
            item.get = Some(Operation {
                operation_id: format!("op{i}"),
                summary: None,
                description: None,
                tags: vec![],
                parameters: vec![param("revision"), param("date")],
                request_body: None,
                responses: IndexMap::new(),
            });
            paths.insert((*template).to_string(), item);
        }
        OpenApi {
            openapi: "3.1.0".to_string(),
            info: Info {
                title: "Weather Forecast API".to_string(),
                version: version.to_string(),
                description: None,
                contact: None,
                license: None,
            },
            servers: vec![Server::new("https://static.example.com")],
            paths,
            components: None,
            tags: vec![],
        }
    }

    #[test]
    fn test_prune_removes_revision_parameter() {
        let mut doc = raw_doc("1.0", &["/api/v{revision}/weatherforecast/{date}"]);
        DocumentFilter::PruneRevisionParameter
            .apply(&mut doc, None)
            .unwrap();
        let item = &doc.paths["/api/v{revision}/weatherforecast/{date}"];
        assert!(item.parameters.is_empty());
        let names: Vec<_> = item.get.as_ref().unwrap().parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["date"]);
    }

    #[test]
    fn test_prune_without_revision_parameter_is_noop() {
        let mut doc = raw_doc("1.0", &["/api/v{revision}/weatherforecast"]);
        DocumentFilter::PruneRevisionParameter
            .apply(&mut doc, None)
            .unwrap();
        let once = doc.clone();
        DocumentFilter::PruneRevisionParameter
            .apply(&mut doc, None)
            .unwrap();
        assert_eq!(doc, once);
    }

    #[test]
    fn test_literalize_paths() {
        let mut doc = raw_doc(
            "2.0",
            &["/api/v{revision}/weatherforecast", "/api/v{revision}/weatherforecast/summaries"],
        );
        DocumentFilter::LiteralizePaths.apply(&mut doc, None).unwrap();
        let keys: Vec<_> = doc.paths.keys().cloned().collect();
        assert_eq!(
            keys,
            vec!["/api/v2.0/weatherforecast", "/api/v2.0/weatherforecast/summaries"]
        );
    }

    #[test]
    fn test_literalize_collision_is_reported() {
        let mut doc = raw_doc("1.0", &["/api/v{revision}/items", "/api/v1.0/items"]);
        let err = DocumentFilter::LiteralizePaths
            .apply(&mut doc, None)
            .unwrap_err();
        match err {
            DocsError::PathCollision { path, first, second } => {
                assert_eq!(path, "/api/v1.0/items");
                assert_eq!(first, "/api/v{revision}/items");
                assert_eq!(second, "/api/v1.0/items");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_literalize_requires_revision_version() {
        let mut doc = raw_doc("latest", &["/api/v{revision}/items"]);
        let err = DocumentFilter::LiteralizePaths
            .apply(&mut doc, None)
            .unwrap_err();
        assert!(matches!(err, DocsError::MissingRevision { .. }));
    }

    #[test]
    fn test_inject_server_origin() {
        let mut doc = raw_doc("1.0", &["/api/v{revision}/items"]);
        let origin = RequestOrigin::new("https", "api.example.com");
        DocumentFilter::InjectServerOrigin
            .apply(&mut doc, Some(&origin))
            .unwrap();
        assert_eq!(doc.servers, vec![Server::new("https://api.example.com")]);
    }

    #[test]
    fn test_inject_without_origin_keeps_static_servers() {
        let mut doc = raw_doc("1.0", &["/api/v{revision}/items"]);
        DocumentFilter::InjectServerOrigin
            .apply(&mut doc, None)
            .unwrap();
        assert_eq!(doc.servers, vec![Server::new("https://static.example.com")]);
    }

    #[test]
    fn test_standard_chain_order() {
        assert_eq!(
            FilterChain::standard().filters(),
            &[
                DocumentFilter::PruneRevisionParameter,
                DocumentFilter::LiteralizePaths,
                DocumentFilter::InjectServerOrigin,
            ]
        );
        assert_eq!(FilterChain::default(), FilterChain::standard());
        assert!(FilterChain::new().filters().is_empty());
    }

    #[test]
    fn test_chain_is_idempotent() {
        let origin = RequestOrigin::new("http", "localhost:8080");
        let chain = FilterChain::standard();
        let once = chain
            .apply(raw_doc("1.0", &["/api/v{revision}/weatherforecast/{date}"]), Some(&origin))
            .unwrap();
        let twice = chain.apply(once.clone(), Some(&origin)).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_custom_chain() {
        let chain = FilterChain::new().with(DocumentFilter::LiteralizePaths);
        let doc = chain
            .apply(raw_doc("1.0", &["/api/v{revision}/items"]), None)
            .unwrap();
        assert!(doc.paths.contains_key("/api/v1.0/items"));
        assert_eq!(doc.paths["/api/v1.0/items"].parameters.len(), 1);
    }
}
