//! Serving the per-revision documents and the viewer.
//!
//! ```text
//! GET {base}                      -> viewer
//! GET {base}/index.html           -> viewer
//! GET {base}/{group}/swagger.json -> document for that revision
//! ```
//!
//! Documents are synthesized on every request; the origin of the request
//! flows into the filter chain as an argument, so nothing is cached and no
//! ambient per-request state is read.

use forecast_core::{ApiError, Revision};
use forecast_docs::{DocsResult, DocumentSynthesizer, FilterChain, RequestOrigin, SwaggerUi};
use http::{header, HeaderMap, Method, StatusCode};

use crate::response::{self, HttpResponse};

/// Header carrying the scheme used by the client at a proxy.
pub const FORWARDED_PROTO: &str = "x-forwarded-proto";
/// Header carrying the host used by the client at a proxy.
pub const FORWARDED_HOST: &str = "x-forwarded-host";

/// How the documentation endpoints are exposed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocsSettings {
    /// Whether documentation is enabled at all.
    pub enabled: bool,
    /// Whether the process runs in the production environment.
    pub production: bool,
    /// Path the viewer is mounted at, e.g. `/swagger`.
    pub base_path: String,
    /// Whether `X-Forwarded-Proto` and `X-Forwarded-Host` are honoured.
    pub trust_forwarded_headers: bool,
}

impl Default for DocsSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            production: false,
            base_path: "/swagger".to_string(),
            trust_forwarded_headers: true,
        }
    }
}

/// Answers documentation requests.
#[derive(Debug)]
pub struct DocumentServer {
    base_path: String,
    synthesizer: DocumentSynthesizer,
    chain: FilterChain,
    viewer: bytes::Bytes,
    trust_forwarded_headers: bool,
}

impl DocumentServer {
    /// Mounts the document server, or returns `None` when documentation is
    /// disabled or the environment is production.
    ///
    /// Leaving the endpoints unmounted in production keeps the interface
    /// description out of public deployments. This is not a security
    /// control: anything the documents describe is still reachable.
    #[must_use]
    pub fn mount(settings: &DocsSettings, synthesizer: DocumentSynthesizer) -> Option<Self> {
        if !settings.enabled || settings.production {
            tracing::info!(
                enabled = settings.enabled,
                production = settings.production,
                "Documentation endpoints not mounted"
            );
            return None;
        }
        let base_path = settings.base_path.trim_end_matches('/').to_string();
        let viewer = SwaggerUi::for_revisions(
            base_path.clone(),
            synthesizer.api_title(),
            synthesizer.table().supported_revisions(),
        )
        .html_bytes();
        tracing::info!(base_path = %base_path, "Documentation endpoints mounted");
        Some(Self {
            base_path,
            synthesizer,
            chain: FilterChain::standard(),
            viewer,
            trust_forwarded_headers: settings.trust_forwarded_headers,
        })
    }

    /// Returns the base path.
    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Answers `path` if it belongs to the documentation, else `None`.
    pub fn handle(
        &self,
        method: &Method,
        path: &str,
        headers: &HeaderMap,
        request_id: &str,
    ) -> Option<HttpResponse> {
        let rest = path.strip_prefix(self.base_path.as_str())?;
        if !(rest.is_empty() || rest.starts_with('/')) {
            return None;
        }
        if method != Method::GET && method != Method::HEAD {
            return None;
        }

        match rest {
            "" | "/" | "/index.html" => Some(response::with_body(
                StatusCode::OK,
                "text/html; charset=utf-8",
                self.viewer.clone(),
            )),
            _ => {
                let group = rest
                    .strip_prefix('/')
                    .and_then(|r| r.strip_suffix("/swagger.json"))?;
                let origin = request_origin(headers, "http", self.trust_forwarded_headers);
                Some(self.document(group, origin.as_ref(), request_id))
            }
        }
    }

    /// Builds the filtered document for the revision named by `group`.
    fn document(&self, group: &str, origin: Option<&RequestOrigin>, request_id: &str) -> HttpResponse {
        let Some(revision) = self.synthesizer.table().supported_revisions().by_group_name(group)
        else {
            let err = ApiError::not_found(format!("No API document named '{group}'"));
            return response::error(&err, Some(request_id));
        };

        match self.render(revision, origin) {
            Ok(body) => {
                forecast_telemetry::record_document_served(&revision.to_string());
                response::json(StatusCode::OK, body)
            }
            Err(err) => {
                tracing::error!(
                    request_id = %request_id,
                    revision = %revision,
                    error = %err,
                    "Document generation failed"
                );
                response::internal(StatusCode::INTERNAL_SERVER_ERROR, Some(request_id))
            }
        }
    }

    fn render(&self, revision: Revision, origin: Option<&RequestOrigin>) -> DocsResult<String> {
        let raw = self.synthesizer.synthesize(revision)?;
        let doc = self.chain.apply(raw, origin)?;
        Ok(doc.to_json_pretty()?)
    }
}

/// Derives the origin a client used to reach this host.
///
/// With `trust_forwarded` set, the first value of `X-Forwarded-Proto` and
/// `X-Forwarded-Host` win over `default_scheme` and `Host`. Without a host
/// there is no origin.
#[must_use]
pub fn request_origin(
    headers: &HeaderMap,
    default_scheme: &str,
    trust_forwarded: bool,
) -> Option<RequestOrigin> {
    let first = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    let (scheme, host) = if trust_forwarded {
        (
            first(FORWARDED_PROTO).unwrap_or(default_scheme),
            first(FORWARDED_HOST).or_else(|| first(header::HOST.as_str())),
        )
    } else {
        (default_scheme, first(header::HOST.as_str()))
    };
    host.map(|host| RequestOrigin::new(scheme, host))
}
