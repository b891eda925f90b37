//! HTTP server.
//!
//! [`Server`] owns everything a request needs: the version resolver, the
//! route table, the handler registry and the optional documentation and
//! CORS layers. Requests flow through it in a fixed order:
//!
//! 1. CORS preflight (answered directly)
//! 2. `GET /metrics` when a metrics registry is attached
//! 3. Documentation endpoints when mounted
//! 4. Resolve revision, dispatch, invoke the handler
//!
//! Every response leaves with `x-request-id` and `api-supported-versions`.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use forecast_core::{ApiError, RequestContext, RequestId, Revision};
use forecast_router::{RouteTable, VersionResolver};
use forecast_telemetry::MetricsRegistry;
use futures_util::FutureExt;
use http::{HeaderValue, Method, Request, Response, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::{TcpListener, TcpStream};

use crate::config::ServerConfig;
use crate::cors::CorsPolicy;
use crate::docs::DocumentServer;
use crate::error::ServerError;
use crate::handler::{HandlerRegistry, HandlerResponse, InvokeError};
use crate::response::{self, HttpResponse, REQUEST_ID_HEADER, SUPPORTED_VERSIONS_HEADER};
use crate::shutdown::{ConnectionTracker, ShutdownSignal};

/// The forecast API server.
///
/// # Example
///
/// ```rust,no_run
/// use forecast_core::{Revision, RevisionSet};
/// use forecast_router::RouteTable;
/// use forecast_server::{HandlerRegistry, Server, ServerConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let table = RouteTable::new(RevisionSet::new([Revision::new(1, 0)]));
///     let server = Server::builder()
///         .config(ServerConfig::builder().http_addr("127.0.0.1:8080").build())
///         .routes(table)
///         .handlers(HandlerRegistry::new())
///         .build()?;
///     server.run().await?;
///     Ok(())
/// }
/// ```
pub struct Server {
    config: ServerConfig,
    resolver: VersionResolver,
    table: Arc<RouteTable>,
    handlers: HandlerRegistry,
    docs: Option<DocumentServer>,
    cors: Option<CorsPolicy>,
    metrics: Option<MetricsRegistry>,
    supported_versions: HeaderValue,
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("config", &self.config)
            .field("routes", &self.table.len())
            .field("handlers", &self.handlers.len())
            .field("docs", &self.docs.as_ref().map(DocumentServer::base_path))
            .field("cors", &self.cors.is_some())
            .field("metrics", &self.metrics.is_some())
            .finish_non_exhaustive()
    }
}

impl Server {
    /// Creates a new server builder.
    #[must_use]
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    /// Returns the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the route table.
    #[must_use]
    pub fn routes(&self) -> &RouteTable {
        &self.table
    }

    /// Returns `true` when the documentation endpoints are mounted.
    #[must_use]
    pub fn docs_mounted(&self) -> bool {
        self.docs.is_some()
    }

    /// Runs the server until SIGINT or SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured address cannot be bound.
    pub async fn run(self) -> Result<(), ServerError> {
        let shutdown = ShutdownSignal::with_os_signals();
        self.run_with_shutdown(shutdown).await
    }

    /// Binds the configured address and serves until `shutdown` fires.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid or cannot be bound.
    pub async fn run_with_shutdown(self, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let addr = self.config.socket_addr().map_err(|e| {
            ServerError::BindError(format!("Invalid address '{}': {}", self.config.http_addr(), e))
        })?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(format!("Failed to bind to {addr}: {e}")))?;

        self.serve(listener, shutdown).await
    }

    /// Serves connections from an already bound listener until `shutdown`
    /// fires, then drains open connections for up to the shutdown timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener's local address cannot be read.
    pub async fn serve(self, listener: TcpListener, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let local_addr = listener.local_addr()?;
        tracing::info!(addr = %local_addr, "Server listening");

        let server = Arc::new(self);
        let tracker = ConnectionTracker::new();

        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, remote_addr)) => {
                            let server = Arc::clone(&server);
                            let guard = tracker.acquire();
                            let shutdown = shutdown.clone();
                            tokio::spawn(async move {
                                server.handle_connection(stream, remote_addr, shutdown).await;
                                drop(guard);
                            });
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "Failed to accept connection");
                        }
                    }
                }
                () = shutdown.recv() => {
                    tracing::info!("Shutdown signal received, no longer accepting connections");
                    break;
                }
            }
        }

        let shutdown_timeout = server.config.shutdown_timeout();
        tracing::info!(
            timeout = ?shutdown_timeout,
            connections = tracker.active_connections(),
            "Draining connections"
        );

        tokio::select! {
            () = tracker.drained() => {
                tracing::info!("All connections closed");
            }
            () = tokio::time::sleep(shutdown_timeout) => {
                tracing::warn!(
                    connections = tracker.active_connections(),
                    "Shutdown timeout reached with connections still open"
                );
            }
        }

        tracing::info!("Server stopped");
        Ok(())
    }

    /// Serves one HTTP/1.1 connection; on shutdown the connection finishes
    /// its in-flight request and then closes.
    async fn handle_connection(
        self: Arc<Self>,
        stream: TcpStream,
        remote_addr: SocketAddr,
        shutdown: ShutdownSignal,
    ) {
        let io = TokioIo::new(stream);
        let server = Arc::clone(&self);
        let service = service_fn(move |req: Request<Incoming>| {
            let server = Arc::clone(&server);
            async move { Ok::<_, Infallible>(server.handle_incoming(req).await) }
        });

        let conn = http1::Builder::new().serve_connection(io, service);
        tokio::pin!(conn);

        let mut draining = false;
        loop {
            tokio::select! {
                result = conn.as_mut() => {
                    if let Err(e) = result {
                        tracing::debug!(remote = %remote_addr, error = %e, "Connection closed with error");
                    }
                    break;
                }
                () = shutdown.recv(), if !draining => {
                    tracing::debug!(remote = %remote_addr, "Closing connection for shutdown");
                    draining = true;
                    conn.as_mut().graceful_shutdown();
                }
            }
        }
    }

    /// Collects the body, then hands over to [`Server::handle`].
    async fn handle_incoming(&self, request: Request<Incoming>) -> HttpResponse {
        let (parts, body) = request.into_parts();
        match tokio::time::timeout(self.config.request_timeout(), body.collect()).await {
            Ok(Ok(collected)) => {
                self.handle(Request::from_parts(parts, collected.to_bytes()))
                    .await
            }
            Ok(Err(e)) => {
                let request_id = RequestId::new().to_string();
                tracing::warn!(request_id = %request_id, error = %e, "Failed to read request body");
                let err = ApiError::validation(format!("Failed to read request body: {e}"));
                let mut response = response::error(&err, Some(&request_id));
                self.finish(&mut response, &request_id);
                response
            }
            Err(_) => {
                let request_id = RequestId::new().to_string();
                tracing::warn!(request_id = %request_id, "Request body collection timed out");
                let mut response = response::request_timeout(Some(&request_id));
                self.finish(&mut response, &request_id);
                response
            }
        }
    }

    /// Handles a request whose body has already been read.
    ///
    /// This is the whole request pipeline minus the socket, and is what the
    /// in-process tests drive.
    pub async fn handle(&self, request: Request<Bytes>) -> HttpResponse {
        let request_id = RequestId::new();
        let id = request_id.to_string();
        let started = Instant::now();
        forecast_telemetry::increment_in_flight();

        let (operation, mut response) =
            contain_panics(self.route(request, request_id, &id), &id).await;

        forecast_telemetry::decrement_in_flight();
        self.finish(&mut response, &id);

        let elapsed = started.elapsed();
        let status = response.status().as_u16();
        forecast_telemetry::record_request(&operation, status, elapsed);
        forecast_telemetry::log_request_complete!(id, operation, status, elapsed.as_millis() as u64);
        response
    }

    async fn route(
        &self,
        request: Request<Bytes>,
        request_id: RequestId,
        id: &str,
    ) -> (String, HttpResponse) {
        if let Some(cors) = &self.cors {
            if cors.is_preflight(&request) {
                return ("preflight".to_string(), cors.preflight(&request));
            }
        }

        let (parts, body) = request.into_parts();
        let path = parts.uri.path();

        if parts.method == Method::GET && path == "/metrics" {
            if let Some(metrics) = &self.metrics {
                return (
                    "metrics".to_string(),
                    response::with_body(
                        StatusCode::OK,
                        "text/plain; version=0.0.4; charset=utf-8",
                        metrics.render(),
                    ),
                );
            }
        }

        if let Some(docs) = &self.docs {
            if let Some(response) = docs.handle(&parts.method, path, &parts.headers, id) {
                return ("docs".to_string(), response);
            }
        }

        let resolved = match self.resolver.resolve(path) {
            Ok(resolved) => resolved,
            Err(e) => return ("unresolved".to_string(), response::error(&e, Some(id))),
        };

        let matched = match self.table.dispatch(resolved.revision, &parts.method, path) {
            Ok(matched) => matched,
            Err(e) => {
                tracing::debug!(
                    request_id = %id,
                    revision = %resolved.revision,
                    method = %parts.method,
                    path = %path,
                    "No route matched"
                );
                return ("unmatched".to_string(), response::error(&e, Some(id)));
            }
        };

        let operation_id = matched.operation_id().to_string();
        let ctx = RequestContext::with_request_id(request_id, resolved.revision)
            .with_explicit_revision(resolved.explicit)
            .with_operation_id(operation_id.clone())
            .with_path_params(matched.into_params())
            .with_query(parts.uri.query());

        let response = self.invoke(&operation_id, ctx, body, id).await;
        (operation_id, response)
    }

    /// Runs a handler under the request timeout, turning timeouts into the
    /// generic envelope.
    async fn invoke(&self, operation_id: &str, ctx: RequestContext, body: Bytes, id: &str) -> HttpResponse {
        let invocation = self.handlers.invoke(operation_id, ctx, body);

        match tokio::time::timeout(self.config.request_timeout(), invocation).await {
            Ok(Ok(handled)) => into_http(handled),
            Ok(Err(InvokeError::Handler(e))) => {
                if e.is_server_error() {
                    forecast_telemetry::log_request_error!(id, e);
                }
                response::error(&e, Some(id))
            }
            Ok(Err(e @ InvokeError::HandlerNotFound(_))) => {
                forecast_telemetry::log_request_error!(id, e);
                response::internal(StatusCode::INTERNAL_SERVER_ERROR, Some(id))
            }
            Err(_) => {
                tracing::warn!(request_id = %id, operation_id = %operation_id, "Handler timed out");
                response::internal(StatusCode::GATEWAY_TIMEOUT, Some(id))
            }
        }
    }

    fn finish(&self, response: &mut HttpResponse, request_id: &str) {
        let headers = response.headers_mut();
        if let Ok(value) = HeaderValue::from_str(request_id) {
            headers.insert(REQUEST_ID_HEADER, value);
        }
        headers.insert(SUPPORTED_VERSIONS_HEADER, self.supported_versions.clone());
        if let Some(cors) = &self.cors {
            cors.apply(headers);
        }
    }
}

/// Awaits one pass of the request pipeline. A panic anywhere in it becomes
/// the generic envelope under the operation label `panicked`.
async fn contain_panics<F>(pipeline: F, id: &str) -> (String, HttpResponse)
where
    F: std::future::Future<Output = (String, HttpResponse)>,
{
    match AssertUnwindSafe(pipeline).catch_unwind().await {
        Ok(routed) => routed,
        Err(_panic) => {
            tracing::error!(request_id = %id, "Request pipeline panicked");
            (
                "panicked".to_string(),
                response::internal(StatusCode::INTERNAL_SERVER_ERROR, Some(id)),
            )
        }
    }
}

fn into_http(handled: HandlerResponse) -> HttpResponse {
    let (status, headers, body) = handled.into_parts();
    let mut response = Response::new(Full::new(body));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

/// Builder for [`Server`].
#[derive(Default)]
pub struct ServerBuilder {
    config: ServerConfig,
    table: Option<Arc<RouteTable>>,
    handlers: HandlerRegistry,
    default_revision: Option<Revision>,
    docs: Option<DocumentServer>,
    cors: Option<CorsPolicy>,
    metrics: Option<MetricsRegistry>,
}

impl ServerBuilder {
    /// Creates a builder with default configuration and no routes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the server configuration.
    #[must_use]
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the route table.
    #[must_use]
    pub fn routes(mut self, table: impl Into<Arc<RouteTable>>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Sets the handler registry.
    #[must_use]
    pub fn handlers(mut self, handlers: HandlerRegistry) -> Self {
        self.handlers = handlers;
        self
    }

    /// Revision applied to requests without a revision segment. Defaults
    /// to the oldest declared revision.
    #[must_use]
    pub fn default_revision(mut self, revision: Revision) -> Self {
        self.default_revision = Some(revision);
        self
    }

    /// Mounts the documentation endpoints.
    #[must_use]
    pub fn docs(mut self, docs: Option<DocumentServer>) -> Self {
        self.docs = docs;
        self
    }

    /// Enables CORS with `policy`.
    #[must_use]
    pub fn cors(mut self, policy: CorsPolicy) -> Self {
        self.cors = Some(policy);
        self
    }

    /// Serves `GET /metrics` from `registry`.
    #[must_use]
    pub fn metrics(mut self, registry: MetricsRegistry) -> Self {
        self.metrics = Some(registry);
        self
    }

    /// Builds the server.
    ///
    /// # Errors
    ///
    /// - [`ServerError::Configuration`] without a route table or with a
    ///   default revision that is not declared.
    /// - [`ServerError::MissingHandler`] when a route has no handler.
    pub fn build(self) -> Result<Server, ServerError> {
        let table = self
            .table
            .ok_or_else(|| ServerError::Configuration("no route table configured".to_string()))?;
        let declared = table.supported_revisions().clone();

        let default_revision = self
            .default_revision
            .or_else(|| declared.iter().next().copied())
            .ok_or_else(|| ServerError::Configuration("no revisions declared".to_string()))?;

        let resolver = VersionResolver::new(declared.clone(), default_revision)
            .map_err(|e| ServerError::Configuration(e.to_string()))?
            .with_prefix(self.config.path_prefix());

        if let Some(route) = table.iter().find(|r| !self.handlers.contains(r.operation_id())) {
            return Err(ServerError::MissingHandler {
                operation_id: route.operation_id().to_string(),
            });
        }

        let supported_versions = HeaderValue::from_str(&declared.to_header_value())
            .map_err(|e| ServerError::Configuration(format!("invalid revision header: {e}")))?;

        tracing::debug!(
            routes = table.len(),
            handlers = self.handlers.len(),
            default_revision = %default_revision,
            "Server assembled"
        );

        Ok(Server {
            config: self.config,
            resolver,
            table,
            handlers: self.handlers,
            docs: self.docs,
            cors: self.cors,
            metrics: self.metrics,
            supported_versions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docs::DocsSettings;
    use forecast_core::RevisionSet;
    use forecast_docs::DocumentSynthesizer;
    use forecast_router::RouteDescriptor;
    use std::time::Duration;

    const V1: Revision = Revision::new(1, 0);
    const V2: Revision = Revision::new(2, 0);

    fn table() -> RouteTable {
        let mut table = RouteTable::new(RevisionSet::new([V1, V2]));
        table
            .register(RouteDescriptor::new(Method::GET, "/api/v{revision}/items", "listItems"))
            .unwrap();
        table
            .register(
                RouteDescriptor::new(Method::GET, "/api/v{revision}/items/extra", "extra")
                    .revisions([V2]),
            )
            .unwrap();
        table
            .register(RouteDescriptor::new(Method::GET, "/api/v{revision}/boom", "boom"))
            .unwrap();
        table
            .register(RouteDescriptor::new(Method::GET, "/api/v{revision}/slow", "slow"))
            .unwrap();
        table
    }

    fn handlers() -> HandlerRegistry {
        let mut handlers = HandlerRegistry::new();
        handlers.register_no_body("listItems", |ctx: RequestContext| async move {
            HandlerResponse::ok(&serde_json::json!({
                "revision": ctx.revision().to_string(),
                "explicit": ctx.is_explicit_revision(),
            }))
        });
        handlers.register_no_body("extra", |_ctx: RequestContext| async {
            HandlerResponse::ok(&serde_json::json!([]))
        });
        handlers.register_no_body("boom", |_ctx: RequestContext| async {
            Err::<HandlerResponse, _>(ApiError::internal("secret failure detail"))
        });
        handlers.register_no_body("slow", |_ctx: RequestContext| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(HandlerResponse::no_content())
        });
        handlers
    }

    fn server() -> Server {
        Server::builder()
            .config(
                ServerConfig::builder()
                    .http_addr("127.0.0.1:0")
                    .request_timeout(Duration::from_millis(200))
                    .build(),
            )
            .routes(table())
            .handlers(handlers())
            .cors(CorsPolicy::allow_any())
            .build()
            .unwrap()
    }

    fn get(path: &str) -> Request<Bytes> {
        Request::builder().uri(path).body(Bytes::new()).unwrap()
    }

    async fn json_body(response: HttpResponse) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_build_requires_table() {
        let err = Server::builder().build().unwrap_err();
        assert!(matches!(err, ServerError::Configuration(_)));
    }

    #[test]
    fn test_build_requires_every_handler() {
        let err = Server::builder()
            .routes(table())
            .handlers(HandlerRegistry::new())
            .build()
            .unwrap_err();
        assert!(matches!(err, ServerError::MissingHandler { .. }));
    }

    #[test]
    fn test_build_rejects_undeclared_default() {
        let err = Server::builder()
            .routes(table())
            .handlers(handlers())
            .default_revision(Revision::new(3, 0))
            .build()
            .unwrap_err();
        assert!(matches!(err, ServerError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_explicit_and_default_revision() {
        let server = server();

        let response = server.handle(get("/api/v2/items")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["revision"], "2.0");
        assert_eq!(body["explicit"], true);

        let body = json_body(server.handle(get("/api/items")).await).await;
        assert_eq!(body["revision"], "1.0");
        assert_eq!(body["explicit"], false);
    }

    #[tokio::test]
    async fn test_headers_on_every_response() {
        let server = server();
        for path in ["/api/v1/items", "/api/v9/items", "/nowhere"] {
            let response = server.handle(get(path)).await;
            assert_eq!(response.headers()[SUPPORTED_VERSIONS_HEADER], "1.0, 2.0", "{path}");
            assert!(response.headers().contains_key(REQUEST_ID_HEADER));
            assert_eq!(response.headers()["access-control-allow-origin"], "*");
        }
    }

    #[tokio::test]
    async fn test_unsupported_revision() {
        let response = server().handle(get("/api/v9.9/items")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "UNSUPPORTED_REVISION");
    }

    #[tokio::test]
    async fn test_route_absent_in_revision() {
        let server = server();
        assert_eq!(server.handle(get("/api/v1/items/extra")).await.status(), StatusCode::NOT_FOUND);
        assert_eq!(server.handle(get("/api/v2/items/extra")).await.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_server_error_hides_detail() {
        let response = server().handle(get("/api/v1/boom")).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["error"]["message"], "An unexpected error occurred.");
        assert!(!body.to_string().contains("secret"));
    }

    #[tokio::test]
    async fn test_handler_timeout() {
        let response = server().handle(get("/api/v1/slow")).await;
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(json_body(response).await["error"]["code"], "INTERNAL_ERROR");
    }

    #[tokio::test]
    async fn test_handler_panic_is_contained() {
        let mut table = RouteTable::new(RevisionSet::new([V1]));
        table
            .register(RouteDescriptor::new(Method::GET, "/api/v{revision}/panic", "panic"))
            .unwrap();
        let mut handlers = HandlerRegistry::new();
        handlers.register_no_body("panic", |_ctx: RequestContext| async {
            if true {
                panic!("handler bug");
            }
            Ok(HandlerResponse::no_content())
        });
        let server = Server::builder().routes(table).handlers(handlers).build().unwrap();

        let response = server.handle(get("/api/v1/panic")).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
        assert_eq!(response.headers()[SUPPORTED_VERSIONS_HEADER], "1.0");
        assert_eq!(json_body(response).await["error"]["code"], "INTERNAL_ERROR");
    }

    #[tokio::test]
    async fn test_panic_outside_handler_gets_envelope() {
        let pipeline = async {
            if true {
                panic!("document rendering bug");
            }
            ("docs".to_string(), response::empty(StatusCode::OK))
        };
        let (operation, response) = contain_panics(pipeline, "req-7").await;
        assert_eq!(operation, "panicked");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
        assert_eq!(body["request_id"], "req-7");
    }

    #[tokio::test]
    async fn test_pipeline_without_panic_passes_through() {
        let pipeline = async { ("docs".to_string(), response::empty(StatusCode::NO_CONTENT)) };
        let (operation, response) = contain_panics(pipeline, "req-8").await;
        assert_eq!(operation, "docs");
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_preflight() {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/v1/items")
            .header("origin", "https://app.example.com")
            .header("access-control-request-method", "GET")
            .body(Bytes::new())
            .unwrap();
        let response = server().handle(request).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(response.headers()["access-control-allow-methods"], "GET");
    }

    #[tokio::test]
    async fn test_docs_mounted_and_absent() {
        let docs = DocumentServer::mount(&DocsSettings::default(), DocumentSynthesizer::new(table()));
        let server = Server::builder()
            .routes(table())
            .handlers(handlers())
            .docs(docs)
            .build()
            .unwrap();
        assert!(server.docs_mounted());
        assert_eq!(server.handle(get("/swagger")).await.status(), StatusCode::OK);

        let production = DocsSettings {
            production: true,
            ..DocsSettings::default()
        };
        let docs = DocumentServer::mount(&production, DocumentSynthesizer::new(table()));
        let server = Server::builder()
            .routes(table())
            .handlers(handlers())
            .docs(docs)
            .build()
            .unwrap();
        assert!(!server.docs_mounted());
        assert_eq!(server.handle(get("/swagger")).await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_run_and_shutdown() {
        let server = server();
        let shutdown = ShutdownSignal::new();
        shutdown.trigger();

        let result = tokio::time::timeout(Duration::from_secs(5), server.run_with_shutdown(shutdown)).await;
        assert!(result.is_ok());
        assert!(result.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_run_invalid_address() {
        let server = Server::builder()
            .config(ServerConfig::builder().http_addr("not-an-address").build())
            .routes(table())
            .handlers(handlers())
            .build()
            .unwrap();
        let err = server.run_with_shutdown(ShutdownSignal::new()).await.unwrap_err();
        assert!(matches!(err, ServerError::BindError(_)));
    }
}
