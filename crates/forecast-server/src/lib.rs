//! # Forecast Server
//!
//! HTTP host for the forecast API, built on hyper and tokio.
//!
//! - Revision resolution and route dispatch per request
//! - Type-erased handler registry bound to operation ids
//! - Per-revision documentation and the Swagger UI viewer, unmounted in
//!   production
//! - Allow-all CORS, the uniform error envelope, request timeouts
//! - Graceful shutdown on SIGINT/SIGTERM with connection draining
//!
//! ## Example
//!
//! ```rust
//! use bytes::Bytes;
//! use forecast_core::{RequestContext, Revision, RevisionSet};
//! use forecast_router::{RouteDescriptor, RouteTable};
//! use forecast_server::{HandlerRegistry, HandlerResponse, Server};
//! use http::{Method, Request, StatusCode};
//!
//! # tokio_test::block_on(async {
//! let mut table = RouteTable::new(RevisionSet::new([Revision::new(1, 0)]));
//! table
//!     .register(RouteDescriptor::new(Method::GET, "/api/v{revision}/ping", "ping"))
//!     .unwrap();
//!
//! let mut handlers = HandlerRegistry::new();
//! handlers.register_no_body("ping", |_ctx: RequestContext| async {
//!     HandlerResponse::ok(&"pong")
//! });
//!
//! let server = Server::builder().routes(table).handlers(handlers).build().unwrap();
//! let request = Request::get("/api/v1/ping").body(Bytes::new()).unwrap();
//! let response = server.handle(request).await;
//! assert_eq!(response.status(), StatusCode::OK);
//! assert_eq!(response.headers()["api-supported-versions"], "1.0");
//! # });
//! ```

#![doc(html_root_url = "https://docs.rs/forecast-server/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod cors;
pub mod docs;
mod error;
pub mod handler;
pub mod response;
mod server;
pub mod shutdown;

pub use config::{ServerConfig, ServerConfigBuilder};
pub use cors::CorsPolicy;
pub use docs::{request_origin, DocsSettings, DocumentServer};
pub use error::ServerError;
pub use handler::{HandlerRegistry, HandlerResponse, InvokeError};
pub use response::{HttpResponse, REQUEST_ID_HEADER, SUPPORTED_VERSIONS_HEADER};
pub use server::{Server, ServerBuilder};
pub use shutdown::{ConnectionTracker, ShutdownSignal};
