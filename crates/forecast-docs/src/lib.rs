//! # Forecast Docs
//!
//! Version-aware interface documentation for the forecast API.
//!
//! This crate provides:
//! - **OpenAPI 3.1 types** with deterministic serialization order
//! - **[`DocumentSynthesizer`]**: one raw document per declared revision,
//!   drawn from the route table
//! - **[`FilterChain`]**: prunes the synthetic revision parameter,
//!   literalizes paths and injects the serving origin
//! - **[`SwaggerUi`]**: a viewer listing every revision, newest first
//!
//! ## Quick Start
//!
//! ```rust
//! use forecast_core::{Revision, RevisionSet};
//! use forecast_docs::{DocumentSynthesizer, FilterChain, RequestOrigin};
//! use forecast_router::{RouteDescriptor, RouteTable};
//! use http::Method;
//!
//! let mut table = RouteTable::new(RevisionSet::new([Revision::new(1, 0)]));
//! table
//!     .register(RouteDescriptor::new(Method::GET, "/api/v{revision}/weatherforecast", "list"))
//!     .unwrap();
//!
//! let raw = DocumentSynthesizer::new(table)
//!     .title("Weather Forecast API")
//!     .synthesize(Revision::new(1, 0))
//!     .unwrap();
//!
//! let origin = RequestOrigin::new("https", "api.example.com");
//! let doc = FilterChain::standard().apply(raw, Some(&origin)).unwrap();
//!
//! assert!(doc.paths.contains_key("/api/v1.0/weatherforecast"));
//! assert_eq!(doc.servers[0].url, "https://api.example.com");
//! ```

mod error;
mod filters;
mod openapi;
mod swagger;
mod synthesizer;

pub use error::{DocsError, DocsResult};
pub use filters::{DocumentFilter, FilterChain, RequestOrigin};
pub use openapi::{
    Components, Contact, Info, License, MediaType, OpenApi, Operation, Parameter, ParameterIn,
    PathItem, RequestBody, Response, Schema, SchemaType, Server, Tag, OPENAPI_VERSION,
};
pub use swagger::{document_path, DocExpansion, SwaggerEntry, SwaggerUi};
pub use synthesizer::DocumentSynthesizer;
