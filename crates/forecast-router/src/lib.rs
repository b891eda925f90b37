//! Revision-aware routing for the forecast API.
//!
//! Two pieces live here:
//!
//! - [`VersionResolver`] decides which declared revision a request path
//!   addresses, falling back to the default when the revision segment is
//!   omitted.
//! - [`RouteTable`] holds every [`RouteDescriptor`], gated by revision, and
//!   dispatches concrete paths to operation ids.
//!
//! # Example
//!
//! ```rust
//! use forecast_core::{Revision, RevisionSet};
//! use forecast_router::{RouteDescriptor, RouteTable, VersionResolver};
//! use http::Method;
//!
//! let declared = RevisionSet::new([Revision::new(1, 0), Revision::new(2, 0)]);
//! let mut table = RouteTable::new(declared.clone());
//! table
//!     .register(RouteDescriptor::new(
//!         Method::DELETE,
//!         "/api/v{revision}/weatherforecast/{date}",
//!         "deleteWeatherForecast",
//!     ))
//!     .unwrap();
//!
//! let resolver = VersionResolver::new(declared, Revision::new(1, 0)).unwrap();
//! let path = "/api/v2/weatherforecast/2030-01-01";
//! let resolved = resolver.resolve(path).unwrap();
//! let m = table.dispatch(resolved.revision, &Method::DELETE, path).unwrap();
//! assert_eq!(m.param("date"), Some("2030-01-01"));
//! ```
//!
//! # Template syntax
//!
//! ```text
//! /api/v{revision}/weatherforecast/{date}
//!      │ └──────┘                 └────┘
//!      │ placeholder, exactly once  captured parameter
//!      └ literal prefix of the revision segment
//! ```

mod resolver;
mod route;
mod table;

pub use resolver::{ResolvedRevision, VersionResolver};
pub use route::{ParameterLocation, ParameterSpec, PayloadSpec, ResponseSpec, RouteDescriptor};
pub use table::{RouteMatch, RouteTable};
