//! # Forecast Core
//!
//! Core types shared by every crate of the forecast API:
//!
//! - [`Revision`] / [`RevisionSet`] - API revision identifiers and the declared set
//! - [`RequestContext`] - Per-request state handed to handlers
//! - [`RequestId`] - UUID v7 request identifier
//! - [`ApiError`] - Error taxonomy with HTTP status mapping and the JSON envelope

#![doc(html_root_url = "https://docs.rs/forecast-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod error;
mod revision;

pub use context::{RequestContext, RequestId};
pub use error::{
    ApiError, ApiResult, ErrorCategory, ErrorDetail, ErrorEnvelope, FieldErrors,
    GENERIC_INTERNAL_MESSAGE,
};
pub use revision::{Revision, RevisionParseError, RevisionSet};

/// The placeholder every route template carries for the revision segment.
pub const REVISION_PLACEHOLDER: &str = "{revision}";

/// Name of the synthetic path parameter bound to [`REVISION_PLACEHOLDER`].
pub const REVISION_PARAMETER: &str = "revision";
