//! Revision resolution from request paths.
//!
//! The resolver inspects one designated path segment (index 1 by default,
//! i.e. `v1` in `/api/v1/weatherforecast`). A segment counts as a revision
//! token when it is `v` followed by an ASCII digit; anything else means the
//! caller omitted the revision and gets the configured default.
//!
//! With a prefix set, only paths under that prefix are inspected. Other
//! paths resolve to the default and are left for dispatch to reject.

use forecast_core::{ApiError, ApiResult, Revision, RevisionSet};

/// The outcome of resolving a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRevision {
    /// The revision the request addresses.
    pub revision: Revision,
    /// `false` when the default revision was applied.
    pub explicit: bool,
}

/// Maps request paths to declared revisions.
///
/// # Example
///
/// ```rust
/// use forecast_core::{Revision, RevisionSet};
/// use forecast_router::VersionResolver;
///
/// let declared = RevisionSet::new([Revision::new(1, 0), Revision::new(2, 0)]);
/// let resolver = VersionResolver::new(declared, Revision::new(1, 0)).unwrap();
///
/// let resolved = resolver.resolve("/api/v2/weatherforecast").unwrap();
/// assert_eq!(resolved.revision, Revision::new(2, 0));
/// assert!(resolved.explicit);
///
/// let defaulted = resolver.resolve("/api/weatherforecast").unwrap();
/// assert_eq!(defaulted.revision, Revision::new(1, 0));
/// assert!(!defaulted.explicit);
///
/// assert!(resolver.resolve("/api/v9.9/weatherforecast").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct VersionResolver {
    declared: RevisionSet,
    default: Revision,
    segment: usize,
    prefix: Vec<String>,
}

impl VersionResolver {
    /// Segment index used unless overridden.
    pub const DEFAULT_SEGMENT: usize = 1;

    /// Creates a resolver.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::UnsupportedRevision`] if `default` is not declared.
    pub fn new(declared: RevisionSet, default: Revision) -> ApiResult<Self> {
        if !declared.contains(&default) {
            return Err(ApiError::unsupported_revision(
                default.to_string(),
                declared.iter().copied(),
            ));
        }
        Ok(Self {
            declared,
            default,
            segment: Self::DEFAULT_SEGMENT,
            prefix: Vec::new(),
        })
    }

    /// Uses a different path segment index (0-based, empty segments skipped).
    #[must_use]
    pub fn with_segment(mut self, index: usize) -> Self {
        self.segment = index;
        self
    }

    /// Restricts resolution to paths under `prefix`; the revision segment
    /// follows it.
    #[must_use]
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        self.segment = self.prefix.len();
        self
    }

    /// Returns the default revision.
    #[must_use]
    pub const fn default_revision(&self) -> Revision {
        self.default
    }

    /// Returns the declared revisions.
    #[must_use]
    pub const fn declared(&self) -> &RevisionSet {
        &self.declared
    }

    /// Resolves the revision a path addresses.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::UnsupportedRevision`] when the path carries a
    /// revision token that does not parse or is not declared.
    pub fn resolve(&self, path: &str) -> ApiResult<ResolvedRevision> {
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let under_prefix = self
            .prefix
            .iter()
            .all(|expected| segments.next().is_some_and(|s| s.eq_ignore_ascii_case(expected)));
        let token = if self.prefix.is_empty() {
            segments.nth(self.segment)
        } else if under_prefix {
            segments.next()
        } else {
            None
        };

        let Some(token) = token.filter(|s| is_revision_token(s)) else {
            return Ok(ResolvedRevision {
                revision: self.default,
                explicit: false,
            });
        };

        let body = &token[1..];
        match Revision::parse_numeric(body) {
            Ok(revision) if self.declared.contains(&revision) => Ok(ResolvedRevision {
                revision,
                explicit: true,
            }),
            _ => Err(ApiError::unsupported_revision(
                body,
                self.declared.iter().copied(),
            )),
        }
    }
}

fn is_revision_token(segment: &str) -> bool {
    let mut bytes = segment.bytes();
    matches!(bytes.next(), Some(b'v' | b'V')) && bytes.next().is_some_and(|b| b.is_ascii_digit())
}
