//! API revision identifiers.
//!
//! A [`Revision`] is a `(major, minor)` pair. Revisions are declared once at
//! startup in a [`RevisionSet`] and used as grouping keys afterwards; they
//! are never mutated.
//!
//! # Textual forms
//!
//! | Form | Example | Used for |
//! |------|---------|----------|
//! | `Display` | `1.0` | `info.version`, literalized paths, headers |
//! | [`Revision::group_name`] | `v1`, `v2.1` | documentation addresses |
//! | path token | `v1`, `v1.0` | incoming request paths |

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// A declared API revision.
///
/// Ordering is by major, then minor.
///
/// # Example
///
/// ```
/// use forecast_core::Revision;
///
/// let r: Revision = "v2".parse().unwrap();
/// assert_eq!(r, Revision::new(2, 0));
/// assert_eq!(r.to_string(), "2.0");
/// assert_eq!(r.group_name(), "v2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Revision {
    major: u32,
    minor: u32,
}

impl Revision {
    /// Creates a revision.
    #[must_use]
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Returns the major component.
    #[must_use]
    pub const fn major(&self) -> u32 {
        self.major
    }

    /// Returns the minor component.
    #[must_use]
    pub const fn minor(&self) -> u32 {
        self.minor
    }

    /// Returns the normalized documentation group name.
    ///
    /// The minor component is omitted when it is zero.
    #[must_use]
    pub fn group_name(&self) -> String {
        if self.minor == 0 {
            format!("v{}", self.major)
        } else {
            format!("v{}.{}", self.major, self.minor)
        }
    }

    /// Parses a path token such as `v1` or `v1.0`.
    ///
    /// Unlike [`FromStr`], the leading `v` is mandatory.
    pub fn from_path_token(token: &str) -> Result<Self, RevisionParseError> {
        let body = token
            .strip_prefix('v')
            .or_else(|| token.strip_prefix('V'))
            .ok_or_else(|| RevisionParseError::new(token))?;
        parse_numbers(body).ok_or_else(|| RevisionParseError::new(token))
    }

    /// Parses the bare numeric form (`1`, `1.0`) with no prefix allowed.
    pub fn parse_numeric(s: &str) -> Result<Self, RevisionParseError> {
        parse_numbers(s).ok_or_else(|| RevisionParseError::new(s))
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for Revision {
    type Err = RevisionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let body = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);
        parse_numbers(body).ok_or_else(|| RevisionParseError::new(s))
    }
}

fn parse_numbers(body: &str) -> Option<Revision> {
    let (major, minor) = match body.split_once('.') {
        Some((major, minor)) => (major, Some(minor)),
        None => (body, None),
    };

    if major.is_empty() || !major.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let major = major.parse().ok()?;

    let minor = match minor {
        Some(m) if !m.is_empty() && m.bytes().all(|b| b.is_ascii_digit()) => m.parse().ok()?,
        Some(_) => return None,
        None => 0,
    };

    Some(Revision::new(major, minor))
}

impl Serialize for Revision {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Revision {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Error returned when a string is not a revision.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{input}' is not a valid revision (expected forms: 1, 1.0, v1, v1.0)")]
pub struct RevisionParseError {
    input: String,
}

impl RevisionParseError {
    fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }

    /// Returns the rejected input.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// The globally declared set of revisions, in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevisionSet {
    revisions: BTreeSet<Revision>,
}

impl RevisionSet {
    /// Creates a set from the given revisions.
    pub fn new(revisions: impl IntoIterator<Item = Revision>) -> Self {
        Self {
            revisions: revisions.into_iter().collect(),
        }
    }

    /// Returns `true` if `revision` is declared.
    #[must_use]
    pub fn contains(&self, revision: &Revision) -> bool {
        self.revisions.contains(revision)
    }

    /// Iterates declared revisions in ascending order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Revision> + '_ {
        self.revisions.iter()
    }

    /// Returns the declared revisions as a vector, ascending.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Revision> {
        self.revisions.iter().copied().collect()
    }

    /// Returns the highest declared revision.
    #[must_use]
    pub fn latest(&self) -> Option<Revision> {
        self.revisions.iter().next_back().copied()
    }

    /// Looks up a revision by its documentation group name (`v1`, `v2.1`).
    #[must_use]
    pub fn by_group_name(&self, group: &str) -> Option<Revision> {
        self.revisions
            .iter()
            .find(|r| r.group_name().eq_ignore_ascii_case(group))
            .copied()
    }

    /// Returns the revisions from `candidates` that are not declared.
    pub fn undeclared<'a>(
        &self,
        candidates: impl IntoIterator<Item = &'a Revision>,
    ) -> Vec<Revision> {
        candidates
            .into_iter()
            .filter(|r| !self.contains(r))
            .copied()
            .collect()
    }

    /// Returns the number of declared revisions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.revisions.len()
    }

    /// Returns `true` if nothing is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.revisions.is_empty()
    }

    /// Renders the set as a comma-separated list (`1.0, 2.0`).
    #[must_use]
    pub fn to_header_value(&self) -> String {
        self.revisions
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromIterator<Revision> for RevisionSet {
    fn from_iter<I: IntoIterator<Item = Revision>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_forms() {
        assert_eq!("1".parse::<Revision>().unwrap(), Revision::new(1, 0));
        assert_eq!("1.0".parse::<Revision>().unwrap(), Revision::new(1, 0));
        assert_eq!("v2".parse::<Revision>().unwrap(), Revision::new(2, 0));
        assert_eq!("v2.1".parse::<Revision>().unwrap(), Revision::new(2, 1));
        assert_eq!(" 3.4 ".parse::<Revision>().unwrap(), Revision::new(3, 4));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "v", "1.", ".1", "1.x", "one", "v1.0.0", "-1", "v+1"] {
            assert!(bad.parse::<Revision>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_path_token_requires_prefix() {
        assert_eq!(Revision::from_path_token("v1").unwrap(), Revision::new(1, 0));
        assert_eq!(Revision::from_path_token("v1.0").unwrap(), Revision::new(1, 0));
        assert!(Revision::from_path_token("1.0").is_err());
        assert!(Revision::from_path_token("weatherforecast").is_err());
    }

    #[test]
    fn test_parse_numeric_rejects_prefix() {
        assert_eq!(Revision::parse_numeric("2.1").unwrap(), Revision::new(2, 1));
        assert!(Revision::parse_numeric("v2").is_err());
    }

    #[test]
    fn test_ordering() {
        let mut revs = vec![
            Revision::new(2, 0),
            Revision::new(1, 5),
            Revision::new(1, 0),
            Revision::new(10, 0),
        ];
        revs.sort();
        assert_eq!(
            revs,
            vec![
                Revision::new(1, 0),
                Revision::new(1, 5),
                Revision::new(2, 0),
                Revision::new(10, 0),
            ]
        );
    }

    #[test]
    fn test_group_name() {
        assert_eq!(Revision::new(1, 0).group_name(), "v1");
        assert_eq!(Revision::new(2, 1).group_name(), "v2.1");
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Revision::new(2, 0)).unwrap();
        assert_eq!(json, "\"2.0\"");
        let back: Revision = serde_json::from_str("\"v1\"").unwrap();
        assert_eq!(back, Revision::new(1, 0));
        assert!(serde_json::from_str::<Revision>("\"nope\"").is_err());
    }

    #[test]
    fn test_revision_set() {
        let set = RevisionSet::new([Revision::new(2, 0), Revision::new(1, 0)]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.latest(), Some(Revision::new(2, 0)));
        assert_eq!(set.to_header_value(), "1.0, 2.0");
        assert_eq!(set.by_group_name("v2"), Some(Revision::new(2, 0)));
        assert_eq!(set.by_group_name("V1"), Some(Revision::new(1, 0)));
        assert_eq!(set.by_group_name("v3"), None);

        let undeclared = set.undeclared(&[Revision::new(1, 0), Revision::new(9, 9)]);
        assert_eq!(undeclared, vec![Revision::new(9, 9)]);
    }

    proptest! {
        #[test]
        fn display_round_trips_through_parse(major in 0u32..1000, minor in 0u32..1000) {
            let r = Revision::new(major, minor);
            prop_assert_eq!(r.to_string().parse::<Revision>().unwrap(), r);
            prop_assert_eq!(Revision::from_path_token(&r.group_name()).unwrap(), r);
        }
    }
}
