// src/version/mod.rs

//! Version labels and version ranges for recipe dependencies
//!
//! Upstream projects label releases however they like (`1.643`, `5.8.1`,
//! `2.0rc1`, `2023_04`), so versions are compared segment by segment rather
//! than as strict SemVer:
//!
//! - `.`, `-` and `_` separate segments, and a change between digits and
//!   letters starts a new one (`2.0rc1` is `2`, `0`, `rc`, `1`)
//! - numeric segments compare numerically, alphabetic ones lexicographically
//! - a numeric segment ranks above an alphabetic one (`1.0 > 1.rc`)
//! - a strict prefix ranks below the longer version (`1.2 < 1.2.1`)
//!
//! Ranges use the `min:max` form. Both bounds are inclusive and the upper
//! bound also admits every version it is a prefix of, so `:5.30` accepts
//! `5.30.2`.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// One component of a version label
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Segment {
    Numeric(u64),
    Alpha(String),
}

impl Ord for Segment {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Segment::Numeric(a), Segment::Numeric(b)) => a.cmp(b),
            (Segment::Alpha(a), Segment::Alpha(b)) => a.cmp(b),
            (Segment::Numeric(_), Segment::Alpha(_)) => Ordering::Greater,
            (Segment::Alpha(_), Segment::Numeric(_)) => Ordering::Less,
        }
    }
}

impl PartialOrd for Segment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A parsed version label
///
/// Equality and ordering look at the parsed segments only, so `1.02` and
/// `1.2` are the same version. [`Version::as_str`] keeps the label as written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    label: String,
    segments: Vec<Segment>,
}

impl Version {
    /// Parse a version label
    pub fn parse(s: &str) -> Result<Self> {
        let label = s.trim();
        if label.is_empty() {
            return Err(Error::ParseError("Empty version label".to_string()));
        }

        let mut segments = Vec::new();
        let mut current = String::new();

        let flush = |current: &mut String, segments: &mut Vec<Segment>| -> Result<()> {
            if current.is_empty() {
                return Ok(());
            }
            let segment = if current.chars().all(|c| c.is_ascii_digit()) {
                let n = current.parse::<u64>().map_err(|e| {
                    Error::ParseError(format!("Invalid numeric segment '{}': {}", current, e))
                })?;
                Segment::Numeric(n)
            } else {
                Segment::Alpha(current.to_ascii_lowercase())
            };
            segments.push(segment);
            current.clear();
            Ok(())
        };

        for c in label.chars() {
            match c {
                '.' | '-' | '_' => flush(&mut current, &mut segments)?,
                c if c.is_ascii_alphanumeric() => {
                    let boundary = current
                        .chars()
                        .last()
                        .is_some_and(|last| last.is_ascii_digit() != c.is_ascii_digit());
                    if boundary {
                        flush(&mut current, &mut segments)?;
                    }
                    current.push(c);
                }
                other => {
                    return Err(Error::ParseError(format!(
                        "Invalid character '{}' in version '{}'",
                        other, label
                    )));
                }
            }
        }
        flush(&mut current, &mut segments)?;

        if segments.is_empty() {
            return Err(Error::ParseError(format!(
                "Version '{}' has no components",
                label
            )));
        }

        Ok(Self {
            label: label.to_string(),
            segments,
        })
    }

    /// The label as written
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.label
    }

    /// Check whether every segment of `self` leads `other`
    ///
    /// `5.30` is a prefix of `5.30` and `5.30.2`, but not of `5.3`.
    pub fn is_prefix_of(&self, other: &Version) -> bool {
        self.segments.len() <= other.segments.len()
            && self.segments.iter().zip(&other.segments).all(|(a, b)| a == b)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.segments == other.segments
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.segments.hash(state);
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.segments.iter().zip(&other.segments) {
            match a.cmp(b) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }
        self.segments.len().cmp(&other.segments.len())
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Version {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Version> for String {
    fn from(version: Version) -> Self {
        version.label
    }
}

/// An inclusive version range
///
/// Textual forms:
/// - `""` or `":"` → any version
/// - `"5.8.1:"` → at least 5.8.1
/// - `":5.30"` → at most 5.30 (including 5.30.x)
/// - `"5.8.1:5.30"` → both bounds
/// - `"1.643"` → exactly 1.643 (including 1.643.x)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VersionRange {
    pub min: Option<Version>,
    pub max: Option<Version>,
}

impl VersionRange {
    /// A range that accepts every version
    pub fn any() -> Self {
        Self::default()
    }

    /// At least `min`, no upper bound
    pub fn at_least(min: Version) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    /// Parse a range string
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() || s == ":" || s == "*" {
            return Ok(Self::any());
        }

        let (min, max) = match s.split_once(':') {
            Some((lo, hi)) => {
                if hi.contains(':') {
                    return Err(Error::ParseError(format!(
                        "Invalid version range '{}': more than one ':'",
                        s
                    )));
                }
                let lo = lo.trim();
                let hi = hi.trim();
                let min = if lo.is_empty() { None } else { Some(Version::parse(lo)?) };
                let max = if hi.is_empty() { None } else { Some(Version::parse(hi)?) };
                (min, max)
            }
            None => {
                let exact = Version::parse(s)?;
                (Some(exact.clone()), Some(exact))
            }
        };

        if let (Some(lo), Some(hi)) = (&min, &max) {
            if lo > hi {
                return Err(Error::ParseError(format!(
                    "Invalid version range '{}': {} is above {}",
                    s, lo, hi
                )));
            }
        }

        Ok(Self { min, max })
    }

    /// Check whether a version falls inside this range
    pub fn satisfies(&self, version: &Version) -> bool {
        let above_min = self.min.as_ref().is_none_or(|min| version >= min);
        let below_max = self
            .max
            .as_ref()
            .is_none_or(|max| version <= max || max.is_prefix_of(version));
        above_min && below_max
    }

    /// True when the range has no bounds
    pub fn is_any(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.min, &self.max) {
            (None, None) => write!(f, ":"),
            (Some(lo), Some(hi)) if lo == hi => write!(f, "{}", lo),
            (Some(lo), None) => write!(f, "{}:", lo),
            (None, Some(hi)) => write!(f, ":{}", hi),
            (Some(lo), Some(hi)) => write!(f, "{}:{}", lo, hi),
        }
    }
}

impl FromStr for VersionRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for VersionRange {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<VersionRange> for String {
    fn from(range: VersionRange) -> Self {
        range.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_version_parse_segments() {
        let version = v("2.0rc1");
        assert_eq!(version.as_str(), "2.0rc1");
        assert_eq!(
            version.segments,
            vec![
                Segment::Numeric(2),
                Segment::Numeric(0),
                Segment::Alpha("rc".to_string()),
                Segment::Numeric(1),
            ]
        );
    }

    #[test]
    fn test_version_parse_rejects_garbage() {
        assert!(Version::parse("").is_err());
        assert!(Version::parse("...").is_err());
        assert!(Version::parse("1.2 beta").is_err());
        assert!(Version::parse("1.2/3").is_err());
    }

    #[test]
    fn test_version_compare_numeric() {
        assert!(v("1.643") > v("1.642"));
        assert!(v("1.643") > v("1.99"));
        assert!(v("5.10") > v("5.8.1"));
        assert!(v("5.8.1") > v("5.8"));
        assert_eq!(v("1.02"), v("1.2"));
    }

    #[test]
    fn test_version_compare_alpha() {
        assert!(v("1.0") > v("1.rc"));
        assert!(v("2.0rc1") < v("2.0rc2"));
        assert!(v("2.0.0") > v("2.0rc1"));
    }

    #[test]
    fn test_version_separators_are_equivalent() {
        assert_eq!(v("2023_04"), v("2023.04"));
        assert_eq!(v("1-2-3"), v("1.2.3"));
    }

    #[test]
    fn test_is_prefix_of() {
        assert!(v("5.30").is_prefix_of(&v("5.30")));
        assert!(v("5.30").is_prefix_of(&v("5.30.2")));
        assert!(!v("5.30").is_prefix_of(&v("5.3")));
        assert!(!v("5.30.2").is_prefix_of(&v("5.30")));
    }

    #[test]
    fn test_range_at_least() {
        let range = VersionRange::parse("5.8.1:").unwrap();
        assert!(range.satisfies(&v("5.8.1")));
        assert!(range.satisfies(&v("5.36.0")));
        assert!(!range.satisfies(&v("5.8.0")));
        assert!(!range.satisfies(&v("5.6.2")));
        assert_eq!(range.to_string(), "5.8.1:");
    }

    #[test]
    fn test_range_at_most_includes_prefix() {
        let range = VersionRange::parse(":5.30").unwrap();
        assert!(range.satisfies(&v("5.30")));
        assert!(range.satisfies(&v("5.30.2")));
        assert!(range.satisfies(&v("5.8.1")));
        assert!(!range.satisfies(&v("5.32.0")));
    }

    #[test]
    fn test_range_bounded() {
        let range = VersionRange::parse("5.8.1:5.30").unwrap();
        assert!(range.satisfies(&v("5.26.1")));
        assert!(!range.satisfies(&v("5.34.0")));
        assert!(!range.satisfies(&v("5.6")));
    }

    #[test]
    fn test_range_exact() {
        let range = VersionRange::parse("1.643").unwrap();
        assert!(range.satisfies(&v("1.643")));
        assert!(!range.satisfies(&v("1.642")));
        assert_eq!(range.to_string(), "1.643");
    }

    #[test]
    fn test_range_any() {
        for s in ["", ":", "*"] {
            let range = VersionRange::parse(s).unwrap();
            assert!(range.is_any());
            assert!(range.satisfies(&v("0.0.1")));
        }
    }

    #[test]
    fn test_range_rejects_inverted_bounds() {
        assert!(VersionRange::parse("5.30:5.8").is_err());
        assert!(VersionRange::parse("1:2:3").is_err());
    }
}
