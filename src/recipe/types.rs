// src/recipe/types.rs

//! Data types exposed by recipes

use crate::error::{Error, Result};
use crate::hash::Checksum;
use crate::version::{Version, VersionRange};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Native build system a recipe's source uses
///
/// Decides which configure invocation the kitchen plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildSystem {
    /// `perl Makefile.PL`
    Perl,
    /// `./configure`
    Autotools,
    /// `cmake`
    #[serde(rename = "cmake")]
    CMake,
    /// No configure step of its own; only the recipe's arguments
    #[default]
    Generic,
}

impl BuildSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Perl => "perl",
            Self::Autotools => "autotools",
            Self::CMake => "cmake",
            Self::Generic => "generic",
        }
    }
}

impl fmt::Display for BuildSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptive metadata of a recipe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    /// Project homepage
    pub homepage: String,
    /// Source archive URL, either a literal URL for one published version
    /// or a template containing `%(version)s`
    pub url: String,
    /// Maintainer identifiers, in authored order
    pub maintainers: Vec<String>,
    /// One-line description
    pub description: Option<String>,
    pub build_system: BuildSystem,
}

/// One published version and the digest of its source archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VersionRecord {
    pub version: Version,
    pub sha256: Checksum,
    /// Use this version by default even if newer ones exist
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub preferred: bool,
}

impl VersionRecord {
    /// Build a record from a label and a hex digest
    pub fn new(version: &str, sha256: &str) -> Result<Self> {
        Ok(Self {
            version: Version::parse(version)?,
            sha256: Checksum::new(sha256)?,
            preferred: false,
        })
    }
}

/// Build phase a dependency applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyPhase {
    /// Needed to run the build (tools, interpreters)
    Build,
    /// Linked into the result
    Link,
    /// Needed when the installed package runs
    Run,
    /// Needed only to run the package's tests
    Test,
}

impl DependencyPhase {
    pub const ALL: [DependencyPhase; 4] = [Self::Build, Self::Link, Self::Run, Self::Test];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Build => "build",
            Self::Link => "link",
            Self::Run => "run",
            Self::Test => "test",
        }
    }

    const fn bit(self) -> u8 {
        match self {
            Self::Build => 1 << 0,
            Self::Link => 1 << 1,
            Self::Run => 1 << 2,
            Self::Test => 1 << 3,
        }
    }
}

impl fmt::Display for DependencyPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DependencyPhase {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "build" => Ok(Self::Build),
            "link" => Ok(Self::Link),
            "run" => Ok(Self::Run),
            "test" => Ok(Self::Test),
            other => Err(Error::ParseError(format!(
                "Unknown dependency phase '{}' (expected build, link, run or test)",
                other
            ))),
        }
    }
}

/// Non-empty set of dependency phases
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<DependencyPhase>", into = "Vec<DependencyPhase>")]
pub struct PhaseSet(u8);

impl PhaseSet {
    /// Build a phase set, rejecting an empty one
    pub fn new(phases: impl IntoIterator<Item = DependencyPhase>) -> Result<Self> {
        let bits = phases.into_iter().fold(0u8, |acc, p| acc | p.bit());
        if bits == 0 {
            return Err(Error::ParseError(
                "Dependency phase set cannot be empty".to_string(),
            ));
        }
        Ok(Self(bits))
    }

    /// Every phase
    pub const fn all() -> Self {
        Self(0b1111)
    }

    /// Check membership
    pub fn contains(&self, phase: DependencyPhase) -> bool {
        self.0 & phase.bit() != 0
    }

    /// Phases in build, link, run, test order
    pub fn iter(&self) -> impl Iterator<Item = DependencyPhase> + '_ {
        DependencyPhase::ALL.into_iter().filter(|p| self.contains(*p))
    }

    /// Number of phases in the set
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Whether no phase is set
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// Build and link, the phases assumed when a recipe names none
impl Default for PhaseSet {
    fn default() -> Self {
        Self(DependencyPhase::Build.bit() | DependencyPhase::Link.bit())
    }
}

impl fmt::Debug for PhaseSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for PhaseSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(|p| p.as_str()).collect();
        write!(f, "{}", names.join(", "))
    }
}

impl TryFrom<Vec<DependencyPhase>> for PhaseSet {
    type Error = Error;

    fn try_from(phases: Vec<DependencyPhase>) -> Result<Self> {
        Self::new(phases)
    }
}

impl From<PhaseSet> for Vec<DependencyPhase> {
    fn from(set: PhaseSet) -> Self {
        set.iter().collect()
    }
}

/// A requirement on another package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DependencyConstraint {
    /// Target package name
    pub name: String,
    /// Acceptable versions
    #[serde(rename = "version", default)]
    pub range: VersionRange,
    /// Phases the dependency is needed in
    #[serde(rename = "type", default)]
    pub phases: PhaseSet,
}

impl DependencyConstraint {
    /// Build a constraint, validating the package name
    pub fn new(name: &str, range: VersionRange, phases: PhaseSet) -> Result<Self> {
        if !is_valid_package_name(name) {
            return Err(Error::ParseError(format!(
                "Invalid dependency name: '{}'",
                name
            )));
        }
        Ok(Self {
            name: name.to_string(),
            range,
            phases,
        })
    }

    /// Parse `name` or `name@range`, e.g. `perl@5.8.1:`
    pub fn parse(spec: &str, phases: PhaseSet) -> Result<Self> {
        let spec = spec.trim();
        let (name, range) = match spec.split_once('@') {
            Some((name, range)) => (name.trim(), VersionRange::parse(range)?),
            None => (spec, VersionRange::any()),
        };
        Self::new(name, range, phases)
    }

    /// Check whether this constraint applies to a phase
    pub fn applies_to(&self, phase: DependencyPhase) -> bool {
        self.phases.contains(phase)
    }

    /// Check whether a version satisfies this constraint
    pub fn satisfied_by(&self, version: &Version) -> bool {
        self.range.satisfies(version)
    }
}

impl fmt::Display for DependencyConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.range.is_any() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}@{}", self.name, self.range)
        }
    }
}

/// Check a package name: lowercase letters, digits and `-`, starting with
/// a letter or digit
pub fn is_valid_package_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !name.starts_with('-')
        && !name.ends_with('-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_set_rejects_empty() {
        assert!(PhaseSet::new([]).is_err());
        assert!(PhaseSet::try_from(Vec::<DependencyPhase>::new()).is_err());
    }

    #[test]
    fn test_phase_set_membership() {
        let set = PhaseSet::new([DependencyPhase::Run, DependencyPhase::Build]).unwrap();
        assert!(set.contains(DependencyPhase::Build));
        assert!(set.contains(DependencyPhase::Run));
        assert!(!set.contains(DependencyPhase::Link));
        assert_eq!(set.len(), 2);
        assert_eq!(set.to_string(), "build, run");

        assert_eq!(PhaseSet::all().len(), 4);
        assert_eq!(PhaseSet::default().to_string(), "build, link");
    }

    #[test]
    fn test_dependency_phase_parse() {
        assert_eq!("Run".parse::<DependencyPhase>().unwrap(), DependencyPhase::Run);
        assert!("install".parse::<DependencyPhase>().is_err());
    }

    #[test]
    fn test_constraint_parse() {
        let dep = DependencyConstraint::parse("perl@5.8.1:", PhaseSet::all()).unwrap();
        assert_eq!(dep.name, "perl");
        assert_eq!(dep.to_string(), "perl@5.8.1:");
        assert!(dep.applies_to(DependencyPhase::Test));
        assert!(dep.satisfied_by(&Version::parse("5.36.0").unwrap()));
        assert!(!dep.satisfied_by(&Version::parse("5.6.1").unwrap()));

        let any = DependencyConstraint::parse("zlib", PhaseSet::default()).unwrap();
        assert!(any.range.is_any());
        assert_eq!(any.to_string(), "zlib");
    }

    #[test]
    fn test_constraint_rejects_bad_names() {
        assert!(DependencyConstraint::parse("@1.0", PhaseSet::all()).is_err());
        assert!(DependencyConstraint::parse("Perl", PhaseSet::all()).is_err());
        assert!(DependencyConstraint::parse("perl dbi", PhaseSet::all()).is_err());
    }

    #[test]
    fn test_constraint_deserialize_defaults() {
        let dep: DependencyConstraint = toml::from_str("name = \"zlib\"").unwrap();
        assert!(dep.range.is_any());
        assert_eq!(dep.phases, PhaseSet::default());

        let err = toml::from_str::<DependencyConstraint>("name = \"zlib\"\ntype = []");
        assert!(err.is_err());
    }

    #[test]
    fn test_version_record_new() {
        let record = VersionRecord::new(
            "1.643",
            "8a2b993db560a2c373c174ee976a51027dd780ec766ae17620c20393d2e836fa",
        )
        .unwrap();
        assert_eq!(record.version.as_str(), "1.643");
        assert!(!record.preferred);

        assert!(VersionRecord::new("1.643", "not-a-digest").is_err());
    }

    #[test]
    fn test_package_names() {
        assert!(is_valid_package_name("perl-dbi"));
        assert!(is_valid_package_name("py3"));
        assert!(!is_valid_package_name(""));
        assert!(!is_valid_package_name("-perl"));
        assert!(!is_valid_package_name("perl_dbi"));
    }
}
