// src/resolver/mod.rs

//! Dependency checking against an installed-package set
//!
//! This is a single-level check: each constraint a recipe declares is matched
//! against what is already installed. Dependencies of dependencies are not
//! followed and nothing is scheduled for installation.

use crate::error::{Error, Result};
use crate::recipe::{DependencyConstraint, DependencyPhase, Recipe, is_valid_package_name};
use crate::version::{Version, VersionRange};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Installed packages and their versions
#[derive(Debug, Clone, Default)]
pub struct InstalledPackages {
    packages: BTreeMap<String, Vec<Version>>,
}

impl InstalledPackages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a list of `name@version` specs
    pub fn from_specs<I, S>(specs: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut installed = Self::new();
        for spec in specs {
            installed.add_spec(spec.as_ref())?;
        }
        Ok(installed)
    }

    /// Add one `name@version` spec
    pub fn add_spec(&mut self, spec: &str) -> Result<()> {
        let (name, version) = spec.trim().split_once('@').ok_or_else(|| {
            Error::ParseError(format!(
                "Installed package '{}' must be written as name@version",
                spec
            ))
        })?;
        if !is_valid_package_name(name) {
            return Err(Error::ParseError(format!("Invalid package name: '{}'", name)));
        }
        self.insert(name, Version::parse(version)?);
        Ok(())
    }

    /// Record an installed version
    ///
    /// Several versions of one package may be installed side by side.
    pub fn insert(&mut self, name: &str, version: Version) {
        let versions = self.packages.entry(name.to_string()).or_default();
        if !versions.contains(&version) {
            versions.push(version);
            versions.sort();
        }
    }

    /// Installed versions of a package, lowest first
    pub fn versions(&self, name: &str) -> &[Version] {
        self.packages.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Highest installed version of a package inside a range
    pub fn best_match(&self, name: &str, range: &VersionRange) -> Option<&Version> {
        self.versions(name).iter().rev().find(|v| range.satisfies(v))
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

/// A constraint and the installed version chosen for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDependency {
    pub constraint: DependencyConstraint,
    pub version: Version,
}

impl fmt::Display for ResolvedDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}@{} ({})",
            self.constraint, self.constraint.name, self.version, self.constraint.phases
        )
    }
}

/// Check a recipe's dependency constraints against installed packages
///
/// With `phase` set only constraints applying to that phase are checked;
/// otherwise all of them are. Every unsatisfied constraint is reported in one
/// resolution error.
pub fn check_dependencies(
    recipe: &dyn Recipe,
    installed: &InstalledPackages,
    phase: Option<DependencyPhase>,
) -> Result<Vec<ResolvedDependency>> {
    let mut resolved = Vec::new();
    let mut unsatisfied = Vec::new();

    for constraint in recipe.dependencies() {
        if phase.is_some_and(|p| !constraint.applies_to(p)) {
            continue;
        }

        match installed.best_match(&constraint.name, &constraint.range) {
            Some(version) => {
                debug!("{}: {} satisfied by {}", recipe.name(), constraint, version);
                resolved.push(ResolvedDependency {
                    constraint: constraint.clone(),
                    version: version.clone(),
                });
            }
            None => {
                let found = installed.versions(&constraint.name);
                let detail = if found.is_empty() {
                    "not installed".to_string()
                } else {
                    let labels: Vec<&str> = found.iter().map(Version::as_str).collect();
                    format!("installed: {}", labels.join(", "))
                };
                unsatisfied.push(format!("{} ({})", constraint, detail));
            }
        }
    }

    if !unsatisfied.is_empty() {
        return Err(Error::ResolutionError(format!(
            "{} has unsatisfied dependencies: {}",
            recipe.name(),
            unsatisfied.join("; ")
        )));
    }

    Ok(resolved)
}
