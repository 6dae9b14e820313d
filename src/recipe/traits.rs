// src/recipe/traits.rs

//! The capability set every recipe provides

use crate::context::BuildContext;
use crate::error::Result;
use crate::recipe::types::{DependencyConstraint, DependencyPhase, Metadata, VersionRecord};
use crate::recipe::urls;
use crate::version::Version;
use std::fmt;

/// A buildable package description
///
/// The build framework only ever talks to recipes through this trait: a
/// recipe compiled into the binary and one loaded from a TOML file look the
/// same from the outside. Recipes are immutable once constructed.
pub trait Recipe: fmt::Debug + Send + Sync {
    /// Package name
    fn name(&self) -> &str;

    /// Homepage, source URL template and descriptive fields
    fn metadata(&self) -> &Metadata;

    /// Published versions, in authored order
    fn versions(&self) -> &[VersionRecord];

    /// Dependency constraints, in authored order
    fn dependencies(&self) -> &[DependencyConstraint];

    /// Extra arguments for the native configure step
    ///
    /// Must return the same arguments for the same context. Implementations
    /// that read the context and find it unusable return a configuration
    /// error instead of falling back to defaults.
    fn configure_args(&self, _ctx: &BuildContext) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    /// Look up a published version
    fn version(&self, version: &Version) -> Option<&VersionRecord> {
        self.versions().iter().find(|r| &r.version == version)
    }

    /// The version built when none is requested: the preferred one if marked,
    /// otherwise the highest
    fn default_version(&self) -> Option<&VersionRecord> {
        self.versions()
            .iter()
            .find(|r| r.preferred)
            .or_else(|| self.versions().iter().max_by(|a, b| a.version.cmp(&b.version)))
    }

    /// Source archive URL for a version
    fn url_for_version(&self, version: &Version) -> Result<String> {
        urls::expand(&self.metadata().url, version)
    }

    /// Constraints that apply to a phase
    fn dependencies_for(&self, phase: DependencyPhase) -> Vec<&DependencyConstraint> {
        self.dependencies()
            .iter()
            .filter(|d| d.applies_to(phase))
            .collect()
    }
}
