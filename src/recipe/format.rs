// src/recipe/format.rs

//! Recipe file format definitions
//!
//! Recipe files are TOML documents stored as `<dir>/<package-name>/recipe.toml`.
//! The directory name is the package name; the file itself only carries the
//! package's data.

use crate::context::BuildContext;
use crate::error::Result;
use crate::recipe::kitchen::validate_configure_args;
use crate::recipe::traits::Recipe;
use crate::recipe::types::{BuildSystem, DependencyConstraint, Metadata, VersionRecord};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name every recipe directory contains
pub const RECIPE_FILE_NAME: &str = "recipe.toml";

/// Raw contents of a recipe file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecipeDocument {
    /// Package metadata
    pub package: PackageSection,

    /// Published versions (`[[version]]` tables)
    #[serde(default, rename = "version")]
    pub versions: Vec<VersionRecord>,

    /// Dependency constraints (`[[depends]]` tables)
    #[serde(default)]
    pub depends: Vec<DependencyConstraint>,

    /// Configure hook (optional)
    #[serde(default)]
    pub configure: ConfigureSection,
}

/// Package metadata section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageSection {
    /// Package name; must match the directory name when present
    #[serde(default)]
    pub name: Option<String>,

    /// Homepage URL
    pub homepage: String,

    /// Source archive URL
    ///
    /// Either a literal URL of one published version or a template
    /// containing `%(version)s`.
    pub url: String,

    /// Maintainer identifiers
    #[serde(default)]
    pub maintainers: Vec<String>,

    /// Short description
    #[serde(default)]
    pub description: Option<String>,

    /// Native build system
    #[serde(default)]
    pub build_system: BuildSystem,
}

/// Configure section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigureSection {
    /// Extra arguments passed to the native configure step
    #[serde(default)]
    pub args: Vec<String>,
}

/// A recipe loaded from a recipe file
#[derive(Debug, Clone)]
pub struct FileRecipe {
    name: String,
    metadata: Metadata,
    versions: Vec<VersionRecord>,
    dependencies: Vec<DependencyConstraint>,
    configure_args: Vec<String>,
    path: Option<PathBuf>,
}

impl FileRecipe {
    /// Assemble a recipe from a parsed document
    pub(crate) fn from_document(name: String, doc: RecipeDocument) -> Self {
        let RecipeDocument {
            package,
            versions,
            depends,
            configure,
        } = doc;

        Self {
            name,
            metadata: Metadata {
                homepage: package.homepage,
                url: package.url,
                maintainers: package.maintainers,
                description: package.description,
                build_system: package.build_system,
            },
            versions,
            dependencies: depends,
            configure_args: configure.args,
            path: None,
        }
    }

    /// Record where this recipe was loaded from
    pub(crate) fn with_path(mut self, path: &Path) -> Self {
        self.path = Some(path.to_path_buf());
        self
    }

    /// The recipe file this came from, if it was read from disk
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl Recipe for FileRecipe {
    fn name(&self) -> &str {
        &self.name
    }

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn versions(&self) -> &[VersionRecord] {
        &self.versions
    }

    fn dependencies(&self) -> &[DependencyConstraint] {
        &self.dependencies
    }

    fn configure_args(&self, _ctx: &BuildContext) -> Result<Vec<String>> {
        validate_configure_args(&self.configure_args)?;
        Ok(self.configure_args.clone())
    }
}
