// src/recipe/mod.rs

//! Recipe system for building packages from source
//!
//! A recipe describes one third-party package:
//! - Metadata (homepage, source URL, maintainers)
//! - Published versions and the SHA-256 of each source archive
//! - Dependency constraints on other packages, per build phase
//! - Extra arguments for the native configure step
//!
//! # Culinary Terminology
//!
//! - **Recipe**: The build specification (like a recipe card)
//! - **Pantry**: The registry of every known recipe
//! - **Kitchen**: Fetches ingredients and plans the configure step
//! - **Ingredients**: Source archives
//!
//! # Example Recipe
//!
//! Stored as `recipes/perl-dbi/recipe.toml`; the directory names the package.
//!
//! ```toml
//! [package]
//! homepage = "https://metacpan.org/pod/DBI"
//! url = "https://cpan.metacpan.org/authors/id/T/TI/TIMB/DBI-1.643.tar.gz"
//! maintainers = ["EbiArnie"]
//! build_system = "perl"
//!
//! [[version]]
//! version = "1.643"
//! sha256 = "8a2b993db560a2c373c174ee976a51027dd780ec766ae17620c20393d2e836fa"
//!
//! [[depends]]
//! name = "perl"
//! version = "5.8.1:"
//! type = ["build", "link", "run", "test"]
//! ```

pub mod builtin;
mod format;
pub mod kitchen;
pub mod parser;
pub mod registry;
mod traits;
mod types;
pub mod urls;

pub use builtin::{PerlDbi, builtin_recipes};
pub use format::{ConfigureSection, FileRecipe, PackageSection, RECIPE_FILE_NAME, RecipeDocument};
pub use kitchen::{Kitchen, KitchenConfig};
pub use parser::{parse_recipe, parse_recipe_file, validate_recipe};
pub use registry::{RecipeOrigin, RecipeRegistry};
pub use traits::Recipe;
pub use types::{
    BuildSystem, DependencyConstraint, DependencyPhase, Metadata, PhaseSet, VersionRecord,
    is_valid_package_name,
};
