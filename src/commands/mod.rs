// src/commands/mod.rs
//! Command handlers for the pantry CLI

mod build;
mod lock;
mod recipe;
mod source;

pub use build::{ContextOverrides, cmd_configure, cmd_deps};
pub use lock::cmd_lock;
pub use recipe::{cmd_info, cmd_list, cmd_url, cmd_validate};
pub use source::{cmd_checksum, cmd_fetch, cmd_verify};

use anyhow::{Context, Result, anyhow};
use pantry::recipe::{Recipe, RecipeRegistry};
use pantry::version::Version;
use pantry::Config;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Load the configuration and append `--recipes` directories
pub fn load_config(path: Option<&Path>, extra_recipe_dirs: Vec<PathBuf>) -> Result<Config> {
    let mut config = Config::load_or_default(path).context("Failed to load configuration")?;
    config.recipe_dirs.extend(extra_recipe_dirs);
    Ok(config)
}

/// Builtin recipes plus every configured recipe directory
fn load_registry(config: &Config) -> Result<RecipeRegistry> {
    RecipeRegistry::load(config).context("Failed to load recipes")
}

/// Look up a recipe by name
fn find_recipe(registry: &RecipeRegistry, name: &str) -> Result<Arc<dyn Recipe>> {
    registry.require(name).map_err(|e| {
        let known = registry.names().join(", ");
        anyhow!("{} (known recipes: {})", e, known)
    })
}

/// The requested version, or the recipe's default
fn select_version(recipe: &dyn Recipe, requested: Option<&str>) -> Result<Version> {
    match requested {
        Some(label) => {
            Version::parse(label).with_context(|| format!("Invalid version '{}'", label))
        }
        None => recipe
            .default_version()
            .map(|r| r.version.clone())
            .ok_or_else(|| anyhow!("{} declares no versions", recipe.name())),
    }
}
