// src/commands/recipe.rs

//! Recipe inspection commands

use super::{find_recipe, load_registry, select_version};
use anyhow::{Context, Result, bail};
use pantry::recipe::{
    RECIPE_FILE_NAME, Recipe, RecipeOrigin, RecipeRegistry, parse_recipe_file, validate_recipe,
};
use pantry::Config;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// List known recipes
pub fn cmd_list(config: &Config) -> Result<()> {
    let registry = load_registry(config)?;

    if registry.is_empty() {
        println!("No recipes found");
        return Ok(());
    }

    for recipe in registry.iter() {
        let default = recipe
            .default_version()
            .map(|r| r.version.to_string())
            .unwrap_or_else(|| "-".to_string());
        let description = recipe.metadata().description.as_deref().unwrap_or("");
        println!("{:<24} {:<12} {}", recipe.name(), default, description);
    }

    Ok(())
}

/// Show one recipe in detail
pub fn cmd_info(config: &Config, name: &str) -> Result<()> {
    let registry = load_registry(config)?;
    let recipe = find_recipe(&registry, name)?;
    let metadata = recipe.metadata();

    println!("Package: {}", recipe.name());
    if let Some(origin) = registry.origin(name) {
        println!("Source: {}", origin);
    }
    if let Some(description) = &metadata.description {
        println!("Description: {}", description);
    }
    println!("Homepage: {}", metadata.homepage);
    println!("URL: {}", metadata.url);
    println!("Build system: {}", metadata.build_system);
    if !metadata.maintainers.is_empty() {
        println!("Maintainers: {}", metadata.maintainers.join(", "));
    }

    let default = recipe.default_version().map(|r| r.version.clone());
    println!("\nVersions:");
    if recipe.versions().is_empty() {
        println!("  (none)");
    }
    for record in recipe.versions() {
        let marker = if Some(&record.version) == default.as_ref() {
            " [default]"
        } else {
            ""
        };
        println!("  {:<12} sha256:{}{}", record.version, record.sha256, marker);
    }

    println!("\nDependencies:");
    if recipe.dependencies().is_empty() {
        println!("  (none)");
    }
    for dep in recipe.dependencies() {
        println!("  {:<24} [{}]", dep.to_string(), dep.phases);
    }

    Ok(())
}

/// Print the source URL of a version
pub fn cmd_url(config: &Config, name: &str, version: Option<&str>) -> Result<()> {
    let registry = load_registry(config)?;
    let recipe = find_recipe(&registry, name)?;
    let version = select_version(recipe.as_ref(), version)?;

    if recipe.version(&version).is_none() {
        info!("{} {} is not a declared version", name, version);
    }

    let url = recipe
        .url_for_version(&version)
        .with_context(|| format!("Cannot derive a URL for {} {}", name, version))?;
    println!("{}", url);
    Ok(())
}

/// Validate recipes
///
/// With a directory, every `<dir>/<name>/recipe.toml` is checked on its own
/// so one broken file does not hide problems in the others.
pub fn cmd_validate(config: &Config, dir: Option<&Path>) -> Result<()> {
    let mut failures = 0;
    let mut checked = 0;

    match dir {
        Some(dir) => {
            for path in recipe_files(dir)? {
                checked += 1;
                let result = parse_recipe_file(&path)
                    .and_then(|recipe| validate_recipe(&recipe).map(|w| (recipe, w)));
                match result {
                    Ok((recipe, warnings)) => report(&recipe, &warnings),
                    Err(e) => {
                        failures += 1;
                        println!("[FAIL] {}: {}", path.display(), e);
                    }
                }
            }
        }
        None => {
            let registry = load_registry(config)?;
            failures += validate_registry(&registry, &mut checked);
        }
    }

    if failures > 0 {
        bail!("{} of {} recipe(s) failed validation", failures, checked);
    }
    println!("\n[COMPLETE] {} recipe(s) validated", checked);
    Ok(())
}

fn validate_registry(registry: &RecipeRegistry, checked: &mut usize) -> usize {
    let mut failures = 0;
    for recipe in registry.iter() {
        *checked += 1;
        match validate_recipe(recipe.as_ref()) {
            Ok(warnings) => report(recipe.as_ref(), &warnings),
            Err(e) => {
                failures += 1;
                let origin = registry
                    .origin(recipe.name())
                    .map(RecipeOrigin::to_string)
                    .unwrap_or_default();
                println!("[FAIL] {} ({}): {}", recipe.name(), origin, e);
            }
        }
    }
    failures
}

fn report(recipe: &dyn Recipe, warnings: &[String]) {
    if warnings.is_empty() {
        println!("[OK] {}", recipe.name());
    } else {
        println!("[OK] {} ({} warning(s))", recipe.name(), warnings.len());
        for warning in warnings {
            println!("  Warning: {}", warning);
        }
    }
}

/// `<dir>/<name>/recipe.toml` files, sorted by package name
fn recipe_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read recipe directory {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path().join(RECIPE_FILE_NAME);
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
