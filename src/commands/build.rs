// src/commands/build.rs

//! Build preparation commands: configure planning and dependency checks

use super::{find_recipe, load_registry};
use anyhow::{Context, Result};
use pantry::context::BuildContext;
use pantry::recipe::{DependencyPhase, Kitchen, KitchenConfig};
use pantry::resolver::{InstalledPackages, check_dependencies};
use pantry::Config;
use std::path::Path;

/// Command-line overrides of the configured build context
pub struct ContextOverrides<'a> {
    pub compiler: Option<&'a str>,
    pub target: Option<&'a str>,
    pub variants: &'a [String],
}

/// Print the configure invocation for a recipe
pub fn cmd_configure(
    config: &Config,
    name: &str,
    prefix: &Path,
    overrides: ContextOverrides<'_>,
) -> Result<()> {
    let registry = load_registry(config)?;
    let recipe = find_recipe(&registry, name)?;

    let ctx = build_context(config, &overrides)?;
    let kitchen = Kitchen::new(KitchenConfig::from_config(config))?;
    let command = kitchen
        .configure_command(recipe.as_ref(), &ctx, prefix)
        .with_context(|| format!("Cannot configure {}", name))?;

    if !ctx.to_string().is_empty() {
        println!("# {}", ctx);
    }
    if command.is_empty() {
        println!("# {} has no configure step", name);
    } else {
        println!("{}", command.join(" "));
    }
    Ok(())
}

/// Check a recipe's dependencies against installed packages
pub fn cmd_deps(
    config: &Config,
    name: &str,
    installed: &[String],
    phase: Option<DependencyPhase>,
) -> Result<()> {
    let registry = load_registry(config)?;
    let recipe = find_recipe(&registry, name)?;
    let installed =
        InstalledPackages::from_specs(installed).context("Invalid --installed value")?;

    let resolved = check_dependencies(recipe.as_ref(), &installed, phase)?;

    if resolved.is_empty() {
        println!("[OK] {} has no dependencies to check", name);
        return Ok(());
    }
    for dep in &resolved {
        println!("  {}", dep);
    }
    println!("[OK] All {} dependencies satisfied", resolved.len());
    Ok(())
}

/// Configured build context with command-line values applied on top
fn build_context(config: &Config, overrides: &ContextOverrides<'_>) -> Result<BuildContext> {
    let compiler = overrides.compiler.or(config.build.compiler.as_deref());
    let target = overrides.target.or(config.build.target.as_deref());
    let mut variants = config.build.variants.clone();
    variants.extend(overrides.variants.iter().cloned());

    BuildContext::from_parts(compiler, target, &variants).context("Invalid build context")
}
