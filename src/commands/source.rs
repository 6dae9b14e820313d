// src/commands/source.rs

//! Source archive commands: hashing, verification and fetching

use super::{find_recipe, load_registry, select_version};
use anyhow::{Context, Result, anyhow};
use pantry::hash::hash_file;
use pantry::lock::ChecksumLock;
use pantry::recipe::{Kitchen, KitchenConfig};
use pantry::version::Version;
use pantry::Config;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Print the SHA-256 of a file
pub fn cmd_checksum(file: &Path) -> Result<()> {
    let checksum =
        hash_file(file).with_context(|| format!("Failed to hash {}", file.display()))?;
    println!("{}  {}", checksum, file.display());
    Ok(())
}

/// Verify a local archive against a recipe's declared checksum
pub fn cmd_verify(config: &Config, name: &str, version: &str, archive: &Path) -> Result<()> {
    let registry = load_registry(config)?;
    let recipe = find_recipe(&registry, name)?;
    let version = Version::parse(version).with_context(|| format!("Invalid version '{}'", version))?;
    let record = recipe
        .version(&version)
        .ok_or_else(|| anyhow!("{} has no version {}", name, version))?;

    let kitchen = Kitchen::new(KitchenConfig::from_config(config))?;
    kitchen
        .verify_archive(archive, &record.sha256)
        .with_context(|| format!("{} does not match {} {}", archive.display(), name, version))?;

    println!("[OK] {} matches {} {}", archive.display(), name, version);
    Ok(())
}

/// Fetch a source archive into the cache
pub fn cmd_fetch(
    config: &Config,
    name: &str,
    version: Option<&str>,
    source_cache: Option<PathBuf>,
    force: bool,
) -> Result<()> {
    let registry = load_registry(config)?;
    let recipe = find_recipe(&registry, name)?;
    let version = select_version(recipe.as_ref(), version)?;

    // Refuse to download against a checksum that changed since it was locked
    if config.lock_file.exists() {
        let lock = ChecksumLock::load(&config.lock_file)?;
        lock.check(recipe.as_ref())
            .with_context(|| format!("Refusing to fetch {}", name))?;
    } else {
        debug!("No lock file at {}", config.lock_file.display());
    }

    let mut kitchen_config = KitchenConfig::from_config(config).with_force_download(force);
    if let Some(dir) = source_cache {
        kitchen_config = kitchen_config.with_source_cache(dir);
    }
    let kitchen = Kitchen::new(kitchen_config)?;

    if kitchen.sources_cached(recipe.as_ref(), &version) && !force {
        info!("{} {} is already cached", name, version);
    }

    let path = kitchen
        .fetch(recipe.as_ref(), &version)
        .with_context(|| format!("Failed to fetch sources for {} {}", name, version))?;

    println!("[COMPLETE] {} {}: {}", name, version, path.display());
    Ok(())
}
