// src/recipe/kitchen/mod.rs

//! Kitchen: where recipes are prepared for building
//!
//! The Kitchen is the framework side of a recipe. It handles:
//! - Fetching source archives into a checksum-keyed cache
//! - Verifying archives against the recipe's declared SHA-256
//! - Planning the native configure invocation
//!
//! Running the configure and build steps themselves is left to the caller.

mod archive;
mod config;
mod configure;

pub use config::KitchenConfig;
pub use configure::{base_command, validate_configure_args};

use crate::context::BuildContext;
use crate::error::{Error, Result};
use crate::hash::Checksum;
use crate::recipe::traits::Recipe;
use crate::version::Version;
use archive::{download_file, http_client, verify_file_checksum};
use reqwest::blocking::Client;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// The Kitchen: fetches and verifies ingredients, plans the configure step
pub struct Kitchen {
    pub(crate) config: KitchenConfig,
    client: Client,
}

impl Kitchen {
    /// Create a new Kitchen with the given configuration
    pub fn new(config: KitchenConfig) -> Result<Self> {
        let client = http_client(config.timeout)?;
        Ok(Self { config, client })
    }

    /// Fetch the source archive of one version of a recipe
    ///
    /// Returns the path of the verified archive in the source cache. A
    /// download that does not match the declared checksum is deleted and
    /// reported as an integrity error.
    pub fn fetch(&self, recipe: &dyn Recipe, version: &Version) -> Result<PathBuf> {
        let record = recipe.version(version).ok_or_else(|| {
            Error::NotFound(format!("{} has no version {}", recipe.name(), version))
        })?;

        info!("Fetching sources for {} version {}", recipe.name(), version);

        let url = recipe.url_for_version(&record.version)?;
        self.fetch_source(&url, &record.sha256)
    }

    /// Check if the source archive for a version is already cached
    ///
    /// Only checks presence; [`Kitchen::fetch`] re-verifies cached files.
    pub fn sources_cached(&self, recipe: &dyn Recipe, version: &Version) -> bool {
        recipe
            .version(version)
            .is_some_and(|record| self.cached_path(&record.sha256).exists())
    }

    /// Verify an archive against a declared checksum
    pub fn verify_archive(&self, path: &Path, expected: &Checksum) -> Result<()> {
        verify_file_checksum(path, expected)
    }

    /// The configure invocation for a recipe
    ///
    /// The build system's own command comes first, followed by the recipe's
    /// extra arguments. Malformed arguments fail here, before anything runs.
    pub fn configure_command(
        &self,
        recipe: &dyn Recipe,
        ctx: &BuildContext,
        prefix: &Path,
    ) -> Result<Vec<String>> {
        let extra = recipe.configure_args(ctx)?;
        validate_configure_args(&extra)?;

        let mut command = base_command(recipe.metadata().build_system, prefix);
        command.extend(extra);

        debug!("Configure command for {}: {:?}", recipe.name(), command);
        Ok(command)
    }

    /// Where an archive with this checksum is cached
    pub fn cached_path(&self, checksum: &Checksum) -> PathBuf {
        self.config
            .source_cache
            .join(checksum.to_prefixed_string().replace(':', "_"))
    }

    /// Fetch a source archive (with caching)
    pub(crate) fn fetch_source(&self, url: &str, checksum: &Checksum) -> Result<PathBuf> {
        fs::create_dir_all(&self.config.source_cache).map_err(|e| {
            Error::IoError(format!(
                "Failed to create source cache {}: {}",
                self.config.source_cache.display(),
                e
            ))
        })?;

        let cached_path = self.cached_path(checksum);

        if cached_path.exists() && !self.config.force_download {
            debug!("Using cached source: {}", cached_path.display());
            match verify_file_checksum(&cached_path, checksum) {
                Ok(()) => return Ok(cached_path),
                Err(e) if e.is_integrity() => {
                    warn!("Cached file checksum mismatch, re-downloading");
                    fs::remove_file(&cached_path)?;
                }
                Err(e) => return Err(e),
            }
        }

        // Partial or unverified downloads are removed when `partial` drops
        let mut partial = NamedTempFile::new_in(&self.config.source_cache)?;
        download_file(&self.client, url, partial.as_file_mut())?;
        verify_file_checksum(partial.path(), checksum)?;

        partial.persist(&cached_path).map_err(|e| {
            Error::IoError(format!(
                "Failed to move download to {}: {}",
                cached_path.display(),
                e.error
            ))
        })?;
        info!("Cached {} as {}", url, cached_path.display());
        Ok(cached_path)
    }
}
