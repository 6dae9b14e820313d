// src/lock.rs

//! Checksum lock
//!
//! Published checksums never change: once `perl-dbi 1.643` is known to hash
//! to `8a2b99…`, a recipe claiming anything else for that version is either a
//! mistake or a tampered upstream archive. The lock (`pantry.lock`) remembers
//! every checksum pantry has seen so such changes are caught.
//!
//! # Format
//!
//! ```toml
//! [metadata]
//! version = 1
//! generated = "2024-01-15T10:30:00+00:00"
//! generator = "pantry 0.1.0"
//!
//! [checksums.perl-dbi]
//! "1.643" = "8a2b993db560a2c373c174ee976a51027dd780ec766ae17620c20393d2e836fa"
//! ```

use crate::error::{Error, Result};
use crate::hash::Checksum;
use crate::recipe::Recipe;
use crate::version::Version;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Current lock format version
pub const LOCK_VERSION: u32 = 1;

/// Default lock file name
pub const LOCK_FILE_NAME: &str = "pantry.lock";

/// Lock metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockMetadata {
    /// Lock format version
    pub version: u32,

    /// When the lock was last written (RFC 3339)
    pub generated: String,

    /// Tool that wrote the lock
    pub generator: String,
}

impl Default for LockMetadata {
    fn default() -> Self {
        Self {
            version: LOCK_VERSION,
            generated: Utc::now().to_rfc3339(),
            generator: format!("pantry {}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Package → version label → published checksum
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChecksumLock {
    pub metadata: LockMetadata,

    #[serde(default)]
    checksums: BTreeMap<String, BTreeMap<String, Checksum>>,
}

impl ChecksumLock {
    /// Create an empty lock
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a lock from a path
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::IoError(format!("Failed to read lock file {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    /// Load a lock, starting empty if the file does not exist yet
    pub fn load_or_new(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            debug!("No lock file at {}, starting empty", path.display());
            Ok(Self::new())
        }
    }

    /// Parse a lock from TOML
    pub fn parse(content: &str) -> Result<Self> {
        let lock: ChecksumLock = toml::from_str(content)
            .map_err(|e| Error::ParseError(format!("Failed to parse lock file: {}", e)))?;

        if lock.metadata.version > LOCK_VERSION {
            return Err(Error::ParseError(format!(
                "Lock file version mismatch: expected {}, found {}",
                LOCK_VERSION, lock.metadata.version
            )));
        }

        Ok(lock)
    }

    /// Write the lock to a path
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_toml()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content).map_err(|e| {
            Error::IoError(format!("Failed to write lock file {}: {}", path.display(), e))
        })?;
        debug!("Wrote lock file {}", path.display());
        Ok(())
    }

    /// Serialize to a TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::ParseError(format!("Failed to serialize lock file: {}", e)))
    }

    /// Recorded checksum for a package version
    ///
    /// Labels are compared as versions, so `1.2` finds an entry recorded
    /// as `1.02`.
    pub fn get(&self, package: &str, version: &str) -> Option<&Checksum> {
        let version = Version::parse(version).ok()?;
        find_recorded(self.checksums.get(package)?, &version).map(|(_, sha)| sha)
    }

    /// Compare a recipe's checksums with the recorded ones
    ///
    /// Versions not recorded yet are fine. A recorded version whose checksum
    /// changed is an integrity error naming every such version.
    pub fn check(&self, recipe: &dyn Recipe) -> Result<()> {
        let Some(recorded) = self.checksums.get(recipe.name()) else {
            return Ok(());
        };

        let changed: Vec<String> = recipe
            .versions()
            .iter()
            .filter_map(|record| {
                let (label, locked) = find_recorded(recorded, &record.version)?;
                (locked != &record.sha256).then(|| {
                    format!(
                        "{} {} (locked as {}): locked {}, recipe says {}",
                        recipe.name(),
                        record.version,
                        label,
                        locked,
                        record.sha256
                    )
                })
            })
            .collect();

        if changed.is_empty() {
            Ok(())
        } else {
            Err(Error::IntegrityError(format!(
                "Published checksum changed: {}",
                changed.join("; ")
            )))
        }
    }

    /// Record a recipe's checksums
    ///
    /// Only adds versions that are not recorded yet; fails without touching
    /// the lock if any recorded checksum changed. Returns how many versions
    /// were added.
    pub fn record(&mut self, recipe: &dyn Recipe) -> Result<usize> {
        self.check(recipe)?;

        let entry = self.checksums.entry(recipe.name().to_string()).or_default();
        let mut added = 0;
        for record in recipe.versions() {
            if find_recorded(entry, &record.version).is_none() {
                entry.insert(record.version.as_str().to_string(), record.sha256.clone());
                added += 1;
            }
        }

        if added > 0 {
            info!("Recorded {} new checksum(s) for {}", added, recipe.name());
            self.metadata.generated = Utc::now().to_rfc3339();
        }
        Ok(added)
    }

    /// Number of recorded package versions
    pub fn len(&self) -> usize {
        self.checksums.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The recorded (label, checksum) whose label equals `version`
fn find_recorded<'a>(
    recorded: &'a BTreeMap<String, Checksum>,
    version: &Version,
) -> Option<(&'a str, &'a Checksum)> {
    if let Some((label, sha)) = recorded.get_key_value(version.as_str()) {
        return Some((label.as_str(), sha));
    }
    recorded
        .iter()
        .find(|(label, _)| Version::parse(label).is_ok_and(|v| &v == version))
        .map(|(label, sha)| (label.as_str(), sha))
}
