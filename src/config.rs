// src/config.rs
//! Configuration file parsing for pantry
//!
//! The configuration file is TOML:
//!
//! ```toml
//! recipe_dirs = ["/usr/share/pantry/recipes", "/home/me/src/my-recipes"]
//! source_cache = "/var/cache/pantry/sources"
//! lock_file = "/var/lib/pantry/pantry.lock"
//! http_timeout_secs = 30
//!
//! [build]
//! compiler = "gcc@13.2.0"
//! target = "x86_64-linux-gnu"
//! variants = ["+threads", "~debug"]
//! ```
//!
//! Every key is optional. A missing file means defaults.

use crate::context::BuildContext;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Environment variable naming an alternate configuration file
pub const CONFIG_ENV: &str = "PANTRY_CONFIG";

/// Configuration file name inside the user config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directories scanned for `<name>/recipe.toml`, in order
    #[serde(default)]
    pub recipe_dirs: Vec<PathBuf>,

    /// Where fetched source archives are kept
    #[serde(default = "default_source_cache")]
    pub source_cache: PathBuf,

    /// Published checksum lock
    #[serde(default = "default_lock_file")]
    pub lock_file: PathBuf,

    /// Timeout for source downloads
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Ambient build settings
    #[serde(default)]
    pub build: BuildSection,
}

/// `[build]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildSection {
    /// Compiler spec, e.g. `gcc@13.2.0`
    #[serde(default)]
    pub compiler: Option<String>,

    /// Target triple
    #[serde(default)]
    pub target: Option<String>,

    /// Variant settings (`+name`, `~name`)
    #[serde(default)]
    pub variants: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            recipe_dirs: Vec::new(),
            source_cache: default_source_cache(),
            lock_file: default_lock_file(),
            http_timeout_secs: default_http_timeout_secs(),
            build: BuildSection::default(),
        }
    }
}

fn default_source_cache() -> PathBuf {
    dirs::cache_dir()
        .map(|d| d.join("pantry").join("sources"))
        .unwrap_or_else(|| PathBuf::from("/var/cache/pantry/sources"))
}

fn default_lock_file() -> PathBuf {
    PathBuf::from("pantry.lock")
}

fn default_http_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Default configuration file location (`$XDG_CONFIG_HOME/pantry/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("pantry").join(CONFIG_FILE_NAME))
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        let config = Self::parse(&content).map_err(|e| match e {
            Error::ConfigError(msg) => {
                Error::ConfigError(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load from `path` if given, else from the default location if it exists
    ///
    /// An explicitly named file must exist; the default one is optional.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => {
                debug!("No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Parse configuration from a TOML string
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.http_timeout_secs == 0 {
            return Err(Error::ConfigError(
                "http_timeout_secs must be greater than zero".to_string(),
            ));
        }

        // Surfaces malformed compiler/target/variant values early
        self.build_context()?;
        Ok(())
    }

    /// HTTP timeout as a duration
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Build context described by the `[build]` section
    pub fn build_context(&self) -> Result<BuildContext> {
        BuildContext::from_parts(
            self.build.compiler.as_deref(),
            self.build.target.as_deref(),
            &self.build.variants,
        )
    }
}
