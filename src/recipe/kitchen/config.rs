// src/recipe/kitchen/config.rs

//! Configuration types for the Kitchen

use crate::config::Config;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the Kitchen
#[derive(Debug, Clone)]
pub struct KitchenConfig {
    /// Directory for caching downloaded sources
    pub source_cache: PathBuf,
    /// Timeout for a single source download
    pub timeout: Duration,
    /// Skip the cache and always download
    pub force_download: bool,
}

impl Default for KitchenConfig {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl KitchenConfig {
    /// Kitchen settings taken from pantry's configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            source_cache: config.source_cache.clone(),
            timeout: config.http_timeout(),
            force_download: false,
        }
    }

    /// Create a config with a custom source cache
    pub fn with_source_cache(mut self, dir: impl Into<PathBuf>) -> Self {
        self.source_cache = dir.into();
        self
    }

    /// Always download, even when a verified copy is cached
    pub fn with_force_download(mut self, force: bool) -> Self {
        self.force_download = force;
        self
    }
}
