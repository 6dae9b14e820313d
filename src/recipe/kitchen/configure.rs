// src/recipe/kitchen/configure.rs

//! Configure invocation planning

use crate::error::{Error, Result};
use crate::recipe::types::BuildSystem;
use std::collections::HashMap;
use std::path::Path;

/// Reject configure arguments that could not be passed through as written
///
/// Every argument must be non-empty and single-line, and no feature may be
/// both switched on and off (`--with-ssl` with `--without-ssl`,
/// `--enable-docs` with `--disable-docs`).
pub fn validate_configure_args(args: &[String]) -> Result<()> {
    // feature -> (enabled, the argument that set it)
    let mut switches: HashMap<String, (bool, &str)> = HashMap::new();

    for arg in args {
        if arg.trim().is_empty() {
            return Err(Error::ConfigError("Empty configure argument".to_string()));
        }
        if arg.contains(['\0', '\n', '\r']) {
            return Err(Error::ConfigError(format!(
                "Configure argument {:?} contains a control character",
                arg
            )));
        }

        let Some((feature, enabled)) = feature_switch(arg) else {
            continue;
        };
        if let Some(&(previous, earlier)) = switches.get(&feature) {
            if previous != enabled {
                return Err(Error::ConfigError(format!(
                    "Contradictory configure arguments: {} and {}",
                    earlier, arg
                )));
            }
        }
        switches.insert(feature, (enabled, arg.as_str()));
    }

    Ok(())
}

/// `--with-x`, `--without-x`, `--enable-x`, `--disable-x` → (`kind:x`, on)
fn feature_switch(arg: &str) -> Option<(String, bool)> {
    let flag = arg.split_once('=').map_or(arg, |(flag, _)| flag);
    let (kind, name, enabled) = if let Some(name) = flag.strip_prefix("--without-") {
        ("with", name, false)
    } else if let Some(name) = flag.strip_prefix("--with-") {
        ("with", name, true)
    } else if let Some(name) = flag.strip_prefix("--disable-") {
        ("enable", name, false)
    } else if let Some(name) = flag.strip_prefix("--enable-") {
        ("enable", name, true)
    } else {
        return None;
    };
    Some((format!("{}:{}", kind, name), enabled))
}

/// The build system's own configure command, before any recipe arguments
pub fn base_command(build_system: BuildSystem, prefix: &Path) -> Vec<String> {
    let prefix = prefix.display();
    match build_system {
        BuildSystem::Perl => vec![
            "perl".to_string(),
            "Makefile.PL".to_string(),
            format!("INSTALL_BASE={}", prefix),
        ],
        BuildSystem::Autotools => vec!["./configure".to_string(), format!("--prefix={}", prefix)],
        BuildSystem::CMake => vec![
            "cmake".to_string(),
            format!("-DCMAKE_INSTALL_PREFIX={}", prefix),
        ],
        BuildSystem::Generic => Vec::new(),
    }
}
