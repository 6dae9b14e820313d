// src/context.rs

//! Ambient build configuration
//!
//! A [`BuildContext`] is what the build framework knows about the build it is
//! about to run: which compiler, which target, which optional variants are
//! switched on. Recipes may consult it when computing configure arguments.
//!
//! Variant syntax: `+name` enables, `~name` disables, a bare `name` enables.

use crate::error::{Error, Result};
use crate::version::Version;
use std::collections::BTreeMap;
use std::fmt;

/// Compiler selection, `name` or `name@version`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerSpec {
    pub name: String,
    pub version: Option<Version>,
}

impl CompilerSpec {
    /// Parse a compiler spec such as `gcc` or `gcc@13.2.0`
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let (name, version) = match s.split_once('@') {
            Some((name, version)) => {
                let version = Version::parse(version).map_err(|e| {
                    Error::ConfigError(format!("Invalid compiler version in '{}': {}", s, e))
                })?;
                (name.trim(), Some(version))
            }
            None => (s, None),
        };

        if !is_valid_identifier(name) {
            return Err(Error::ConfigError(format!("Invalid compiler name: '{}'", s)));
        }

        Ok(Self {
            name: name.to_string(),
            version,
        })
    }
}

impl fmt::Display for CompilerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{}@{}", self.name, v),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Build configuration supplied by the framework
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildContext {
    /// Compiler the build will use, if the framework pinned one
    pub compiler: Option<CompilerSpec>,
    /// Target triple, if cross-compiling or pinned
    pub target: Option<String>,
    /// Variant name → enabled
    variants: BTreeMap<String, bool>,
}

impl BuildContext {
    /// An empty context: no compiler, no target, no variants
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from raw configuration strings
    ///
    /// Fails with a configuration error rather than guessing when any value
    /// is malformed.
    pub fn from_parts(
        compiler: Option<&str>,
        target: Option<&str>,
        variants: &[String],
    ) -> Result<Self> {
        let mut ctx = Self::new();

        if let Some(compiler) = compiler {
            ctx.compiler = Some(CompilerSpec::parse(compiler)?);
        }

        if let Some(target) = target {
            let target = target.trim();
            if target.is_empty() || target.chars().any(char::is_whitespace) {
                return Err(Error::ConfigError(format!("Invalid target triple: '{}'", target)));
            }
            ctx.target = Some(target.to_string());
        }

        for item in variants {
            ctx.apply_variant(item)?;
        }

        Ok(ctx)
    }

    /// Apply one variant item (`+ssl`, `~debug`, `threads`)
    pub fn apply_variant(&mut self, item: &str) -> Result<()> {
        let item = item.trim();
        let (enabled, name) = if let Some(rest) = item.strip_prefix('+') {
            (true, rest.trim())
        } else if let Some(rest) = item.strip_prefix('~') {
            (false, rest.trim())
        } else {
            (true, item)
        };

        if !is_valid_identifier(name) {
            return Err(Error::ConfigError(format!("Invalid variant: '{}'", item)));
        }

        if let Some(&previous) = self.variants.get(name) {
            if previous != enabled {
                return Err(Error::ConfigError(format!(
                    "Variant '{}' is both enabled and disabled",
                    name
                )));
            }
        }

        self.variants.insert(name.to_string(), enabled);
        Ok(())
    }

    /// Explicit setting for a variant, if any
    pub fn variant(&self, name: &str) -> Option<bool> {
        self.variants.get(name).copied()
    }

    /// True only if the variant was explicitly enabled
    pub fn is_enabled(&self, name: &str) -> bool {
        self.variant(name) == Some(true)
    }

    /// All variant settings in name order
    pub fn variants(&self) -> impl Iterator<Item = (&str, bool)> {
        self.variants.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl fmt::Display for BuildContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(compiler) = &self.compiler {
            parts.push(format!("%{}", compiler));
        }
        for (name, enabled) in self.variants() {
            parts.push(format!("{}{}", if enabled { '+' } else { '~' }, name));
        }
        if let Some(target) = &self.target {
            parts.push(format!("target={}", target));
        }
        write!(f, "{}", parts.join(" "))
    }
}

fn is_valid_identifier(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '+')
        && s.chars().next().is_some_and(|c| c.is_ascii_alphanumeric())
}
