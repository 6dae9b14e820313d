// src/lib.rs

//! Pantry: package build recipes
//!
//! A recipe describes how to obtain and configure one third-party package:
//! where its source lives, which published versions exist and the SHA-256 of
//! each source archive, what it depends on in which build phase, and which
//! extra arguments its configure step needs.
//!
//! # Architecture
//!
//! - Recipes are trait objects: builtin recipes and TOML recipe files look
//!   the same to everything that consumes them
//! - An explicit registry maps package names to recipes; nothing is global
//! - Published checksums are immutable: a lock file catches changes
//! - The kitchen fetches and verifies sources and plans the configure step

pub mod config;
pub mod context;
mod error;
pub mod hash;
pub mod lock;
pub mod recipe;
pub mod resolver;
pub mod version;

pub use config::Config;
pub use context::{BuildContext, CompilerSpec};
pub use error::{Error, Result};
pub use hash::{Checksum, Hasher};
pub use lock::ChecksumLock;
pub use recipe::{
    DependencyConstraint, DependencyPhase, Kitchen, KitchenConfig, PhaseSet, Recipe,
    RecipeRegistry, VersionRecord,
};
pub use resolver::{InstalledPackages, ResolvedDependency, check_dependencies};
pub use version::{Version, VersionRange};
