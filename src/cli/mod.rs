// src/cli/mod.rs
//! CLI definitions for pantry
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.
//!
//! Recipe inspection:
//! - `list` / `info` - Known recipes and their details
//! - `url` - Source archive URL for a version
//! - `validate` - Check recipe files
//!
//! Sources:
//! - `fetch` - Download and verify a source archive
//! - `checksum` / `verify` - Hash and verify local archives
//! - `lock` - Record or check published checksums
//!
//! Building:
//! - `configure` - Show the configure invocation
//! - `deps` - Check dependencies against installed packages

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;
use pantry::recipe::DependencyPhase;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pantry")]
#[command(author = "Pantry Contributors")]
#[command(version)]
#[command(about = "Package build recipes with pinned source checksums", long_about = None)]
pub struct Cli {
    /// Configuration file (default: ~/.config/pantry/config.toml)
    #[arg(long, global = true, env = "PANTRY_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Additional recipe directory, scanned after the configured ones
    #[arg(long = "recipes", global = true, value_name = "DIR")]
    pub recipes: Vec<PathBuf>,

    /// More log output (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List known recipes
    List,

    /// Show a recipe's metadata, versions and dependencies
    Info {
        /// Package name
        name: String,
    },

    /// Print the source archive URL for a version
    Url {
        /// Package name
        name: String,

        /// Version (default: the recipe's default version)
        version: Option<String>,
    },

    /// Print the SHA-256 of a file
    Checksum {
        /// File to hash
        file: PathBuf,
    },

    /// Verify a local archive against a recipe's declared checksum
    Verify {
        /// Package name
        name: String,

        /// Version the archive claims to be
        version: String,

        /// Archive to verify
        archive: PathBuf,
    },

    /// Download and verify a source archive into the source cache
    Fetch {
        /// Package name
        name: String,

        /// Version (default: the recipe's default version)
        version: Option<String>,

        /// Source cache directory (overrides the configuration)
        #[arg(long, value_name = "DIR")]
        source_cache: Option<PathBuf>,

        /// Download even if a verified copy is cached
        #[arg(long)]
        force: bool,
    },

    /// Show the configure invocation for a recipe
    Configure {
        /// Package name
        name: String,

        /// Installation prefix
        #[arg(long, default_value = "/usr/local")]
        prefix: PathBuf,

        /// Compiler (name or name@version), overrides the configuration
        #[arg(long)]
        compiler: Option<String>,

        /// Target triple, overrides the configuration
        #[arg(long)]
        target: Option<String>,

        /// Variant setting (+name, ~name); repeatable, added to the configured ones
        #[arg(long = "variant", value_name = "VARIANT", allow_hyphen_values = true)]
        variants: Vec<String>,
    },

    /// Check a recipe's dependencies against installed packages
    Deps {
        /// Package name
        name: String,

        /// Installed packages as name@version
        #[arg(long, value_name = "NAME@VERSION", num_args = 1..)]
        installed: Vec<String>,

        /// Only check dependencies of this phase (build, link, run, test)
        #[arg(long)]
        phase: Option<DependencyPhase>,
    },

    /// Validate recipe files
    Validate {
        /// Recipe directory (default: every configured recipe)
        dir: Option<PathBuf>,
    },

    /// Record published checksums in the lock file
    Lock {
        /// Only check for changed checksums, do not write
        #[arg(long)]
        check: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
