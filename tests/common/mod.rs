// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use pantry::recipe::RECIPE_FILE_NAME;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// The recipe directory shipped with the crate
pub fn bundled_recipes_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("recipes")
}

/// Write `<root>/<name>/recipe.toml` and return its path
pub fn write_recipe(root: &Path, name: &str, content: &str) -> PathBuf {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(RECIPE_FILE_NAME);
    fs::write(&path, content).unwrap();
    path
}

/// A scratch recipe directory holding one recipe whose source URL points at
/// `base_url`.
///
/// Returns (TempDir, recipe dir) - keep the TempDir alive to prevent cleanup.
pub fn setup_recipe_dir(name: &str, base_url: &str, version: &str, sha256: &str) -> (TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().unwrap();
    let recipes = temp_dir.path().join("recipes");

    let content = format!(
        r#"
[package]
homepage = "https://example.com/{name}"
url = "{base_url}/{name}-%(version)s.tar.gz"
maintainers = ["tester"]
description = "Test package"
build_system = "autotools"

[[version]]
version = "{version}"
sha256 = "{sha256}"

[[depends]]
name = "zlib"
version = "1.2:"
type = ["link"]
"#
    );
    write_recipe(&recipes, name, &content);

    (temp_dir, recipes)
}
