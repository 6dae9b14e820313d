// src/recipe/registry.rs

//! Recipe registry
//!
//! Maps package names to recipes. Nothing is registered implicitly: callers
//! build a registry (usually with [`RecipeRegistry::load`]) and pass it to
//! whatever needs to look recipes up.
//!
//! Two layers feed a registry: builtin recipes and recipe directories laid out
//! as `<dir>/<package-name>/recipe.toml`. A directory recipe replaces a
//! builtin of the same name; a second recipe of the same name within one
//! layer is rejected.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::recipe::builtin::builtin_recipes;
use crate::recipe::format::RECIPE_FILE_NAME;
use crate::recipe::parser::parse_recipe_file;
use crate::recipe::traits::Recipe;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Where a registered recipe came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeOrigin {
    Builtin,
    File(PathBuf),
}

impl RecipeOrigin {
    fn is_builtin(&self) -> bool {
        matches!(self, Self::Builtin)
    }
}

impl fmt::Display for RecipeOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin => write!(f, "builtin"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    origin: RecipeOrigin,
    recipe: Arc<dyn Recipe>,
}

/// Package name → recipe
#[derive(Debug, Clone, Default)]
pub struct RecipeRegistry {
    recipes: BTreeMap<String, Entry>,
}

impl RecipeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every builtin recipe
    pub fn with_builtins() -> Result<Self> {
        let mut registry = Self::new();
        for recipe in builtin_recipes()? {
            registry.register(RecipeOrigin::Builtin, recipe)?;
        }
        Ok(registry)
    }

    /// Builtins plus every recipe directory named in the configuration
    pub fn load(config: &Config) -> Result<Self> {
        let mut registry = Self::with_builtins()?;
        for dir in &config.recipe_dirs {
            registry.scan_dir(dir)?;
        }
        info!("Loaded {} recipe(s)", registry.len());
        Ok(registry)
    }

    /// Register a recipe
    pub fn register(&mut self, origin: RecipeOrigin, recipe: Arc<dyn Recipe>) -> Result<()> {
        let name = recipe.name().to_string();

        if let Some(existing) = self.recipes.get(&name) {
            match (existing.origin.is_builtin(), origin.is_builtin()) {
                (true, false) => {
                    debug!("Recipe {} from {} shadows the builtin", name, origin);
                }
                (false, true) => {
                    debug!("Keeping {} from {} over the builtin", name, existing.origin);
                    return Ok(());
                }
                _ => {
                    return Err(Error::AlreadyExists(format!(
                        "Recipe {} is defined by both {} and {}",
                        name, existing.origin, origin
                    )));
                }
            }
        }

        self.recipes.insert(name, Entry { origin, recipe });
        Ok(())
    }

    /// Register every `<dir>/<name>/recipe.toml`
    ///
    /// Returns the number of recipe files found. Any unparsable recipe
    /// aborts the scan.
    pub fn scan_dir(&mut self, dir: &Path) -> Result<usize> {
        if !dir.is_dir() {
            return Err(Error::NotFound(format!(
                "Recipe directory {} does not exist",
                dir.display()
            )));
        }

        debug!("Scanning recipe directory {}", dir.display());

        let mut count = 0;
        for entry in WalkDir::new(dir)
            .min_depth(2)
            .max_depth(2)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                Error::IoError(format!("Failed to scan {}: {}", dir.display(), e))
            })?;

            if !entry.file_type().is_file() || entry.file_name() != RECIPE_FILE_NAME {
                continue;
            }

            let recipe = parse_recipe_file(entry.path())?;
            self.register(
                RecipeOrigin::File(entry.path().to_path_buf()),
                Arc::new(recipe),
            )?;
            count += 1;
        }

        debug!("Found {} recipe(s) in {}", count, dir.display());
        Ok(count)
    }

    /// Look up a recipe by package name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Recipe>> {
        self.recipes.get(name).map(|e| Arc::clone(&e.recipe))
    }

    /// Look up a recipe, failing with NotFound
    pub fn require(&self, name: &str) -> Result<Arc<dyn Recipe>> {
        self.get(name)
            .ok_or_else(|| Error::NotFound(format!("No recipe for package '{}'", name)))
    }

    /// Where a recipe was registered from
    pub fn origin(&self, name: &str) -> Option<&RecipeOrigin> {
        self.recipes.get(name).map(|e| &e.origin)
    }

    /// Registered package names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.recipes.keys().map(String::as_str).collect()
    }

    /// All recipes, sorted by name
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Recipe>> {
        self.recipes.values().map(|e| &e.recipe)
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::builtin::PerlDbi;
    use std::fs;
    use tempfile::TempDir;

    const RECIPE: &str = r#"
[package]
homepage = "https://example.com"
url = "https://example.com/hello-%(version)s.tar.gz"

[[version]]
version = "2.12"
sha256 = "cf04af86dc085268c5f4470fbae49b18afbc221b78096aab842d934a76bad0ab"
"#;

    fn write_recipe(root: &Path, name: &str, content: &str) -> PathBuf {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(RECIPE_FILE_NAME);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_with_builtins() {
        let registry = RecipeRegistry::with_builtins().unwrap();
        assert_eq!(registry.names(), vec!["perl-dbi"]);
        assert_eq!(registry.origin("perl-dbi"), Some(&RecipeOrigin::Builtin));
        assert!(registry.get("zlib").is_none());
        assert!(matches!(registry.require("zlib"), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_scan_dir() {
        let dir = TempDir::new().unwrap();
        write_recipe(dir.path(), "hello", RECIPE);
        fs::create_dir_all(dir.path().join("empty")).unwrap();
        fs::write(dir.path().join("README"), "not a recipe").unwrap();

        let mut registry = RecipeRegistry::new();
        assert_eq!(registry.scan_dir(dir.path()).unwrap(), 1);

        let hello = registry.get("hello").unwrap();
        assert_eq!(hello.versions().len(), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_scan_missing_dir() {
        let mut registry = RecipeRegistry::new();
        let err = registry.scan_dir(Path::new("/nonexistent/recipes")).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_file_shadows_builtin() {
        let dir = TempDir::new().unwrap();
        let content = RECIPE.replace("https://example.com\"", "https://metacpan.org/pod/DBI\"");
        let path = write_recipe(dir.path(), "perl-dbi", &content);

        let mut registry = RecipeRegistry::with_builtins().unwrap();
        registry.scan_dir(dir.path()).unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.origin("perl-dbi"), Some(&RecipeOrigin::File(path)));
        assert_eq!(
            registry.get("perl-dbi").unwrap().versions()[0].version.as_str(),
            "2.12"
        );

        // A builtin registered afterwards does not displace the file
        registry
            .register(RecipeOrigin::Builtin, Arc::new(PerlDbi::new().unwrap()))
            .unwrap();
        assert!(matches!(registry.origin("perl-dbi"), Some(RecipeOrigin::File(_))));
    }

    #[test]
    fn test_duplicate_in_same_layer() {
        let mut registry = RecipeRegistry::with_builtins().unwrap();
        let err = registry
            .register(RecipeOrigin::Builtin, Arc::new(PerlDbi::new().unwrap()))
            .unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(_)));

        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        write_recipe(first.path(), "hello", RECIPE);
        write_recipe(second.path(), "hello", RECIPE);

        let mut registry = RecipeRegistry::new();
        registry.scan_dir(first.path()).unwrap();
        let err = registry.scan_dir(second.path()).unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(_)));
    }

    #[test]
    fn test_bad_recipe_aborts_scan() {
        let dir = TempDir::new().unwrap();
        write_recipe(dir.path(), "broken", "[package]\nhomepage = 1\n");

        let mut registry = RecipeRegistry::new();
        assert!(registry.scan_dir(dir.path()).is_err());
    }

    #[test]
    fn test_load_from_config() {
        let dir = TempDir::new().unwrap();
        write_recipe(dir.path(), "hello", RECIPE);

        let config = Config {
            recipe_dirs: vec![dir.path().to_path_buf()],
            ..Config::default()
        };
        let registry = RecipeRegistry::load(&config).unwrap();
        assert_eq!(registry.names(), vec!["hello", "perl-dbi"]);
        assert_eq!(registry.iter().count(), 2);
    }
}
