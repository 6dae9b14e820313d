// src/recipe/parser.rs

//! Recipe file parsing and validation

use crate::context::BuildContext;
use crate::error::{Error, Result};
use crate::recipe::format::{FileRecipe, RecipeDocument};
use crate::recipe::kitchen::validate_configure_args;
use crate::recipe::traits::Recipe;
use crate::recipe::types::{VersionRecord, is_valid_package_name};
use crate::recipe::urls::{self, VERSION_PLACEHOLDER};
use crate::version::Version;
use std::collections::HashSet;
use std::path::Path;
use url::Url;

/// Parse a recipe from a TOML string
///
/// `name` is the package name, normally the recipe's directory name.
pub fn parse_recipe(name: &str, content: &str) -> Result<FileRecipe> {
    if !is_valid_package_name(name) {
        return Err(Error::ParseError(format!("Invalid package name: '{}'", name)));
    }

    let doc: RecipeDocument = toml::from_str(content)
        .map_err(|e| Error::ParseError(format!("Invalid recipe for {}: {}", name, e)))?;

    if let Some(declared) = &doc.package.name {
        if declared != name {
            return Err(Error::ParseError(format!(
                "Recipe declares name '{}' but lives in directory '{}'",
                declared, name
            )));
        }
    }

    check_version_records(name, &doc.versions)?;

    Ok(FileRecipe::from_document(name.to_string(), doc))
}

/// Each label maps to exactly one digest, and at most one is preferred
///
/// Labels are compared as versions: `1.2` and `1.02` are the same label.
fn check_version_records(name: &str, versions: &[VersionRecord]) -> Result<()> {
    let mut seen = HashSet::new();
    for record in versions {
        if !seen.insert(&record.version) {
            return Err(Error::ParseError(format!(
                "{}: version {} is declared more than once",
                name, record.version
            )));
        }
    }

    let preferred = versions.iter().filter(|r| r.preferred).count();
    if preferred > 1 {
        return Err(Error::ParseError(format!(
            "{}: {} versions are marked preferred",
            name, preferred
        )));
    }
    Ok(())
}

/// Parse a recipe from `<dir>/<name>/recipe.toml`
pub fn parse_recipe_file(path: &Path) -> Result<FileRecipe> {
    let name = path
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            Error::ParseError(format!(
                "Cannot derive a package name from {}",
                path.display()
            ))
        })?;

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::IoError(format!("Failed to read recipe file {}: {}", path.display(), e)))?;

    Ok(parse_recipe(name, &content)?.with_path(path))
}

/// Validate a recipe for completeness and correctness
///
/// Hard problems are errors; soft ones come back as warnings.
pub fn validate_recipe(recipe: &dyn Recipe) -> Result<Vec<String>> {
    let mut warnings = Vec::new();
    let name = recipe.name();
    let metadata = recipe.metadata();

    if !is_valid_package_name(name) {
        return Err(Error::ParseError(format!("Invalid package name: '{}'", name)));
    }

    Url::parse(&metadata.homepage).map_err(|e| {
        Error::ParseError(format!("{}: invalid homepage '{}': {}", name, metadata.homepage, e))
    })?;

    let probe = metadata.url.replace(VERSION_PLACEHOLDER, "0");
    let source = Url::parse(&probe).map_err(|e| {
        Error::ParseError(format!("{}: invalid source url '{}': {}", name, metadata.url, e))
    })?;
    if !matches!(source.scheme(), "http" | "https" | "ftp" | "file") {
        return Err(Error::ParseError(format!(
            "{}: unsupported source url scheme '{}'",
            name,
            source.scheme()
        )));
    }

    check_version_records(name, recipe.versions())?;

    for record in recipe.versions() {
        recipe.url_for_version(&record.version)?;
    }

    if !metadata.url.contains(VERSION_PLACEHOLDER) {
        if let Some(published) = urls::extract_version(&metadata.url) {
            let listed = Version::parse(&published)
                .is_ok_and(|p| recipe.versions().iter().any(|r| r.version == p));
            if !listed {
                warnings.push(format!(
                    "Source url points at version {} which is not declared",
                    published
                ));
            }
        }
    }

    for dep in recipe.dependencies() {
        if !is_valid_package_name(&dep.name) {
            return Err(Error::ParseError(format!(
                "{}: invalid dependency name '{}'",
                name, dep.name
            )));
        }
        if dep.phases.is_empty() {
            return Err(Error::ParseError(format!(
                "{}: dependency {} has no phases",
                name, dep
            )));
        }
        if dep.name == name {
            return Err(Error::ParseError(format!("{}: depends on itself", name)));
        }
    }

    validate_configure_args(&recipe.configure_args(&BuildContext::new())?)?;

    if recipe.versions().is_empty() {
        warnings.push("No versions declared".to_string());
    }
    if metadata.maintainers.is_empty() {
        warnings.push("No maintainers listed".to_string());
    }
    if metadata.description.is_none() {
        warnings.push("Missing package description".to_string());
    }

    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const DIGEST: &str = "8a2b993db560a2c373c174ee976a51027dd780ec766ae17620c20393d2e836fa";

    fn recipe_text(extra: &str) -> String {
        format!(
            r#"
[package]
homepage = "https://example.com"
url = "https://example.com/test-1.0.tar.gz"
maintainers = ["alice"]
description = "Test package"

[[version]]
version = "1.0"
sha256 = "{DIGEST}"
{extra}
"#
        )
    }

    #[test]
    fn test_parse_valid_recipe() {
        let recipe = parse_recipe("test", &recipe_text("")).unwrap();
        assert_eq!(recipe.name(), "test");
        assert!(validate_recipe(&recipe).unwrap().is_empty());
    }

    #[test]
    fn test_parse_invalid_recipe() {
        assert!(parse_recipe("test", "this is not valid toml at all {}").is_err());
    }

    #[test]
    fn test_parse_rejects_bad_name() {
        assert!(parse_recipe("Test_Pkg", &recipe_text("")).is_err());
    }

    #[test]
    fn test_declared_name_must_match_directory() {
        let content = recipe_text("").replace("[package]", "[package]\nname = \"other\"");
        assert!(parse_recipe("test", &content).is_err());

        let content = recipe_text("").replace("[package]", "[package]\nname = \"test\"");
        assert!(parse_recipe("test", &content).is_ok());
    }

    #[test]
    fn test_parse_recipe_file_uses_directory_name() {
        let dir = TempDir::new().unwrap();
        let recipe_dir = dir.path().join("test");
        fs::create_dir(&recipe_dir).unwrap();
        let path = recipe_dir.join("recipe.toml");
        fs::write(&path, recipe_text("")).unwrap();

        let recipe = parse_recipe_file(&path).unwrap();
        assert_eq!(recipe.name(), "test");
        assert_eq!(recipe.path(), Some(path.as_path()));
    }

    #[test]
    fn test_parse_rejects_duplicate_version() {
        let extra = format!("\n[[version]]\nversion = \"1.0\"\nsha256 = \"{}\"\n", "0".repeat(64));
        let err = parse_recipe("test", &recipe_text(&extra)).unwrap_err();
        assert!(matches!(err, Error::ParseError(_)));

        // Same version, different spelling
        let extra = format!("\n[[version]]\nversion = \"1.00\"\nsha256 = \"{}\"\n", "0".repeat(64));
        assert!(parse_recipe("test", &recipe_text(&extra)).is_err());
    }

    #[test]
    fn test_parse_rejects_two_preferred_versions() {
        let extra = format!(
            "preferred = true\n\n[[version]]\nversion = \"2.0\"\nsha256 = \"{}\"\npreferred = true\n",
            "0".repeat(64)
        );
        assert!(parse_recipe("test", &recipe_text(&extra)).is_err());
    }

    #[test]
    fn test_validate_bad_homepage() {
        let content = recipe_text("").replace("https://example.com\"", "not a url\"");
        let recipe = parse_recipe("test", &content).unwrap();
        assert!(validate_recipe(&recipe).is_err());
    }

    #[test]
    fn test_validate_self_dependency() {
        let recipe = parse_recipe("test", &recipe_text("\n[[depends]]\nname = \"test\"\n")).unwrap();
        assert!(validate_recipe(&recipe).is_err());
    }

    #[test]
    fn test_validate_contradictory_configure_args() {
        let extra = "\n[configure]\nargs = [\"--with-ssl\", \"--without-ssl\"]\n";
        let recipe = parse_recipe("test", &recipe_text(extra)).unwrap();
        let err = validate_recipe(&recipe).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn test_validate_warnings() {
        let content = r#"
[package]
homepage = "https://example.com"
url = "https://example.com/test-2.0.tar.gz"
"#;
        let recipe = parse_recipe("test", content).unwrap();
        let warnings = validate_recipe(&recipe).unwrap();
        assert!(warnings.iter().any(|w| w.contains("No versions")));
        assert!(warnings.iter().any(|w| w.contains("maintainers")));
        assert!(warnings.iter().any(|w| w.contains("description")));
        assert!(warnings.iter().any(|w| w.contains("2.0")));
    }
}
