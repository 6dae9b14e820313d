// src/recipe/urls.rs

//! Source URL expansion
//!
//! Recipes name their source archive in one of two ways:
//!
//! - a template with a `%(version)s` placeholder
//!   (`https://example.org/foo-%(version)s.tar.gz`)
//! - a literal URL of one published release
//!   (`https://cpan.metacpan.org/authors/id/T/TI/TIMB/DBI-1.643.tar.gz`)
//!
//! For literal URLs the version embedded in the archive file name is located
//! and swapped for the requested one.

use crate::error::{Error, Result};
use crate::version::Version;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Placeholder replaced by the version label
pub const VERSION_PLACEHOLDER: &str = "%(version)s";

/// `<stem><separator><version><archive extension>`
static ARCHIVE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<stem>.+?)(?P<sep>[-_]v?)(?P<version>\d[0-9A-Za-z._-]*?)(?P<ext>\.tar\.gz|\.tar\.bz2|\.tar\.xz|\.tar\.zst|\.tgz|\.tbz2|\.txz|\.zip|\.tar)$",
    )
    .expect("archive name pattern is valid")
});

/// Expand a source URL for a version
///
/// Only the path changes; query string and fragment are kept as written.
pub fn expand(template: &str, version: &Version) -> Result<String> {
    if template.contains(VERSION_PLACEHOLDER) {
        return Ok(template.replace(VERSION_PLACEHOLDER, version.as_str()));
    }

    let mut url = Url::parse(template)
        .map_err(|e| Error::ConfigError(format!("Invalid source URL '{}': {}", template, e)))?;

    let path = url.path().to_string();
    let (dir, filename) = split_filename(&path);
    let caps = ARCHIVE_NAME.captures(filename).ok_or_else(|| {
        Error::ConfigError(format!(
            "Cannot derive a URL for version {}: '{}' has no {} placeholder and no version in its file name",
            version, template, VERSION_PLACEHOLDER
        ))
    })?;
    let published = &caps["version"];

    let filename = format!(
        "{}{}{}{}",
        &caps["stem"],
        &caps["sep"],
        version.as_str(),
        &caps["ext"]
    );

    // Release directories named after the version move along with it
    let dir: Vec<String> = dir
        .split('/')
        .map(|segment| {
            if segment == published {
                version.as_str().to_string()
            } else if segment.strip_prefix('v') == Some(published) {
                format!("v{}", version.as_str())
            } else {
                segment.to_string()
            }
        })
        .collect();

    url.set_path(&format!("{}{}", dir.join("/"), filename));
    Ok(url.into())
}

/// Version embedded in a URL's archive file name, if any
pub fn extract_version(url: &str) -> Option<String> {
    let url = Url::parse(url).ok()?;
    let (_, filename) = split_filename(url.path());
    ARCHIVE_NAME
        .captures(filename)
        .map(|caps| caps["version"].to_string())
}

/// Split a path into (everything up to and including the last `/`, file name)
fn split_filename(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(idx) => (&path[..=idx], &path[idx + 1..]),
        None => ("", path),
    }
}
