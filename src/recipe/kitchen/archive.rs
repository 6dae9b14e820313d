// src/recipe/kitchen/archive.rs

//! Source archive download and verification for the Kitchen

use crate::error::{Error, Result};
use crate::hash::{Checksum, verify_file};
use reqwest::blocking::Client;
use std::fs::File;
use std::io;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Build the HTTP client used for source downloads
pub fn http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("pantry/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| Error::DownloadError(format!("Failed to create HTTP client: {e}")))
}

/// Download a URL into `dest`
///
/// `file://` URLs are copied from the local filesystem. Nothing is retried.
pub fn download_file(client: &Client, url: &str, dest: &mut File) -> Result<u64> {
    if url.starts_with("file:") {
        let local = Url::parse(url)
            .ok()
            .and_then(|u| u.to_file_path().ok())
            .ok_or_else(|| Error::DownloadError(format!("Invalid file URL {}", url)))?;
        debug!("Copying local source {}", local.display());
        let mut src = File::open(&local).map_err(|e| {
            Error::DownloadError(format!("Failed to open {}: {}", local.display(), e))
        })?;
        return io::copy(&mut src, dest)
            .map_err(|e| Error::IoError(format!("Failed to copy {}: {}", local.display(), e)));
    }

    info!("Downloading {}", url);
    let mut response = client
        .get(url)
        .send()
        .map_err(|e| Error::DownloadError(format!("Failed to fetch {}: {}", url, e)))?;

    if !response.status().is_success() {
        return Err(Error::DownloadError(format!(
            "HTTP {} from {}",
            response.status(),
            url
        )));
    }

    let written = io::copy(&mut response, dest)
        .map_err(|e| Error::IoError(format!("Failed to write downloaded data: {e}")))?;

    debug!("Downloaded {} bytes from {}", written, url);
    Ok(written)
}

/// Verify an archive against its declared checksum
///
/// A mismatching file is left in place; the caller decides what to do with it.
pub fn verify_file_checksum(path: &Path, expected: &Checksum) -> Result<()> {
    verify_file(path, expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::hash_bytes;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_download_local_file() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src.tar.gz");
        let dest = dir.path().join("dest.tar.gz");
        fs::write(&src, b"archive bytes").unwrap();

        let client = http_client(Duration::from_secs(5)).unwrap();
        let url = format!("file://{}", src.display());
        let mut file = File::create(&dest).unwrap();
        assert_eq!(download_file(&client, &url, &mut file).unwrap(), 13);
        assert_eq!(fs::read(&dest).unwrap(), b"archive bytes");
    }

    #[test]
    fn test_download_local_file_with_escapes() {
        let dir = TempDir::new().unwrap();
        let src_dir = dir.path().join("my sources");
        fs::create_dir(&src_dir).unwrap();
        let src = src_dir.join("src.tar.gz");
        fs::write(&src, b"archive bytes").unwrap();

        let url = Url::from_file_path(&src).unwrap().to_string();
        assert!(url.contains("%20"));

        let client = http_client(Duration::from_secs(5)).unwrap();
        let dest = dir.path().join("dest.tar.gz");
        let mut file = File::create(&dest).unwrap();
        assert_eq!(download_file(&client, &url, &mut file).unwrap(), 13);
        assert_eq!(fs::read(&dest).unwrap(), b"archive bytes");
    }

    #[test]
    fn test_download_missing_local_file() {
        let dir = TempDir::new().unwrap();
        let client = http_client(Duration::from_secs(5)).unwrap();
        let mut file = File::create(dir.path().join("x")).unwrap();
        let result = download_file(&client, "file:///nonexistent/x.tar.gz", &mut file);
        assert!(matches!(result, Err(Error::DownloadError(_))));
    }

    #[test]
    fn test_verify_file_checksum() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.tar.gz");
        fs::write(&path, b"hello").unwrap();

        assert!(verify_file_checksum(&path, &hash_bytes(b"hello")).is_ok());
        let err = verify_file_checksum(&path, &hash_bytes(b"other")).unwrap_err();
        assert!(err.is_integrity());
    }
}
