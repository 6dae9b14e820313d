// src/error.rs

//! Error types for pantry

use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by recipes and the helpers that consume them
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Download error: {0}")]
    DownloadError(String),

    /// Fetched archive does not hash to the declared digest
    #[error("Checksum mismatch for {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        path: String,
        expected: String,
        actual: String,
    },

    /// Declared data contradicts previously published data
    #[error("Integrity error: {0}")]
    IntegrityError(String),

    /// A dependency constraint cannot be satisfied
    #[error("Resolution error: {0}")]
    ResolutionError(String),

    /// Build configuration or configure arguments are malformed
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl Error {
    /// True for checksum mismatches and changed published checksums
    pub fn is_integrity(&self) -> bool {
        matches!(self, Error::ChecksumMismatch { .. } | Error::IntegrityError(_))
    }
}
