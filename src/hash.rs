// src/hash.rs

//! SHA-256 checksums for source archives
//!
//! Every published version of a recipe pins its source archive to a SHA-256
//! digest, written as 64 lowercase hexadecimal characters. This module owns
//! that representation: parsing and validating declared digests, computing
//! digests over bytes, readers and files, and comparing the two.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;

/// Length of a SHA-256 digest in bytes
pub const SHA256_LEN: usize = 32;

/// Length of a SHA-256 digest as a hex string
pub const SHA256_HEX_LEN: usize = SHA256_LEN * 2;

/// Buffer size for streaming file hashing (8 KB)
const STREAM_BUFFER_SIZE: usize = 8192;

/// Checksum parsing errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChecksumError {
    /// Digest string has the wrong length
    InvalidLength { expected: usize, got: usize },
    /// Digest string contains non-hex characters
    InvalidHex(String),
    /// Prefixed digest names an algorithm other than sha256
    UnsupportedAlgorithm(String),
}

impl fmt::Display for ChecksumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength { expected, got } => {
                write!(f, "invalid checksum length: expected {}, got {}", expected, got)
            }
            Self::InvalidHex(s) => write!(f, "invalid hex in checksum: {}", s),
            Self::UnsupportedAlgorithm(name) => {
                write!(f, "unsupported checksum algorithm: {} (supported: sha256)", name)
            }
        }
    }
}

impl std::error::Error for ChecksumError {}

impl From<ChecksumError> for Error {
    fn from(err: ChecksumError) -> Self {
        Error::ParseError(err.to_string())
    }
}

/// A validated SHA-256 digest
///
/// Always stored as 64 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Checksum(String);

impl Checksum {
    /// Parse a bare hex digest
    pub fn new(value: impl Into<String>) -> std::result::Result<Self, ChecksumError> {
        let value = value.into();

        if value.len() != SHA256_HEX_LEN {
            return Err(ChecksumError::InvalidLength {
                expected: SHA256_HEX_LEN,
                got: value.len(),
            });
        }

        if !value.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ChecksumError::InvalidHex(value));
        }

        Ok(Self(value.to_ascii_lowercase()))
    }

    /// Parse a digest that may carry an algorithm prefix (`sha256:abc...`)
    pub fn parse_prefixed(s: &str) -> std::result::Result<Self, ChecksumError> {
        match s.split_once(':') {
            Some((algo, hex)) => match algo.to_ascii_lowercase().as_str() {
                "sha256" | "sha-256" => Self::new(hex),
                _ => Err(ChecksumError::UnsupportedAlgorithm(algo.to_string())),
            },
            None => Self::new(s),
        }
    }

    /// The digest as lowercase hex
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Format with the algorithm prefix (`sha256:abc...`)
    pub fn to_prefixed_string(&self) -> String {
        format!("sha256:{}", self.0)
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Checksum {
    type Err = ChecksumError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse_prefixed(s)
    }
}

impl TryFrom<String> for Checksum {
    type Error = ChecksumError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Self::parse_prefixed(&value)
    }
}

impl From<Checksum> for String {
    fn from(checksum: Checksum) -> Self {
        checksum.0
    }
}

/// Incremental SHA-256 hasher
#[derive(Default)]
pub struct Hasher {
    state: Sha256,
}

impl Hasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the hasher with more data
    pub fn update(&mut self, data: &[u8]) {
        self.state.update(data);
    }

    /// Finalize and return the digest
    pub fn finalize(self) -> Checksum {
        Checksum(format!("{:x}", self.state.finalize()))
    }
}

/// Compute the SHA-256 digest of a byte slice
pub fn hash_bytes(data: &[u8]) -> Checksum {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Compute the SHA-256 digest of everything a reader yields
pub fn hash_reader<R: Read>(reader: &mut R) -> io::Result<Checksum> {
    let mut hasher = Hasher::new();
    let mut buffer = [0u8; STREAM_BUFFER_SIZE];

    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hasher.finalize())
}

/// Compute the SHA-256 digest of a file, streaming its content
pub fn hash_file(path: &Path) -> Result<Checksum> {
    let mut file = std::fs::File::open(path)
        .map_err(|e| Error::IoError(format!("Failed to open {}: {}", path.display(), e)))?;
    Ok(hash_reader(&mut file)?)
}

/// Verify that a file hashes to the expected digest
///
/// A mismatch is an integrity failure: the caller must not build from the file.
pub fn verify_file(path: &Path, expected: &Checksum) -> Result<()> {
    let actual = hash_file(path)?;
    if &actual == expected {
        Ok(())
    } else {
        Err(Error::ChecksumMismatch {
            path: path.display().to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HELLO_WORLD: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

    #[test]
    fn test_sha256_hash() {
        let hash = hash_bytes(b"Hello, World!");
        assert_eq!(
            hash.as_str(),
            "dffd6021bb2bd5b0af676290809ec3a53191dd81c7f70a4b28688a362182986f"
        );
        assert_eq!(hash.as_str().len(), SHA256_HEX_LEN);
    }

    #[test]
    fn test_hasher_incremental() {
        let mut hasher = Hasher::new();
        hasher.update(b"hello ");
        hasher.update(b"world");
        assert_eq!(hasher.finalize().as_str(), HELLO_WORLD);
    }

    #[test]
    fn test_checksum_validation() {
        assert!(Checksum::new(HELLO_WORLD).is_ok());

        let err = Checksum::new("abc123").unwrap_err();
        assert_eq!(
            err,
            ChecksumError::InvalidLength {
                expected: 64,
                got: 6
            }
        );

        let bad_hex = format!("gggg{}", &HELLO_WORLD[4..]);
        assert!(matches!(Checksum::new(bad_hex), Err(ChecksumError::InvalidHex(_))));
    }

    #[test]
    fn test_checksum_normalizes_case() {
        let upper = Checksum::new(HELLO_WORLD.to_uppercase()).unwrap();
        assert_eq!(upper.as_str(), HELLO_WORLD);
    }

    #[test]
    fn test_prefixed_checksum() {
        let prefixed = format!("sha256:{}", HELLO_WORLD);
        let checksum: Checksum = prefixed.parse().unwrap();
        assert_eq!(checksum.as_str(), HELLO_WORLD);
        assert_eq!(checksum.to_prefixed_string(), prefixed);

        let md5 = "md5:5eb63bbbe01eeed093cb22bb8f5acdc3";
        assert!(matches!(
            md5.parse::<Checksum>(),
            Err(ChecksumError::UnsupportedAlgorithm(_))
        ));
    }

    #[test]
    fn test_hash_reader() {
        let mut cursor = std::io::Cursor::new(b"hello world");
        assert_eq!(hash_reader(&mut cursor).unwrap().as_str(), HELLO_WORLD);
    }

    #[test]
    fn test_verify_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"hello world").unwrap();

        let expected = Checksum::new(HELLO_WORLD).unwrap();
        assert!(verify_file(file.path(), &expected).is_ok());

        let wrong = Checksum::new("0".repeat(64)).unwrap();
        let err = verify_file(file.path(), &wrong).unwrap_err();
        assert!(err.is_integrity());
        match err {
            Error::ChecksumMismatch { actual, .. } => assert_eq!(actual, HELLO_WORLD),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_verify_missing_file() {
        let expected = Checksum::new(HELLO_WORLD).unwrap();
        let err = verify_file(Path::new("/nonexistent/archive.tar.gz"), &expected).unwrap_err();
        assert!(!err.is_integrity());
    }
}
