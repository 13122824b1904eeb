// Image sources and content keys.
//
// The gate identifies an image by a ContentKey that the caller supplies. The
// key must be deterministic over the image bytes: two byte-identical uploads
// always get the same key. `ContentKey::from_bytes` (SHA-256, hex) is offered
// as a convenience for callers like the CLI, but the gate itself never hashes.

use std::fmt;
use std::path::PathBuf;

use sha2::{Digest, Sha256};

/// Opaque, deterministic identity for a piece of image content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentKey(String);

impl ContentKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// SHA-256 of the raw bytes, lowercase hex.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(hex::encode(Sha256::digest(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContentKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// Where the classifier reads image bytes from.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// A file on local disk, read lazily at classification time.
    Path(PathBuf),
    /// Bytes already in memory (e.g. a request body).
    Bytes(Vec<u8>),
}

impl ImageSource {
    /// Load the full image into memory.
    ///
    /// Cache hits never call this, so an unreadable path only fails when the
    /// classifier actually needs the bytes.
    pub async fn read(&self) -> std::io::Result<Vec<u8>> {
        match self {
            ImageSource::Path(path) => tokio::fs::read(path).await,
            ImageSource::Bytes(bytes) => Ok(bytes.clone()),
        }
    }

    /// Short description for log lines.
    pub fn describe(&self) -> String {
        match self {
            ImageSource::Path(path) => path.display().to_string(),
            ImageSource::Bytes(bytes) => format!("<{} bytes>", bytes.len()),
        }
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        ImageSource::Path(path)
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        ImageSource::Bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_bytes_share_a_key() {
        let a = ContentKey::from_bytes(b"\x89PNG fake image");
        let b = ContentKey::from_bytes(b"\x89PNG fake image");
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 64);
    }

    #[test]
    fn test_different_bytes_differ() {
        let a = ContentKey::from_bytes(b"one");
        let b = ContentKey::from_bytes(b"two");
        assert_ne!(a, b);
    }

    #[test]
    fn test_known_digest() {
        // sha256("abc")
        assert_eq!(
            ContentKey::from_bytes(b"abc").as_str(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[tokio::test]
    async fn test_bytes_source_reads_back() {
        let source = ImageSource::from(vec![1u8, 2, 3]);
        assert_eq!(source.read().await.unwrap(), vec![1, 2, 3]);
        assert_eq!(source.describe(), "<3 bytes>");
    }

    #[tokio::test]
    async fn test_missing_path_is_an_io_error() {
        let source = ImageSource::Path(PathBuf::from("/definitely/not/here.png"));
        assert!(source.read().await.is_err());
    }
}
