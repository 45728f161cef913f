//! Content-addressed blob store for proof files.

use std::path::{Path, PathBuf};

use sha1::{Digest, Sha1};
use tokio::fs;

use crate::errors::{BoardError, BoardResult};

/// Default cap on a single proof upload
pub const DEFAULT_MAX_PROOF_BYTES: u64 = 10 * 1024 * 1024;

/// Proof types accepted by default
pub fn default_allowed_types() -> Vec<String> {
    vec![
        "image/jpeg".to_string(),
        "image/png".to_string(),
        "application/pdf".to_string(),
    ]
}

/// Local blob store addressed by content hash. Storing the same bytes twice
/// yields the same ID, so re-uploads are free.
pub struct BlobStore {
    root: PathBuf,
    max_bytes: u64,
    allowed_types: Vec<String>,
}

impl BlobStore {
    /// Create a store with the default size and type limits
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self::with_limits(root, DEFAULT_MAX_PROOF_BYTES, default_allowed_types())
    }

    /// Create a store with explicit limits
    pub fn with_limits(root: impl AsRef<Path>, max_bytes: u64, allowed_types: Vec<String>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            max_bytes,
            allowed_types,
        }
    }

    /// Create the blob directory
    pub async fn initialize(&self) -> BoardResult<()> {
        fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Validate a proof's content type and size against the configured limits
    pub fn check(&self, content_type: &str, size: u64) -> BoardResult<()> {
        // Drop parameters like "; charset=binary" before comparing
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        if !self.allowed_types.iter().any(|t| *t == essence) {
            return Err(BoardError::UnsupportedProofType {
                content_type: content_type.to_string(),
            });
        }
        if size > self.max_bytes {
            return Err(BoardError::ProofTooLarge {
                size,
                limit: self.max_bytes,
            });
        }
        Ok(())
    }

    /// Store bytes and return their content ID. Validates limits first.
    pub async fn store(&self, content_type: &str, bytes: &[u8]) -> BoardResult<String> {
        self.check(content_type, bytes.len() as u64)?;

        let blob_id = hex::encode(Sha1::digest(bytes));
        let path = self.root.join(&blob_id);
        if !path.exists() {
            fs::create_dir_all(&self.root).await?;
            fs::write(&path, bytes)
                .await
                .map_err(|e| BoardError::FileWriteError {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })?;
        }
        Ok(blob_id)
    }

    /// Load a blob by content ID
    pub async fn load(&self, blob_id: &str) -> BoardResult<Vec<u8>> {
        let path = self.blob_path(blob_id).ok_or_else(|| BoardError::BlobNotFound {
            blob_id: blob_id.to_string(),
        })?;

        match fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(BoardError::BlobNotFound {
                blob_id: blob_id.to_string(),
            }),
            Err(e) => Err(BoardError::FileReadError {
                path: path.display().to_string(),
                reason: e.to_string(),
            }),
        }
    }

    /// Check whether a blob is present
    pub async fn exists(&self, blob_id: &str) -> bool {
        self.blob_path(blob_id)
            .is_some_and(|p| p.exists())
    }

    /// Resolve the on-disk path for an ID. IDs must be bare hex; anything
    /// else cannot name a stored blob and must not touch the filesystem.
    fn blob_path(&self, blob_id: &str) -> Option<PathBuf> {
        if blob_id.is_empty() || !blob_id.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        Some(self.root.join(blob_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_store() -> (BlobStore, TempDir) {
        let temp = TempDir::new().unwrap();
        let store = BlobStore::new(temp.path());
        (store, temp)
    }

    #[tokio::test]
    async fn test_store_and_load_roundtrip() {
        let (store, _temp) = setup_store();
        let id = store.store("image/png", b"fake png bytes").await.unwrap();
        let bytes = store.load(&id).await.unwrap();
        assert_eq!(bytes, b"fake png bytes");
        assert!(store.exists(&id).await);
    }

    #[tokio::test]
    async fn test_same_content_same_id() {
        let (store, _temp) = setup_store();
        let a = store.store("image/jpeg", b"same bytes").await.unwrap();
        let b = store.store("image/jpeg", b"same bytes").await.unwrap();
        let c = store.store("image/jpeg", b"other bytes").await.unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[tokio::test]
    async fn test_content_type_whitelist() {
        let (store, _temp) = setup_store();
        assert!(store.store("application/pdf", b"%PDF-1.4").await.is_ok());
        assert!(store
            .store("image/png; charset=binary", b"png")
            .await
            .is_ok());

        let err = store.store("text/html", b"<html>").await.unwrap_err();
        assert!(matches!(err, BoardError::UnsupportedProofType { .. }));
    }

    #[tokio::test]
    async fn test_size_limit() {
        let temp = TempDir::new().unwrap();
        let store = BlobStore::with_limits(temp.path(), 4, default_allowed_types());

        assert!(store.store("image/png", b"1234").await.is_ok());
        let err = store.store("image/png", b"12345").await.unwrap_err();
        assert!(matches!(
            err,
            BoardError::ProofTooLarge { size: 5, limit: 4 }
        ));
    }

    #[tokio::test]
    async fn test_load_unknown_id() {
        let (store, _temp) = setup_store();
        let err = store.load("deadbeef").await.unwrap_err();
        assert!(matches!(err, BoardError::BlobNotFound { .. }));
    }

    #[tokio::test]
    async fn test_non_hex_ids_never_touch_disk() {
        let (store, _temp) = setup_store();
        let err = store.load("../users.json").await.unwrap_err();
        assert!(matches!(err, BoardError::BlobNotFound { .. }));
        assert!(!store.exists("..").await);
    }
}
