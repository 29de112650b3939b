//! Blob storage
//!
//! Files are addressed by a relative key such as `Image/Receipt/a.png`.
//! The public URL of a key is `<base_url>/<key>`.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("Invalid blob key: {0}")]
    InvalidKey(String),

    #[error("Blob storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<BlobError> for shared::error::AppError {
    fn from(err: BlobError) -> Self {
        match err {
            BlobError::InvalidKey(key) => shared::error::AppError::with_message(
                shared::error::ErrorCode::InvalidRequest,
                format!("Invalid file name: {key}"),
            ),
            BlobError::Io(e) => shared::error::AppError::with_message(
                shared::error::ErrorCode::FileStorageFailed,
                format!("Failed to store file: {e}"),
            ),
        }
    }
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `data` under `key`, replacing any previous content.
    /// Returns the public URL.
    async fn put(&self, key: &str, data: &[u8]) -> Result<String, BlobError>;

    /// Remove `key`. Missing blobs are not an error.
    async fn delete(&self, key: &str) -> Result<(), BlobError>;

    /// Public URL of `key`
    fn url_for(&self, key: &str) -> String;

    /// Inverse of [`url_for`](Self::url_for) for URLs this store produced
    fn key_for(&self, url: &str) -> Option<String>;
}

/// Blob store over a local directory, served elsewhere under `base_url`
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
    base_url: String,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a key below the root, refusing anything that could escape it
    fn resolve(&self, key: &str) -> Result<PathBuf, BlobError> {
        let relative = Path::new(key);
        let only_normal = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if key.is_empty() || key.contains('\\') || !only_normal {
            return Err(BlobError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, key: &str, data: &[u8]) -> Result<String, BlobError> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, data).await?;
        tracing::debug!(key, size = data.len(), "Blob stored");
        Ok(self.url_for(key))
    }

    async fn delete(&self, key: &str) -> Result<(), BlobError> {
        let path = self.resolve(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(key, "Blob deleted");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn url_for(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }

    fn key_for(&self, url: &str) -> Option<String> {
        url.strip_prefix(&self.base_url)?
            .strip_prefix('/')
            .filter(|k| !k.is_empty())
            .map(str::to_string)
    }
}
