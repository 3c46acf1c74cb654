//! Durable object storage for archived recordings.
//!
//! The seam is the S3-shaped `put(bucket, key, bytes)`; the shipped
//! implementation writes to the local filesystem with the bucket as a
//! subdirectory. Keys may contain `/` separators but must not escape
//! their bucket.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use crate::errors::{Result, StoreError};

/// Durable object storage.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write `bytes` under `bucket/key`, overwriting any existing object.
    async fn put(&self, bucket: &str, key: &str, bytes: Bytes) -> Result<()>;

    /// Fetch the object stored under `bucket/key`, if any.
    async fn get(&self, bucket: &str, key: &str) -> Result<Option<Bytes>>;
}

/// Filesystem-backed [`ObjectStore`] rooted at a directory.
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    /// Create a store rooted at `root`. The directory is created lazily on
    /// first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve and validate `bucket/key` into a path under the root.
    fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf> {
        validate_segment(bucket)?;
        if key.is_empty() {
            return Err(StoreError::InvalidKey("empty key".into()));
        }
        for segment in key.split('/') {
            validate_segment(segment)?;
        }
        Ok(self.root.join(bucket).join(key))
    }
}

/// Reject path segments that are empty or would escape the store root.
fn validate_segment(segment: &str) -> Result<()> {
    if segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains('\\')
        || Path::new(segment).is_absolute()
    {
        return Err(StoreError::InvalidKey(segment.to_string()));
    }
    Ok(())
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn put(&self, bucket: &str, key: &str, bytes: Bytes) -> Result<()> {
        let path = self.object_path(bucket, key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &bytes).await?;
        debug!(?path, size = bytes.len(), "object written");
        Ok(())
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<Option<Bytes>> {
        let path = self.object_path(bucket, key)?;
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
