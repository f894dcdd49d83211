// logscrub-core/src/store.rs
//! The object-store seam consumed by the scrubbing pipeline.
//!
//! The pipeline only ever sees [`ObjectStore`]. This module ships an in-memory
//! store for tests and event replay, and a directory-backed store mapping
//! `s3://bucket/key` to `<root>/<bucket>/<key>`. The S3 implementation lives in
//! the application crate next to the Lambda entry points.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use log::debug;
use tokio::sync::RwLock;

use crate::errors::ScrubError;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetches the full content of an object.
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, ScrubError>;

    /// Creates or overwrites an object.
    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<(), ScrubError>;

    async fn delete(&self, bucket: &str, key: &str) -> Result<(), ScrubError>;
}

/// Object store held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: RwLock<HashMap<(String, String), Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of an object, if present.
    pub async fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.objects
            .read()
            .await
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    /// Sorted keys currently stored in `bucket`.
    pub async fn keys(&self, bucket: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .objects
            .read()
            .await
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, ScrubError> {
        self.object(bucket, key)
            .await
            .ok_or_else(|| ScrubError::store("get", bucket, key, "NoSuchKey: the specified key does not exist"))
    }

    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<(), ScrubError> {
        debug!("MemoryStore: put s3://{}/{} ({} bytes)", bucket, key, body.len());
        self.objects
            .write()
            .await
            .insert((bucket.to_string(), key.to_string()), body);
        Ok(())
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<(), ScrubError> {
        self.objects
            .write()
            .await
            .remove(&(bucket.to_string(), key.to_string()));
        Ok(())
    }
}

/// Object store backed by a local directory, one sub-directory per bucket.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolves an object location, refusing anything that could escape the root.
    pub fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf, ScrubError> {
        let mut path = self.root.clone();
        for (what, part) in [("bucket", bucket), ("key", key)] {
            let relative = Path::new(part);
            if part.is_empty()
                || relative
                    .components()
                    .any(|c| !matches!(c, Component::Normal(_)))
            {
                return Err(ScrubError::store(
                    "resolve",
                    bucket,
                    key,
                    format!("{what} '{part}' is not a plain relative path"),
                ));
            }
            path.push(relative);
        }
        Ok(path)
    }
}

#[async_trait]
impl ObjectStore for FsStore {
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, ScrubError> {
        let path = self.object_path(bucket, key)?;
        tokio::fs::read(&path)
            .await
            .map_err(|e| ScrubError::store("get", bucket, key, e))
    }

    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<(), ScrubError> {
        let path = self.object_path(bucket, key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ScrubError::store("put", bucket, key, e))?;
        }
        debug!("FsStore: writing {} bytes to {}", body.len(), path.display());
        tokio::fs::write(&path, body)
            .await
            .map_err(|e| ScrubError::store("put", bucket, key, e))
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<(), ScrubError> {
        let path = self.object_path(bucket, key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            // S3 deletes are idempotent.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ScrubError::store("delete", bucket, key, e)),
        }
    }
}
