//! Object storage boundary
//!
//! Uploads are validated by [`UploadValidator`] and then handed to an
//! [`ObjectStore`]. Production talks to S3; tests use [`MemoryObjectStore`].

pub mod s3;
pub mod upload;

use async_trait::async_trait;
use dashmap::DashMap;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

pub use s3::S3ObjectStore;
pub use upload::{UploadService, UploadValidator};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("put {key} timed out")]
    Timeout { key: String },

    #[error("put {key} failed: {message}")]
    Backend { key: String, message: String },
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        tracing::error!(error = %err, "Object storage failure");
        AppError::new(ErrorCode::FileStorageFailed)
    }
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// In-process object store keyed by `(bucket, key)`
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: DashMap<(String, String), StoredObject>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.objects
            .get(&(bucket.to_string(), key.to_string()))
            .map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.objects.insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }
}
