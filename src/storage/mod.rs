//! Object storage abstraction.
//!
//! The pipeline only needs four operations: read metadata, copy, delete and
//! read content. [`S3Storage`] implements them on top of the AWS SDK.

pub mod s3;

pub use s3::S3Storage;

use async_trait::async_trait;

use crate::error::StorageError;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Metadata returned by a head request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectMetadata {
    pub content_length: Option<i64>,
    pub content_type: Option<String>,
}

/// Storage operations used by the event pipeline.
///
/// Calls are made one at a time and never retried; any error aborts the
/// record being processed.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Read an object's metadata.
    async fn head_object(&self, bucket: &str, key: &str) -> StorageResult<ObjectMetadata>;

    /// Copy an object, possibly across buckets.
    async fn copy_object(
        &self,
        from_bucket: &str,
        from_key: &str,
        to_bucket: &str,
        to_key: &str,
    ) -> StorageResult<()>;

    /// Delete an object.
    async fn delete_object(&self, bucket: &str, key: &str) -> StorageResult<()>;

    /// Read an object's full content into memory.
    async fn get_object(&self, bucket: &str, key: &str) -> StorageResult<Vec<u8>>;
}
