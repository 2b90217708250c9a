use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;

use crate::error::StorageError;
use crate::storage::{ObjectMetadata, ObjectStorage, StorageResult};

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    client: aws_sdk_s3::Client,
}

impl S3Storage {
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }

    /// Build a client from the ambient AWS configuration (region, credentials).
    pub async fn from_env() -> Self {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .load()
            .await;
        Self::new(aws_sdk_s3::Client::new(&config))
    }
}

/// `bucket/key` with the key percent-encoded, as `CopyObject` expects.
pub fn copy_source(bucket: &str, key: &str) -> String {
    format!("{}/{}", bucket, urlencoding::encode(key))
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn head_object(&self, bucket: &str, key: &str) -> StorageResult<ObjectMetadata> {
        let resp = self
            .client
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::Metadata {
                bucket: bucket.to_string(),
                key: key.to_string(),
                reason: DisplayErrorContext(&e).to_string(),
            })?;

        Ok(ObjectMetadata {
            content_length: resp.content_length(),
            content_type: resp.content_type().map(str::to_string),
        })
    }

    async fn copy_object(
        &self,
        from_bucket: &str,
        from_key: &str,
        to_bucket: &str,
        to_key: &str,
    ) -> StorageResult<()> {
        let start = std::time::Instant::now();

        self.client
            .copy_object()
            .copy_source(copy_source(from_bucket, from_key))
            .bucket(to_bucket)
            .key(to_key)
            .send()
            .await
            .map_err(|e| {
                let reason = DisplayErrorContext(&e).to_string();
                tracing::error!(
                    error = %reason,
                    from_bucket,
                    from_key,
                    to_bucket,
                    to_key,
                    "S3 copy failed"
                );
                StorageError::Copy {
                    from_bucket: from_bucket.to_string(),
                    from_key: from_key.to_string(),
                    to_bucket: to_bucket.to_string(),
                    to_key: to_key.to_string(),
                    reason,
                }
            })?;

        tracing::info!(
            from_bucket,
            from_key,
            to_bucket,
            to_key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 copy successful"
        );
        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> StorageResult<()> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::Delete {
                bucket: bucket.to_string(),
                key: key.to_string(),
                reason: DisplayErrorContext(&e).to_string(),
            })?;

        tracing::info!(bucket, key, "S3 delete successful");
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> StorageResult<Vec<u8>> {
        let read_error = |reason: String| StorageError::Read {
            bucket: bucket.to_string(),
            key: key.to_string(),
            reason,
        };

        let resp = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| read_error(DisplayErrorContext(&e).to_string()))?;

        let body = resp
            .body
            .collect()
            .await
            .map_err(|e| read_error(e.to_string()))?;

        let bytes = body.into_bytes().to_vec();
        tracing::info!(
            bucket,
            key,
            size_bytes = bytes.len(),
            "S3 download successful"
        );
        Ok(bytes)
    }
}
