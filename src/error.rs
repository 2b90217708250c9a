//! Error types for s3-notify.

/// Top-level error type for the notification function.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Policy error: {0}")]
    Policy(#[from] PolicyError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Chat error: {0}")]
    Chat(#[from] ChatError),
}

/// Malformed keys rejected by the relocation policy.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("Object key is empty")]
    EmptyKey,

    #[error("Destination s3://{bucket}/{key} is the source object itself")]
    SelfCopy { bucket: String, key: String },
}

/// Object storage failures. Every variant aborts the record being processed.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to read metadata for s3://{bucket}/{key}: {reason}")]
    Metadata {
        bucket: String,
        key: String,
        reason: String,
    },

    #[error("Failed to copy s3://{from_bucket}/{from_key} to s3://{to_bucket}/{to_key}: {reason}")]
    Copy {
        from_bucket: String,
        from_key: String,
        to_bucket: String,
        to_key: String,
        reason: String,
    },

    #[error("Failed to delete s3://{bucket}/{key}: {reason}")]
    Delete {
        bucket: String,
        key: String,
        reason: String,
    },

    #[error("Failed to read s3://{bucket}/{key}: {reason}")]
    Read {
        bucket: String,
        key: String,
        reason: String,
    },
}

/// Chat backend errors.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// The backend answered `ok: false`, the request never completed, or the
    /// body was not the expected JSON.
    #[error("Chat API {operation} failed: {message}")]
    Api { operation: String, message: String },

    #[error("Could not determine the channel ID for the channel {name}")]
    ChannelNotFound { name: String },

    #[error("Failed to upload file to {url}. Server returned message [{server_message}]")]
    UploadTransfer { url: String, server_message: String },
}

impl ChatError {
    pub(crate) fn api(operation: &str, message: impl Into<String>) -> Self {
        Self::Api {
            operation: operation.to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias for the notification function.
pub type Result<T> = std::result::Result<T, Error>;
