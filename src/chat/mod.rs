//! Chat backend integration.
//!
//! - `transport`: HTTP/JSON wrapper with per-request bearer auth
//! - `client`: messages, channel resolution, the 3-phase external upload
//! - `upload`: upload session state machine (Reserved → Pushed → Finalized)
//! - `types`: wire types

pub mod client;
pub mod transport;
pub mod types;
pub mod upload;

pub use client::ChatClient;
pub use transport::ChatTransport;
pub use types::{ChatAttachment, ChatMessage};
pub use upload::{UploadPhase, UploadSession};

use async_trait::async_trait;
use secrecy::SecretString;

use crate::error::ChatError;

/// The chat operations the event pipeline relies on.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Post one visible message.
    async fn post_message(
        &self,
        token: &SecretString,
        message: &ChatMessage,
    ) -> Result<(), ChatError>;

    /// Map a channel name to the backend's channel ID.
    async fn resolve_channel_id(
        &self,
        token: &SecretString,
        channel_name: &str,
    ) -> Result<String, ChatError>;

    /// Upload a file into a channel.
    async fn upload_file(
        &self,
        token: &SecretString,
        file_name: &str,
        bytes: Vec<u8>,
        channel_id: &str,
        comment: &str,
    ) -> Result<(), ChatError>;
}
