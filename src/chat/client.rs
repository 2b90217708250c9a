//! Chat backend client: messages, channel lookup and external file uploads.

use async_trait::async_trait;
use secrecy::SecretString;

use crate::chat::ChatApi;
use crate::chat::transport::ChatTransport;
use crate::chat::types::{
    ChatMessage, CompleteUploadRequest, CompleteUploadResponse, ConversationsListResponse, FileRef,
    PostMessageResponse, SharePublicRequest, UploadUrlResponse,
};
use crate::chat::upload::{UploadPhase, UploadSession, push_acknowledged};
use crate::error::ChatError;

/// Page size for `conversations.list`.
const CHANNEL_PAGE_SIZE: u32 = 10;

/// Client for the chat backend's Web API.
#[derive(Debug, Clone)]
pub struct ChatClient {
    transport: ChatTransport,
    channel_page_limit: u32,
}

impl ChatClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::from_transport(ChatTransport::new(base_url))
    }

    pub fn from_transport(transport: ChatTransport) -> Self {
        Self {
            transport,
            channel_page_limit: 1,
        }
    }

    /// Follow `conversations.list` cursors for up to `pages` pages.
    ///
    /// The default of one page means channels beyond the first ten private
    /// channels are never found.
    pub fn with_channel_page_limit(mut self, pages: u32) -> Self {
        self.channel_page_limit = pages.max(1);
        self
    }

    /// Post a message to a channel.
    pub async fn post_message(
        &self,
        token: &SecretString,
        message: &ChatMessage,
    ) -> Result<(), ChatError> {
        let resp: PostMessageResponse = self
            .transport
            .post(token, "chat.postMessage", message)
            .await?;

        tracing::debug!(
            channel = %message.channel,
            ts = resp.ts.as_deref().unwrap_or_default(),
            "Chat message posted"
        );
        Ok(())
    }

    /// Find the ID of the private, unarchived channel named `channel_name`.
    ///
    /// The first exact name match in listing order wins.
    pub async fn resolve_channel_id(
        &self,
        token: &SecretString,
        channel_name: &str,
    ) -> Result<String, ChatError> {
        let mut cursor: Option<String> = None;
        let mut exhausted = false;

        for page in 0..self.channel_page_limit {
            let mut query = vec![
                ("limit", CHANNEL_PAGE_SIZE.to_string()),
                ("types", "private_channel".to_string()),
                ("exclude_archived", "true".to_string()),
            ];
            if let Some(ref c) = cursor {
                query.push(("cursor", c.clone()));
            }

            let listing: ConversationsListResponse = self
                .transport
                .get(token, "conversations.list", &query)
                .await?;

            if let Some(channel) = listing.channels.iter().find(|c| c.name == channel_name) {
                tracing::debug!(channel_name, channel_id = %channel.id, page, "Channel resolved");
                return Ok(channel.id.clone());
            }

            match listing.next_cursor() {
                Some(next) => cursor = Some(next.to_string()),
                None => {
                    exhausted = true;
                    break;
                }
            }
        }

        if !exhausted {
            tracing::debug!(
                channel_name,
                pages = self.channel_page_limit,
                "Channel listing has more pages than searched"
            );
        }

        Err(ChatError::ChannelNotFound {
            name: channel_name.to_string(),
        })
    }

    /// Upload `bytes` as `file_name` into `channel_id`.
    ///
    /// Runs reserve → push → finalize; the first failing phase aborts the rest.
    /// A reservation left behind by a failed push or finalize is not cleaned up.
    pub async fn upload_file(
        &self,
        token: &SecretString,
        file_name: &str,
        bytes: Vec<u8>,
        channel_id: &str,
        comment: &str,
    ) -> Result<UploadSession, ChatError> {
        let mut session = self
            .reserve_upload(token, file_name, bytes.len(), channel_id)
            .await?;

        if let Err(e) = self.push_upload(&mut session, bytes).await {
            tracing::warn!(
                file_id = %session.file_id,
                file_name = %session.file_name,
                error = %e,
                "Upload reserved but bytes were not accepted; reservation left orphaned"
            );
            return Err(e);
        }

        if let Err(e) = self.finalize_upload(token, &mut session, comment).await {
            tracing::warn!(
                file_id = %session.file_id,
                file_name = %session.file_name,
                error = %e,
                "Upload pushed but not finalized; reservation left orphaned"
            );
            return Err(e);
        }

        tracing::info!(
            file_id = %session.file_id,
            file_name = %session.file_name,
            channel_id = %session.channel_id,
            length = session.length,
            "File uploaded to chat"
        );
        Ok(session)
    }

    /// Phase A: request an upload URL and file id.
    pub async fn reserve_upload(
        &self,
        token: &SecretString,
        file_name: &str,
        length: usize,
        channel_id: &str,
    ) -> Result<UploadSession, ChatError> {
        let query = [
            ("filename", file_name.to_string()),
            ("length", length.to_string()),
        ];
        let resp: UploadUrlResponse = self
            .transport
            .get(token, "files.getUploadURLExternal", &query)
            .await?;

        tracing::debug!(file_id = %resp.file_id, file_name, length, "Upload reserved");
        Ok(UploadSession::reserved(
            resp.upload_url,
            resp.file_id,
            channel_id,
            file_name,
            length,
        ))
    }

    /// Phase B: push the raw bytes to the reserved URL.
    pub async fn push_upload(
        &self,
        session: &mut UploadSession,
        bytes: Vec<u8>,
    ) -> Result<(), ChatError> {
        let body = self.transport.put_bytes(&session.upload_url, bytes).await?;

        if !push_acknowledged(&body) {
            return Err(ChatError::UploadTransfer {
                url: session.upload_url.clone(),
                server_message: body,
            });
        }

        session.transition_to(UploadPhase::Pushed)
    }

    /// Phase C: complete the upload and share it into the session's channel.
    pub async fn finalize_upload(
        &self,
        token: &SecretString,
        session: &mut UploadSession,
        comment: &str,
    ) -> Result<(), ChatError> {
        let request = CompleteUploadRequest {
            files: vec![FileRef {
                id: session.file_id.clone(),
                title: Some(session.file_name.clone()),
            }],
            channel_id: &session.channel_id,
            initial_comment: comment,
        };

        let resp: CompleteUploadResponse = self
            .transport
            .post(token, "files.completeUploadExternal", &request)
            .await?;

        if !resp.lists(&session.file_id) {
            tracing::warn!(
                file_id = %session.file_id,
                channel_id = %session.channel_id,
                "Completed upload does not list the reserved file"
            );
        }

        session.transition_to(UploadPhase::Finalized)
    }

    /// Make an uploaded file readable by anyone with the link.
    ///
    /// Irreversible. Not used by the relay path.
    pub async fn share_file_publicly(
        &self,
        token: &SecretString,
        channel_id: &str,
        file_id: &str,
        comment: &str,
    ) -> Result<(), ChatError> {
        let operation = "files.sharedPublicURL";
        let request = SharePublicRequest {
            channel: channel_id,
            file: file_id,
            initial_comment: comment,
        };

        let status = self
            .transport
            .post_for_status(token, operation, &request)
            .await?;

        if !status.is_success() {
            return Err(ChatError::api(
                operation,
                format!("could not make file [{file_id}] public (HTTP {status})"),
            ));
        }

        tracing::warn!(file_id, channel_id, "File made public");
        Ok(())
    }
}

#[async_trait]
impl ChatApi for ChatClient {
    async fn post_message(
        &self,
        token: &SecretString,
        message: &ChatMessage,
    ) -> Result<(), ChatError> {
        ChatClient::post_message(self, token, message).await
    }

    async fn resolve_channel_id(
        &self,
        token: &SecretString,
        channel_name: &str,
    ) -> Result<String, ChatError> {
        ChatClient::resolve_channel_id(self, token, channel_name).await
    }

    async fn upload_file(
        &self,
        token: &SecretString,
        file_name: &str,
        bytes: Vec<u8>,
        channel_id: &str,
        comment: &str,
    ) -> Result<(), ChatError> {
        ChatClient::upload_file(self, token, file_name, bytes, channel_id, comment)
            .await
            .map(|_| ())
    }
}
