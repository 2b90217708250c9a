//! Wire types for the chat backend's Web API.

use serde::{Deserialize, Serialize};

// ── Outbound messages ───────────────────────────────────────────────

/// A message posted with `chat.postMessage`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    /// Channel name or ID.
    pub channel: String,
    pub text: String,
    pub as_user: bool,
    pub attachments: Vec<ChatAttachment>,
}

impl ChatMessage {
    pub fn new(channel: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            text: text.into(),
            as_user: true,
            attachments: Vec::new(),
        }
    }

    pub fn with_attachment(mut self, attachment: ChatAttachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}

/// Legacy message attachment. Unset optional fields are left out of the JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatAttachment {
    /// Plain-text summary for clients that cannot render attachments.
    pub fallback: String,
    pub text: String,
    /// `good`, `warning`, `danger` or a hex colour.
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretext: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_link: Option<String>,
}

impl ChatAttachment {
    pub fn new(fallback: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            fallback: fallback.into(),
            text: text.into(),
            color: "good".to_string(),
            pretext: None,
            footer: None,
            author_name: None,
            author_link: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }
}

// ── Request bodies ──────────────────────────────────────────────────

/// File reference sent to `files.completeUploadExternal`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRef {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CompleteUploadRequest<'a> {
    pub files: Vec<FileRef>,
    pub channel_id: &'a str,
    pub initial_comment: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct SharePublicRequest<'a> {
    pub channel: &'a str,
    pub file: &'a str,
    pub initial_comment: &'a str,
}

// ── Response payloads ───────────────────────────────────────────────
//
// The `ok`/`error` envelope is checked by the transport before these are
// decoded, so they only carry the success payload.

/// Common envelope every Web API method answers with.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostMessageResponse {
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub ts: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConversationsListResponse {
    #[serde(default)]
    pub channels: Vec<ChannelInfo>,
    #[serde(default)]
    pub response_metadata: Option<ResponseMetadata>,
}

impl ConversationsListResponse {
    /// Cursor for the next page, if the backend reported one.
    pub fn next_cursor(&self) -> Option<&str> {
        self.response_metadata
            .as_ref()
            .map(|m| m.next_cursor.as_str())
            .filter(|c| !c.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseMetadata {
    #[serde(default)]
    pub next_cursor: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChannelInfo {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadUrlResponse {
    pub upload_url: String,
    pub file_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompleteUploadResponse {
    #[serde(default)]
    pub files: Vec<FileRef>,
}

impl CompleteUploadResponse {
    /// Whether the finalized upload lists `file_id`.
    pub fn lists(&self, file_id: &str) -> bool {
        self.files.iter().any(|f| f.id == file_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_serializes_with_attachments() {
        let msg = ChatMessage::new("s3-notifications", "New File Detected")
            .with_attachment(ChatAttachment::new("File detected", "s3://b/k."));
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "channel": "s3-notifications",
                "text": "New File Detected",
                "as_user": true,
                "attachments": [
                    { "fallback": "File detected", "text": "s3://b/k.", "color": "good" }
                ]
            })
        );
    }

    #[test]
    fn optional_attachment_fields_serialize_when_set() {
        let att = ChatAttachment::new("f", "t")
            .with_color("danger")
            .with_footer("s3-notify");
        let json = serde_json::to_value(&att).unwrap();
        assert_eq!(json["color"], "danger");
        assert_eq!(json["footer"], "s3-notify");
        assert!(json.get("pretext").is_none());
    }

    #[test]
    fn next_cursor_ignores_empty_string() {
        let page: ConversationsListResponse = serde_json::from_value(serde_json::json!({
            "channels": [],
            "response_metadata": { "next_cursor": "" }
        }))
        .unwrap();
        assert_eq!(page.next_cursor(), None);

        let page: ConversationsListResponse = serde_json::from_value(serde_json::json!({
            "channels": [],
            "response_metadata": { "next_cursor": "dGVhbTpD" }
        }))
        .unwrap();
        assert_eq!(page.next_cursor(), Some("dGVhbTpD"));
    }

    #[test]
    fn completed_upload_lists_file_ids() {
        let resp: CompleteUploadResponse = serde_json::from_value(serde_json::json!({
            "ok": true,
            "files": [{ "id": "F0001", "title": "a.csv" }]
        }))
        .unwrap();
        assert!(resp.lists("F0001"));
        assert!(!resp.lists("F0002"));

        let empty: CompleteUploadResponse =
            serde_json::from_value(serde_json::json!({ "ok": true })).unwrap();
        assert!(!empty.lists("F0001"));
    }
}
