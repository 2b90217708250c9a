//! Upload session state machine.
//!
//! An external upload moves through three phases: the backend reserves an
//! upload URL and file id, the bytes are pushed to that URL, and the upload
//! is finalized into a channel. A session that never reaches `Finalized` is
//! an orphaned reservation; nothing cleans it up.

use crate::error::ChatError;

/// Phase of an external upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadPhase {
    /// Upload URL and file id granted.
    Reserved,
    /// Bytes accepted by the upload URL.
    Pushed,
    /// File shared into the channel.
    Finalized,
}

impl UploadPhase {
    pub fn can_transition_to(&self, target: UploadPhase) -> bool {
        use UploadPhase::*;

        matches!((self, target), (Reserved, Pushed) | (Pushed, Finalized))
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finalized)
    }
}

impl std::fmt::Display for UploadPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Reserved => "reserved",
            Self::Pushed => "pushed",
            Self::Finalized => "finalized",
        };
        write!(f, "{s}")
    }
}

/// Transient state of one upload. Lives for a single upload call chain.
#[derive(Debug, Clone)]
pub struct UploadSession {
    pub upload_url: String,
    pub file_id: String,
    pub channel_id: String,
    pub file_name: String,
    pub length: usize,
    pub phase: UploadPhase,
}

impl UploadSession {
    pub fn reserved(
        upload_url: impl Into<String>,
        file_id: impl Into<String>,
        channel_id: impl Into<String>,
        file_name: impl Into<String>,
        length: usize,
    ) -> Self {
        Self {
            upload_url: upload_url.into(),
            file_id: file_id.into(),
            channel_id: channel_id.into(),
            file_name: file_name.into(),
            length,
            phase: UploadPhase::Reserved,
        }
    }

    /// Move to `target`, rejecting skipped or repeated phases.
    pub fn transition_to(&mut self, target: UploadPhase) -> Result<(), ChatError> {
        if !self.phase.can_transition_to(target) {
            return Err(ChatError::api(
                "upload",
                format!(
                    "upload {} cannot move from {} to {}",
                    self.file_id, self.phase, target
                ),
            ));
        }
        tracing::debug!(file_id = %self.file_id, from = %self.phase, to = %target, "Upload phase");
        self.phase = target;
        Ok(())
    }

    pub fn is_finalized(&self) -> bool {
        self.phase.is_terminal()
    }
}

/// Whether the upload URL acknowledged the pushed bytes.
///
/// The backend answers a plain-text body such as `OK - 1024`; any body without
/// the literal `OK` is treated as a rejection.
pub fn push_acknowledged(body: &str) -> bool {
    body.contains("OK")
}
