//! Configuration types.
//!
//! The function reads a fresh [`RelayConfig`] snapshot from the environment on
//! every invocation. Nothing here can fail: unparseable values are logged and
//! replaced by their defaults.

use secrecy::SecretString;

/// Default chat channel that notices and relayed files go to.
pub const DEFAULT_CHANNEL_NAME: &str = "s3-notifications";

/// Default base URL of the chat backend's Web API.
pub const DEFAULT_CHAT_API_BASE: &str = "https://slack.com/api";

/// Initial comment attached to relayed files.
pub const DEFAULT_UPLOAD_COMMENT: &str = "New file available.";

/// Immutable per-invocation configuration.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Bucket whose notifications are acted on.
    pub source_bucket: String,
    /// Key prefix ("folder") that must match for an object to be in scope.
    pub source_prefix: String,
    /// Bucket copies are written to.
    pub dest_bucket: String,
    /// Prefix that replaces `source_prefix` in the destination key.
    pub dest_prefix: String,
    /// Copy in-scope objects to the destination.
    pub copy_enabled: bool,
    /// Delete the original once it has been copied.
    pub delete_after_copy: bool,
    /// Upload the object's content to the chat channel.
    pub relay_to_chat: bool,
    /// Bearer token for the chat backend.
    pub chat_token: SecretString,
    /// Channel notices are posted to.
    pub chat_channel_name: String,
    /// Base URL of the chat backend's Web API.
    pub chat_api_base: String,
    /// Where users collect relocated files, e.g. `sftp://sftp.example.com`.
    pub pickup_base_url: Option<String>,
    /// Initial comment for relayed uploads.
    pub upload_comment: String,
    /// Maximum number of channel-listing pages searched when resolving a channel.
    pub channel_page_limit: u32,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            source_bucket: String::new(),
            source_prefix: String::new(),
            dest_bucket: String::new(),
            dest_prefix: String::new(),
            copy_enabled: true,
            delete_after_copy: false,
            relay_to_chat: false,
            chat_token: SecretString::from(String::new()),
            chat_channel_name: DEFAULT_CHANNEL_NAME.to_string(),
            chat_api_base: DEFAULT_CHAT_API_BASE.to_string(),
            pickup_base_url: None,
            upload_comment: DEFAULT_UPLOAD_COMMENT.to_string(),
            channel_page_limit: 1,
        }
    }
}

impl RelayConfig {
    /// Build a snapshot from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a snapshot from an arbitrary key/value source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let source_bucket = lookup("srcbucket").unwrap_or(defaults.source_bucket);
        let source_prefix = lookup("srcfolder").unwrap_or(defaults.source_prefix);
        let dest_bucket = lookup("destbucket").unwrap_or_else(|| source_bucket.clone());
        let dest_prefix = lookup("destfolder").unwrap_or(defaults.dest_prefix);

        let copy_enabled = parse_flag("copyfile", lookup("copyfile"), defaults.copy_enabled);
        let delete_after_copy = parse_flag(
            "delorgfile",
            lookup("delorgfile"),
            defaults.delete_after_copy,
        );
        let relay_to_chat = parse_flag("slackfile", lookup("slackfile"), defaults.relay_to_chat);

        let chat_token = lookup("token")
            .map(SecretString::from)
            .unwrap_or(defaults.chat_token);
        let chat_channel_name = lookup("channelName")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.chat_channel_name);
        let chat_api_base = lookup("chatApiBase")
            .map(|s| s.trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.chat_api_base);
        let pickup_base_url = lookup("pickupBaseUrl")
            .map(|s| s.trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty());
        let upload_comment = lookup("uploadComment").unwrap_or(defaults.upload_comment);

        let channel_page_limit = match lookup("channelPages") {
            None => defaults.channel_page_limit,
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    tracing::warn!(
                        variable = "channelPages",
                        value = %raw,
                        default = defaults.channel_page_limit,
                        "Unable to parse environment variable, using default"
                    );
                    defaults.channel_page_limit
                }
            },
        };

        Self {
            source_bucket,
            source_prefix,
            dest_bucket,
            dest_prefix,
            copy_enabled,
            delete_after_copy,
            relay_to_chat,
            chat_token,
            chat_channel_name,
            chat_api_base,
            pickup_base_url,
            upload_comment,
            channel_page_limit,
        }
    }
}

/// Parse a boolean switch, falling back to `default` on missing or bad input.
fn parse_flag(variable: &str, raw: Option<String>, default: bool) -> bool {
    let Some(raw) = raw else {
        return default;
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "true" => {
            tracing::info!(variable, value = true, "Environment switch set");
            true
        }
        "false" => {
            tracing::info!(variable, value = false, "Environment switch set");
            false
        }
        _ => {
            tracing::warn!(
                variable,
                value = %raw,
                default,
                "Unable to parse environment switch, using default"
            );
            default
        }
    }
}
