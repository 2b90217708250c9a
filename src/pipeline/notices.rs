//! Chat notices posted at each pipeline milestone.

use crate::chat::{ChatAttachment, ChatMessage};
use crate::config::RelayConfig;
use crate::event::ObjectCreatedEvent;

/// "New File Detected", posted before any storage mutation.
pub fn discovered(config: &RelayConfig, event: &ObjectCreatedEvent) -> ChatMessage {
    ChatMessage::new(&config.chat_channel_name, "New File Detected").with_attachment(
        ChatAttachment::new("File detected", format!("{}.", event.location())),
    )
}

/// "File Copied", posted once the copy has landed.
pub fn copied(
    config: &RelayConfig,
    event: &ObjectCreatedEvent,
    destination_key: &str,
) -> ChatMessage {
    let attachment = ChatAttachment::new(
        "File now in pickup location",
        relocation_text(config, event, destination_key),
    );
    ChatMessage::new(&config.chat_channel_name, "File Copied").with_attachment(attachment)
}

/// "File Moved", posted once the original has been deleted.
pub fn moved(
    config: &RelayConfig,
    event: &ObjectCreatedEvent,
    destination_key: &str,
) -> ChatMessage {
    let attachment = ChatAttachment::new(
        "File now in pickup location",
        relocation_text(config, event, destination_key),
    );
    ChatMessage::new(&config.chat_channel_name, "File Moved").with_attachment(attachment)
}

fn relocation_text(
    config: &RelayConfig,
    event: &ObjectCreatedEvent,
    destination_key: &str,
) -> String {
    let mut text = format!(
        "From {}. To s3://{}/{}.",
        event.location(),
        config.dest_bucket,
        destination_key
    );
    if let Some(ref pickup) = config.pickup_base_url {
        text.push_str(&format!(
            " Users may collect the file from {pickup}/{destination_key}"
        ));
    }
    text
}
