//! Normalized object-creation events.
//!
//! The host hands us an S3 notification envelope. Only the bucket name and
//! the (URL-decoded) object key matter to the pipeline, so everything else is
//! dropped here.

use aws_lambda_events::event::s3::S3Event;

/// One "object created" notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectCreatedEvent {
    pub bucket: String,
    /// Object key, already URL-decoded.
    pub object_key: String,
}

impl ObjectCreatedEvent {
    pub fn new(bucket: impl Into<String>, object_key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            object_key: object_key.into(),
        }
    }

    /// `s3://bucket/key` form used in logs and notices.
    pub fn location(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.object_key)
    }
}

/// Convert an S3 notification batch into events, preserving record order.
///
/// Records without a bucket name or object key, or whose key does not decode,
/// are skipped; the rest of the batch is unaffected.
pub fn from_s3_event(event: &S3Event) -> Vec<ObjectCreatedEvent> {
    let mut events = Vec::with_capacity(event.records.len());

    for (index, record) in event.records.iter().enumerate() {
        let bucket = record.s3.bucket.name.as_deref().unwrap_or_default();
        let raw_key = record.s3.object.key.as_deref().unwrap_or_default();

        if bucket.is_empty() || raw_key.is_empty() {
            tracing::warn!(record = index, "Skipping record without bucket or key");
            continue;
        }

        let object_key = match decode_key(raw_key) {
            Some(key) => key,
            None => {
                tracing::warn!(record = index, key = %raw_key, "Unable to decode object key");
                continue;
            }
        };

        events.push(ObjectCreatedEvent::new(bucket, object_key));
    }

    events
}

/// Decode a key as it appears in S3 notifications (form encoding, `+` is a space).
pub fn decode_key(raw: &str) -> Option<String> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .ok()
        .map(|key| key.into_owned())
}
