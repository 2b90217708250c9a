//! Relocation policy.
//!
//! Decides whether an object-creation event is one we act on and where the
//! object goes. Pure: no I/O, the same input always yields the same decision.

use tracing::debug;

use crate::config::RelayConfig;
use crate::error::PolicyError;
use crate::event::ObjectCreatedEvent;

/// What to do with one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelocationDecision {
    /// The event matches the configured source bucket and prefix.
    pub in_scope: bool,
    /// Key the object is copied to in the destination bucket.
    pub destination_key: String,
    /// Last path segment of the source key.
    pub file_name: String,
}

/// Evaluate an event against the configuration.
///
/// Out-of-scope events produce `in_scope == false` and are never an error.
/// An empty key, or a destination that is the source object itself, is.
pub fn evaluate(
    event: &ObjectCreatedEvent,
    config: &RelayConfig,
) -> Result<RelocationDecision, PolicyError> {
    let key = event.object_key.as_str();
    if key.is_empty() {
        return Err(PolicyError::EmptyKey);
    }

    let file_name = file_name(key).to_string();
    let destination_key = key.replacen(&config.source_prefix, &config.dest_prefix, 1);

    let matches_bucket = event.bucket == config.source_bucket;
    let matches_prefix = key.starts_with(&config.source_prefix);

    let in_scope = if !matches_bucket || !matches_prefix {
        debug!(
            bucket = %event.bucket,
            key,
            source_bucket = %config.source_bucket,
            source_prefix = %config.source_prefix,
            "Event does not match source bucket/prefix"
        );
        false
    } else if file_name.is_empty() {
        debug!(bucket = %event.bucket, key, "Ignoring folder placeholder");
        false
    } else {
        true
    };

    if in_scope && config.dest_bucket == event.bucket && destination_key == key {
        return Err(PolicyError::SelfCopy {
            bucket: event.bucket.clone(),
            key: key.to_string(),
        });
    }

    Ok(RelocationDecision {
        in_scope,
        destination_key,
        file_name,
    })
}

/// Substring after the final `/`, or the whole key if there is none.
pub fn file_name(key: &str) -> &str {
    key.rsplit_once('/').map_or(key, |(_, name)| name)
}
