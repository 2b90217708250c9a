//! Event pipeline: applies the relocation policy to object-creation events.
//!
//! Flow for one event:
//! 1. Evaluate scope and destination (no I/O)
//! 2. Read object metadata, post the discovery notice
//! 3. Copy → notice, delete → notice, relay content → upload, each if enabled
//!
//! Batches are processed sequentially and stop at the first error.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::chat::ChatApi;
use crate::config::RelayConfig;
use crate::error::Result;
use crate::event::ObjectCreatedEvent;
use crate::pipeline::notices;
use crate::pipeline::policy;
use crate::pipeline::types::{EventOutcome, EventStage};
use crate::storage::ObjectStorage;

/// Orchestrates storage and chat calls for object-creation events.
///
/// Holds no per-event state; the configuration snapshot is passed with each
/// batch.
pub struct EventPipeline {
    storage: Arc<dyn ObjectStorage>,
    chat: Arc<dyn ChatApi>,
}

impl EventPipeline {
    pub fn new(storage: Arc<dyn ObjectStorage>, chat: Arc<dyn ChatApi>) -> Self {
        Self { storage, chat }
    }

    /// Process a batch in order.
    ///
    /// The first failing event aborts the batch: its error is returned and the
    /// events after it are never looked at.
    pub async fn process_batch(
        &self,
        events: &[ObjectCreatedEvent],
        config: &RelayConfig,
    ) -> Result<Vec<EventOutcome>> {
        info!(
            record_count = events.len(),
            "Processing object-created events"
        );

        let mut outcomes = Vec::with_capacity(events.len());
        for event in events {
            outcomes.push(self.process_event(event, config).await?);
        }

        info!(
            record_count = events.len(),
            in_scope = outcomes.iter().filter(|o| o.is_in_scope()).count(),
            "Batch complete"
        );
        Ok(outcomes)
    }

    /// Process one event.
    #[tracing::instrument(skip_all, fields(bucket = %event.bucket, key = %event.object_key))]
    pub async fn process_event(
        &self,
        event: &ObjectCreatedEvent,
        config: &RelayConfig,
    ) -> Result<EventOutcome> {
        let mut stages = Vec::new();

        match self.run(event, config, &mut stages).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                error!(
                    error = %e,
                    source = ?std::error::Error::source(&e),
                    last_stage = %stages.last().copied().unwrap_or(EventStage::Received),
                    "Event processing failed"
                );
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        event: &ObjectCreatedEvent,
        config: &RelayConfig,
        stages: &mut Vec<EventStage>,
    ) -> Result<EventOutcome> {
        info!(location = %event.location(), "New file detected");
        stages.push(EventStage::Received);

        let decision = policy::evaluate(event, config)?;
        stages.push(EventStage::ScopeChecked);

        if !decision.in_scope {
            info!("Event outside configured source bucket/prefix, nothing to do");
            return Ok(EventOutcome::OutOfScope);
        }

        info!(
            file_name = %decision.file_name,
            destination = %format!("s3://{}/{}", config.dest_bucket, decision.destination_key),
            "Criteria for action met"
        );

        let metadata = self
            .storage
            .head_object(&event.bucket, &event.object_key)
            .await?;
        info!(
            size_bytes = metadata.content_length.unwrap_or_default(),
            content_type = metadata.content_type.as_deref().unwrap_or("unknown"),
            "Object metadata read"
        );

        let token = &config.chat_token;

        self.chat
            .post_message(token, &notices::discovered(config, event))
            .await?;
        stages.push(EventStage::NotifiedDiscovery);
        info!("Discovery notice sent");

        if config.copy_enabled {
            self.storage
                .copy_object(
                    &event.bucket,
                    &event.object_key,
                    &config.dest_bucket,
                    &decision.destination_key,
                )
                .await?;
            stages.push(EventStage::Copied);

            self.chat
                .post_message(
                    token,
                    &notices::copied(config, event, &decision.destination_key),
                )
                .await?;
            stages.push(EventStage::NotifiedCopy);
        }

        if config.delete_after_copy {
            if !config.copy_enabled {
                warn!("Deleting original although copying is disabled");
            }
            self.storage
                .delete_object(&event.bucket, &event.object_key)
                .await?;
            stages.push(EventStage::Deleted);

            self.chat
                .post_message(
                    token,
                    &notices::moved(config, event, &decision.destination_key),
                )
                .await?;
            stages.push(EventStage::NotifiedDelete);
        }

        if config.relay_to_chat {
            info!(
                location = %format!("s3://{}/{}", config.dest_bucket, decision.destination_key),
                "Reading file content to relay to chat"
            );
            let bytes = self
                .storage
                .get_object(&config.dest_bucket, &decision.destination_key)
                .await?;

            let channel_id = self
                .chat
                .resolve_channel_id(token, &config.chat_channel_name)
                .await?;

            self.chat
                .upload_file(
                    token,
                    &decision.file_name,
                    bytes,
                    &channel_id,
                    &config.upload_comment,
                )
                .await?;
            stages.push(EventStage::RelayedToChat);
        }

        stages.push(EventStage::Done);
        info!(stages = stages.len(), "Event processed");

        Ok(EventOutcome::Completed {
            destination_key: decision.destination_key,
            stages: stages.clone(),
        })
    }
}
