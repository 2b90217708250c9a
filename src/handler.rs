//! Function handler: one S3 notification batch per invocation.

use std::sync::Arc;

use aws_lambda_events::event::s3::S3Event;
use lambda_runtime::LambdaEvent;
use tracing::info;

use crate::chat::{ChatClient, ChatTransport};
use crate::config::RelayConfig;
use crate::error::Result;
use crate::event;
use crate::pipeline::{EventOutcome, EventPipeline};
use crate::storage::ObjectStorage;

/// Long-lived clients shared across invocations.
#[derive(Clone)]
pub struct HandlerContext {
    pub storage: Arc<dyn ObjectStorage>,
    pub http: reqwest::Client,
}

impl HandlerContext {
    pub fn new(storage: Arc<dyn ObjectStorage>, http: reqwest::Client) -> Self {
        Self { storage, http }
    }

    /// Build a pipeline for one configuration snapshot.
    pub fn pipeline(&self, config: &RelayConfig) -> EventPipeline {
        let chat = ChatClient::from_transport(ChatTransport::with_client(
            self.http.clone(),
            config.chat_api_base.as_str(),
        ))
        .with_channel_page_limit(config.channel_page_limit);

        EventPipeline::new(Arc::clone(&self.storage), Arc::new(chat))
    }
}

/// Runtime entry point. Reads a fresh configuration snapshot per invocation.
#[tracing::instrument(skip_all, fields(request_id = %event.context.request_id))]
pub async fn handler(
    ctx: &HandlerContext,
    event: LambdaEvent<S3Event>,
) -> std::result::Result<(), lambda_runtime::Error> {
    info!("Function started");

    let config = RelayConfig::from_env();
    process_notification(ctx, &config, &event.payload).await?;

    info!("Function completed");
    Ok(())
}

/// Adapt the notification and run the batch through the pipeline.
pub async fn process_notification(
    ctx: &HandlerContext,
    config: &RelayConfig,
    notification: &S3Event,
) -> Result<Vec<EventOutcome>> {
    let events = event::from_s3_event(notification);
    if events.len() < notification.records.len() {
        info!(
            received = notification.records.len(),
            usable = events.len(),
            "Some records were skipped"
        );
    }

    ctx.pipeline(config).process_batch(&events, config).await
}
