use std::sync::Arc;

use anyhow::Context;
use aws_lambda_events::event::s3::S3Event;
use lambda_runtime::{LambdaEvent, run, service_fn};

use s3_notify::handler::{HandlerContext, handler};
use s3_notify::storage::S3Storage;

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .without_time()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "s3-notify starting");

    let storage = S3Storage::from_env().await;
    let http = reqwest::Client::builder()
        .user_agent(concat!("s3-notify/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("failed to build HTTP client")?;

    let ctx = Arc::new(HandlerContext::new(Arc::new(storage), http));

    let func = service_fn(move |event: LambdaEvent<S3Event>| {
        let ctx = Arc::clone(&ctx);
        async move { handler(&ctx, event).await }
    });

    run(func).await
}
