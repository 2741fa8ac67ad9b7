//! Pier Visibility Watcher - entry point
//!
//! One invocation runs one complete check: resolve the stream, capture a
//! frame, assess visibility, decide, and notify.

use pierwatch::config::AppConfig;
use pierwatch::pipeline::CheckPipeline;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pierwatch=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting pier visibility check v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::from_env();
    tracing::info!(
        threshold_ft = config.threshold_ft,
        embed_url = %config.embed_url,
        frame_path = %config.frame_path.display(),
        email_configured = config.email.is_configured(),
        sms_configured = config.sms.is_configured(),
        "Configuration loaded"
    );

    let pipeline = CheckPipeline::new(config)?;
    let outcome = pipeline.run().await?;

    tracing::info!(
        visibility_ft = outcome.assessment.estimated_visibility_ft,
        rating = outcome.assessment.rating.as_str(),
        notify = outcome.decision.notify,
        sent = outcome.notifications_sent,
        "Check complete"
    );

    Ok(())
}
