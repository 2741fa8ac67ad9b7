//! CheckPipeline - one end-to-end visibility check
//!
//! ## Responsibilities
//!
//! - Compose locator, extractor, oracle client, validation, decision, and
//!   dispatcher for a single run
//! - Abort the remainder of the run on any fatal stage failure (no partial
//!   notification on a failed assessment)

use crate::assessment::{self, VisibilityAssessment};
use crate::config::AppConfig;
use crate::decision::{decide, Decision};
use crate::error::Result;
use crate::frame_extractor::FrameExtractor;
use crate::notifier::NotificationDispatcher;
use crate::stream_locator::StreamLocator;
use crate::vision_client::VisionClient;

/// Summary of one completed run
#[derive(Debug)]
pub struct CheckOutcome {
    /// The assessment produced from this run's frame
    pub assessment: VisibilityAssessment,
    /// The notification decision
    pub decision: Decision,
    /// Messages actually delivered (0 when not notifying or nothing
    /// configured)
    pub notifications_sent: usize,
}

/// CheckPipeline instance
pub struct CheckPipeline {
    config: AppConfig,
    locator: StreamLocator,
    extractor: FrameExtractor,
    vision: VisionClient,
    dispatcher: NotificationDispatcher,
}

impl CheckPipeline {
    /// Build the pipeline and all components from the configuration
    ///
    /// Fails when the oracle is unconfigured; every other gap is handled
    /// per-channel at dispatch time.
    pub fn new(config: AppConfig) -> Result<Self> {
        let locator = StreamLocator::new(config.embed_url.clone());
        let extractor = FrameExtractor::new(config.capture_timeout_secs);
        let vision = VisionClient::new(&config.oracle)?;
        let dispatcher = NotificationDispatcher::new(&config);

        Ok(Self {
            config,
            locator,
            extractor,
            vision,
            dispatcher,
        })
    }

    /// Run one complete check
    pub async fn run(&self) -> Result<CheckOutcome> {
        tracing::info!("Resolving HLS stream URL");
        let hls_url = self.locator.locate().await?;

        tracing::info!("Extracting frame with ffmpeg");
        let frame = self.extractor.capture(&hls_url).await?;
        tracing::info!(size = frame.len(), "Frame captured");

        self.extractor
            .save_latest(&self.config.frame_path, &frame)
            .await?;
        tracing::info!(path = %self.config.frame_path.display(), "Frame saved");

        tracing::info!(model = %self.vision.model(), "Analyzing visibility");
        let assessment = self.vision.analyze(&frame).await?;
        tracing::info!(
            visibility_ft = assessment.estimated_visibility_ft,
            rating = assessment.rating.as_str(),
            confidence = assessment.confidence.as_str(),
            piling_count = assessment.piling_count,
            "Assessment received"
        );

        for violation in assessment::validate(&assessment) {
            tracing::warn!(violation = %violation, "Assessment violates a domain invariant");
        }

        let decision = decide(&assessment, self.config.threshold_ft);

        let notifications_sent = if decision.notify {
            tracing::info!(reason = %decision.reason, "Threshold crossed, sending notifications");
            let sent = self.dispatcher.dispatch(&assessment).await;
            tracing::info!(sent, "Notification dispatch complete");
            sent
        } else {
            tracing::info!(reason = %decision.reason, "No notification");
            0
        };

        Ok(CheckOutcome {
            assessment,
            decision,
            notifications_sent,
        })
    }
}
