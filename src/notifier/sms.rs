//! SMS channel (Twilio)
//!
//! Recipients come from the static NOTIFY_PHONE_NUMBERS list only; the
//! channel is unconfigured unless all credentials, the sending number, and
//! at least one recipient are present. One compact message per recipient;
//! a failed recipient is logged and skipped.

use super::pacific_time_label;
use crate::assessment::VisibilityAssessment;
use crate::config::SmsConfig;
use crate::error::{Error, Result};
use std::time::Duration;

const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";

/// SMS channel instance
pub struct SmsChannel {
    client: reqwest::Client,
    config: SmsConfig,
}

impl SmsChannel {
    /// Create the channel from its configuration
    pub fn new(config: SmsConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Send one SMS per configured recipient, returning the sent count
    pub async fn send_notifications(&self, assessment: &VisibilityAssessment) -> Result<usize> {
        if !self.config.is_configured() {
            tracing::info!("Twilio credentials not configured, skipping SMS");
            return Ok(0);
        }

        // is_configured() guarantees these are present
        let sid = self.config.account_sid.as_deref().unwrap_or_default();
        let token = self.config.auth_token.as_deref().unwrap_or_default();
        let from = self.config.from_number.as_deref().unwrap_or_default();

        let body = format_message(assessment);

        let mut sent = 0;
        for to in &self.config.recipients {
            match self.send_one(sid, token, from, to, &body).await {
                Ok(()) => {
                    sent += 1;
                    tracing::info!(recipient = %to, "SMS sent");
                }
                Err(e) => {
                    tracing::error!(recipient = %to, error = %e, "SMS delivery failed, continuing");
                }
            }
        }

        Ok(sent)
    }

    /// Send one message via the Twilio API
    async fn send_one(
        &self,
        sid: &str,
        token: &str,
        from: &str,
        to: &str,
        body: &str,
    ) -> Result<()> {
        let url = format!("{}/Accounts/{}/Messages.json", TWILIO_API_BASE, sid);
        let params = [("To", to), ("From", from), ("Body", body)];

        let resp = self
            .client
            .post(&url)
            .basic_auth(sid, Some(token))
            .form(&params)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(Error::Delivery(format!(
                "Twilio returned {}: {}",
                status, text
            )));
        }

        Ok(())
    }
}

/// Compact three-line message body
fn format_message(assessment: &VisibilityAssessment) -> String {
    [
        format!(
            "Scripps Pier: {}",
            assessment.rating.as_str().to_uppercase()
        ),
        format!(
            "~{}ft vis, {} pilings ({})",
            assessment.estimated_visibility_ft,
            assessment.piling_count,
            assessment.piling_list()
        ),
        pacific_time_label(),
    ]
    .join("\n")
}
