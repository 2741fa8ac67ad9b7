//! Email channel (Resend)
//!
//! Recipient resolution with fallback: the managed Supabase subscriber
//! store is queried first; on error or zero rows the static NOTIFY_EMAILS
//! list applies. Both empty means a configured-but-idle channel, which is
//! a no-op. One message per recipient; a failed recipient is logged and
//! skipped so the rest of the list still receives mail.

use super::pacific_time_label;
use crate::assessment::VisibilityAssessment;
use crate::config::EmailConfig;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

/// Resend send request
#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
}

/// Subscriber row from the managed store
#[derive(Debug, Deserialize)]
struct SubscriberRow {
    email: String,
}

/// Email channel instance
pub struct EmailChannel {
    client: reqwest::Client,
    config: EmailConfig,
}

impl EmailChannel {
    /// Create the channel from its configuration
    pub fn new(config: EmailConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Send one email per resolved recipient, returning the sent count
    pub async fn send_notifications(&self, assessment: &VisibilityAssessment) -> Result<usize> {
        let Some(api_key) = self.config.resend_api_key.as_deref() else {
            tracing::info!("Resend API key not configured, skipping email");
            return Ok(0);
        };

        let recipients = self.resolve_recipients().await;
        if recipients.is_empty() {
            tracing::info!("No email subscribers found, skipping email");
            return Ok(0);
        }

        let subject = format_subject(assessment);
        let body = format_body(assessment);

        let mut sent = 0;
        for to in &recipients {
            match self.send_one(api_key, to, &subject, &body).await {
                Ok(()) => {
                    sent += 1;
                    tracing::info!(recipient = %to, "Email sent");
                }
                Err(e) => {
                    tracing::error!(recipient = %to, error = %e, "Email delivery failed, continuing");
                }
            }
        }

        Ok(sent)
    }

    /// Resolve recipients: managed store first, then the static list
    async fn resolve_recipients(&self) -> Vec<String> {
        let store_rows = if let (Some(url), Some(key)) = (
            self.config.supabase_url.as_deref(),
            self.config.supabase_service_role_key.as_deref(),
        ) {
            match self.fetch_subscribers(url, key).await {
                Ok(rows) => Some(rows),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to fetch subscribers, using static list");
                    None
                }
            }
        } else {
            None
        };

        apply_fallback(store_rows, &self.config.static_recipients)
    }

    /// Query the subscriber store for email addresses
    async fn fetch_subscribers(&self, base_url: &str, key: &str) -> Result<Vec<String>> {
        let url = format!("{}/rest/v1/subscribers?select=email", base_url);
        let resp = self
            .client
            .get(&url)
            .header("apikey", key)
            .bearer_auth(key)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(Error::Delivery(format!(
                "subscriber store returned {}",
                resp.status()
            )));
        }

        let rows: Vec<SubscriberRow> = resp.json().await?;
        Ok(rows.into_iter().map(|r| r.email).collect())
    }

    /// Send one message via the Resend API
    async fn send_one(&self, api_key: &str, to: &str, subject: &str, text: &str) -> Result<()> {
        let request = SendEmailRequest {
            from: &self.config.from,
            to: [to],
            subject,
            text,
        };

        let resp = self
            .client
            .post(RESEND_ENDPOINT)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Delivery(format!(
                "Resend returned {}: {}",
                status, body
            )));
        }

        Ok(())
    }
}

/// Pick the recipient list: store rows when the lookup succeeded and
/// returned any, otherwise the static list. `None` means the store was
/// unavailable or unconfigured.
fn apply_fallback(store_rows: Option<Vec<String>>, static_list: &[String]) -> Vec<String> {
    match store_rows {
        Some(rows) if !rows.is_empty() => rows,
        _ => static_list.to_vec(),
    }
}

/// Rating-coded subject line
fn format_subject(assessment: &VisibilityAssessment) -> String {
    format!(
        "Scripps Pier: {} — ~{}ft visibility",
        assessment.rating.as_str().to_uppercase(),
        assessment.estimated_visibility_ft
    )
}

/// Full narrative plaintext body
fn format_body(assessment: &VisibilityAssessment) -> String {
    [
        format!(
            "Visibility: ~{}ft ({})",
            assessment.estimated_visibility_ft,
            assessment.rating.as_str()
        ),
        format!(
            "Pilings visible: {} ({})",
            assessment.piling_count,
            assessment.piling_list()
        ),
        assessment.description.clone(),
        "Scripps Cam: https://coollab.ucsd.edu/pierviz/".to_string(),
        String::new(),
        pacific_time_label(),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::{Confidence, PilingLabel, Rating};

    fn assessment() -> VisibilityAssessment {
        VisibilityAssessment {
            description: "Back left piling faintly visible".to_string(),
            piling_count: 3,
            visible_pilings: vec![PilingLabel::CloseR, PilingLabel::BackR, PilingLabel::BackL],
            estimated_visibility_ft: 20.0,
            rating: Rating::Excellent,
            confidence: Confidence::High,
        }
    }

    #[test]
    fn test_subject_is_rating_coded() {
        let subject = format_subject(&assessment());
        assert_eq!(subject, "Scripps Pier: EXCELLENT — ~20ft visibility");
    }

    #[test]
    fn test_body_carries_all_assessment_fields() {
        let body = format_body(&assessment());
        assert!(body.contains("Visibility: ~20ft (excellent)"));
        assert!(body.contains("Pilings visible: 3 (close R, back R, back L)"));
        assert!(body.contains("Back left piling faintly visible"));
        assert!(body.contains("Scripps Cam:"));
        assert!(body.trim_end().ends_with("PT"));
    }

    #[tokio::test]
    async fn test_unconfigured_channel_is_noop() {
        let channel = EmailChannel::new(EmailConfig {
            resend_api_key: None,
            from: "Pier Cam <onboarding@resend.dev>".to_string(),
            supabase_url: None,
            supabase_service_role_key: None,
            static_recipients: vec!["a@example.com".to_string()],
        });
        let sent = channel.send_notifications(&assessment()).await.unwrap();
        assert_eq!(sent, 0);
    }

    #[tokio::test]
    async fn test_static_list_applies_without_store_config() {
        let channel = EmailChannel::new(EmailConfig {
            resend_api_key: Some("re_test".to_string()),
            from: "Pier Cam <onboarding@resend.dev>".to_string(),
            supabase_url: None,
            supabase_service_role_key: None,
            static_recipients: vec!["a@example.com".to_string(), "b@example.com".to_string()],
        });
        let recipients = channel.resolve_recipients().await;
        assert_eq!(recipients, vec!["a@example.com", "b@example.com"]);
    }

    #[test]
    fn test_store_rows_win_when_present() {
        let statics = vec!["fallback@example.com".to_string()];
        let rows = vec!["member@example.com".to_string()];
        assert_eq!(apply_fallback(Some(rows.clone()), &statics), rows);
    }

    #[test]
    fn test_zero_store_rows_fall_back_to_static_list() {
        let statics = vec!["fallback@example.com".to_string()];
        assert_eq!(apply_fallback(Some(vec![]), &statics), statics);
    }

    #[test]
    fn test_store_unavailable_falls_back_to_static_list() {
        let statics = vec!["fallback@example.com".to_string()];
        assert_eq!(apply_fallback(None, &statics), statics);
    }

    #[test]
    fn test_both_sources_empty_resolves_nobody() {
        assert!(apply_fallback(Some(vec![]), &[]).is_empty());
    }

    #[tokio::test]
    async fn test_no_recipients_resolves_empty() {
        let channel = EmailChannel::new(EmailConfig {
            resend_api_key: Some("re_test".to_string()),
            from: "Pier Cam <onboarding@resend.dev>".to_string(),
            supabase_url: None,
            supabase_service_role_key: None,
            static_recipients: vec![],
        });
        let sent = channel.send_notifications(&assessment()).await.unwrap();
        assert_eq!(sent, 0);
    }
}
