//! NotificationDispatcher - multi-channel fan-out
//!
//! ## Responsibilities
//!
//! - Fan out one assessment to every configured channel
//! - Channel isolation: a failing or unconfigured channel never aborts its
//!   siblings
//! - Aggregate sent count across channels
//!
//! Each channel resolves its own recipients and formats its own message
//! body from the same read-only assessment. A channel without credentials
//! is a benign no-op, not an error.

pub mod email;
pub mod sms;

use crate::assessment::VisibilityAssessment;
use crate::config::AppConfig;
use self::email::EmailChannel;
use self::sms::SmsChannel;
use chrono_tz::America::Los_Angeles;

/// NotificationDispatcher instance
pub struct NotificationDispatcher {
    email: EmailChannel,
    sms: SmsChannel,
}

impl NotificationDispatcher {
    /// Build the dispatcher and its channels from the configuration
    pub fn new(config: &AppConfig) -> Self {
        Self {
            email: EmailChannel::new(config.email.clone()),
            sms: SmsChannel::new(config.sms.clone()),
        }
    }

    /// Attempt delivery across all channels
    ///
    /// Returns the count of messages actually sent. Channel-level failures
    /// are logged and do not propagate; the count only reflects successful
    /// sends.
    pub async fn dispatch(&self, assessment: &VisibilityAssessment) -> usize {
        let mut sent = 0;

        match self.email.send_notifications(assessment).await {
            Ok(n) => sent += n,
            Err(e) => {
                tracing::error!(channel = "email", error = %e, "Channel delivery failed");
            }
        }

        match self.sms.send_notifications(assessment).await {
            Ok(n) => sent += n,
            Err(e) => {
                tracing::error!(channel = "sms", error = %e, "Channel delivery failed");
            }
        }

        sent
    }
}

/// Localized short timestamp for message bodies, e.g. "3:04 PM PT"
pub(crate) fn pacific_time_label() -> String {
    let now = chrono::Utc::now().with_timezone(&Los_Angeles);
    format!("{} PT", now.format("%-I:%M %p"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::{Confidence, PilingLabel, Rating};
    use crate::config::{EmailConfig, SmsConfig};

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

    fn unconfigured() -> NotificationDispatcher {
        NotificationDispatcher {
            email: EmailChannel::new(EmailConfig {
                resend_api_key: None,
                from: "Pier Cam <onboarding@resend.dev>".to_string(),
                supabase_url: None,
                supabase_service_role_key: None,
                static_recipients: vec!["a@example.com".to_string()],
            }),
            sms: SmsChannel::new(SmsConfig {
                account_sid: None,
                auth_token: None,
                from_number: None,
                recipients: vec!["+15550001111".to_string()],
            }),
        }
    }

    #[tokio::test]
    async fn test_no_configured_channels_sends_zero() {
        let sent = unconfigured().dispatch(&assessment()).await;
        assert_eq!(sent, 0);
    }

    #[test]
    fn test_pacific_time_label_shape() {
        let label = pacific_time_label();
        assert!(label.ends_with(" PT"));
        assert!(label.contains(':'));
        assert!(label.contains('M'));
    }
}
