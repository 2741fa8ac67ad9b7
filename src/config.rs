//! Application configuration
//!
//! ## Responsibilities
//!
//! - Read all environment-sourced settings once at process start
//! - Hand each component an explicit config slice (no ambient env reads)
//! - Report per-channel configured/unconfigured state

use std::path::PathBuf;

/// Default embed page carrying the player-data payload
const DEFAULT_EMBED_URL: &str =
    "https://hdontap.com/stream/018408/scripps-pier-underwater-live-webcam/embed/";

/// Default notification threshold in feet
const DEFAULT_THRESHOLD_FT: f64 = 15.0;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Visibility threshold in feet; notify at or above this value
    pub threshold_ft: f64,
    /// Embed page URL to resolve the HLS stream from
    pub embed_url: String,
    /// Where the captured frame is written after each run
    pub frame_path: PathBuf,
    /// ffmpeg wall-clock timeout in seconds
    pub capture_timeout_secs: u64,
    /// Vision oracle credentials
    pub oracle: OracleConfig,
    /// Email channel credentials and recipients
    pub email: EmailConfig,
    /// SMS channel credentials and recipients
    pub sms: SmsConfig,
}

/// Vision oracle (Anthropic Messages API) configuration
#[derive(Debug, Clone)]
pub struct OracleConfig {
    /// API key; the run cannot produce an assessment without one
    pub api_key: Option<String>,
    /// Model id
    pub model: String,
    /// API base URL
    pub base_url: String,
}

/// Email channel (Resend + Supabase subscriber store) configuration
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// Resend API key; channel is a no-op without one
    pub resend_api_key: Option<String>,
    /// Sender identity
    pub from: String,
    /// Supabase project URL for the managed subscriber store
    pub supabase_url: Option<String>,
    /// Supabase service-role key
    pub supabase_service_role_key: Option<String>,
    /// Static fallback recipient list
    pub static_recipients: Vec<String>,
}

impl EmailConfig {
    /// Channel can attempt delivery (recipients are resolved later)
    pub fn is_configured(&self) -> bool {
        self.resend_api_key.is_some()
    }
}

/// SMS channel (Twilio) configuration
#[derive(Debug, Clone)]
pub struct SmsConfig {
    /// Twilio account SID
    pub account_sid: Option<String>,
    /// Twilio auth token
    pub auth_token: Option<String>,
    /// Sending number
    pub from_number: Option<String>,
    /// Static recipient list
    pub recipients: Vec<String>,
}

impl SmsConfig {
    /// Channel can attempt delivery; all credentials and at least one
    /// recipient are required
    pub fn is_configured(&self) -> bool {
        self.account_sid.is_some()
            && self.auth_token.is_some()
            && self.from_number.is_some()
            && !self.recipients.is_empty()
    }
}

impl AppConfig {
    /// Build the configuration from environment variables
    ///
    /// Missing or unparseable values fall back to defaults; absent channel
    /// credentials leave that channel unconfigured rather than failing.
    pub fn from_env() -> Self {
        Self {
            threshold_ft: std::env::var("VISIBILITY_THRESHOLD_FT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_THRESHOLD_FT),
            embed_url: std::env::var("EMBED_URL").unwrap_or_else(|_| DEFAULT_EMBED_URL.to_string()),
            frame_path: std::env::var("FRAME_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("latest-frame.jpg")),
            capture_timeout_secs: std::env::var("CAPTURE_TIMEOUT_SEC")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            oracle: OracleConfig {
                api_key: std::env::var("ANTHROPIC_API_KEY").ok(),
                model: std::env::var("ANTHROPIC_MODEL")
                    .unwrap_or_else(|_| "claude-sonnet-4-5-20250929".to_string()),
                base_url: std::env::var("ANTHROPIC_BASE_URL")
                    .unwrap_or_else(|_| "https://api.anthropic.com".to_string()),
            },
            email: EmailConfig {
                resend_api_key: std::env::var("RESEND_API_KEY").ok(),
                from: std::env::var("EMAIL_FROM")
                    .unwrap_or_else(|_| "Pier Cam <onboarding@resend.dev>".to_string()),
                supabase_url: std::env::var("SUPABASE_URL").ok(),
                supabase_service_role_key: std::env::var("SUPABASE_SERVICE_ROLE_KEY").ok(),
                static_recipients: parse_list(std::env::var("NOTIFY_EMAILS").ok()),
            },
            sms: SmsConfig {
                account_sid: std::env::var("TWILIO_ACCOUNT_SID").ok(),
                auth_token: std::env::var("TWILIO_AUTH_TOKEN").ok(),
                from_number: std::env::var("TWILIO_FROM_NUMBER").ok(),
                recipients: parse_list(std::env::var("NOTIFY_PHONE_NUMBERS").ok()),
            },
        }
    }
}

/// Split a comma-separated recipient list, trimming whitespace and
/// dropping empty entries
fn parse_list(raw: Option<String>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .collect()
    })
    .unwrap_or_default()
}
