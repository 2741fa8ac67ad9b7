//! VisionClient - visibility oracle adapter
//!
//! ## Responsibilities
//!
//! - Submit the captured frame to the Anthropic Messages API with the fixed
//!   domain prompt (landmark distances, counting rules, rating and
//!   confidence bands, required output schema)
//! - Tolerant parsing of the free-text reply into a typed assessment
//!
//! The oracle is non-deterministic and only loosely schema-constrained by
//! its prompt, so the client accepts formatting noise around the JSON but
//! rejects anything that does not deserialize into the assessment schema.

pub mod parser;

use crate::assessment::VisibilityAssessment;
use crate::config::OracleConfig;
use crate::error::{Error, Result};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 300;

const SYSTEM_PROMPT: &str = r#"You are an underwater visibility analyst for the Scripps Pier camera in La Jolla, CA.

The camera is mounted underwater on the pier. It sees specific pilings at known positions:

RIGHT SIDE OF FRAME:
- Right close piling: ~4ft (1.2m) from camera — always visible unless very poor conditions
- Right back piling: ~11ft (3.4m) from camera — visible in fair+ conditions

LEFT SIDE OF FRAME:
- Back left piling: ~14ft (4.3m) from camera — only visible in calm, clear water
- Far left piling: ~30ft (9m) from camera — rarely visible, exceptional conditions only

WHAT PILINGS LOOK LIKE: Pilings appear as dark vertical columns or rectangular shapes, often covered in marine growth (algae, barnacles). The closest piling will be large, dark, and sharp. Pilings further away appear as fainter, blurrier dark vertical silhouettes — they may blend into the murky background but are still countable. Do NOT mistake horizontal features (pipes, cables, the seafloor) for pilings — pilings are always vertical.

COUNTING INSTRUCTIONS: Carefully scan the entire frame from right to left. You should expect to see up to 4 pilings at different distances. Pilings further from the camera will appear smaller, fainter, and more blurred, but a faint/hazy piling still counts — it proves visibility extends to at least that distance. Count every distinct dark vertical shape that could be a piling, even if it is partially obscured or blurry.

HARD CONSTRAINT: Your visibility estimate MUST NOT exceed the distance of the farthest piling you can clearly see. If you only see the 2 right-side pilings, visibility cannot exceed ~14ft. If you cannot see the back left piling, do not estimate above 14ft.

Visibility rating scale:
- "poor": 0–4ft (can't even see the closest right piling clearly, or no pilings visible)
- "fair": 4–11ft (right close piling visible, right back piling faint or invisible)
- "good": 11–14ft (both right pilings clearly visible, back left piling may be faintly visible)
- "excellent": 14–30ft (back left piling clearly visible; if far left piling visible, exceptional)

Confidence levels:
- "high": Clear daytime image, pilings are visible and countable
- "medium": Image is somewhat murky but pilings are partially distinguishable
- "low": Nighttime, camera offline, error overlay, completely dark, or cannot determine conditions

Respond ONLY with valid JSON matching this schema:
{
  "description": "Brief description of what you see in the image",
  "pilingCount": <number of clearly visible pilings, 0 if none>,
  "visiblePilings": <subset of ["close R", "back R", "back L", "far L"] that are visible>,
  "estimatedVisibilityFt": <estimated visibility in feet>,
  "rating": "poor" | "fair" | "good" | "excellent",
  "confidence": "low" | "medium" | "high"
}"#;

const USER_PROMPT: &str = "Analyze this Scripps Pier underwater camera frame. Count how many pier pilings you can see, estimate the underwater visibility distance in feet, and rate the conditions. Respond with JSON only.";

/// Messages API request body
#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<RequestMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'a str,
    content: Vec<ContentBlock<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ContentBlock<'a> {
    Image { source: ImageSource },
    Text { text: &'a str },
}

#[derive(Debug, Serialize)]
struct ImageSource {
    #[serde(rename = "type")]
    kind: &'static str,
    media_type: &'static str,
    data: String,
}

/// Messages API response body (only the fields the client consumes)
#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ResponseBlock>,
}

#[derive(Debug, Deserialize)]
struct ResponseBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

/// Visibility oracle client
#[derive(Debug)]
pub struct VisionClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl VisionClient {
    /// Create a new client from the oracle configuration
    ///
    /// Fails when no API key is configured; the pipeline cannot produce an
    /// assessment without the oracle.
    pub fn new(config: &OracleConfig) -> Result<Self> {
        Self::with_timeout(config, Duration::from_secs(60))
    }

    /// Create a new client with a custom request timeout
    pub fn with_timeout(config: &OracleConfig, timeout: Duration) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| Error::Config("ANTHROPIC_API_KEY not configured".to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.clone(),
        })
    }

    /// Submit a JPEG frame and return the parsed visibility assessment
    pub async fn analyze(&self, image: &[u8]) -> Result<VisibilityAssessment> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(image);

        let request = MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            system: SYSTEM_PROMPT,
            messages: vec![RequestMessage {
                role: "user",
                content: vec![
                    ContentBlock::Image {
                        source: ImageSource {
                            kind: "base64",
                            media_type: "image/jpeg",
                            data: encoded,
                        },
                    },
                    ContentBlock::Text { text: USER_PROMPT },
                ],
            }],
        };

        let url = format!("{}/v1/messages", self.base_url);
        let resp = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api(format!(
                "oracle request failed: {} - {}",
                status, body
            )));
        }

        let result: MessagesResponse = resp.json().await?;

        let reply = result
            .content
            .iter()
            .find(|b| b.kind == "text")
            .map(|b| b.text.as_str())
            .ok_or_else(|| Error::Parse("oracle reply contained no text block".to_string()))?;

        tracing::debug!(model = %self.model, reply_len = reply.len(), "Oracle reply received");

        parser::extract_assessment(reply)
    }

    /// Model id in use
    pub fn model(&self) -> &str {
        &self.model
    }
}
