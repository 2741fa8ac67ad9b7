//! StreamLocator - HLS stream URL resolution
//!
//! ## Responsibilities
//!
//! - Fetch the camera embed page
//! - Extract the player-data JSON payload from its script tag
//! - Validate and return the playable HLS URL
//!
//! The embed page carries the stream source in
//! `<script id="player-data" type="application/json">...</script>`. A
//! missing tag, invalid JSON, or a `streamSrc` that is not an HLS playlist
//! are all fatal for the run.

use crate::error::{Error, Result};
use std::time::Duration;

/// StreamLocator instance
pub struct StreamLocator {
    client: reqwest::Client,
    embed_url: String,
}

impl StreamLocator {
    /// Create a new locator for the given embed page
    pub fn new(embed_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, embed_url }
    }

    /// Resolve the playable HLS URL from the embed page
    pub async fn locate(&self) -> Result<String> {
        let resp = self.client.get(&self.embed_url).send().await?;

        if !resp.status().is_success() {
            return Err(Error::Locator(format!(
                "embed page returned {}",
                resp.status()
            )));
        }

        let html = resp.text().await?;
        let url = extract_stream_src(&html)?;

        tracing::debug!(url_prefix = %&url[..url.len().min(80)], "Resolved HLS stream URL");
        Ok(url)
    }
}

/// Extract the `streamSrc` HLS URL from the embed page HTML
///
/// Pure over the document text so it can be tested without a network.
pub fn extract_stream_src(html: &str) -> Result<String> {
    let payload = player_data_payload(html)
        .ok_or_else(|| Error::Locator("player-data script tag not found in embed page".to_string()))?;

    let player_data: serde_json::Value = serde_json::from_str(payload)
        .map_err(|e| Error::Locator(format!("player-data payload is not valid JSON: {e}")))?;

    let stream_src = player_data
        .get("streamSrc")
        .and_then(|v| v.as_str())
        .unwrap_or_default();

    if stream_src.is_empty() || !stream_src.contains("playlist.m3u8") {
        return Err(Error::Locator(
            "player data has no playable streamSrc".to_string(),
        ));
    }

    Ok(stream_src.to_string())
}

/// Slice out the JSON body of the player-data script tag
fn player_data_payload(html: &str) -> Option<&str> {
    let marker = html.find(r#"id="player-data""#)?;
    let open = html[marker..].find('>')? + marker + 1;
    let close = html[open..].find("</script>")? + open;
    Some(html[open..close].trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMBED_PAGE: &str = r#"<html><head></head><body>
        <div id="player"></div>
        <script id="player-data" type="application/json">
            {"streamSrc": "https://edge.example.com/scripps/playlist.m3u8?token=abc", "poster": "x.jpg"}
        </script>
        </body></html>"#;

    #[test]
    fn test_extracts_stream_src() {
        let url = extract_stream_src(EMBED_PAGE).unwrap();
        assert_eq!(url, "https://edge.example.com/scripps/playlist.m3u8?token=abc");
    }

    #[test]
    fn test_missing_script_tag_is_locator_error() {
        let err = extract_stream_src("<html><body>no player here</body></html>").unwrap_err();
        assert!(matches!(err, Error::Locator(_)));
    }

    #[test]
    fn test_invalid_json_is_locator_error() {
        let html = r#"<script id="player-data" type="application/json">{not json</script>"#;
        let err = extract_stream_src(html).unwrap_err();
        assert!(matches!(err, Error::Locator(_)));
    }

    #[test]
    fn test_stream_src_without_playlist_is_rejected() {
        let html = r#"<script id="player-data" type="application/json">
            {"streamSrc": "https://edge.example.com/scripps/live.mp4"}
        </script>"#;
        let err = extract_stream_src(html).unwrap_err();
        assert!(matches!(err, Error::Locator(_)));
    }

    #[test]
    fn test_missing_stream_src_is_rejected() {
        let html = r#"<script id="player-data" type="application/json">{"poster": "x.jpg"}</script>"#;
        let err = extract_stream_src(html).unwrap_err();
        assert!(matches!(err, Error::Locator(_)));
    }
}
