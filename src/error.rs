//! Error handling for the pier visibility watcher

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Stream locator failure (embed fetch, player-data extraction)
    #[error("Stream locator error: {0}")]
    Locator(String),

    /// Frame capture failure (ffmpeg error or timeout)
    #[error("Frame capture error: {0}")]
    Capture(String),

    /// Oracle reply parse failure (no JSON object span or missing fields)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Notification delivery failure (channel/recipient send attempt)
    #[error("Delivery error: {0}")]
    Delivery(String),

    /// Oracle API failure (non-2xx response)
    #[error("API error: {0}")]
    Api(String),

    /// Config error (required credential absent)
    #[error("Config error: {0}")]
    Config(String),

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
