//! Pier Visibility Watcher
//!
//! Single-shot agent that checks the Scripps Pier underwater camera and
//! notifies subscribers when visibility crosses a configured threshold.
//!
//! ## Architecture (7 Components)
//!
//! 1. AppConfig - environment-sourced configuration, built once
//! 2. StreamLocator - embed page to playable HLS URL
//! 3. FrameExtractor - one JPEG frame via ffmpeg with a bounded timeout
//! 4. VisionClient - visibility oracle adapter with a lenient reply parser
//! 5. Assessment - typed domain model with advisory invariant validation
//! 6. Decision - confidence gate + threshold comparison
//! 7. NotificationDispatcher - isolated email/SMS fan-out
//!
//! ## Design Principles
//!
//! - One run, one linear pipeline; any fatal stage failure aborts the rest
//! - Components receive explicit config, never ambient env reads
//! - A channel without credentials is a no-op, not an error

pub mod assessment;
pub mod config;
pub mod decision;
pub mod error;
pub mod frame_extractor;
pub mod notifier;
pub mod pipeline;
pub mod stream_locator;
pub mod vision_client;

pub use error::{Error, Result};
