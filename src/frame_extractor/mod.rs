//! FrameExtractor - one still frame from the HLS stream
//!
//! ## Responsibilities
//!
//! - ffmpeg frame grab from the resolved HLS URL
//! - Bounded wall-clock timeout with process cleanup
//! - Transient artifact handling and latest-frame persistence

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::fs;
use tokio::process::Command;

/// FrameExtractor instance
pub struct FrameExtractor {
    /// Directory for the transient capture artifact
    temp_dir: PathBuf,
    /// ffmpeg timeout in seconds
    timeout_secs: u64,
}

impl FrameExtractor {
    /// Create a new extractor writing transient frames under the OS temp dir
    pub fn new(timeout_secs: u64) -> Self {
        Self {
            temp_dir: std::env::temp_dir(),
            timeout_secs,
        }
    }

    /// Capture one JPEG frame from the stream
    ///
    /// Uses kill_on_drop(true) so that when the timeout fires and the future
    /// is cancelled, the dropped Child sends SIGKILL to ffmpeg. This prevents
    /// zombie ffmpeg processes from accumulating when the stream stalls.
    pub async fn capture(&self, hls_url: &str) -> Result<Vec<u8>> {
        let out_path = self.temp_dir.join(format!(
            "pier-cam-{}.jpg",
            chrono::Utc::now().timestamp_millis()
        ));

        let child = Command::new("ffmpeg")
            .args([
                "-y",
                "-i",
                hls_url,
                "-frames:v",
                "1",
                "-f",
                "image2",
            ])
            .arg(&out_path)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::Capture(format!("ffmpeg spawn failed: {e}")))?;

        let timeout = Duration::from_secs(self.timeout_secs);

        match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => {
                if !output.status.success() {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    let _ = fs::remove_file(&out_path).await;
                    return Err(Error::Capture(format!(
                        "ffmpeg failed: {}",
                        stderr.trim()
                    )));
                }
            }
            Ok(Err(e)) => {
                let _ = fs::remove_file(&out_path).await;
                return Err(Error::Capture(format!("ffmpeg execution failed: {e}")));
            }
            Err(_) => {
                // Future cancelled, Child dropped, SIGKILL sent via kill_on_drop
                tracing::warn!(
                    timeout_sec = self.timeout_secs,
                    "ffmpeg timeout, process killed via kill_on_drop"
                );
                let _ = fs::remove_file(&out_path).await;
                return Err(Error::Capture(format!(
                    "ffmpeg timeout ({}s)",
                    self.timeout_secs
                )));
            }
        }

        let data = fs::read(&out_path)
            .await
            .map_err(|e| Error::Capture(format!("captured frame unreadable: {e}")))?;

        // Transient artifact; cleanup failure is non-fatal
        let _ = fs::remove_file(&out_path).await;

        if data.is_empty() {
            return Err(Error::Capture("ffmpeg produced an empty frame".to_string()));
        }

        Ok(data)
    }

    /// Persist the captured frame to the fixed output path
    pub async fn save_latest(&self, path: &Path, data: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        fs::write(path, data).await?;

        tracing::debug!(
            path = %path.display(),
            size = data.len(),
            "Saved latest frame"
        );

        Ok(())
    }
}
