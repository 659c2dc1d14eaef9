//! FFprobe adapter for media file probing

use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;

use crate::domain::errors::*;
use crate::ports::*;

/// FFprobe-based probe adapter
pub struct FFprobeAdapter {
    ffprobe_path: String,
}

impl FFprobeAdapter {
    /// Create new FFprobe adapter
    pub fn new(ffprobe_path: impl Into<String>) -> Self {
        Self {
            ffprobe_path: ffprobe_path.into(),
        }
    }

    /// Parse the single value printed by `-show_entries format=duration`
    pub fn parse_duration(stdout: &str) -> Result<f64, DomainError> {
        let value = stdout.trim();
        let seconds: f64 = value.parse().map_err(|_| {
            DomainError::ProbeFailed(format!("Unexpected duration output: {:?}", value))
        })?;

        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(DomainError::ProbeFailed(format!(
                "Unusable media duration: {}",
                seconds
            )));
        }
        Ok(seconds)
    }
}

#[async_trait]
impl ProbePort for FFprobeAdapter {
    async fn media_duration(&self, file_path: &Path) -> Result<f64, DomainError> {
        let output = Command::new(&self.ffprobe_path)
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(file_path)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                DomainError::ProbeFailed(format!("Failed to launch {}: {}", self.ffprobe_path, e))
            })?;

        if !output.status.success() {
            return Err(DomainError::ProbeFailed(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        Self::parse_duration(&String::from_utf8_lossy(&output.stdout))
    }
}
