//! FFmpeg execution adapter
//!
//! Runs one `ffmpeg` subprocess per cut.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::domain::errors::*;
use crate::ports::*;

/// FFmpeg-based execution adapter
pub struct FFmpegAdapter {
    ffmpeg_path: String,
}

impl FFmpegAdapter {
    /// Create new FFmpeg adapter
    pub fn new(ffmpeg_path: impl Into<String>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
        }
    }

    /// Command-line arguments for a cut
    ///
    /// Input seeking (`-ss` before `-i`) keeps stream copy fast; the cut then
    /// starts on the nearest preceding keyframe.
    pub fn build_args(job: &CutJob) -> Vec<String> {
        let mut args = vec![
            "-y".to_string(),
            "-hide_banner".to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
            "-ss".to_string(),
            format!("{:.3}", job.start),
            "-i".to_string(),
            job.input.to_string_lossy().to_string(),
            "-t".to_string(),
            format!("{:.3}", job.duration),
        ];

        if job.stream_copy {
            args.extend(["-c", "copy", "-avoid_negative_ts", "make_zero"].map(String::from));
        } else {
            args.extend(
                [
                    "-c:v", "libx264", "-preset", "veryfast", "-crf", "20", "-c:a", "aac",
                    "-b:a", "128k",
                ]
                .map(String::from),
            );
        }

        args.extend(["-movflags", "+faststart"].map(String::from));
        args.push(job.output.to_string_lossy().to_string());
        args
    }
}

#[async_trait]
impl TranscodePort for FFmpegAdapter {
    async fn cut(&self, job: &CutJob) -> Result<(), DomainError> {
        let args = Self::build_args(job);
        debug!(ffmpeg = %self.ffmpeg_path, args = ?args, "Launching ffmpeg");

        let output = Command::new(&self.ffmpeg_path)
            .args(&args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                DomainError::ExtractionFailed(format!(
                    "Failed to launch {}: {}",
                    self.ffmpeg_path, e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DomainError::ExtractionFailed(format!(
                "ffmpeg exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(())
    }
}
