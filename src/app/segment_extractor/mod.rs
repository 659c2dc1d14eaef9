// Segment extractor - Cuts accepted candidates into clip files

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use futures_util::stream::{self, StreamExt};
use tracing::{error, info, warn};

use crate::domain::model::*;
use crate::domain::rules::OutputNamer;
use crate::ports::*;

/// Shortest cut handed to the transcoder, in seconds
pub const MIN_CUT_SECONDS: f64 = 1.0;

/// Where and how clips are written
#[derive(Debug, Clone)]
pub struct ExtractorSettings {
    pub output_dir: PathBuf,
    pub url_prefix: String,
    pub stream_copy: bool,
    /// Transcoding subprocesses running at once
    pub concurrency: usize,
}

/// Fans candidates out to the transcoder on a bounded pool
pub struct SegmentExtractor {
    transcode_port: Arc<dyn TranscodePort>,
    fs_port: Arc<dyn FsPort>,
    settings: ExtractorSettings,
}

impl SegmentExtractor {
    pub fn new(
        transcode_port: Arc<dyn TranscodePort>,
        fs_port: Arc<dyn FsPort>,
        settings: ExtractorSettings,
    ) -> Self {
        Self {
            transcode_port,
            fs_port,
            settings,
        }
    }

    pub fn settings(&self) -> &ExtractorSettings {
        &self.settings
    }

    /// Extract every candidate, keeping the ones that succeed
    ///
    /// Each candidate gets its own subprocess. A failure is logged and only
    /// removes that segment; the rest still run. Result order follows
    /// candidate order regardless of completion order.
    pub async fn extract(&self, source: &Path, candidates: &[Candidate]) -> Vec<ExtractedSegment> {
        if let Err(e) = self.fs_port.create_directory(&self.settings.output_dir).await {
            // Individual cuts will fail and be reported below.
            warn!(error = %e, "Could not prepare output directory");
        }

        let total = candidates.len();
        let started = Instant::now();

        let segments: Vec<ExtractedSegment> = stream::iter(candidates.iter().enumerate())
            .map(|(index, candidate)| self.extract_one(source, index, total, candidate))
            .buffered(self.settings.concurrency.max(1))
            .filter_map(|segment| async move { segment })
            .collect()
            .await;

        info!(
            produced = segments.len(),
            requested = total,
            elapsed_secs = started.elapsed().as_secs_f64(),
            "Segment extraction finished"
        );
        segments
    }

    async fn extract_one(
        &self,
        source: &Path,
        index: usize,
        total: usize,
        candidate: &Candidate,
    ) -> Option<ExtractedSegment> {
        let file_name = OutputNamer::clip_file_name(
            source,
            index + 1,
            Utc::now().timestamp_micros(),
            rand::random::<u32>(),
        );
        let output = self.settings.output_dir.join(&file_name);

        let job = CutJob {
            input: source.to_path_buf(),
            output: output.clone(),
            start: candidate.start,
            duration: candidate.duration().max(MIN_CUT_SECONDS),
            stream_copy: self.settings.stream_copy,
        };

        match self.transcode_port.cut(&job).await {
            Ok(()) => {
                let bytes = self.fs_port.get_file_size(&output).await.unwrap_or(0);
                info!(
                    clip_index = index + 1,
                    total,
                    start = job.start,
                    duration = job.duration,
                    bytes,
                    synthetic = candidate.is_synthetic(),
                    output = %output.display(),
                    "Clip created"
                );
                Some(ExtractedSegment {
                    output_ref: OutputNamer::clip_url(&self.settings.url_prefix, &file_name),
                    output_path: output,
                    start: candidate.start,
                    end: candidate.end,
                    reason: candidate.reason.clone(),
                })
            }
            Err(e) => {
                error!(
                    clip_index = index + 1,
                    total,
                    error = %e,
                    "Segment extraction failed"
                );
                None
            }
        }
    }
}
