use std::sync::Arc;
use std::time::Duration;

use crate::adapters::toml_config::ClipperConfig;
use crate::adapters::{FFmpegAdapter, FFprobeAdapter, GeminiAdapter, LocalFsAdapter};
use crate::app::pipeline_interactor::{ClipPipeline, PipelineSettings};
use crate::app::segment_extractor::{ExtractorSettings, SegmentExtractor};
use crate::domain::errors::DomainError;
use crate::ports::{FsPort, ProbePort, SelectionPort, TranscodePort};

pub trait AppContainer: Send + Sync {
    fn clip_pipeline(&self) -> Arc<ClipPipeline>;
}

pub struct DefaultAppContainer {
    clip_pipeline: Arc<ClipPipeline>,
}

impl DefaultAppContainer {
    /// Wire production adapters; the AI client is built here once
    pub fn new(config: &ClipperConfig) -> Result<Self, DomainError> {
        let selection_port: Arc<dyn SelectionPort> = Arc::new(GeminiAdapter::new(&config.ai)?);
        Ok(Self::with_selection_port(config, selection_port))
    }

    /// Wire production adapters around a given AI collaborator
    pub fn with_selection_port(
        config: &ClipperConfig,
        selection_port: Arc<dyn SelectionPort>,
    ) -> Self {
        let transcode_port: Arc<dyn TranscodePort> =
            Arc::new(FFmpegAdapter::new(config.extract.ffmpeg_path.clone()));
        let probe_port: Arc<dyn ProbePort> =
            Arc::new(FFprobeAdapter::new(config.extract.ffprobe_path.clone()));
        let fs_port: Arc<dyn FsPort> = Arc::new(LocalFsAdapter::new());

        let extractor = SegmentExtractor::new(
            transcode_port,
            Arc::clone(&fs_port),
            ExtractorSettings {
                output_dir: config.extract.output_dir.clone(),
                url_prefix: config.extract.url_prefix.clone(),
                stream_copy: config.extract.stream_copy,
                concurrency: config.extract.concurrency,
            },
        );

        let clip_pipeline = Arc::new(ClipPipeline::new(
            selection_port,
            probe_port,
            fs_port,
            extractor,
            PipelineSettings {
                max_retries: config.pipeline.max_retries,
                ai_timeout: Duration::from_secs(config.ai.timeout_secs),
                fallback_start_range: config.pipeline.fallback_start_range,
                media_dir: config.extract.media_dir.clone(),
            },
        ));

        Self { clip_pipeline }
    }
}

impl AppContainer for DefaultAppContainer {
    fn clip_pipeline(&self) -> Arc<ClipPipeline> {
        Arc::clone(&self.clip_pipeline)
    }
}
