// Pipeline interactor - Orchestrates selection, repair and extraction

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::app::repair_controller::{selection_round, RepairController, RepairPolicy};
use crate::app::segment_extractor::SegmentExtractor;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::prompt::PromptBuilder;
use crate::domain::rules::FallbackSynthesizer;
use crate::ports::*;

/// Run-wide policy taken from configuration
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub max_retries: u32,
    pub ai_timeout: Duration,
    pub fallback_start_range: f64,
    /// Fallback lookup directory for relative source references
    pub media_dir: PathBuf,
}

/// Render the initial selection request without running anything
pub fn preview_selection_request(request: &ClipRequest) -> Result<String, DomainError> {
    let constraints = request.constraints()?;
    Ok(PromptBuilder::new(&request.transcript, &request.intent, &constraints).selection_request())
}

/// Find the source file as given, else by file name in `media_dir`
pub async fn resolve_source(
    fs_port: &dyn FsPort,
    media_dir: &Path,
    reference: &str,
) -> Result<PathBuf, DomainError> {
    let direct = PathBuf::from(reference.trim());
    if fs_port.file_exists(&direct).await? {
        return Ok(direct);
    }

    if let Some(file_name) = Path::new(reference.trim()).file_name() {
        let in_media_dir = media_dir.join(file_name);
        if fs_port.file_exists(&in_media_dir).await? {
            return Ok(in_media_dir);
        }
    }

    Err(DomainError::FileNotFound(format!(
        "Source media {} (also looked in {})",
        reference,
        media_dir.display()
    )))
}

/// Interactor for the clip generation use case
pub struct ClipPipeline {
    selection_port: Arc<dyn SelectionPort>,
    probe_port: Arc<dyn ProbePort>,
    fs_port: Arc<dyn FsPort>,
    extractor: SegmentExtractor,
    settings: PipelineSettings,
    seed: Option<u64>,
}

impl ClipPipeline {
    /// Create new pipeline with injected ports
    pub fn new(
        selection_port: Arc<dyn SelectionPort>,
        probe_port: Arc<dyn ProbePort>,
        fs_port: Arc<dyn FsPort>,
        extractor: SegmentExtractor,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            selection_port,
            probe_port,
            fs_port,
            extractor,
            settings,
            seed: None,
        }
    }

    /// Fix the fallback random source, for reproducible runs
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Execute one run
    ///
    /// Fails only on malformed input. Collaborator and transcoder problems
    /// degrade the result instead; check `PipelineResult::is_partial`.
    pub async fn execute(&self, request: &ClipRequest) -> Result<PipelineResult, DomainError> {
        let started = Instant::now();
        let constraints = request.constraints()?;
        let source = resolve_source(
            self.fs_port.as_ref(),
            &self.settings.media_dir,
            &request.source_media_ref,
        )
        .await?;
        let expected = constraints.expected_total();

        info!(
            source = %source.display(),
            expected,
            segments = constraints.segment_count,
            variations = constraints.variation_count,
            min_duration = constraints.min_duration,
            max_duration = constraints.max_duration,
            "Starting clip generation"
        );
        if request.transcript.is_empty() {
            warn!("Transcript is empty, selection will likely fall back to placeholders");
        }

        let media_duration = match self.probe_port.media_duration(&source).await {
            Ok(duration) => Some(duration),
            Err(e) => {
                debug!(error = %e, "Media duration unavailable, using transcript span");
                request.transcript.span_end()
            }
        };

        let builder = PromptBuilder::new(&request.transcript, &request.intent, &constraints);
        let initial = selection_round(
            self.selection_port.as_ref(),
            &builder.selection_request(),
            self.settings.ai_timeout,
            &constraints,
        )
        .await;
        info!(
            accepted = initial.accepted.len(),
            rejected = initial.rejected.len(),
            expected,
            "Initial selection validated"
        );

        let controller = RepairController::new(
            Arc::clone(&self.selection_port),
            RepairPolicy {
                max_retries: self.settings.max_retries,
                call_timeout: self.settings.ai_timeout,
            },
        );
        let synthesizer = FallbackSynthesizer::new(self.settings.fallback_start_range)
            .with_media_duration(media_duration);
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let repaired = controller
            .repair(&builder, &constraints, initial.accepted, &synthesizer, &mut rng)
            .await;

        let segments = self.extractor.extract(&source, &repaired.candidates).await;
        let result = PipelineResult::new(
            expected,
            segments,
            repaired.retries_used,
            repaired.synthesized,
        );

        if result.is_partial() {
            warn!(
                produced = result.produced_total,
                requested = result.requested_total,
                "Clip generation finished with partial success"
            );
        } else {
            info!(
                produced = result.produced_total,
                retries = result.retries_used,
                synthesized = result.synthesized,
                elapsed_secs = started.elapsed().as_secs_f64(),
                "Clip generation completed"
            );
        }

        Ok(result)
    }
}
