// Domain models - Core types and data structures

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Reason attached to every synthesized placeholder candidate
pub const FALLBACK_REASON: &str = "Fallback auto-generated clip to fill gap.";

/// Upper bound on `segment_count * variation_count` for one run
pub const MAX_EXPECTED_TOTAL: u64 = 100;

/// One timed line of the transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptLine {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl TranscriptLine {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }
}

/// Ordered transcript of the source media, produced upstream
///
/// Deserializes from a bare array of lines or from the transcript
/// provider's `{"captions": [...]}` envelope.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "TranscriptWire")]
pub struct Transcript {
    lines: Vec<TranscriptLine>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TranscriptWire {
    Lines(Vec<TranscriptLine>),
    Wrapped { captions: Vec<TranscriptLine> },
}

impl From<TranscriptWire> for Transcript {
    fn from(wire: TranscriptWire) -> Self {
        match wire {
            TranscriptWire::Lines(lines) => Self { lines },
            TranscriptWire::Wrapped { captions } => Self { lines: captions },
        }
    }
}

impl Transcript {
    pub fn new(lines: Vec<TranscriptLine>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[TranscriptLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// End of the last line, if any
    pub fn span_end(&self) -> Option<f64> {
        self.lines.iter().map(|line| line.end).reduce(f64::max)
    }
}

/// Numeric policy for one pipeline run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraints {
    pub min_duration: f64,
    pub max_duration: f64,
    pub segment_count: u32,
    pub variation_count: u32,
}

impl Constraints {
    /// Create constraints with validation
    pub fn new(
        min_duration: f64,
        max_duration: f64,
        segment_count: u32,
        variation_count: u32,
    ) -> Result<Self, DomainError> {
        if !min_duration.is_finite() || !max_duration.is_finite() {
            return Err(DomainError::BadArgs(
                "Duration bounds must be finite numbers".to_string(),
            ));
        }
        if min_duration < 0.0 {
            return Err(DomainError::BadArgs(
                "Minimum duration cannot be negative".to_string(),
            ));
        }
        if min_duration >= max_duration {
            return Err(DomainError::BadArgs(format!(
                "Minimum duration ({}) must be less than maximum duration ({})",
                min_duration, max_duration
            )));
        }
        if segment_count == 0 {
            return Err(DomainError::BadArgs(
                "Segment count must be positive".to_string(),
            ));
        }
        if variation_count == 0 {
            return Err(DomainError::BadArgs(
                "Variation count must be positive".to_string(),
            ));
        }
        let expected_total = u64::from(segment_count) * u64::from(variation_count);
        if expected_total > MAX_EXPECTED_TOTAL {
            return Err(DomainError::BadArgs(format!(
                "Segment count ({}) times variation count ({}) exceeds {}",
                segment_count, variation_count, MAX_EXPECTED_TOTAL
            )));
        }

        Ok(Self {
            min_duration,
            max_duration,
            segment_count,
            variation_count,
        })
    }

    /// Create constraints from a `[min, max]` duration range
    pub fn from_range(
        range: &[f64],
        segment_count: u32,
        variation_count: u32,
    ) -> Result<Self, DomainError> {
        match range {
            [min, max] => Self::new(*min, *max, segment_count, variation_count),
            _ => Err(DomainError::BadArgs(format!(
                "Duration range must be [min, max], got {} value(s)",
                range.len()
            ))),
        }
    }

    /// Number of segments the run must deliver
    pub fn expected_total(&self) -> usize {
        self.segment_count as usize * self.variation_count as usize
    }

    /// Whether a duration lies inside the inclusive bound
    pub fn admits(&self, duration: f64) -> bool {
        duration >= self.min_duration && duration <= self.max_duration
    }
}

/// Proposed time range for a clip, not yet materialized
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub start: f64,
    pub end: f64,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_clip_id: Option<i64>,
}

impl Candidate {
    pub fn new(start: f64, end: f64, reason: impl Into<String>) -> Self {
        Self {
            start,
            end,
            reason: reason.into(),
            source_clip_id: None,
        }
    }

    pub fn with_source_clip(mut self, clip_id: Option<i64>) -> Self {
        self.source_clip_id = clip_id;
        self
    }

    /// Placeholder candidate produced after the retry budget is spent
    pub fn synthetic(start: f64, duration: f64) -> Self {
        Self::new(start, start + duration, FALLBACK_REASON)
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn is_synthetic(&self) -> bool {
        self.reason == FALLBACK_REASON
    }
}

/// A candidate that was successfully cut into its own file
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedSegment {
    /// Public location of the produced file
    pub output_ref: String,
    pub output_path: PathBuf,
    pub start: f64,
    pub end: f64,
    pub reason: String,
}

/// Outcome of one pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineResult {
    pub requested_total: usize,
    pub produced_total: usize,
    pub segments: Vec<ExtractedSegment>,
    /// Repair calls made after the initial selection call
    pub retries_used: u32,
    /// Placeholder candidates that went into extraction
    pub synthesized: usize,
}

impl PipelineResult {
    pub fn new(
        requested_total: usize,
        mut segments: Vec<ExtractedSegment>,
        retries_used: u32,
        synthesized: usize,
    ) -> Self {
        segments.truncate(requested_total);
        Self {
            requested_total,
            produced_total: segments.len(),
            segments,
            retries_used,
            synthesized,
        }
    }

    /// Some accepted candidates could not be extracted
    pub fn is_partial(&self) -> bool {
        self.produced_total < self.requested_total
    }

    /// Convert into the caller-facing wire shape
    pub fn to_response(&self) -> ClipResponse {
        ClipResponse {
            success: true,
            total: self.produced_total,
            expected: self.requested_total,
            clips: self
                .segments
                .iter()
                .map(|segment| ClipEntry {
                    clip_url: segment.output_ref.clone(),
                    start: segment.start,
                    end: segment.end,
                    reason: segment.reason.clone(),
                })
                .collect(),
        }
    }
}

fn default_duration_range() -> Vec<f64> {
    vec![10.0, 30.0]
}

fn default_count() -> u32 {
    1
}

/// Caller-facing request for one pipeline run
///
/// Field aliases keep request bodies written for the web route working.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipRequest {
    #[serde(default, alias = "prompt")]
    pub intent: String,
    #[serde(default, alias = "videoPath")]
    pub source_media_ref: String,
    #[serde(default, alias = "captions")]
    pub transcript: Transcript,
    #[serde(default = "default_duration_range", alias = "range")]
    pub duration_range: Vec<f64>,
    #[serde(default = "default_count", alias = "variations")]
    pub variation_count: u32,
    #[serde(default = "default_count", alias = "number_clips")]
    pub segment_count: u32,
}

impl ClipRequest {
    /// Check required fields and derive the run's constraints
    pub fn constraints(&self) -> Result<Constraints, DomainError> {
        if self.intent.trim().is_empty() {
            return Err(DomainError::BadArgs("Missing intent".to_string()));
        }
        if self.source_media_ref.trim().is_empty() {
            return Err(DomainError::BadArgs(
                "Missing source media reference".to_string(),
            ));
        }
        Constraints::from_range(
            &self.duration_range,
            self.segment_count,
            self.variation_count,
        )
    }
}

/// One produced clip on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipEntry {
    pub clip_url: String,
    pub start: f64,
    pub end: f64,
    pub reason: String,
}

/// Caller-facing response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipResponse {
    pub success: bool,
    pub total: usize,
    pub expected: usize,
    pub clips: Vec<ClipEntry>,
}

/// Caller-facing hard failure
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: String,
}

impl ErrorResponse {
    pub fn new(details: impl Into<String>) -> Self {
        Self {
            error: "Clip generation failed".to_string(),
            details: details.into(),
        }
    }

    pub fn from_error(error: &DomainError) -> Self {
        Self::new(error.to_string())
    }
}
