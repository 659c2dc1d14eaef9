// Domain rules - Business logic and policies

use std::path::Path;

use rand::Rng;

use crate::domain::model::*;

/// Result of filtering candidates against the run's constraints
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationOutcome {
    /// Candidates that satisfy the constraints, in input order
    pub accepted: Vec<Candidate>,
    /// Everything else, in input order
    pub rejected: Vec<Candidate>,
}

/// Business rules for candidate acceptance
pub struct CandidateValidator;

impl CandidateValidator {
    /// Check a single candidate
    ///
    /// Both bounds must be finite, `start >= 0`, `end > start`, and the
    /// duration must lie in `[min_duration, max_duration]` inclusive.
    pub fn is_valid(candidate: &Candidate, constraints: &Constraints) -> bool {
        candidate.start.is_finite()
            && candidate.end.is_finite()
            && candidate.start >= 0.0
            && candidate.end > candidate.start
            && constraints.admits(candidate.duration())
    }

    /// Stable partition of `candidates` into accepted and rejected
    pub fn validate(candidates: &[Candidate], constraints: &Constraints) -> ValidationOutcome {
        let (accepted, rejected) = candidates
            .iter()
            .cloned()
            .partition(|candidate| Self::is_valid(candidate, constraints));

        ValidationOutcome { accepted, rejected }
    }
}

/// Placeholder candidates used once the retry budget is spent
#[derive(Debug, Clone)]
pub struct FallbackSynthesizer {
    placeholder_range: f64,
    media_duration: Option<f64>,
}

impl FallbackSynthesizer {
    /// `placeholder_range` bounds the start time when the media duration is unknown
    pub fn new(placeholder_range: f64) -> Self {
        Self {
            placeholder_range,
            media_duration: None,
        }
    }

    /// Clamp synthetic clips so they end inside the media
    pub fn with_media_duration(mut self, media_duration: Option<f64>) -> Self {
        self.media_duration = media_duration.filter(|d| d.is_finite() && *d > 0.0);
        self
    }

    /// Produce exactly `count` placeholders
    pub fn synthesize<R: Rng + ?Sized>(
        &self,
        constraints: &Constraints,
        count: usize,
        rng: &mut R,
    ) -> Vec<Candidate> {
        (0..count).map(|_| self.sample(constraints, rng)).collect()
    }

    fn sample<R: Rng + ?Sized>(&self, constraints: &Constraints, rng: &mut R) -> Candidate {
        let duration = rng.gen_range(constraints.min_duration..=constraints.max_duration);

        let start_bound = match self.media_duration {
            Some(media_duration) => (media_duration - duration).max(0.0),
            None => self.placeholder_range.max(0.0),
        };
        let start = if start_bound > 0.0 {
            rng.gen_range(0.0..start_bound)
        } else {
            0.0
        };

        Candidate::synthetic(start, duration)
    }
}

/// Business rules for output file naming
pub struct OutputNamer;

impl OutputNamer {
    /// Build a collision-free clip file name
    ///
    /// `<stem>_clip_<ordinal>_<micros>_<suffix>.mp4`, ordinal is 1-based.
    pub fn clip_file_name(
        source: &Path,
        ordinal: usize,
        timestamp_micros: i64,
        suffix: u32,
    ) -> String {
        let stem = source
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .filter(|stem| !stem.is_empty())
            .unwrap_or_else(|| "source".to_string());

        format!(
            "{}_clip_{}_{}_{:08x}.mp4",
            stem, ordinal, timestamp_micros, suffix
        )
    }

    /// Public URL of a produced file
    pub fn clip_url(url_prefix: &str, file_name: &str) -> String {
        format!("{}/{}", url_prefix.trim_end_matches('/'), file_name)
    }
}
