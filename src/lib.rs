//! TrimX AI Clipper Library
//!
//! Transcript-guided clip selection with an AI collaborator, a bounded
//! repair loop for short answers, and concurrent extraction of each
//! accepted segment through an external transcoder.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use app::ClipPipeline;
pub use domain::errors::DomainError;
pub use domain::model::{
    Candidate, ClipRequest, ClipResponse, Constraints, ExtractedSegment, PipelineResult,
    Transcript, TranscriptLine,
};
pub use error::{ClipperError, ClipperResult};
