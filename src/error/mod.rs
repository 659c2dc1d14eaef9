//! Error handling module for the clipper boundary

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Errors raised outside the pipeline itself: request files, configuration
/// and wiring
#[derive(Error, Debug)]
pub enum ClipperError {
    /// Request file could not be read
    #[error("Failed to read request file {path}: {source}")]
    RequestRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Request file is not a valid clip request
    #[error("Invalid request file {path}: {message}")]
    RequestParse { path: String, message: String },

    /// Configuration file or override is invalid
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// Pipeline or adapter error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for clipper boundary operations
pub type ClipperResult<T> = std::result::Result<T, ClipperError>;
