// Domain errors - Error types for the domain layer

use std::fmt;

/// Domain-specific error types
///
/// Only `BadArgs` and `FileNotFound` are fatal to a pipeline run. Every
/// other variant is recovered where it is raised and degrades the result.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Missing or malformed request fields
    BadArgs(String),
    /// File not found
    FileNotFound(String),
    /// AI collaborator could not be reached or answered with an error
    CollaboratorUnavailable(String),
    /// AI collaborator did not answer in time
    Timeout(String),
    /// Transcoding subprocess failed for one segment
    ExtractionFailed(String),
    /// Media probe failed
    ProbeFailed(String),
    /// File system operation failed
    FsFail(String),
    /// Internal error
    InternalError(String),
}

impl DomainError {
    /// Whether this error must abort the whole run
    pub fn is_fatal(&self) -> bool {
        matches!(self, DomainError::BadArgs(_) | DomainError::FileNotFound(_))
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::BadArgs(msg) => write!(f, "Bad arguments: {}", msg),
            DomainError::FileNotFound(msg) => write!(f, "File not found: {}", msg),
            DomainError::CollaboratorUnavailable(msg) => {
                write!(f, "AI collaborator unavailable: {}", msg)
            }
            DomainError::Timeout(msg) => write!(f, "Timed out: {}", msg),
            DomainError::ExtractionFailed(msg) => write!(f, "Extraction failed: {}", msg),
            DomainError::ProbeFailed(msg) => write!(f, "Probe failed: {}", msg),
            DomainError::FsFail(msg) => write!(f, "File system error: {}", msg),
            DomainError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}
