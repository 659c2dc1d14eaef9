// Ports - Interface definitions (contracts)

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::errors::*;

/// Port for the AI collaborator that selects segments
///
/// Request and response are plain text. Implementations should bound their
/// own network time; callers additionally wrap each call in a timeout.
#[async_trait]
pub trait SelectionPort: Send + Sync {
    /// Send one request and return the raw answer text
    async fn complete(&self, request: &str) -> Result<String, DomainError>;

    /// Short name used in logs
    fn name(&self) -> &str;
}

/// One cut handed to the transcoder
#[derive(Debug, Clone, PartialEq)]
pub struct CutJob {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Start offset in seconds
    pub start: f64,
    /// Length in seconds
    pub duration: f64,
    /// Copy streams instead of re-encoding
    pub stream_copy: bool,
}

/// Port for the transcoding subprocess
#[async_trait]
pub trait TranscodePort: Send + Sync {
    /// Cut `job.start .. job.start + job.duration` into `job.output`
    async fn cut(&self, job: &CutJob) -> Result<(), DomainError>;
}

/// Port for media file probing
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Container duration in seconds
    async fn media_duration(&self, file_path: &Path) -> Result<f64, DomainError>;
}

/// Port for file system operations
#[async_trait]
pub trait FsPort: Send + Sync {
    /// Check if file exists
    async fn file_exists(&self, file_path: &Path) -> Result<bool, DomainError>;

    /// Create directory (including parent directories)
    async fn create_directory(&self, dir_path: &Path) -> Result<(), DomainError>;

    /// Size of a produced file
    async fn get_file_size(&self, file_path: &Path) -> Result<u64, DomainError>;
}
