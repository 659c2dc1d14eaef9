// Local file system adapter

use std::path::Path;

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::ports::*;

/// File system adapter backed by `tokio::fs`
pub struct LocalFsAdapter;

impl LocalFsAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFsAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FsPort for LocalFsAdapter {
    async fn file_exists(&self, file_path: &Path) -> Result<bool, DomainError> {
        match tokio::fs::metadata(file_path).await {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(DomainError::FsFail(format!(
                "Failed to stat {}: {}",
                file_path.display(),
                e
            ))),
        }
    }

    async fn create_directory(&self, dir_path: &Path) -> Result<(), DomainError> {
        tokio::fs::create_dir_all(dir_path).await.map_err(|e| {
            DomainError::FsFail(format!(
                "Failed to create directory {}: {}",
                dir_path.display(),
                e
            ))
        })
    }

    async fn get_file_size(&self, file_path: &Path) -> Result<u64, DomainError> {
        tokio::fs::metadata(file_path)
            .await
            .map(|metadata| metadata.len())
            .map_err(|e| {
                DomainError::FsFail(format!("Failed to stat {}: {}", file_path.display(), e))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_exists_and_size() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("source.mp4");
        std::fs::write(&file, b"0123456789").unwrap();

        let fs = LocalFsAdapter::new();
        assert!(fs.file_exists(&file).await.unwrap());
        assert!(!fs.file_exists(&dir.path().join("missing.mp4")).await.unwrap());
        assert!(!fs.file_exists(dir.path()).await.unwrap());
        assert_eq!(fs.get_file_size(&file).await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_create_nested_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("public").join("videos");

        LocalFsAdapter::new().create_directory(&nested).await.unwrap();
        assert!(nested.is_dir());
    }
}
