use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

use super::{ImageStorage, IncomingFile, StorageError, UploadResult};

/// Writes uploads under a directory that the server exposes at `/uploads`.
#[derive(Debug, Clone)]
pub struct LocalDiskStorage {
    base_path: PathBuf,
}

impl LocalDiskStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self { base_path: base_path.into() }
    }

    /// `{field}-{millis}-{n}.{ext}`
    fn file_name_for(file: &IncomingFile) -> String {
        let suffix = Uuid::new_v4().as_u128() % 1_000_000_000;
        let ext = file
            .extension()
            .or_else(|| file.content_type.rsplit('/').next().map(str::to_string))
            .unwrap_or_else(|| "bin".to_string());
        format!("{}-{}-{}.{}", file.field, Utc::now().timestamp_millis(), suffix, ext)
    }
}

#[async_trait]
impl ImageStorage for LocalDiskStorage {
    async fn store(&self, file: &IncomingFile) -> Result<UploadResult, StorageError> {
        fs::create_dir_all(&self.base_path).await?;
        let name = Self::file_name_for(file);
        fs::write(self.base_path.join(&name), &file.bytes).await?;
        debug!(file = %name, bytes = file.bytes.len(), "Stored upload on disk");
        Ok(UploadResult {
            url: format!("/uploads/{}", name),
            delete_handle: Some(name),
        })
    }

    async fn delete(&self, handle: &str) -> Result<(), StorageError> {
        if handle.is_empty() || handle.contains('/') || handle.contains('\\') || handle.contains("..") {
            return Err(StorageError::InvalidHandle(handle.to_string()));
        }
        fs::remove_file(self.base_path.join(handle)).await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn upload(field: &str, name: &str) -> IncomingFile {
        IncomingFile {
            field: field.to_string(),
            file_name: name.to_string(),
            content_type: "image/png".to_string(),
            bytes: Bytes::from_static(b"\x89PNG"),
        }
    }

    #[tokio::test]
    async fn stores_and_deletes_files() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalDiskStorage::new(dir.path());

        let result = storage.store(&upload("image", "Team Photo.PNG")).await.unwrap();
        let handle = result.delete_handle.clone().unwrap();
        assert!(handle.starts_with("image-"));
        assert!(handle.ends_with(".png"));
        assert_eq!(result.url, format!("/uploads/{}", handle));
        assert!(dir.path().join(&handle).exists());

        storage.delete(&handle).await.unwrap();
        assert!(!dir.path().join(&handle).exists());
    }

    #[tokio::test]
    async fn refuses_paths_outside_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalDiskStorage::new(dir.path());
        assert!(matches!(
            storage.delete("../secrets.txt").await,
            Err(StorageError::InvalidHandle(_))
        ));
    }
}
