//! Upload storage: one [`ImageStorage`] backend is chosen at start-up.
//!
//! - [`CloudinaryStorage`] when Cloudinary credentials are configured.
//! - [`InlineStorage`] on serverless hosts, embedding the file as a data URL.
//! - [`LocalDiskStorage`] otherwise, serving files from `/uploads`.

pub mod cloudinary;
pub mod inline;
pub mod local;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tracing::info;

use crate::config::UploadConfig;

pub use cloudinary::CloudinaryStorage;
pub use inline::InlineStorage;
pub use local::LocalDiskStorage;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{0}")]
    InvalidType(String),

    #[error("File too large. Maximum size is {} MB", .0 / (1024 * 1024))]
    TooLarge(usize),

    #[error("Invalid storage handle: {0}")]
    InvalidHandle(String),

    #[error("Remote storage error: {0}")]
    Remote(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// A file received in a multipart request.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    /// Form field name, e.g. `image` or `cv`.
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl IncomingFile {
    /// Lowercased extension of the original file name, without the dot.
    pub fn extension(&self) -> Option<String> {
        std::path::Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
    }
}

/// Where a stored file can be fetched from, and the handle needed to delete it.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadResult {
    pub url: String,
    pub delete_handle: Option<String>,
}

/// Accepted file kinds and size for one upload field.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    extensions: &'static [&'static str],
    mime_types: &'static [&'static str],
    max_bytes: usize,
    rejection: &'static str,
}

impl UploadPolicy {
    pub fn images(max_bytes: usize) -> Self {
        Self {
            extensions: &["jpeg", "jpg", "png", "gif", "webp"],
            mime_types: &["image/jpeg", "image/jpg", "image/png", "image/gif", "image/webp"],
            max_bytes,
            rejection: "Only image files are allowed (jpeg, jpg, png, gif, webp)",
        }
    }

    pub fn documents(max_bytes: usize) -> Self {
        Self {
            extensions: &["jpeg", "jpg", "png", "pdf", "doc", "docx"],
            mime_types: &[
                "image/jpeg",
                "image/jpg",
                "image/png",
                "application/pdf",
                "application/msword",
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            ],
            max_bytes,
            rejection: "Invalid file type. Only JPEG, PNG, PDF, DOC, DOCX allowed.",
        }
    }

    /// Both the extension and the declared MIME type must be allowed.
    pub fn check(&self, file: &IncomingFile) -> Result<(), StorageError> {
        let ext_ok = file
            .extension()
            .map(|e| self.extensions.contains(&e.as_str()))
            .unwrap_or(false);
        let mime = file.content_type.to_ascii_lowercase();
        let mime_ok = self.mime_types.contains(&mime.as_str());
        if !ext_ok || !mime_ok {
            return Err(StorageError::InvalidType(self.rejection.to_string()));
        }
        if file.bytes.len() > self.max_bytes {
            return Err(StorageError::TooLarge(self.max_bytes));
        }
        Ok(())
    }
}

#[async_trait]
pub trait ImageStorage: Send + Sync {
    async fn store(&self, file: &IncomingFile) -> Result<UploadResult, StorageError>;

    async fn delete(&self, handle: &str) -> Result<(), StorageError>;

    fn backend(&self) -> &'static str;
}

/// Picks the backend for this process from the upload configuration.
pub fn select_backend(config: &UploadConfig) -> Arc<dyn ImageStorage> {
    let storage: Arc<dyn ImageStorage> = if let Some(cloudinary) = &config.cloudinary {
        Arc::new(CloudinaryStorage::new(cloudinary.clone()))
    } else if config.serverless {
        Arc::new(InlineStorage)
    } else {
        Arc::new(LocalDiskStorage::new(config.dir.clone()))
    };
    info!(backend = storage.backend(), "Upload storage selected");
    storage
}

/// Recovers `folder/name` from a Cloudinary delivery URL.
pub fn public_id_from_url(url: &str) -> Option<String> {
    let mut parts = url.trim_end_matches('/').rsplit('/');
    let file = parts.next().filter(|f| !f.is_empty())?;
    let folder = parts.next().filter(|f| !f.is_empty())?;
    let stem = match file.rfind('.') {
        Some(idx) if idx > 0 => &file[..idx],
        _ => file,
    };
    Some(format!("{}/{}", folder, stem))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, mime: &str, len: usize) -> IncomingFile {
        IncomingFile {
            field: "image".to_string(),
            file_name: name.to_string(),
            content_type: mime.to_string(),
            bytes: Bytes::from(vec![0u8; len]),
        }
    }

    #[test]
    fn image_policy_checks_type_and_size() {
        let policy = UploadPolicy::images(1024);
        assert!(policy.check(&file("photo.JPG", "image/jpeg", 10)).is_ok());
        assert!(matches!(
            policy.check(&file("notes.pdf", "application/pdf", 10)),
            Err(StorageError::InvalidType(_))
        ));
        assert!(matches!(
            policy.check(&file("photo.png", "text/plain", 10)),
            Err(StorageError::InvalidType(_))
        ));
        assert!(matches!(
            policy.check(&file("big.png", "image/png", 2048)),
            Err(StorageError::TooLarge(1024))
        ));
    }

    #[test]
    fn document_policy_accepts_cv_formats() {
        let policy = UploadPolicy::documents(5 * 1024 * 1024);
        assert!(policy.check(&file("cv.pdf", "application/pdf", 10)).is_ok());
        assert!(policy
            .check(&file(
                "cv.docx",
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
                10
            ))
            .is_ok());
        assert!(policy.check(&file("cv.gif", "image/gif", 10)).is_err());
    }

    #[test]
    fn public_id_is_folder_and_stem() {
        assert_eq!(
            public_id_from_url("https://res.cloudinary.com/demo/image/upload/v1712/javelin-security/abc123.jpg"),
            Some("javelin-security/abc123".to_string())
        );
        assert_eq!(public_id_from_url("logo.png"), None);
    }

    #[test]
    fn serverless_selects_inline_backend() {
        let config = UploadConfig { serverless: true, ..UploadConfig::default() };
        assert_eq!(select_backend(&config).backend(), "inline");
        assert_eq!(select_backend(&UploadConfig::default()).backend(), "local");
    }
}
