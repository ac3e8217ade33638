use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::{ImageStorage, IncomingFile, StorageError, UploadResult};

/// For hosts without a writable disk: the file is embedded in the document as
/// a `data:` URL, so there is nothing to delete later.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineStorage;

#[async_trait]
impl ImageStorage for InlineStorage {
    async fn store(&self, file: &IncomingFile) -> Result<UploadResult, StorageError> {
        let url = format!("data:{};base64,{}", file.content_type, STANDARD.encode(&file.bytes));
        Ok(UploadResult { url, delete_handle: None })
    }

    async fn delete(&self, _handle: &str) -> Result<(), StorageError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "inline"
    }
}
