use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use super::{public_id_from_url, ImageStorage, IncomingFile, StorageError, UploadResult};
use crate::config::CloudinaryConfig;

const API_BASE: &str = "https://api.cloudinary.com/v1_1";
const IMAGE_TRANSFORMATION: &str = "c_limit,h_1200,w_1200/q_auto";

/// Signed uploads to Cloudinary. Images are limited to 1200x1200 with
/// automatic quality; other files go up as raw resources.
pub struct CloudinaryStorage {
    config: CloudinaryConfig,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    url: Option<String>,
    public_id: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl CloudinaryStorage {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self { config, client: reqwest::Client::new() }
    }

    /// SHA-256 over the sorted `key=value` pairs followed by the API secret.
    fn sign(&self, params: &[(&str, String)]) -> String {
        let mut sorted: Vec<_> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
        sorted.sort_by(|a, b| a.0.cmp(b.0));
        let joined = sorted
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        let digest = Sha256::digest(format!("{}{}", joined, self.config.api_secret).as_bytes());
        digest.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Handles are normally public ids; records that only kept the delivery URL
    /// are mapped back to `folder/name`.
    fn public_id(handle: &str) -> Result<String, StorageError> {
        if handle.starts_with("http://") || handle.starts_with("https://") {
            public_id_from_url(handle).ok_or_else(|| StorageError::InvalidHandle(handle.to_string()))
        } else {
            Ok(handle.to_string())
        }
    }

    fn endpoint(&self, resource_type: &str, action: &str) -> String {
        format!("{}/{}/{}/{}", API_BASE, self.config.cloud_name, resource_type, action)
    }

    async fn error_message(response: reqwest::Response) -> String {
        let status = response.status();
        match response.json::<ErrorResponse>().await {
            Ok(body) => body.error.message,
            Err(_) => format!("HTTP {}", status),
        }
    }
}

#[async_trait]
impl ImageStorage for CloudinaryStorage {
    async fn store(&self, file: &IncomingFile) -> Result<UploadResult, StorageError> {
        let is_image = file.content_type.starts_with("image/");
        let resource_type = if is_image { "image" } else { "raw" };
        let timestamp = Utc::now().timestamp().to_string();

        let mut params = vec![
            ("folder", self.config.folder.clone()),
            ("timestamp", timestamp.clone()),
        ];
        if is_image {
            params.push(("transformation", IMAGE_TRANSFORMATION.to_string()));
        }
        let signature = self.sign(&params);

        let part = Part::bytes(file.bytes.to_vec())
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)?;
        let mut form = Form::new()
            .part("file", part)
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");
        for (key, value) in params {
            form = form.text(key, value);
        }

        let response = self
            .client
            .post(self.endpoint(resource_type, "upload"))
            .multipart(form)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(StorageError::Remote(Self::error_message(response).await));
        }

        let body: UploadResponse = response.json().await?;
        let url = body
            .secure_url
            .or(body.url)
            .ok_or_else(|| StorageError::Remote("upload response had no URL".to_string()))?;
        debug!(public_id = %body.public_id, "Uploaded to Cloudinary");
        Ok(UploadResult { url, delete_handle: Some(body.public_id) })
    }

    async fn delete(&self, handle: &str) -> Result<(), StorageError> {
        let public_id = Self::public_id(handle)?;
        let timestamp = Utc::now().timestamp().to_string();
        let params = [("public_id", public_id.clone()), ("timestamp", timestamp.clone())];
        let signature = self.sign(&params);

        let form = [
            ("public_id", public_id.clone()),
            ("timestamp", timestamp),
            ("api_key", self.config.api_key.clone()),
            ("signature", signature),
            ("signature_algorithm", "sha256".to_string()),
        ];
        let response = self
            .client
            .post(self.endpoint("image", "destroy"))
            .form(&form)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(StorageError::Remote(Self::error_message(response).await));
        }

        let body: DestroyResponse = response.json().await?;
        if body.result != "ok" {
            warn!(public_id = %public_id, result = %body.result, "Cloudinary destroy did not remove the asset");
        }
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "cloudinary"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> CloudinaryStorage {
        CloudinaryStorage::new(CloudinaryConfig {
            cloud_name: "demo".to_string(),
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
            folder: "javelin-security".to_string(),
        })
    }

    #[test]
    fn signature_sorts_params_and_skips_empty_values() {
        let s = storage();
        let a = s.sign(&[("timestamp", "1".to_string()), ("folder", "f".to_string())]);
        let b = s.sign(&[
            ("folder", "f".to_string()),
            ("timestamp", "1".to_string()),
            ("eager", String::new()),
        ]);
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);

        let expected: String = Sha256::digest(b"folder=f&timestamp=1secret")
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect();
        assert_eq!(a, expected);
    }

    #[test]
    fn delivery_urls_resolve_to_public_ids() {
        assert_eq!(CloudinaryStorage::public_id("javelin-security/abc123").unwrap(), "javelin-security/abc123");
        assert_eq!(
            CloudinaryStorage::public_id("https://res.cloudinary.com/demo/image/upload/v1712/javelin-security/abc123.jpg")
                .unwrap(),
            "javelin-security/abc123"
        );
        assert!(matches!(
            CloudinaryStorage::public_id("https://"),
            Err(StorageError::InvalidHandle(_))
        ));
    }

    #[test]
    fn endpoints_include_cloud_and_resource_type() {
        assert_eq!(
            storage().endpoint("image", "destroy"),
            "https://api.cloudinary.com/v1_1/demo/image/destroy"
        );
    }
}
