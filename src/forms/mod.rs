//! Request body decoding at the API boundary.

pub mod de;

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use validator::Validate;

use crate::error::ApiError;
use crate::storage::IncomingFile;

/// A typed body sent either as JSON or as `multipart/form-data`. Multipart
/// text parts become string fields of the DTO; file parts are collected in
/// `files`.
#[derive(Debug)]
pub struct FormPayload<T> {
    pub data: T,
    pub files: Vec<IncomingFile>,
}

impl<T> FormPayload<T> {
    /// Removes and returns the file sent under `field`.
    pub fn take_file(&mut self, field: &str) -> Option<IncomingFile> {
        let index = self.files.iter().position(|f| f.field == field)?;
        Some(self.files.remove(index))
    }
}

#[async_trait]
impl<S, T> FromRequest<S> for FormPayload<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();

        let (fields, files) = if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state).await?;
            read_multipart(multipart).await?
        } else if content_type.starts_with("application/json") {
            let Json(value) = Json::<Value>::from_request(req, state).await?;
            (value, Vec::new())
        } else {
            let body = Bytes::from_request(req, state)
                .await
                .map_err(|e| ApiError::bad_request(e.to_string()))?;
            if !body.is_empty() {
                return Err(ApiError::unsupported_media_type(
                    "Expected application/json or multipart/form-data",
                ));
            }
            (Value::Object(Map::new()), Vec::new())
        };

        let data = serde_json::from_value(fields).map_err(|e| ApiError::bad_request(e.to_string()))?;
        Ok(FormPayload { data, files })
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<(Value, Vec<IncomingFile>), ApiError> {
    let mut fields = Map::new();
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await?;
                // An untouched file input still sends an empty part.
                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }
                files.push(IncomingFile { field: name, file_name, content_type, bytes });
            }
            None => {
                let text = field.text().await?;
                fields.insert(name, Value::String(text));
            }
        }
    }

    Ok((Value::Object(fields), files))
}

/// JSON body deserialized into `T` and checked with `validator`.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}
