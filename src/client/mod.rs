//! Typed HTTP client for the API, used by the `javelin` CLI.
//!
//! The bearer token comes from a [`SessionStore`] and is attached only when it
//! has the three-part JWT shape. A 401 on an authenticated call clears the
//! stored session and surfaces as [`ClientError::SessionExpired`].

pub mod booking;
pub mod session;

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::auth::looks_like_jwt;
use crate::database::models::{
    Appointment, AppointmentStatus, Contact, ContactInfo, GalleryItem, NewsPostView, Site, TeamMember, User,
};

pub use booking::{BookingConfirmation, BookingDetails, BookingStep, BookingWizard};
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionError, SessionStore};

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Session expired, please log in again")]
    SessionExpired,

    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },

    #[error("Please complete the '{0}' step first")]
    IncompleteStep(&'static str),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// The `{ success, data, ... }` body every endpoint returns.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub count: Option<i64>,
    pub total: Option<i64>,
    pub pages: Option<i64>,
    pub current_page: Option<i64>,
}

impl<T> Envelope<T> {
    pub fn into_data(self) -> Result<T, ClientError> {
        self.data.ok_or_else(|| ClientError::Decode("response has no data".to_string()))
    }
}

/// One page of a paginated listing.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub pages: i64,
    pub current_page: i64,
}

impl<T> TryFrom<Envelope<Vec<T>>> for Page<T> {
    type Error = ClientError;

    fn try_from(envelope: Envelope<Vec<T>>) -> Result<Self, Self::Error> {
        let total = envelope.total.unwrap_or(0);
        let pages = envelope.pages.unwrap_or(0);
        let current_page = envelope.current_page.unwrap_or(1);
        Ok(Page { items: envelope.into_data()?, total, pages, current_page })
    }
}

#[derive(Debug, Clone, Deserialize)]
struct LoginData {
    token: String,
    user: User,
}

#[derive(Debug, Clone, Deserialize)]
struct Created {
    id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<dyn SessionStore>,
}

impl ApiClient {
    /// `base_url` is the API root, e.g. `http://localhost:5000/api`.
    pub fn new(base_url: impl Into<String>, session: Arc<dyn SessionStore>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send<T, B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<Envelope<T>, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.request(method.clone(), &url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let mut authenticated = false;
        if let Some(session) = self.session.load().await? {
            if looks_like_jwt(&session.token) {
                request = request.bearer_auth(&session.token);
                authenticated = true;
            }
        }

        debug!(%method, %url, authenticated, "API request");
        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if status == StatusCode::UNAUTHORIZED && authenticated {
            self.session.clear().await?;
            return Err(ClientError::SessionExpired);
        }

        if !status.is_success() {
            return Err(ClientError::Api { status: status.as_u16(), message: error_message(status, &bytes) });
        }

        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<Envelope<T>, ClientError> {
        self.send::<T, Value>(Method::GET, path, query, None).await
    }

    // Auth

    /// Signs in and stores the session.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        let body = json!({ "email": email, "password": password });
        let data: LoginData = self.send(Method::POST, "/auth/login", &[], Some(&body)).await?.into_data()?;
        let session = Session::new(data.token, Some(data.user));
        self.session.save(&session).await?;
        Ok(session)
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        Ok(self.session.clear().await?)
    }

    pub async fn me(&self) -> Result<User, ClientError> {
        self.get("/auth/me", &[]).await?.into_data()
    }

    pub async fn health(&self) -> Result<Value, ClientError> {
        self.get("/health", &[]).await?.into_data()
    }

    // Public content

    pub async fn team(&self) -> Result<Vec<TeamMember>, ClientError> {
        self.get("/team", &[]).await?.into_data()
    }

    pub async fn sites(&self) -> Result<Vec<Site>, ClientError> {
        self.get("/sites", &[]).await?.into_data()
    }

    pub async fn gallery(&self, category: Option<&str>) -> Result<Vec<GalleryItem>, ClientError> {
        let query: Vec<(&str, String)> = category.map(|c| ("category", c.to_string())).into_iter().collect();
        self.get("/gallery", &query).await?.into_data()
    }

    pub async fn news(&self, page: i64, limit: i64) -> Result<Page<NewsPostView>, ClientError> {
        let query = [("page", page.to_string()), ("limit", limit.to_string())];
        Page::try_from(self.get::<Vec<NewsPostView>>("/news", &query).await?)
    }

    pub async fn news_by_slug(&self, slug: &str) -> Result<NewsPostView, ClientError> {
        self.get(&format!("/news/slug/{}", slug), &[]).await?.into_data()
    }

    pub async fn contact_info(&self) -> Result<ContactInfo, ClientError> {
        self.get("/contact/info", &[]).await?.into_data()
    }

    /// Returns the stored message id.
    pub async fn submit_contact(&self, request: &ContactRequest) -> Result<Uuid, ClientError> {
        let created: Created = self.send(Method::POST, "/contact", &[], Some(request)).await?.into_data()?;
        Ok(created.id)
    }

    pub async fn book_appointment(&self, details: &BookingDetails) -> Result<Appointment, ClientError> {
        self.send(Method::POST, "/appointments", &[], Some(details)).await?.into_data()
    }

    // Admin

    pub async fn contacts(&self, status: Option<&str>, page: i64) -> Result<Page<Contact>, ClientError> {
        let mut query = vec![("page", page.to_string())];
        if let Some(status) = status {
            query.push(("status", status.to_string()));
        }
        Page::try_from(self.get::<Vec<Contact>>("/contact/admin/all", &query).await?)
    }

    pub async fn contact_stats(&self) -> Result<Value, ClientError> {
        self.get("/contact/admin/stats", &[]).await?.into_data()
    }

    pub async fn appointments(&self, status: Option<&str>) -> Result<Vec<Appointment>, ClientError> {
        let query: Vec<(&str, String)> = status.map(|s| ("status", s.to_string())).into_iter().collect();
        self.get("/appointments", &query).await?.into_data()
    }

    pub async fn appointment_stats(&self) -> Result<Value, ClientError> {
        self.get("/appointments/stats", &[]).await?.into_data()
    }

    pub async fn set_appointment_status(&self, id: Uuid, status: AppointmentStatus) -> Result<Appointment, ClientError> {
        let body = json!({ "status": status });
        self.send(Method::PUT, &format!("/appointments/{}", id), &[], Some(&body))
            .await?
            .into_data()
    }
}

/// The server's `message`, falling back to the HTTP reason phrase.
fn error_message(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_server_text() {
        let body = br#"{"success":false,"message":"Invalid credentials"}"#;
        assert_eq!(error_message(StatusCode::UNAUTHORIZED, body), "Invalid credentials");
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, b"<html>"), "Bad Gateway");
    }

    #[test]
    fn paginated_envelope_becomes_page() {
        let envelope: Envelope<Vec<i32>> = serde_json::from_value(json!({
            "success": true, "count": 2, "total": 12, "pages": 6, "currentPage": 2, "data": [1, 2]
        }))
        .unwrap();
        let page = Page::try_from(envelope).unwrap();
        assert_eq!(page.items, vec![1, 2]);
        assert_eq!((page.total, page.pages, page.current_page), (12, 6, 2));
    }
}
