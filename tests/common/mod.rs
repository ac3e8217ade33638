#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde_json::Value;
use tempfile::TempDir;

use javelin_api::auth::{hash_password, issue_token};
use javelin_api::config::AppConfig;
use javelin_api::database::models::{Role, User};
use javelin_api::database::DatabaseManager;
use javelin_api::mail::{MailError, Mailer, Notifier, OutgoingMail};
use javelin_api::storage::{ImageStorage, IncomingFile, StorageError, UploadResult};
use javelin_api::{app, AppState};

pub const ADMIN_EMAIL: &str = "admin@javelin.com";
pub const ADMIN_PASSWORD: &str = "admin123";

/// Records every store and delete instead of touching disk.
#[derive(Default)]
pub struct CountingStorage {
    stored: AtomicUsize,
    deleted: Mutex<Vec<String>>,
}

impl CountingStorage {
    pub fn stored(&self) -> usize {
        self.stored.load(Ordering::SeqCst)
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageStorage for CountingStorage {
    async fn store(&self, file: &IncomingFile) -> Result<UploadResult, StorageError> {
        let n = self.stored.fetch_add(1, Ordering::SeqCst) + 1;
        let name = format!("{}-{}.{}", file.field, n, file.extension().unwrap_or_default());
        Ok(UploadResult { url: format!("/uploads/{}", name), delete_handle: Some(name) })
    }

    async fn delete(&self, handle: &str) -> Result<(), StorageError> {
        self.deleted.lock().unwrap().push(handle.to_string());
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "counting"
    }
}

#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingMail>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(mail);
        Ok(())
    }
}

/// An API server on a free port backed by the in-memory store. Dropped with
/// the test's runtime.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub state: AppState,
    pub storage: Arc<CountingStorage>,
    pub mailer: Arc<RecordingMailer>,
    pub client: reqwest::Client,
    _uploads: TempDir,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        Self::start_with(|_| {}).await
    }

    pub async fn start_with(customize: impl FnOnce(&mut AppConfig)) -> Result<Self> {
        let uploads = tempfile::tempdir()?;
        let mut config = AppConfig::for_tests(uploads.path());
        customize(&mut config);

        let storage = Arc::new(CountingStorage::default());
        let mailer = Arc::new(RecordingMailer::default());
        let notifier = Notifier::new(
            mailer.clone(),
            Some("ops@javelin.com".to_string()),
            Some("hr@javelin.com".to_string()),
        );
        let state = AppState::new(config, DatabaseManager::memory(), storage.clone(), notifier);

        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
        let router = app(state.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        let server = Self {
            port,
            base_url: format!("http://127.0.0.1:{}", port),
            state,
            storage,
            mailer,
            client: reqwest::Client::new(),
            _uploads: uploads,
        };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/api/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// The API root the typed client expects.
    pub fn api_url(&self) -> String {
        self.url("/api")
    }

    /// Inserts a user directly and returns it.
    pub async fn create_user(&self, email: &str, password: &str, role: Role) -> Result<User> {
        let user = User::new("Test User", email, hash_password(password)?, role);
        Ok(self.state.store.users.insert(user).await?)
    }

    pub fn token_for(&self, user: &User) -> Result<String> {
        Ok(issue_token(&self.state.config.security, user.id, user.role)?)
    }

    /// A bearer token for a freshly created superadmin.
    pub async fn admin_token(&self) -> Result<String> {
        let user = self.create_user(ADMIN_EMAIL, ADMIN_PASSWORD, Role::Superadmin).await?;
        self.token_for(&user)
    }
}

/// A tiny PNG-typed file part.
pub fn png(name: &str) -> Part {
    Part::bytes(vec![0x89, b'P', b'N', b'G', 0, 0, 0, 0])
        .file_name(name.to_string())
        .mime_str("image/png")
        .unwrap()
}

pub fn pdf(name: &str) -> Part {
    Part::bytes(b"%PDF-1.4".to_vec())
        .file_name(name.to_string())
        .mime_str("application/pdf")
        .unwrap()
}

/// Text fields as a multipart form.
pub fn form(fields: &[(&str, &str)]) -> Form {
    fields
        .iter()
        .fold(Form::new(), |form, (k, v)| form.text(k.to_string(), v.to_string()))
}

pub async fn body(resp: reqwest::Response) -> Result<(StatusCode, Value)> {
    let status = resp.status();
    let json = resp.json::<Value>().await?;
    Ok((status, json))
}
