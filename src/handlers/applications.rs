// handlers/applications.rs - /api/applications : recruitment submissions

use axum::{
    extract::{DefaultBodyLimit, State},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::{admin_only, store_upload};
use crate::app::AppState;
use crate::database::models::JobApplication;
use crate::filter::Filter;
use crate::forms::{de, FormPayload};
use crate::middleware::{ApiResponse, ApiResult};
use crate::storage::UploadPolicy;

/// Multipart file fields accepted with an application.
const DOCUMENT_FIELDS: [&str; 3] = ["passport", "cv", "idCard"];

/// Room for the text fields and multipart framing around the documents.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Every document may reach the per-file limit, so the body cap scales with it.
fn body_limit(max_file_bytes: usize) -> usize {
    max_file_bytes
        .saturating_mul(DOCUMENT_FIELDS.len())
        .saturating_add(FORM_OVERHEAD_BYTES)
}

pub fn routes(state: &AppState) -> Router<AppState> {
    let limit = body_limit(state.config.uploads.max_file_bytes);
    let public = Router::new().route(
        "/api/applications",
        post(submit).layer(DefaultBodyLimit::max(limit)),
    );
    let admin = Router::new().route("/api/applications", get(list_applications));
    public.merge(admin_only(state, admin))
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct ApplicationForm {
    #[serde(deserialize_with = "de::opt_string")]
    #[validate(required(message = "Full name is required"))]
    pub full_name: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    #[validate(
        required(message = "Valid email is required"),
        email(message = "Valid email is required")
    )]
    pub email: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    #[validate(required(message = "Phone number is required"))]
    pub phone: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    #[validate(required(message = "State is required"))]
    pub state: Option<String>,
    #[serde(deserialize_with = "de::opt_i32")]
    #[validate(
        required(message = "Age must be between 18 and 65"),
        range(min = 18, max = 65, message = "Age must be between 18 and 65")
    )]
    pub age: Option<i32>,
    #[serde(deserialize_with = "de::opt_string")]
    #[validate(required(message = "Position is required"))]
    pub position: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub experience: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Submitted {
    pub id: Uuid,
}

/// POST /api/applications - documents are checked before any is stored.
pub async fn submit(
    State(state): State<AppState>,
    mut payload: FormPayload<ApplicationForm>,
) -> ApiResult<Submitted> {
    payload.data.validate()?;

    let policy = UploadPolicy::documents(state.config.uploads.max_file_bytes);
    let files: Vec<_> = DOCUMENT_FIELDS.iter().map(|field| payload.take_file(field)).collect();
    for file in files.iter().flatten() {
        policy.check(file)?;
    }

    let mut stored = Vec::with_capacity(files.len());
    for file in files {
        stored.push(match file {
            Some(file) => Some(store_upload(&state, &file, &policy).await?.url),
            None => None,
        });
    }
    let mut stored = stored.into_iter();

    let form = payload.data;
    let now = Utc::now();
    let application = JobApplication {
        id: Uuid::new_v4(),
        full_name: form.full_name.unwrap_or_default(),
        email: form.email.unwrap_or_default().to_lowercase(),
        phone: form.phone.unwrap_or_default(),
        state: form.state.unwrap_or_default(),
        age: form.age.unwrap_or_default(),
        position: form.position.unwrap_or_default(),
        experience: form.experience,
        message: form.message,
        passport: stored.next().flatten(),
        cv: stored.next().flatten(),
        id_card: stored.next().flatten(),
        submitted_at: now,
        created_at: now,
        updated_at: now,
    };

    let application = state.store.applications.insert(application).await?;
    info!(application_id = %application.id, position = %application.position, "Job application received");
    state.notifier.application_received(&application).await;

    Ok(ApiResponse::created(Submitted { id: application.id })
        .message("Application submitted successfully! We will review and contact you soon."))
}

/// GET /api/applications - newest first
pub async fn list_applications(State(state): State<AppState>) -> ApiResult<Vec<JobApplication>> {
    let applications = state
        .store
        .applications
        .select_any(Filter::new().order("submitted_at desc"))
        .await?;
    Ok(ApiResponse::list(applications))
}
