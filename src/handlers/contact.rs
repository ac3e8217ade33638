// handlers/contact.rs - /api/contact : public messages, the company contact
// details, and the admin inbox

use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::ValidateEmail;

use super::{admin_only, find_or_404, positive_or};
use crate::app::AppState;
use crate::database::models::{Contact, ContactInfo, ContactInfoPatch, ContactStatus};
use crate::database::Document;
use crate::error::ApiError;
use crate::filter::Filter;
use crate::forms::{de, FormPayload};
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};

const NOT_FOUND: &str = "Contact message not found";
const DEFAULT_PAGE_SIZE: i64 = 20;

pub fn routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/api/contact", post(submit))
        .route("/api/contact/info", get(get_info));

    let admin = Router::new()
        .route("/api/contact/info", put(update_info))
        .route("/api/contact/admin/all", get(list_messages))
        .route("/api/contact/admin/stats", get(stats))
        .route(
            "/api/contact/admin/:id",
            get(get_message).put(update_message).delete(delete_message),
        );

    public.merge(admin_only(state, admin))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    #[serde(deserialize_with = "de::opt_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub email: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub subject: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Submitted {
    pub id: Uuid,
}

/// POST /api/contact - stores the message, then notifies the admin inbox.
pub async fn submit(State(state): State<AppState>, payload: FormPayload<ContactForm>) -> ApiResult<Submitted> {
    let form = payload.data;
    let (Some(name), Some(email), Some(subject), Some(message)) =
        (form.name, form.email, form.subject, form.message)
    else {
        return Err(ApiError::bad_request("Please provide name, email, subject, and message"));
    };
    if !email.validate_email() {
        return Err(ApiError::field_error("email", "Please provide a valid email"));
    }

    let contact = Contact::new(&name, &email, form.phone, &subject, &message);
    let contact = state.store.contacts.insert(contact).await?;
    state.notifier.contact_received(&contact).await;

    Ok(ApiResponse::created(Submitted { id: contact.id })
        .message("Your message has been sent successfully. We will get back to you soon."))
}

/// The single contact-details row, created with defaults on first use.
async fn load_or_create_info(state: &AppState) -> Result<ContactInfo, ApiError> {
    if let Some(info) = state.store.contact_info.select_one(Filter::new()).await? {
        return Ok(info);
    }
    Ok(state.store.contact_info.insert(ContactInfo::default()).await?)
}

/// GET /api/contact/info
pub async fn get_info(State(state): State<AppState>) -> ApiResult<ContactInfo> {
    Ok(ApiResponse::success(load_or_create_info(&state).await?))
}

/// PUT /api/contact/info - nested objects are merged key by key.
pub async fn update_info(
    State(state): State<AppState>,
    payload: FormPayload<ContactInfoPatch>,
) -> ApiResult<ContactInfo> {
    let mut info = load_or_create_info(&state).await?;
    info.apply_patch(payload.data)
        .map_err(|e| ApiError::bad_request(format!("Invalid contact info: {}", e)))?;
    info.touch(Utc::now());
    let info = state.store.contact_info.update(info).await?;
    Ok(ApiResponse::success(info))
}

#[derive(Debug, Default, Deserialize)]
pub struct InboxQuery {
    pub status: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// GET /api/contact/admin/all?status=&page=&limit=
pub async fn list_messages(
    State(state): State<AppState>,
    Query(query): Query<InboxQuery>,
) -> ApiResult<Vec<Contact>> {
    let page = positive_or(query.page.as_deref(), 1);
    let limit = positive_or(query.limit.as_deref(), DEFAULT_PAGE_SIZE);
    let status = query.status.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

    let filter = Filter::new().where_opt("status", status);
    let total = state.store.contacts.count(filter.clone()).await?;
    let contacts = state
        .store
        .contacts
        .select_any(filter.order("created_at desc").page(page, limit))
        .await?;

    Ok(ApiResponse::list(contacts).paginated(total, page, limit))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactStats {
    pub total: i64,
    pub unread: i64,
    pub by_status: BTreeMap<&'static str, i64>,
}

/// GET /api/contact/admin/stats - statuses with no messages are omitted
/// from `byStatus`.
pub async fn stats(State(state): State<AppState>) -> ApiResult<ContactStats> {
    let mut by_status = BTreeMap::new();
    let mut total = 0;
    for status in ContactStatus::ALL {
        let count = state
            .store
            .contacts
            .count(Filter::new().where_eq("status", *status))
            .await?;
        if count > 0 {
            by_status.insert(status.as_str(), count);
        }
        total += count;
    }
    let unread = by_status.get(ContactStatus::New.as_str()).copied().unwrap_or(0);
    Ok(ApiResponse::success(ContactStats { total, unread, by_status }))
}

/// GET /api/contact/admin/:id - opening a new message marks it read.
pub async fn get_message(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Contact> {
    let mut contact = find_or_404(state.store.contacts.as_ref(), &id, NOT_FOUND).await?;
    if contact.status == ContactStatus::New {
        contact.status = ContactStatus::Read;
        contact.touch(Utc::now());
        contact = state.store.contacts.update(contact).await?;
    }
    Ok(ApiResponse::success(contact))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContactUpdate {
    #[serde(deserialize_with = "de::opt_parsed")]
    pub status: Option<ContactStatus>,
    pub notes: Option<String>,
}

/// PUT /api/contact/admin/:id
pub async fn update_message(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    payload: FormPayload<ContactUpdate>,
) -> ApiResult<Contact> {
    let mut contact = find_or_404(state.store.contacts.as_ref(), &id, NOT_FOUND).await?;
    let update = payload.data;
    let now = Utc::now();

    if let Some(status) = update.status {
        contact.set_status(status, user.id, now);
    }
    if let Some(notes) = update.notes {
        contact.notes = Some(notes);
    }

    contact.touch(now);
    let contact = state.store.contacts.update(contact).await?;
    Ok(ApiResponse::success(contact))
}

/// DELETE /api/contact/admin/:id
pub async fn delete_message(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    let contact = find_or_404(state.store.contacts.as_ref(), &id, NOT_FOUND).await?;
    state.store.contacts.delete(contact.id).await?;
    Ok(ApiResponse::message_only("Contact message deleted successfully"))
}
