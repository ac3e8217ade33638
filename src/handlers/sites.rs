// handlers/sites.rs - /api/sites

use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use sqlx::types::Json;
use validator::Validate;

use super::{admin_only, discard_upload, find_or_404, image_policy, store_upload};
use crate::app::AppState;
use crate::database::models::{Coordinates, Site};
use crate::database::Document;
use crate::error::ApiError;
use crate::filter::Filter;
use crate::forms::{de, FormPayload};
use crate::middleware::{ApiResponse, ApiResult};

const NOT_FOUND: &str = "Site not found";
const ORDERING: &str = "display_order asc, created_at desc";

pub fn routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/api/sites", get(list_active))
        .route("/api/sites/:id", get(get_site));

    let admin = Router::new()
        .route("/api/sites", post(create_site))
        .route("/api/sites/admin/all", get(list_all))
        .route("/api/sites/:id", put(update_site).delete(delete_site));

    public.merge(admin_only(state, admin))
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteForm {
    #[serde(deserialize_with = "de::opt_string")]
    #[validate(required(message = "Site name is required"))]
    pub name: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    #[validate(required(message = "Location is required"))]
    pub location: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    #[validate(required(message = "Description is required"))]
    pub description: Option<String>,
    #[serde(deserialize_with = "de::opt_string_list")]
    pub services: Option<Vec<String>>,
    #[serde(deserialize_with = "de::opt_json")]
    pub coordinates: Option<Coordinates>,
    #[serde(deserialize_with = "de::opt_i32")]
    pub order: Option<i32>,
    #[serde(deserialize_with = "de::opt_bool")]
    pub is_active: Option<bool>,
}

/// GET /api/sites
pub async fn list_active(State(state): State<AppState>) -> ApiResult<Vec<Site>> {
    let sites = state
        .store
        .sites
        .select_any(Filter::new().where_eq("is_active", true).order(ORDERING))
        .await?;
    Ok(ApiResponse::list(sites))
}

/// GET /api/sites/admin/all
pub async fn list_all(State(state): State<AppState>) -> ApiResult<Vec<Site>> {
    let sites = state.store.sites.select_any(Filter::new().order(ORDERING)).await?;
    Ok(ApiResponse::list(sites))
}

/// GET /api/sites/:id
pub async fn get_site(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Site> {
    let site = find_or_404(state.store.sites.as_ref(), &id, NOT_FOUND).await?;
    Ok(ApiResponse::success(site))
}

/// POST /api/sites - requires an `image` file.
pub async fn create_site(State(state): State<AppState>, mut payload: FormPayload<SiteForm>) -> ApiResult<Site> {
    payload.data.validate()?;
    let file = payload
        .take_file("image")
        .ok_or_else(|| ApiError::bad_request("Please upload an image"))?;
    let stored = store_upload(&state, &file, &image_policy(&state)).await?;

    let form = payload.data;
    let mut site = Site::new(
        form.name.as_deref().unwrap_or_default(),
        form.location.as_deref().unwrap_or_default(),
        form.description.as_deref().unwrap_or_default(),
        stored.url,
    );
    site.image_public_id = stored.delete_handle;
    site.services = form.services.unwrap_or_default();
    site.coordinates = Json(form.coordinates.unwrap_or_default());
    site.display_order = form.order.unwrap_or(0);
    site.is_active = form.is_active.unwrap_or(true);

    let site = state.store.sites.insert(site).await?;
    Ok(ApiResponse::created(site))
}

/// PUT /api/sites/:id
pub async fn update_site(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut payload: FormPayload<SiteForm>,
) -> ApiResult<Site> {
    let mut site = find_or_404(state.store.sites.as_ref(), &id, NOT_FOUND).await?;

    if let Some(file) = payload.take_file("image") {
        let stored = store_upload(&state, &file, &image_policy(&state)).await?;
        discard_upload(&state, site.image_public_id.as_deref()).await;
        site.image = stored.url;
        site.image_public_id = stored.delete_handle;
    }

    let form = payload.data;
    if let Some(name) = form.name {
        site.name = name;
    }
    if let Some(location) = form.location {
        site.location = location;
    }
    if let Some(description) = form.description {
        site.description = description;
    }
    if let Some(services) = form.services {
        site.services = services;
    }
    if let Some(coordinates) = form.coordinates {
        site.coordinates = Json(coordinates);
    }
    if let Some(order) = form.order {
        site.display_order = order;
    }
    if let Some(active) = form.is_active {
        site.is_active = active;
    }

    site.touch(Utc::now());
    let site = state.store.sites.update(site).await?;
    Ok(ApiResponse::success(site))
}

/// DELETE /api/sites/:id
pub async fn delete_site(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    let site = find_or_404(state.store.sites.as_ref(), &id, NOT_FOUND).await?;
    state.store.sites.delete(site.id).await?;
    discard_upload(&state, site.image_public_id.as_deref()).await;
    Ok(ApiResponse::message_only("Site deleted successfully"))
}
