// handlers/gallery.rs - /api/gallery

use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use validator::Validate;

use super::{admin_only, discard_upload, find_or_404, image_policy, store_upload};
use crate::app::AppState;
use crate::database::models::{CategoryOption, GalleryCategory, GalleryItem};
use crate::database::Document;
use crate::error::ApiError;
use crate::filter::Filter;
use crate::forms::{de, FormPayload};
use crate::middleware::{ApiResponse, ApiResult};

const NOT_FOUND: &str = "Gallery item not found";
const ORDERING: &str = "display_order asc, created_at desc";

pub fn routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/api/gallery", get(list_active))
        .route("/api/gallery/categories", get(categories))
        .route("/api/gallery/:id", get(get_item));

    let admin = Router::new()
        .route("/api/gallery", post(create_item))
        .route("/api/gallery/admin/all", get(list_all))
        .route("/api/gallery/:id", put(update_item).delete(delete_item));

    public.merge(admin_only(state, admin))
}

#[derive(Debug, Default, Deserialize)]
pub struct GalleryQuery {
    pub category: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct GalleryForm {
    #[serde(deserialize_with = "de::opt_string")]
    #[validate(required(message = "Title is required"))]
    pub title: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub description: Option<String>,
    #[serde(deserialize_with = "de::opt_parsed")]
    pub category: Option<GalleryCategory>,
    #[serde(deserialize_with = "de::opt_i32")]
    pub order: Option<i32>,
    #[serde(deserialize_with = "de::opt_bool")]
    pub is_active: Option<bool>,
}

/// GET /api/gallery?category=
pub async fn list_active(
    State(state): State<AppState>,
    Query(query): Query<GalleryQuery>,
) -> ApiResult<Vec<GalleryItem>> {
    let category = query.category.filter(|c| !c.trim().is_empty());
    let filter = Filter::new()
        .where_eq("is_active", true)
        .where_opt("category", category)
        .order(ORDERING);
    let items = state.store.gallery.select_any(filter).await?;
    Ok(ApiResponse::list(items))
}

/// GET /api/gallery/admin/all
pub async fn list_all(State(state): State<AppState>) -> ApiResult<Vec<GalleryItem>> {
    let items = state.store.gallery.select_any(Filter::new().order(ORDERING)).await?;
    Ok(ApiResponse::list(items))
}

/// GET /api/gallery/categories
pub async fn categories() -> ApiResult<Vec<CategoryOption>> {
    Ok(ApiResponse::success(GalleryCategory::options()))
}

/// GET /api/gallery/:id
pub async fn get_item(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<GalleryItem> {
    let item = find_or_404(state.store.gallery.as_ref(), &id, NOT_FOUND).await?;
    Ok(ApiResponse::success(item))
}

/// POST /api/gallery - requires an `image` file.
pub async fn create_item(
    State(state): State<AppState>,
    mut payload: FormPayload<GalleryForm>,
) -> ApiResult<GalleryItem> {
    payload.data.validate()?;
    let file = payload
        .take_file("image")
        .ok_or_else(|| ApiError::bad_request("Please upload an image"))?;
    let stored = store_upload(&state, &file, &image_policy(&state)).await?;

    let form = payload.data;
    let mut item = GalleryItem::new(
        form.title.as_deref().unwrap_or_default(),
        form.category.unwrap_or_default(),
        stored.url,
    );
    item.image_public_id = stored.delete_handle;
    item.description = form.description.unwrap_or_default();
    item.display_order = form.order.unwrap_or(0);
    item.is_active = form.is_active.unwrap_or(true);

    let item = state.store.gallery.insert(item).await?;
    Ok(ApiResponse::created(item))
}

/// PUT /api/gallery/:id
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut payload: FormPayload<GalleryForm>,
) -> ApiResult<GalleryItem> {
    let mut item = find_or_404(state.store.gallery.as_ref(), &id, NOT_FOUND).await?;

    if let Some(file) = payload.take_file("image") {
        let stored = store_upload(&state, &file, &image_policy(&state)).await?;
        discard_upload(&state, item.image_public_id.as_deref()).await;
        item.image = stored.url;
        item.image_public_id = stored.delete_handle;
    }

    let form = payload.data;
    if let Some(title) = form.title {
        item.title = title;
    }
    if let Some(description) = form.description {
        item.description = description;
    }
    if let Some(category) = form.category {
        item.category = category;
    }
    if let Some(order) = form.order {
        item.display_order = order;
    }
    if let Some(active) = form.is_active {
        item.is_active = active;
    }

    item.touch(Utc::now());
    let item = state.store.gallery.update(item).await?;
    Ok(ApiResponse::success(item))
}

/// DELETE /api/gallery/:id
pub async fn delete_item(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    let item = find_or_404(state.store.gallery.as_ref(), &id, NOT_FOUND).await?;
    state.store.gallery.delete(item.id).await?;
    discard_upload(&state, item.image_public_id.as_deref()).await;
    Ok(ApiResponse::message_only("Gallery item deleted successfully"))
}
