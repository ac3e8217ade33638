// handlers/team.rs - /api/team

use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;
use validator::Validate;

use super::{admin_only, discard_upload, find_or_404, image_policy, store_upload};
use crate::app::AppState;
use crate::database::models::{TeamMember, TeamSocialLinks};
use crate::database::Document;
use crate::filter::Filter;
use crate::forms::{de, FormPayload, ValidatedJson};
use crate::middleware::{ApiResponse, ApiResult};

const NOT_FOUND: &str = "Team member not found";
const ORDERING: &str = "display_order asc, created_at desc";

pub fn routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/api/team", get(list_active))
        .route("/api/team/:id", get(get_member));

    let admin = Router::new()
        .route("/api/team", post(create_member))
        .route("/api/team/admin/all", get(list_all))
        .route("/api/team/reorder", put(reorder))
        .route("/api/team/:id", put(update_member).delete(delete_member));

    public.merge(admin_only(state, admin))
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct TeamMemberForm {
    #[serde(deserialize_with = "de::opt_string")]
    #[validate(required(message = "Name is required"))]
    pub name: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    #[validate(required(message = "Position is required"))]
    pub position: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    #[validate(required(message = "Bio is required"))]
    pub bio: Option<String>,
    #[serde(deserialize_with = "de::opt_json")]
    pub social_links: Option<TeamSocialLinks>,
    #[serde(deserialize_with = "de::opt_i32")]
    pub order: Option<i32>,
    #[serde(deserialize_with = "de::opt_bool")]
    pub is_active: Option<bool>,
}

/// GET /api/team - active members only
pub async fn list_active(State(state): State<AppState>) -> ApiResult<Vec<TeamMember>> {
    let members = state
        .store
        .team
        .select_any(Filter::new().where_eq("is_active", true).order(ORDERING))
        .await?;
    Ok(ApiResponse::list(members))
}

/// GET /api/team/admin/all
pub async fn list_all(State(state): State<AppState>) -> ApiResult<Vec<TeamMember>> {
    let members = state.store.team.select_any(Filter::new().order(ORDERING)).await?;
    Ok(ApiResponse::list(members))
}

/// GET /api/team/:id
pub async fn get_member(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<TeamMember> {
    let member = find_or_404(state.store.team.as_ref(), &id, NOT_FOUND).await?;
    Ok(ApiResponse::success(member))
}

/// POST /api/team - the photo is optional; members without one get the
/// configured placeholder.
pub async fn create_member(
    State(state): State<AppState>,
    mut payload: FormPayload<TeamMemberForm>,
) -> ApiResult<TeamMember> {
    payload.data.validate()?;

    let uploaded = match payload.take_file("image") {
        Some(file) => Some(store_upload(&state, &file, &image_policy(&state)).await?),
        None => None,
    };

    let form = payload.data;
    let image = match &uploaded {
        Some(stored) => stored.url.clone(),
        None => state.config.content.default_team_image.clone(),
    };

    let mut member = TeamMember::new(
        form.name.as_deref().unwrap_or_default(),
        form.position.as_deref().unwrap_or_default(),
        form.bio.as_deref().unwrap_or_default(),
        image,
    );
    member.image_public_id = uploaded.and_then(|u| u.delete_handle);
    member.social_links = Json(form.social_links.unwrap_or_default());
    member.display_order = form.order.unwrap_or(0);
    member.is_active = form.is_active.unwrap_or(true);

    let member = state.store.team.insert(member).await?;
    Ok(ApiResponse::created(member))
}

/// PUT /api/team/:id - a new photo replaces and deletes the stored one.
pub async fn update_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut payload: FormPayload<TeamMemberForm>,
) -> ApiResult<TeamMember> {
    let mut member = find_or_404(state.store.team.as_ref(), &id, NOT_FOUND).await?;

    if let Some(file) = payload.take_file("image") {
        let stored = store_upload(&state, &file, &image_policy(&state)).await?;
        discard_upload(&state, member.image_public_id.as_deref()).await;
        member.image = stored.url;
        member.image_public_id = stored.delete_handle;
    }

    let form = payload.data;
    if let Some(name) = form.name {
        member.name = name;
    }
    if let Some(position) = form.position {
        member.position = position;
    }
    if let Some(bio) = form.bio {
        member.bio = bio;
    }
    if let Some(links) = form.social_links {
        member.social_links = Json(links);
    }
    if let Some(order) = form.order {
        member.display_order = order;
    }
    if let Some(active) = form.is_active {
        member.is_active = active;
    }

    member.touch(Utc::now());
    let member = state.store.team.update(member).await?;
    Ok(ApiResponse::success(member))
}

/// DELETE /api/team/:id
pub async fn delete_member(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    let member = find_or_404(state.store.team.as_ref(), &id, NOT_FOUND).await?;
    state.store.team.delete(member.id).await?;
    discard_upload(&state, member.image_public_id.as_deref()).await;
    Ok(ApiResponse::message_only("Team member deleted successfully"))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub id: Uuid,
    pub order: i32,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct ReorderRequest {
    #[validate(length(min = 1, message = "Please provide orderUpdates"))]
    pub order_updates: Vec<OrderUpdate>,
}

/// PUT /api/team/reorder - ids that no longer exist are skipped.
pub async fn reorder(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<ReorderRequest>,
) -> ApiResult<()> {
    let now = Utc::now();
    for update in body.order_updates {
        if let Some(mut member) = state.store.team.find_by_id(update.id).await? {
            member.display_order = update.order;
            member.touch(now);
            state.store.team.update(member).await?;
        }
    }
    Ok(ApiResponse::message_only("Order updated successfully"))
}
