// handlers/news.rs - /api/news

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::{admin_only, discard_upload, find_or_404, image_policy, positive_or, store_upload};
use crate::app::AppState;
use crate::database::models::news_post::slugify;
use crate::database::models::{AuthorRef, CategoryOption, NewsCategory, NewsPost, NewsPostView, PostStatus};
use crate::database::{DatabaseError, Document};
use crate::error::ApiError;
use crate::filter::Filter;
use crate::forms::{de, FormPayload};
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};

const NOT_FOUND: &str = "News post not found";
const DEFAULT_PAGE_SIZE: i64 = 10;

pub fn routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/api/news", get(list_published))
        .route("/api/news/categories", get(categories))
        .route("/api/news/slug/:slug", get(get_by_slug))
        .route("/api/news/:id", get(get_post));

    let admin = Router::new()
        .route("/api/news", post(create_post))
        .route("/api/news/admin/all", get(list_all))
        .route("/api/news/:id", put(update_post).delete(delete_post));

    public.merge(admin_only(state, admin))
}

#[derive(Debug, Default, Deserialize)]
pub struct PublicNewsQuery {
    pub category: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AdminNewsQuery {
    pub status: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct NewsForm {
    #[serde(deserialize_with = "de::opt_string")]
    #[validate(required(message = "Title is required"))]
    pub title: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    #[validate(required(message = "Excerpt is required"))]
    pub excerpt: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    #[validate(required(message = "Content is required"))]
    pub content: Option<String>,
    #[serde(deserialize_with = "de::opt_parsed")]
    pub category: Option<NewsCategory>,
    #[serde(deserialize_with = "de::opt_string_list")]
    pub tags: Option<Vec<String>>,
    #[serde(deserialize_with = "de::opt_parsed")]
    pub status: Option<PostStatus>,
    #[serde(deserialize_with = "de::opt_bool")]
    pub is_active: Option<bool>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// GET /api/news - published and active posts, newest publication first.
pub async fn list_published(
    State(state): State<AppState>,
    Query(query): Query<PublicNewsQuery>,
) -> ApiResult<Vec<NewsPostView>> {
    let page = positive_or(query.page.as_deref(), 1);
    let limit = positive_or(query.limit.as_deref(), DEFAULT_PAGE_SIZE);

    let filter = Filter::new()
        .where_eq("status", PostStatus::Published)
        .where_eq("is_active", true)
        .where_opt("category", non_blank(query.category));

    let total = state.store.news.count(filter.clone()).await?;
    let posts = state
        .store
        .news
        .select_any(filter.order("published_at desc, created_at desc").page(page, limit))
        .await?;

    let views = with_authors(&state, posts).await?;
    Ok(ApiResponse::list(views).paginated(total, page, limit))
}

/// GET /api/news/admin/all?status=&category=
pub async fn list_all(
    State(state): State<AppState>,
    Query(query): Query<AdminNewsQuery>,
) -> ApiResult<Vec<NewsPostView>> {
    let filter = Filter::new()
        .where_opt("status", non_blank(query.status))
        .where_opt("category", non_blank(query.category))
        .order("created_at desc");
    let posts = state.store.news.select_any(filter).await?;
    Ok(ApiResponse::list(with_authors(&state, posts).await?))
}

/// GET /api/news/categories
pub async fn categories() -> ApiResult<Vec<CategoryOption>> {
    Ok(ApiResponse::success(NewsCategory::options()))
}

/// GET /api/news/slug/:slug - counts one view per call.
pub async fn get_by_slug(State(state): State<AppState>, Path(slug): Path<String>) -> ApiResult<NewsPostView> {
    let filter = Filter::new()
        .where_eq("slug", slug.as_str())
        .where_eq("status", PostStatus::Published)
        .where_eq("is_active", true);
    let mut post = state
        .store
        .news
        .select_one(filter)
        .await?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;

    post.views += 1;
    let post = state.store.news.update(post).await?;
    Ok(ApiResponse::success(with_author(&state, post).await?))
}

/// GET /api/news/:id
pub async fn get_post(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<NewsPostView> {
    let post = find_or_404(state.store.news.as_ref(), &id, NOT_FOUND).await?;
    Ok(ApiResponse::success(with_author(&state, post).await?))
}

/// POST /api/news - requires a `featuredImage` file; the caller becomes the author.
pub async fn create_post(
    State(state): State<AppState>,
    CurrentUser(author): CurrentUser,
    mut payload: FormPayload<NewsForm>,
) -> ApiResult<NewsPostView> {
    payload.data.validate()?;
    let file = payload
        .take_file("featuredImage")
        .ok_or_else(|| ApiError::bad_request("Please upload a featured image"))?;
    let stored = store_upload(&state, &file, &image_policy(&state)).await?;

    let form = payload.data;
    let title = form.title.unwrap_or_default();
    let now = Utc::now();

    let mut post = NewsPost::new(
        &title,
        form.excerpt.as_deref().unwrap_or_default(),
        form.content.as_deref().unwrap_or_default(),
        stored.url,
    );
    post.slug = unique_slug(&state, &slugify(&title)).await?;
    post.image_public_id = stored.delete_handle;
    post.category = form.category.unwrap_or_default();
    post.tags = form.tags.unwrap_or_default();
    post.author_id = Some(author.id);
    post.is_active = form.is_active.unwrap_or(true);
    post.set_status(form.status.unwrap_or_default(), now);

    let post = state.store.news.insert(post).await?;
    Ok(ApiResponse::created(NewsPostView {
        post,
        author: Some(AuthorRef { id: author.id, name: author.name }),
    }))
}

/// PUT /api/news/:id - the slug stays fixed once the post exists.
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut payload: FormPayload<NewsForm>,
) -> ApiResult<NewsPostView> {
    let mut post = find_or_404(state.store.news.as_ref(), &id, NOT_FOUND).await?;

    if let Some(file) = payload.take_file("featuredImage") {
        let stored = store_upload(&state, &file, &image_policy(&state)).await?;
        discard_upload(&state, post.image_public_id.as_deref()).await;
        post.featured_image = stored.url;
        post.image_public_id = stored.delete_handle;
    }

    let form = payload.data;
    let now = Utc::now();
    if let Some(title) = form.title {
        post.title = title;
    }
    if let Some(excerpt) = form.excerpt {
        post.excerpt = excerpt;
    }
    if let Some(content) = form.content {
        post.content = content;
    }
    if let Some(category) = form.category {
        post.category = category;
    }
    if let Some(tags) = form.tags {
        post.tags = tags;
    }
    if let Some(active) = form.is_active {
        post.is_active = active;
    }
    if let Some(status) = form.status {
        post.set_status(status, now);
    }

    post.touch(now);
    let post = state.store.news.update(post).await?;
    Ok(ApiResponse::success(with_author(&state, post).await?))
}

/// DELETE /api/news/:id
pub async fn delete_post(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    let post = find_or_404(state.store.news.as_ref(), &id, NOT_FOUND).await?;
    state.store.news.delete(post.id).await?;
    discard_upload(&state, post.image_public_id.as_deref()).await;
    Ok(ApiResponse::message_only("News post deleted successfully"))
}

/// `base`, or `base-N` for the first N not already taken.
async fn unique_slug(state: &AppState, base: &str) -> Result<String, DatabaseError> {
    let mut candidate = base.to_string();
    let mut suffix = 1;
    loop {
        let filter = Filter::new().where_eq("slug", candidate.as_str());
        if state.store.news.count(filter).await? == 0 {
            return Ok(candidate);
        }
        candidate = format!("{}-{}", base, suffix);
        suffix += 1;
    }
}

async fn with_author(state: &AppState, post: NewsPost) -> Result<NewsPostView, DatabaseError> {
    let author = match post.author_id {
        Some(id) => state
            .store
            .users
            .find_by_id(id)
            .await?
            .map(|u| AuthorRef { id: u.id, name: u.name }),
        None => None,
    };
    Ok(NewsPostView { post, author })
}

async fn with_authors(state: &AppState, posts: Vec<NewsPost>) -> Result<Vec<NewsPostView>, DatabaseError> {
    let mut authors: HashMap<Uuid, Option<AuthorRef>> = HashMap::new();
    let mut views = Vec::with_capacity(posts.len());
    for post in posts {
        let author = match post.author_id {
            Some(id) => {
                if !authors.contains_key(&id) {
                    let found = state
                        .store
                        .users
                        .find_by_id(id)
                        .await?
                        .map(|u| AuthorRef { id: u.id, name: u.name });
                    authors.insert(id, found);
                }
                authors.get(&id).cloned().flatten()
            }
            None => None,
        };
        views.push(NewsPostView { post, author });
    }
    Ok(views)
}
