// handlers/auth.rs - /api/auth/* : login, registration and the caller's own account

use axum::{
    extract::State,
    http::HeaderMap,
    routing::{get, post, put},
    Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use crate::app::AppState;
use crate::auth::{hash_password, issue_token, verify_password, verify_token};
use crate::database::models::user::normalize_email;
use crate::database::models::{Role, User};
use crate::database::Document;
use crate::error::ApiError;
use crate::filter::Filter;
use crate::forms::{de, ValidatedJson};
use crate::middleware::auth::{extract_bearer, CurrentUser};
use crate::middleware::{ApiResponse, ApiResult};

pub fn routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register));

    let account = Router::new()
        .route("/api/auth/me", get(me))
        .route("/api/auth/profile", put(update_profile))
        .route("/api/auth/password", put(change_password));

    public.merge(super::authenticated(state, account))
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Please provide email and password"))]
    pub email: String,
    #[validate(length(min = 1, message = "Please provide email and password"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub user: User,
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<LoginRequest>,
) -> ApiResult<TokenResponse> {
    let email = normalize_email(&body.email);
    let user = state
        .store
        .users
        .select_one(Filter::new().where_eq("email", email.as_str()))
        .await?;

    let mut user = match user {
        Some(user) if verify_password(&body.password, &user.password) => user,
        _ => {
            warn!(email = %email, "Failed login attempt");
            return Err(ApiError::unauthorized("Invalid credentials"));
        }
    };

    if !user.is_active {
        return Err(ApiError::unauthorized("User account is deactivated"));
    }

    let now = Utc::now();
    user.last_login = Some(now);
    user.touch(now);
    let user = state.store.users.update(user).await?;

    let token = issue_token(&state.config.security, user.id, user.role)?;
    info!(user_id = %user.id, role = %user.role, "User logged in");
    Ok(ApiResponse::success(TokenResponse { token, user }))
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    pub role: Option<Role>,
}

/// POST /api/auth/register
///
/// The requested role is honoured only for the very first account or when a
/// superadmin makes the call; everyone else is registered as `admin`.
pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    ValidatedJson(body): ValidatedJson<RegisterRequest>,
) -> ApiResult<TokenResponse> {
    let caller_is_superadmin = match caller(&state, &headers).await? {
        Some(user) => user.is_superadmin(),
        None => false,
    };
    let first_user = state.store.users.count(Filter::new()).await? == 0;

    if !state.config.security.allow_registration && !caller_is_superadmin && !first_user {
        return Err(ApiError::forbidden("Registration is disabled"));
    }

    let email = normalize_email(&body.email);
    if state
        .store
        .users
        .select_one(Filter::new().where_eq("email", email.as_str()))
        .await?
        .is_some()
    {
        return Err(ApiError::conflict("User already exists"));
    }

    let role = if first_user || caller_is_superadmin {
        body.role.unwrap_or_default()
    } else {
        Role::Admin
    };

    let hash = hash_password(&body.password)?;
    let user = state.store.users.insert(User::new(&body.name, &email, hash, role)).await?;
    let token = issue_token(&state.config.security, user.id, user.role)?;

    info!(user_id = %user.id, role = %user.role, "User registered");
    Ok(ApiResponse::created(TokenResponse { token, user }))
}

/// The user behind an optional bearer token on an otherwise public route.
async fn caller(state: &AppState, headers: &HeaderMap) -> Result<Option<User>, ApiError> {
    let Some(token) = extract_bearer(headers) else { return Ok(None) };
    let Ok(claims) = verify_token(&state.config.security, token) else { return Ok(None) };
    Ok(state
        .store
        .users
        .find_by_id(claims.id)
        .await?
        .filter(|u| u.is_active))
}

/// GET /api/auth/me
pub async fn me(CurrentUser(user): CurrentUser) -> ApiResult<User> {
    Ok(ApiResponse::success(user))
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ProfileRequest {
    #[serde(deserialize_with = "de::opt_string")]
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    #[validate(email(message = "Please provide a valid email"))]
    pub email: Option<String>,
}

/// PUT /api/auth/profile
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(mut user): CurrentUser,
    ValidatedJson(body): ValidatedJson<ProfileRequest>,
) -> ApiResult<User> {
    if let Some(name) = body.name {
        user.name = name;
    }
    if let Some(email) = body.email {
        let email = normalize_email(&email);
        if email != user.email {
            let taken = state
                .store
                .users
                .select_one(Filter::new().where_eq("email", email.as_str()))
                .await?
                .is_some();
            if taken {
                return Err(ApiError::conflict("Email already in use"));
            }
            user.email = email;
        }
    }

    user.touch(Utc::now());
    let user = state.store.users.update(user).await?;
    Ok(ApiResponse::success(user).message("Profile updated successfully"))
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct PasswordRequest {
    #[validate(length(min = 1, message = "Please provide current and new password"))]
    pub current_password: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenOnly {
    pub token: String,
}

/// PUT /api/auth/password - re-issues the token on success.
pub async fn change_password(
    State(state): State<AppState>,
    CurrentUser(mut user): CurrentUser,
    ValidatedJson(body): ValidatedJson<PasswordRequest>,
) -> ApiResult<TokenOnly> {
    if !verify_password(&body.current_password, &user.password) {
        return Err(ApiError::unauthorized("Current password is incorrect"));
    }

    user.password = hash_password(&body.new_password)?;
    user.touch(Utc::now());
    let user = state.store.users.update(user).await?;

    let token = issue_token(&state.config.security, user.id, user.role)?;
    info!(user_id = %user.id, "Password changed");
    Ok(ApiResponse::success(TokenOnly { token }).message("Password updated successfully"))
}
