use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use crate::app::AppState;
use crate::auth::verify_token;
use crate::database::models::User;
use crate::error::ApiError;

/// The authenticated user, loaded from the store by `require_auth`.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Not authorized, no token"))
    }
}

/// Verifies the bearer token and loads its user into request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(&headers).ok_or_else(|| ApiError::unauthorized("Not authorized, no token"))?;

    let claims = verify_token(&state.config.security, token).map_err(|e| {
        debug!(error = %e, "Rejected bearer token");
        ApiError::unauthorized("Not authorized, token failed")
    })?;

    let user = state
        .store
        .users
        .find_by_id(claims.id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("User not found"))?;

    if !user.is_active {
        warn!(user_id = %user.id, "Deactivated account attempted access");
        return Err(ApiError::unauthorized("User account is deactivated"));
    }

    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}

/// Admin or superadmin. Must run after `require_auth`.
pub async fn require_admin(user: CurrentUser, request: Request, next: Next) -> Result<Response, ApiError> {
    if !user.0.is_admin() {
        return Err(ApiError::forbidden("Access denied. Admin only."));
    }
    Ok(next.run(request).await)
}

/// Extract the token from an `Authorization: Bearer` header
pub(crate) fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(axum::http::header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}
