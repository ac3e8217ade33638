// handlers/mod.rs - HTTP handlers grouped by resource
//
// Each module exposes `routes(&AppState)`, returning its public routes merged
// with the admin routes wrapped in `require_auth` + `require_admin`.

pub mod applications;
pub mod appointments;
pub mod auth;
pub mod contact;
pub mod gallery;
pub mod health;
pub mod news;
pub mod sites;
pub mod team;

use axum::{middleware, Router};
use tracing::{info, warn};
use uuid::Uuid;

use crate::app::AppState;
use crate::database::{Document, Repository};
use crate::error::ApiError;
use crate::middleware::auth::{require_admin, require_auth};
use crate::storage::{IncomingFile, UploadPolicy, UploadResult};

/// Wraps every route of `router` in bearer authentication.
pub(crate) fn authenticated(state: &AppState, router: Router<AppState>) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
}

/// Wraps every route of `router` in authentication plus the admin role check.
pub(crate) fn admin_only(state: &AppState, router: Router<AppState>) -> Router<AppState> {
    router
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
}

/// Loads a row by its path id. Malformed ids read as missing rows.
pub(crate) async fn find_or_404<T: Document>(
    repo: &dyn Repository<T>,
    id: &str,
    not_found: &str,
) -> Result<T, ApiError> {
    let id = Uuid::parse_str(id).map_err(|_| ApiError::not_found(not_found))?;
    repo.find_by_id(id).await?.ok_or_else(|| ApiError::not_found(not_found))
}

/// Checks `file` against `policy` and hands it to the configured backend.
pub(crate) async fn store_upload(
    state: &AppState,
    file: &IncomingFile,
    policy: &UploadPolicy,
) -> Result<UploadResult, ApiError> {
    policy.check(file)?;
    let stored = state.storage.store(file).await?;
    info!(
        field = %file.field,
        backend = state.storage.backend(),
        bytes = file.bytes.len(),
        "Stored upload"
    );
    Ok(stored)
}

/// Removes a previously stored file. Failures are logged; the row change
/// that triggered the removal still goes through.
pub(crate) async fn discard_upload(state: &AppState, handle: Option<&str>) {
    let Some(handle) = handle else { return };
    match state.storage.delete(handle).await {
        Ok(()) => info!(handle, backend = state.storage.backend(), "Deleted stored file"),
        Err(e) => warn!(handle, error = %e, "Failed to delete stored file"),
    }
}

pub(crate) fn image_policy(state: &AppState) -> UploadPolicy {
    UploadPolicy::images(state.config.uploads.max_file_bytes)
}

/// Positive integer from a query string, or `default`.
pub(crate) fn positive_or(value: Option<&str>, default: i64) -> i64 {
    value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paging_params_fall_back_on_garbage() {
        assert_eq!(positive_or(Some("3"), 1), 3);
        assert_eq!(positive_or(Some(" 25 "), 10), 25);
        assert_eq!(positive_or(Some("0"), 1), 1);
        assert_eq!(positive_or(Some("-2"), 1), 1);
        assert_eq!(positive_or(Some("ten"), 10), 10);
        assert_eq!(positive_or(None, 20), 20);
    }
}
