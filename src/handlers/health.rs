// handlers/health.rs - service descriptor and liveness

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::app::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/api/health", get(health))
}

/// GET /
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Javelin Security API",
            "version": version,
            "description": "Content and booking backend for the Javelin Security website",
            "endpoints": {
                "health": "/api/health (public)",
                "auth": "/api/auth/{login,register} (public), /api/auth/{me,profile,password} (authenticated)",
                "team": "/api/team[/:id] (public), /api/team/{admin/all,reorder} (admin)",
                "sites": "/api/sites[/:id] (public), /api/sites/admin/all (admin)",
                "gallery": "/api/gallery[/:id|/categories] (public), /api/gallery/admin/all (admin)",
                "news": "/api/news[/:id|/slug/:slug|/categories] (public), /api/news/admin/all (admin)",
                "contact": "/api/contact[/info] (public), /api/contact/admin/{all,stats,:id} (admin)",
                "appointments": "POST /api/appointments (public), /api/appointments[/stats|/:id] (admin)",
                "applications": "POST /api/applications (public), GET /api/applications (admin)",
                "uploads": "/uploads/* (static)"
            }
        }
    }))
}

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();
    let backend = if state.db.is_memory() { "memory" } else { "postgres" };

    match state.db.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "connected",
                    "store": backend,
                    "uploads": state.storage.backend()
                }
            })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "message": "Database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "database": "disconnected",
                        "error": e.to_string()
                    }
                })),
            )
        }
    }
}
