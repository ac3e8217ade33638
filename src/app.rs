use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, http::header, http::HeaderValue, http::Method, http::Uri, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::warn;

use crate::config::AppConfig;
use crate::database::{DatabaseError, DatabaseManager, Store};
use crate::error::ApiError;
use crate::handlers;
use crate::mail::Notifier;
use crate::storage::{select_backend, ImageStorage};

/// Shared per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DatabaseManager,
    pub store: Store,
    pub storage: Arc<dyn ImageStorage>,
    pub notifier: Notifier,
}

impl AppState {
    pub fn new(config: AppConfig, db: DatabaseManager, storage: Arc<dyn ImageStorage>, notifier: Notifier) -> Self {
        let store = db.store();
        Self { config: Arc::new(config), db, store, storage, notifier }
    }

    /// Connects and migrates the database, then picks the upload backend and
    /// mail transport from `config`.
    pub async fn from_config(config: AppConfig) -> Result<Self, DatabaseError> {
        let db = DatabaseManager::connect(&config.database).await?;
        db.migrate().await?;
        let storage = select_backend(&config.uploads);
        let notifier = Notifier::from_config(&config.mail);
        Ok(Self::new(config, db, storage, notifier))
    }
}

pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.cors_origins);
    let uploads = ServeDir::new(&state.config.uploads.dir);
    let body_limit = state.config.server.max_request_size_bytes;

    Router::new()
        // Public
        .merge(handlers::health::routes())
        // Per-resource groups; admin routes carry their own auth layers
        .merge(handlers::auth::routes(&state))
        .merge(handlers::team::routes(&state))
        .merge(handlers::sites::routes(&state))
        .merge(handlers::gallery::routes(&state))
        .merge(handlers::news::routes(&state))
        .merge(handlers::contact::routes(&state))
        .merge(handlers::appointments::routes(&state))
        .merge(handlers::applications::routes(&state))
        // Stored files from the local disk backend
        .nest_service("/uploads", uploads)
        .fallback(not_found)
        // Global middleware, outermost first
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT]);

    if origins.iter().any(|o| o == "*") {
        return base.allow_origin(AllowOrigin::any());
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    base.allow_origin(AllowOrigin::list(allowed)).allow_credentials(true)
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("Route {} not found", uri.path()))
}
