use anyhow::Context;
use tracing_subscriber::EnvFilter;

use javelin_api::{app, config::AppConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("javelin_api=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env();
    tracing::info!("Starting Javelin API in {:?} mode", config.environment);
    if config.uses_default_jwt_secret() {
        tracing::warn!("JWT_SECRET is not set; using the built-in development secret");
    }

    let port = config.server.port;
    let state = AppState::from_config(config)
        .await
        .context("failed to initialise the database")?;
    let db = state.db.clone();
    if !state.notifier.is_enabled() {
        tracing::warn!("EMAIL_USER is not set; notification mail is disabled");
    }

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    println!("🚀 Javelin API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    db.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}
