use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::database::store::Store;

/// Errors from the persistence layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate value for {0}")]
    Conflict(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl From<crate::filter::FilterError> for DatabaseError {
    fn from(err: crate::filter::FilterError) -> Self {
        DatabaseError::QueryError(err.to_string())
    }
}

/// Owns the connection pool for the lifetime of the process. A `memory://`
/// URL selects the in-process store and no pool is opened.
#[derive(Clone)]
pub struct DatabaseManager {
    pool: Option<PgPool>,
}

impl DatabaseManager {
    pub const MEMORY_URL: &'static str = "memory://";

    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        if config.url == Self::MEMORY_URL {
            info!("Using in-memory store");
            return Ok(Self { pool: None });
        }

        let url = url::Url::parse(&config.url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        if !matches!(url.scheme(), "postgres" | "postgresql") {
            return Err(DatabaseError::InvalidDatabaseUrl);
        }

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(&config.url)
            .await?;

        info!(
            host = url.host_str().unwrap_or("localhost"),
            database = url.path().trim_start_matches('/'),
            "Created database pool"
        );
        Ok(Self { pool: Some(pool) })
    }

    pub fn memory() -> Self {
        Self { pool: None }
    }

    pub fn is_memory(&self) -> bool {
        self.pool.is_none()
    }

    /// Applies the embedded migrations under `migrations/`.
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        if let Some(pool) = &self.pool {
            sqlx::migrate!("./migrations").run(pool).await?;
            info!("Database migrations applied");
        }
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        if let Some(pool) = &self.pool {
            sqlx::query("SELECT 1").execute(pool).await?;
        }
        Ok(())
    }

    /// One repository per entity, backed by this manager.
    pub fn store(&self) -> Store {
        match &self.pool {
            Some(pool) => Store::postgres(pool.clone()),
            None => Store::memory(),
        }
    }

    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
            info!("Closed database pool");
        }
    }
}
