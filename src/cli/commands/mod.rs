pub mod admin;
pub mod auth;
pub mod book;
pub mod health;
pub mod seed;

use crate::config::config;
use crate::database::{DatabaseManager, Store};

/// Connects with the server's own configuration and applies migrations, for
/// commands that work on the database directly.
pub async fn open_store() -> anyhow::Result<(DatabaseManager, Store)> {
    let db = DatabaseManager::connect(&config().database).await?;
    db.migrate().await?;
    let store = db.store();
    Ok((db, store))
}
