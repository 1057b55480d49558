//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! midori-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string
//! - `DATABASE_NAME` - Database to migrate
//!
//! # Migration Files
//!
//! `crates/server/migrations/`, embedded at compile time.

use tracing::info;

use midori_server::config::ServerConfig;
use midori_server::db::PostgresStore;

use super::CommandError;

/// Apply all pending migrations.
///
/// # Errors
///
/// Returns an error if configuration is missing, the database cannot be
/// reached, or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let config = ServerConfig::from_env()?;
    let (url, name) = super::database_settings(&config)?;

    info!(database = %name, "Connecting to database...");
    let store = PostgresStore::connect(url, name).await?;

    info!("Running migrations...");
    sqlx::migrate!("../server/migrations")
        .run(store.pool())
        .await?;

    store.close().await;
    info!("Migrations complete!");
    Ok(())
}
