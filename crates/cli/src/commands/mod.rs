//! CLI command implementations.

pub mod menu;
pub mod migrate;
pub mod seed;

use secrecy::SecretString;
use thiserror::Error;

use midori_server::config::{ConfigError, ServerConfig};
use midori_server::db::{Gateway, GatewayStatus, StorageError};

/// Errors shared by all commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Document store operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Seeding failed.
    #[error(transparent)]
    Seed(#[from] seed::SeedError),
}

/// URL and name of the configured database.
fn database_settings(config: &ServerConfig) -> Result<(&SecretString, &str), CommandError> {
    let url = config
        .database
        .url
        .as_ref()
        .ok_or(CommandError::MissingEnvVar("DATABASE_URL"))?;
    let name = config
        .database
        .name
        .as_deref()
        .ok_or(CommandError::MissingEnvVar("DATABASE_NAME"))?;
    Ok((url, name))
}

/// Connect the gateway, failing instead of degrading when unavailable.
async fn connect_gateway() -> Result<Gateway, CommandError> {
    let config = ServerConfig::from_env()?;
    database_settings(&config)?;

    let gateway = Gateway::connect(&config.database).await;
    if let GatewayStatus::Unavailable { reason } = gateway.status().await {
        return Err(StorageError::Unavailable(reason).into());
    }
    Ok(gateway)
}
