//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Database (both needed for a connected store)
//! - `DATABASE_URL` - `PostgreSQL` connection string
//! - `DATABASE_NAME` - Database to use on that server
//!
//! ## Optional
//! - `HOST` - Bind address (default: 0.0.0.0)
//! - `PORT` - Listen port (default: 8000)
//! - `CORS_ALLOWED_ORIGINS` - Comma-separated origin list (default: any origin)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_TRACES_SAMPLE_RATE` - Fraction of requests traced (default: 0.0)
//!
//! Missing database variables are not an error: the document store gateway
//! starts in its unavailable state and `/test` reports which are unset.

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Document store connection settings
    pub database: DatabaseConfig,
    /// Allowed CORS origins; `None` allows any origin
    pub cors_allowed_origins: Option<Vec<String>>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name (e.g. production, staging)
    pub sentry_environment: Option<String>,
    /// Sentry error event sample rate
    pub sentry_sample_rate: f32,
    /// Sentry performance tracing sample rate
    pub sentry_traces_sample_rate: f32,
}

/// Document store connection settings.
///
/// `Debug` comes from `SecretString`, which redacts the URL.
#[derive(Debug, Clone, Default)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL (may contain a password)
    pub url: Option<SecretString>,
    /// Database name
    pub name: Option<String>,
}

impl DatabaseConfig {
    /// Whether `DATABASE_URL` was provided.
    #[must_use]
    pub const fn url_is_set(&self) -> bool {
        self.url.is_some()
    }

    /// Whether `DATABASE_NAME` was provided.
    #[must_use]
    pub const fn name_is_set(&self) -> bool {
        self.name.is_some()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an optional variable is set to an unparseable
    /// value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` for unparseable values.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = parse_or_default(get("HOST"), "HOST", IpAddr::from([0, 0, 0, 0]))?;
        let port = parse_or_default(get("PORT"), "PORT", 8000_u16)?;

        let database = DatabaseConfig {
            url: get("DATABASE_URL").map(SecretString::from),
            name: get("DATABASE_NAME"),
        };

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS").map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(String::from)
                .collect()
        });

        let sentry_sample_rate =
            parse_rate(get("SENTRY_SAMPLE_RATE"), "SENTRY_SAMPLE_RATE", 1.0)?;
        let sentry_traces_sample_rate = parse_rate(
            get("SENTRY_TRACES_SAMPLE_RATE"),
            "SENTRY_TRACES_SAMPLE_RATE",
            0.0,
        )?;

        Ok(Self {
            host,
            port,
            database,
            cors_allowed_origins,
            sentry_dsn: get("SENTRY_DSN"),
            sentry_environment: get("SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse an optional value, falling back to a default when unset.
fn parse_or_default<T>(value: Option<String>, key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Parse a sample rate in `[0.0, 1.0]`.
fn parse_rate(value: Option<String>, key: &str, default: f32) -> Result<f32, ConfigError> {
    let rate = parse_or_default(value, key, default)?;
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ))
    }
}
