//! Health and database diagnostic endpoints.
//!
//! `/test` never fails: every problem is written into the response body.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use tracing::instrument;

use crate::config::DatabaseConfig;
use crate::db::GatewayStatus;
use crate::error::truncate;
use crate::state::AppState;

/// Most collection names listed by `/test`.
pub const MAX_LISTED_COLLECTIONS: usize = 10;

/// Longest error excerpt shown by `/test`, in characters.
const MAX_ERROR_CHARS: usize = 50;

const CONNECTED: &str = "Connected";
const NOT_CONNECTED: &str = "Not Connected";

/// Body of `GET /test`.
#[derive(Debug, Serialize)]
pub struct DiagnosticsResponse {
    pub backend: String,
    pub database: String,
    pub database_url: String,
    pub database_name: String,
    pub connection_status: String,
    pub collections: Vec<String>,
}

impl DiagnosticsResponse {
    /// Describe a gateway status and which settings are present.
    #[must_use]
    pub fn new(status: GatewayStatus, settings: &DatabaseConfig) -> Self {
        let (database, connection_status, collections) = match status {
            GatewayStatus::Connected {
                collections: Ok(mut names),
                ..
            } => {
                names.truncate(MAX_LISTED_COLLECTIONS);
                ("✅ Connected & Working".to_string(), CONNECTED, names)
            }
            GatewayStatus::Connected {
                collections: Err(e),
                ..
            } => (
                format!("⚠️  Connected but Error: {}", truncate(&e, MAX_ERROR_CHARS)),
                CONNECTED,
                Vec::new(),
            ),
            GatewayStatus::Unavailable { reason } => (
                format!("❌ Not Available: {}", truncate(&reason, MAX_ERROR_CHARS)),
                NOT_CONNECTED,
                Vec::new(),
            ),
        };

        Self {
            backend: "✅ Running".to_string(),
            database,
            database_url: presence(settings.url_is_set()),
            database_name: presence(settings.name_is_set()),
            connection_status: connection_status.to_string(),
            collections,
        }
    }
}

fn presence(set: bool) -> String {
    if set { "✅ Set" } else { "❌ Not Set" }.to_string()
}

/// Report backend and database health.
///
/// GET /test
#[instrument(skip(state))]
pub async fn test_database(State(state): State<AppState>) -> Json<DiagnosticsResponse> {
    let status = state.gateway().status().await;
    Json(DiagnosticsResponse::new(status, &state.config().database))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the document store does not answer.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.gateway().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn settings(url: bool, name: bool) -> DatabaseConfig {
        DatabaseConfig {
            url: url.then(|| SecretString::from("postgres://localhost")),
            name: name.then(|| "midori".to_string()),
        }
    }

    #[test]
    fn test_unavailable() {
        let response = DiagnosticsResponse::new(
            GatewayStatus::Unavailable {
                reason: "DATABASE_URL and DATABASE_NAME must both be set".to_string(),
            },
            &settings(false, false),
        );
        assert_eq!(response.backend, "✅ Running");
        assert!(response.database.starts_with("❌ Not Available"));
        assert_eq!(response.connection_status, "Not Connected");
        assert!(response.collections.is_empty());
        assert_eq!(response.database_url, "❌ Not Set");
        assert_eq!(response.database_name, "❌ Not Set");
    }

    #[test]
    fn test_connected_lists_at_most_ten_collections() {
        let names: Vec<String> = (0..15).map(|i| format!("c{i:02}")).collect();
        let response = DiagnosticsResponse::new(
            GatewayStatus::Connected {
                database_name: "midori".to_string(),
                collections: Ok(names),
            },
            &settings(true, true),
        );
        assert_eq!(response.database, "✅ Connected & Working");
        assert_eq!(response.connection_status, "Connected");
        assert_eq!(response.collections.len(), MAX_LISTED_COLLECTIONS);
        assert_eq!(response.database_url, "✅ Set");
        assert_eq!(response.database_name, "✅ Set");
    }

    #[test]
    fn test_connected_with_listing_error() {
        let response = DiagnosticsResponse::new(
            GatewayStatus::Connected {
                database_name: "midori".to_string(),
                collections: Err(format!("relation \"documents\" does not exist{}", "!".repeat(80))),
            },
            &settings(true, true),
        );
        assert!(response.database.starts_with("⚠️  Connected but Error: relation"));
        assert_eq!(response.connection_status, "Connected");
        assert!(response.collections.is_empty());
    }
}
