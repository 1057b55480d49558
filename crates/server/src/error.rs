//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`.
//!
//! Every error response is JSON with a `detail` field:
//! - validation failures: a list of `{field, message}` objects (422)
//! - everything else: a message string, truncated for server errors

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use midori_core::ValidationError;

use crate::db::StorageError;

/// Longest server-error message returned to clients, in characters.
pub const MAX_DETAIL_CHARS: usize = 120;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request body failed schema validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Document store operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// One failing field in a 422 response.
#[derive(Debug, Serialize)]
pub struct FieldDetail {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Detail {
    Message(String),
    Fields(Vec<FieldDetail>),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: Detail,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Storage(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Storage(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        };

        let detail = match self {
            Self::Validation(err) => {
                tracing::debug!(error = %err, "Rejected invalid input");
                Detail::Fields(
                    err.into_failures()
                        .into_iter()
                        .map(|failure| FieldDetail {
                            message: failure.reason.to_string(),
                            field: failure.field,
                        })
                        .collect(),
                )
            }
            Self::Storage(err) => Detail::Message(truncate(&err.to_string(), MAX_DETAIL_CHARS)),
            Self::Internal(msg) => Detail::Message(truncate(&msg, MAX_DETAIL_CHARS)),
            Self::NotFound(what) => Detail::Message(format!("Not found: {what}")),
        };

        (status, Json(ErrorBody { detail })).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Cut a message to at most `max` characters.
#[must_use]
pub fn truncate(message: &str, max: usize) -> String {
    message.chars().take(max).collect()
}
