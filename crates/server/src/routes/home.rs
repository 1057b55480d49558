//! Root and fallback route handlers.

use axum::{Json, http::Uri};
use serde::Serialize;

use crate::error::AppError;

/// Greeting returned by `GET /`.
pub const RUNNING_MESSAGE: &str = "Midori Teehaus backend is running";

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
}

/// GET /
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: RUNNING_MESSAGE,
    })
}

/// Fallback for unknown paths: 404 with a JSON `detail`.
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
