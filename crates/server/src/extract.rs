//! Request extractors.

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde_json::Value;

use midori_core::{Schema, ValidationError};

use crate::error::AppError;

/// Extractor that reads a JSON body and validates it as `T`.
///
/// Bodies that are not JSON (bad syntax, wrong or missing content type,
/// unreadable) are rejected the same way as invalid records: 422 with a
/// failure on the `$` field.
///
/// # Example
///
/// ```rust,ignore
/// async fn create(Validated(item): Validated<MenuItem>) -> impl IntoResponse {
///     item.name().to_string()
/// }
/// ```
pub struct Validated<T>(pub T);

impl<S, T> FromRequest<S> for Validated<T>
where
    S: Send + Sync,
    T: Schema + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(error = %rejection, "Rejected unreadable body");
                ValidationError::malformed_body(T::KIND, rejection.body_text())
            })?;

        Ok(Self(T::validate(&body)?))
    }
}
