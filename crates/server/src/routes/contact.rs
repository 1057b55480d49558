//! Contact form route handler.
//!
//! Submissions are stored in the `inquiry` collection. There is no read
//! endpoint; staff read inquiries from the database directly.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use midori_core::{Inquiry, Schema};

use crate::error::Result;
use crate::extract::Validated;
use crate::state::AppState;

/// Response for a stored submission.
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub ok: bool,
    pub inserted_id: String,
}

/// Submit the contact form.
///
/// POST /api/contact
#[instrument(skip(state, inquiry))]
pub async fn submit(
    State(state): State<AppState>,
    Validated(inquiry): Validated<Inquiry>,
) -> Result<Json<ContactResponse>> {
    let inserted_id = state
        .gateway()
        .create(&Inquiry::collection_name(), &inquiry)
        .await?;

    tracing::info!(
        id = %inserted_id,
        email = inquiry.email(),
        has_subject = inquiry.subject().is_some(),
        "Contact inquiry stored"
    );
    Ok(Json(ContactResponse {
        ok: true,
        inserted_id,
    }))
}
