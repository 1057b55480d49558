//! Public menu route handlers.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use midori_core::{MenuItem, Schema};

use crate::db::{Document, Filter};
use crate::error::Result;
use crate::extract::Validated;
use crate::state::AppState;

/// Query parameters for the menu listing.
#[derive(Debug, Default, Deserialize)]
pub struct MenuQuery {
    /// Only list items in this category. Empty means all.
    pub category: Option<String>,
}

impl MenuQuery {
    /// Equality filter for this query.
    #[must_use]
    pub fn filter(&self) -> Filter {
        match self.category.as_deref() {
            Some(category) if !category.trim().is_empty() => Filter::all().eq("category", category),
            _ => Filter::all(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MenuListResponse {
    pub items: Vec<Document>,
}

#[derive(Debug, Serialize)]
pub struct InsertedResponse {
    pub inserted_id: String,
}

/// List menu items, optionally by category.
///
/// GET /api/menu?category=Tea
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<MenuQuery>,
) -> Result<Json<MenuListResponse>> {
    let items = state
        .gateway()
        .find(&MenuItem::collection_name(), &query.filter())
        .await?;

    tracing::debug!(count = items.len(), "Listed menu items");
    Ok(Json(MenuListResponse { items }))
}

/// Add a menu item.
///
/// POST /api/menu
#[instrument(skip(state, item))]
pub async fn create(
    State(state): State<AppState>,
    Validated(item): Validated<MenuItem>,
) -> Result<Json<InsertedResponse>> {
    let inserted_id = state
        .gateway()
        .create(&MenuItem::collection_name(), &item)
        .await?;

    tracing::info!(
        id = %inserted_id,
        name = item.name(),
        category = item.category(),
        "Menu item added"
    );
    Ok(Json(InsertedResponse { inserted_id }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_by_category() {
        let query = MenuQuery {
            category: Some("Tea".to_string()),
        };
        assert_eq!(query.filter(), Filter::all().eq("category", "Tea"));
    }

    #[test]
    fn test_empty_category_matches_all() {
        assert!(MenuQuery::default().filter().is_empty());

        let query = MenuQuery {
            category: Some("  ".to_string()),
        };
        assert!(query.filter().is_empty());
    }
}
