//! Menu inspection commands.

use midori_core::{MenuItem, Schema};
use midori_server::db::{Filter, StorageError};
use midori_server::routes::menu::MenuQuery;

use super::CommandError;

/// Print stored menu items as pretty JSON, one document per item.
///
/// # Errors
///
/// Returns an error if the store cannot be reached or read.
#[allow(clippy::print_stdout)]
pub async fn list(category: Option<String>) -> Result<(), CommandError> {
    let gateway = super::connect_gateway().await?;

    let filter: Filter = MenuQuery { category }.filter();
    let items = gateway.find(&MenuItem::collection_name(), &filter).await?;

    for item in &items {
        let json = serde_json::to_string_pretty(item).map_err(StorageError::from)?;
        println!("{json}");
    }

    tracing::info!(count = items.len(), "Listed menu items");
    gateway.close().await;
    Ok(())
}
