// Catalog management CLI commands

use crate::errors::internal::CatalogKind;
use crate::stores::CatalogStore;
use crate::types::internal::context::RequestContext;

/// Add one entry to a catalog
pub async fn add_entry(
    catalog_store: &CatalogStore,
    kind: CatalogKind,
    name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = RequestContext::for_cli("catalog_add");

    if name.trim().is_empty() {
        println!("❌ Error: name must not be empty");
        return Err("Empty catalog name".into());
    }

    let entry = catalog_store
        .add(catalog_store.connection(), kind, name)
        .await
        .map_err(|e| format!("Failed to add {}: {}", kind, e))?;

    tracing::info!(
        request_id = %ctx.request_id,
        source = %ctx.source,
        actor = %ctx.actor_id,
        kind = %kind,
        id = entry.id,
        "Catalog entry added"
    );
    println!("✅ Added {} '{}' with id {}", kind, entry.name, entry.id);

    Ok(())
}

/// Print every entry of a catalog
pub async fn list_entries(
    catalog_store: &CatalogStore,
    kind: CatalogKind,
) -> Result<(), Box<dyn std::error::Error>> {
    let entries = catalog_store
        .list(catalog_store.connection(), kind)
        .await
        .map_err(|e| format!("Failed to list {} catalog: {}", kind, e))?;

    if entries.is_empty() {
        println!("ℹ️  No {} entries.", kind);
        return Ok(());
    }

    for entry in entries {
        println!("{:>6}  {}", entry.id, entry.name);
    }

    Ok(())
}
