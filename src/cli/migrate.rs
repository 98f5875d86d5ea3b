use crate::config::{BootstrapSettings, init_database, migrate_database};

/// Run pending database migrations
///
/// Connects and migrates without building the full AppData, so it works
/// before any secrets are configured.
pub async fn run_migrations(settings: &BootstrapSettings) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Running database migrations...");

    let db = init_database(settings).await?;
    migrate_database(&db).await?;

    tracing::info!("All migrations completed successfully");
    println!("✅ Migrations applied");

    Ok(())
}
