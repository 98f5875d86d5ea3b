use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::{BootstrapSettings, EnvironmentProvider, SecretManager};
use crate::errors::InternalError;
use crate::stores::{BusinessStore, CatalogStore, CredentialStore};

/// Centralized application data following the main-owned stores pattern
///
/// All dependencies are created once in main.rs and shared across coordinators.
///
/// ```text
/// main.rs
///   ↓
/// AppData::init()
///   ↓ creates once
///   ├─ db (DatabaseConnection)
///   ├─ settings (BootstrapSettings)
///   ├─ secret_manager (Arc<SecretManager>)
///   ├─ credential_store (Arc<CredentialStore>)
///   ├─ business_store (Arc<BusinessStore>)
///   └─ catalog_store (Arc<CatalogStore>)
///   ↓ wrapped in Arc<AppData>
///   ↓ passed to coordinators
///   ├─ AuthCoordinator::new(app_data) → extracts stores, creates providers
///   └─ BusinessCoordinator::new(app_data) → extracts stores
/// ```
pub struct AppData {
    pub db: DatabaseConnection,
    pub settings: BootstrapSettings,
    pub secret_manager: Arc<SecretManager>,
    pub credential_store: Arc<CredentialStore>,
    pub business_store: Arc<BusinessStore>,
    pub catalog_store: Arc<CatalogStore>,
}

impl AppData {
    /// Initialize all application data
    ///
    /// The database should be connected and migrated before calling this.
    ///
    /// # Errors
    ///
    /// Returns `InternalError` when secret manager initialization fails
    pub fn init(
        db: DatabaseConnection,
        settings: BootstrapSettings,
        env_provider: Arc<dyn EnvironmentProvider + Send + Sync>,
    ) -> Result<Self, InternalError> {
        tracing::info!("Initializing AppData...");

        tracing::debug!("Initializing secret manager...");
        let secret_manager = Arc::new(SecretManager::init(env_provider).map_err(|e| {
            InternalError::parse("secret_manager", format!("Secret manager init failed: {}", e))
        })?);
        tracing::debug!("Secret manager initialized");

        tracing::debug!("Creating stores...");
        let credential_store = Arc::new(CredentialStore::new(db.clone()));
        let business_store = Arc::new(BusinessStore::new(db.clone()));
        let catalog_store = Arc::new(CatalogStore::new(db.clone()));
        tracing::debug!("Stores created");

        tracing::info!("AppData initialization complete");

        Ok(Self {
            db,
            settings,
            secret_manager,
            credential_store,
            business_store,
            catalog_store,
        })
    }
}
