// Test utilities shared across unit tests
// Only compiled when running tests

use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use crate::app_data::AppData;
use crate::config::{BootstrapSettings, EnvironmentProvider, MockEnvironment, SecretManager};
use crate::errors::internal::CatalogKind;
use crate::stores::CatalogStore;
use crate::types::internal::auth::NewUser;

/// JWT secret carried by `MockEnvironment::with_test_secrets`
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-that-is-at-least-32-characters";

pub const TEST_PASSWORD: &str = "correct-horse-battery";

fn test_env() -> Arc<dyn EnvironmentProvider + Send + Sync> {
    Arc::new(MockEnvironment::with_test_secrets())
}

pub fn test_secret_manager() -> Arc<SecretManager> {
    Arc::new(SecretManager::init(test_env()).expect("Failed to initialize test SecretManager"))
}

/// Fresh in-memory database with every migration applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// AppData over an in-memory database and mock secrets
pub async fn setup_test_app_data() -> Arc<AppData> {
    let db = setup_test_db().await;
    let env = test_env();
    let settings =
        BootstrapSettings::from_env_provider(env.clone()).expect("Failed to load test settings");

    Arc::new(AppData::init(db, settings, env).expect("Failed to initialize test AppData"))
}

/// Ids of the catalog rows created by `seed_catalog`, in insertion order
pub struct SeededCatalog {
    pub service_ids: Vec<i32>,
    pub brand_ids: Vec<i32>,
    pub specialization_ids: Vec<i32>,
}

/// Three services, two brands and two specializations
pub async fn seed_catalog(db: &DatabaseConnection) -> SeededCatalog {
    let store = CatalogStore::new(db.clone());

    let mut seeded = SeededCatalog {
        service_ids: Vec::new(),
        brand_ids: Vec::new(),
        specialization_ids: Vec::new(),
    };

    for name in ["Plumbing", "Electrical", "Carpentry"] {
        let entry = store.add(db, CatalogKind::Service, name).await.expect("seed service");
        seeded.service_ids.push(entry.id);
    }
    for name in ["Bosch", "Makita"] {
        let entry = store.add(db, CatalogKind::Brand, name).await.expect("seed brand");
        seeded.brand_ids.push(entry.id);
    }
    for name in ["Residential", "Commercial"] {
        let entry = store
            .add(db, CatalogKind::Specialization, name)
            .await
            .expect("seed specialization");
        seeded.specialization_ids.push(entry.id);
    }

    seeded
}

/// Active, verified signup input with `TEST_PASSWORD`
pub fn new_user(email: &str, username: &str, role: &str) -> NewUser {
    NewUser {
        email: email.to_string(),
        password: TEST_PASSWORD.to_string(),
        username: username.to_string(),
        role: role.to_string(),
        is_active: true,
        is_email_verified: false,
    }
}
