// Common test utilities for integration tests

use std::collections::HashMap;
use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use poem::Route;
use poem::test::{TestClient, TestResponse};
use sea_orm::{Database, DatabaseConnection};
use serde_json::{Value, json};

use localbiz_backend::AppData;
use localbiz_backend::api::build_routes;
use localbiz_backend::config::{BootstrapSettings, EnvironmentProvider};
use localbiz_backend::errors::internal::CatalogKind;
use localbiz_backend::stores::CatalogStore;

/// Fixed environment for integration tests; never reads the process environment
pub struct TestEnvironment {
    vars: HashMap<String, String>,
}

impl TestEnvironment {
    pub fn new() -> Self {
        let vars = [
            ("JWT_SECRET", "integration-jwt-secret-at-least-32-chars!"),
            ("PASSWORD_PEPPER", "integration-pepper"),
            ("REFRESH_TOKEN_SECRET", "integration-refresh-secret-32-chars-long"),
            ("COOKIE_SECURE", "false"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self { vars }
    }
}

impl EnvironmentProvider for TestEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

pub struct TestApp {
    pub client: TestClient<Route>,
    pub db: DatabaseConnection,
}

/// Full application over a fresh in-memory database
pub async fn spawn_app() -> TestApp {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let env: Arc<dyn EnvironmentProvider + Send + Sync> = Arc::new(TestEnvironment::new());
    let settings = BootstrapSettings::from_env_provider(env.clone()).expect("settings");
    let app_data = Arc::new(AppData::init(db.clone(), settings, env).expect("app data"));

    TestApp {
        client: TestClient::new(build_routes(app_data, "http://localhost/api")),
        db,
    }
}

/// Insert catalog rows and return their ids in order
pub async fn seed(db: &DatabaseConnection, kind: CatalogKind, names: &[&str]) -> Vec<i32> {
    let store = CatalogStore::new(db.clone());
    let mut ids = Vec::new();
    for name in names {
        ids.push(store.add(db, kind, name).await.expect("seed catalog").id);
    }
    ids
}

pub async fn body_json(resp: TestResponse) -> Value {
    resp.0
        .into_body()
        .into_json::<Value>()
        .await
        .expect("JSON body")
}

pub fn set_cookie(resp: &TestResponse) -> String {
    resp.0
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_default()
}

/// `name=value` pair from a Set-Cookie header, ready for a Cookie request header
pub fn cookie_pair(set_cookie: &str) -> String {
    set_cookie.split(';').next().unwrap_or_default().to_string()
}

pub async fn signup(app: &TestApp, email: &str, username: &str, role: &str) -> TestResponse {
    app.client
        .post("/api/auth/signup")
        .body_json(&json!({
            "email": email,
            "password": "s3cret-pass",
            "username": username,
            "role": role,
        }))
        .send()
        .await
}

/// Sign up and return the access token
pub async fn signup_token(app: &TestApp, email: &str, username: &str, role: &str) -> String {
    let resp = signup(app, email, username, role).await;
    let body = body_json(resp).await;
    body["data"]["tokens"]["accessToken"]
        .as_str()
        .expect("access token")
        .to_string()
}

pub fn business_payload(name: &str, city_id: i32, address: &str) -> Value {
    json!({
        "name": name,
        "contact": { "phone_primary": "+91 98450 00000" },
        "location": {
            "address_line1": address,
            "city_id": city_id,
            "pincode": "560001"
        }
    })
}
