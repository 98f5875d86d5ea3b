// API layer - HTTP endpoints
pub mod auth;
pub mod business;
pub mod health;
pub mod helpers;

use std::sync::Arc;

use poem::Route;
use poem_openapi::auth::Bearer;
use poem_openapi::{OpenApiService, SecurityScheme};

pub use auth::AuthApi;
pub use business::BusinessApi;
pub use health::HealthApi;

use crate::app_data::AppData;

/// JWT Bearer token authentication
#[derive(SecurityScheme)]
#[oai(ty = "bearer", key_name = "Authorization", key_in = "header", bearer_format = "JWT")]
pub struct BearerAuth(pub Bearer);

pub type ApiService = OpenApiService<(HealthApi, AuthApi, BusinessApi), ()>;

/// OpenAPI service over every endpoint group
pub fn api_service(app_data: Arc<AppData>, server_url: &str) -> ApiService {
    OpenApiService::new(
        (
            HealthApi::new(app_data.db.clone()),
            AuthApi::new(app_data.clone()),
            BusinessApi::new(app_data),
        ),
        "Local Business Directory API",
        env!("CARGO_PKG_VERSION"),
    )
    .server(server_url)
}

/// Routes served by the application: the API under `/api`, Swagger UI under `/swagger`
pub fn build_routes(app_data: Arc<AppData>, server_url: &str) -> Route {
    let api = api_service(app_data, server_url);
    let ui = api.swagger_ui();

    Route::new().nest("/api", api).nest("/swagger", ui)
}
