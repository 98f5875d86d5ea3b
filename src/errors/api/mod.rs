// API-facing error types
pub mod auth;
pub mod business;

use poem_openapi::Object;

pub use auth::AuthError;
pub use business::BusinessApiError;

/// Standardized error body returned by every endpoint
#[derive(Object, Debug, Clone)]
pub struct ApiErrorResponse {
    /// Always false for errors
    pub success: bool,

    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,
}

impl ApiErrorResponse {
    pub fn new(error: &str, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            success: false,
            error: error.to_string(),
            message: message.into(),
            status_code,
        }
    }
}
