use crate::errors::internal::{CredentialError, InternalError};
use poem_openapi::{ApiResponse, payload::Json};
use std::fmt;

use super::ApiErrorResponse;

/// Authentication error types
#[derive(ApiResponse, Debug)]
pub enum AuthError {
    /// Request body or parameters failed validation
    #[oai(status = 400)]
    ValidationFailed(Json<ApiErrorResponse>),

    /// Email or username already registered
    #[oai(status = 400)]
    DuplicateUser(Json<ApiErrorResponse>),

    /// Invalid email or password
    #[oai(status = 401)]
    InvalidCredentials(Json<ApiErrorResponse>),

    /// Account has been deactivated
    #[oai(status = 401)]
    AccountInactive(Json<ApiErrorResponse>),

    /// Invalid or malformed access token
    #[oai(status = 401)]
    InvalidToken(Json<ApiErrorResponse>),

    /// Access token has expired
    #[oai(status = 401)]
    ExpiredToken(Json<ApiErrorResponse>),

    /// Refresh cookie missing, expired, revoked or unknown; the cookie is cleared
    #[oai(status = 401)]
    InvalidRefreshToken(
        Json<ApiErrorResponse>,
        #[oai(header = "Set-Cookie")] String,
    ),

    /// Refresh cookie required for this operation
    #[oai(status = 400)]
    RefreshTokenRequired(Json<ApiErrorResponse>),

    /// Refresh token not found or already revoked
    #[oai(status = 404)]
    RefreshTokenNotFound(Json<ApiErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ApiErrorResponse>),
}

impl AuthError {
    pub fn validation_failed(message: impl Into<String>) -> Self {
        AuthError::ValidationFailed(Json(ApiErrorResponse::new(
            "validation_error",
            message,
            400,
        )))
    }

    pub fn duplicate_user() -> Self {
        AuthError::DuplicateUser(Json(ApiErrorResponse::new(
            "duplicate_user",
            "User already exists",
            400,
        )))
    }

    pub fn invalid_credentials() -> Self {
        AuthError::InvalidCredentials(Json(ApiErrorResponse::new(
            "invalid_credentials",
            "Invalid credentials",
            401,
        )))
    }

    pub fn account_inactive() -> Self {
        AuthError::AccountInactive(Json(ApiErrorResponse::new(
            "account_inactive",
            "Account is inactive",
            401,
        )))
    }

    pub fn invalid_token() -> Self {
        AuthError::InvalidToken(Json(ApiErrorResponse::new(
            "invalid_token",
            "Invalid or malformed access token",
            401,
        )))
    }

    pub fn expired_token() -> Self {
        AuthError::ExpiredToken(Json(ApiErrorResponse::new(
            "expired_token",
            "Access token has expired",
            401,
        )))
    }

    /// Refresh rejection carrying a `Set-Cookie` value that clears the refresh cookie
    pub fn invalid_refresh_token(message: impl Into<String>, clear_cookie: String) -> Self {
        AuthError::InvalidRefreshToken(
            Json(ApiErrorResponse::new("invalid_refresh_token", message, 401)),
            clear_cookie,
        )
    }

    /// Refresh rejection for callers that have no cookie to clear
    pub fn refresh_token_rejected() -> Self {
        AuthError::InvalidToken(Json(ApiErrorResponse::new(
            "invalid_refresh_token",
            CredentialError::TokenInvalid.to_string(),
            401,
        )))
    }

    pub fn refresh_token_required() -> Self {
        AuthError::RefreshTokenRequired(Json(ApiErrorResponse::new(
            "refresh_token_missing",
            "Refresh token missing",
            400,
        )))
    }

    pub fn refresh_token_not_found() -> Self {
        AuthError::RefreshTokenNotFound(Json(ApiErrorResponse::new(
            "refresh_token_not_found",
            "Token not found or already revoked",
            404,
        )))
    }

    fn internal_server_error() -> Self {
        AuthError::InternalError(Json(ApiErrorResponse::new(
            "internal_error",
            "An internal error occurred",
            500,
        )))
    }

    /// Convert InternalError to AuthError
    ///
    /// This is the explicit conversion point from internal errors to API errors.
    /// Internal error details are logged but not exposed to clients.
    pub fn from_internal_error(err: InternalError) -> Self {
        match &err {
            InternalError::Database(_) => {
                tracing::error!("Database error in auth operation: {}", err);
                Self::internal_server_error()
            }
            InternalError::Parse { value_type, .. } => {
                tracing::error!("Parse error for {}: {}", value_type, err);
                Self::internal_server_error()
            }
            InternalError::Crypto { operation, .. } => {
                tracing::error!("Crypto error in {}: {}", operation, err);
                Self::internal_server_error()
            }

            InternalError::Credential(CredentialError::AlreadyExists) => {
                tracing::debug!("Duplicate signup attempt");
                Self::duplicate_user()
            }
            InternalError::Credential(CredentialError::RoleNotFound(role)) => {
                tracing::warn!("Signup referenced a role missing from the catalog: {}", role);
                Self::validation_failed(format!("Role not found: {}", role))
            }
            InternalError::Credential(CredentialError::InvalidCredentials) => {
                tracing::debug!("Invalid credentials attempt");
                Self::invalid_credentials()
            }
            InternalError::Credential(CredentialError::AccountInactive) => {
                tracing::debug!("Login attempt on inactive account");
                Self::account_inactive()
            }
            InternalError::Credential(CredentialError::UserNotFound(user_id)) => {
                tracing::debug!("Token subject no longer exists: {}", user_id);
                Self::invalid_token()
            }
            InternalError::Credential(CredentialError::InvalidToken { token_type, reason }) => {
                tracing::debug!("Invalid token: {} - {}", token_type, reason);
                Self::invalid_token()
            }
            InternalError::Credential(CredentialError::ExpiredToken(token_type)) => {
                tracing::debug!("Expired token: {}", token_type);
                Self::expired_token()
            }
            InternalError::Credential(CredentialError::TokenMissing) => Self::refresh_token_required(),
            InternalError::Credential(CredentialError::TokenNotFound) => Self::refresh_token_not_found(),
            InternalError::Credential(CredentialError::TokenInvalid) => Self::refresh_token_rejected(),

            // Business errors should not surface from auth endpoints
            InternalError::Business(_) => {
                tracing::error!("Unexpected error in auth operation: {}", err);
                Self::internal_server_error()
            }
        }
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        self.body().message.clone()
    }

    /// HTTP status code carried by the error body
    pub fn status_code(&self) -> u16 {
        self.body().status_code
    }

    fn body(&self) -> &ApiErrorResponse {
        match self {
            AuthError::ValidationFailed(json)
            | AuthError::DuplicateUser(json)
            | AuthError::InvalidCredentials(json)
            | AuthError::AccountInactive(json)
            | AuthError::InvalidToken(json)
            | AuthError::ExpiredToken(json)
            | AuthError::InvalidRefreshToken(json, _)
            | AuthError::RefreshTokenRequired(json)
            | AuthError::RefreshTokenNotFound(json)
            | AuthError::InternalError(json) => &json.0,
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::DbErr;

    #[test]
    fn test_database_error_converts_to_internal_server_error() {
        let internal_err = InternalError::database("find_user", DbErr::RecordNotFound("test".to_string()));
        let auth_err = AuthError::from_internal_error(internal_err);

        assert_eq!(auth_err.message(), "An internal error occurred");
        assert_eq!(auth_err.status_code(), 500);
    }

    #[test]
    fn test_crypto_error_hides_details() {
        let internal_err = InternalError::crypto("argon2_init", "invalid secret");
        let auth_err = AuthError::from_internal_error(internal_err);

        assert_eq!(auth_err.message(), "An internal error occurred");
        assert!(!auth_err.message().contains("argon2"));
    }

    #[test]
    fn test_duplicate_user_maps_to_bad_request() {
        let auth_err = AuthError::from_internal_error(CredentialError::AlreadyExists.into());

        assert!(matches!(auth_err, AuthError::DuplicateUser(_)));
        assert_eq!(auth_err.status_code(), 400);
        assert_eq!(auth_err.message(), "User already exists");
    }

    #[test]
    fn test_invalid_credentials_and_inactive_are_unauthorized() {
        let invalid = AuthError::from_internal_error(CredentialError::InvalidCredentials.into());
        let inactive = AuthError::from_internal_error(CredentialError::AccountInactive.into());

        assert_eq!(invalid.status_code(), 401);
        assert_eq!(invalid.message(), "Invalid credentials");
        assert_eq!(inactive.status_code(), 401);
        assert_eq!(inactive.message(), "Account is inactive");
    }

    #[test]
    fn test_revoke_errors_map_to_400_and_404() {
        let missing = AuthError::from_internal_error(CredentialError::TokenMissing.into());
        let not_found = AuthError::from_internal_error(CredentialError::TokenNotFound.into());

        assert!(matches!(missing, AuthError::RefreshTokenRequired(_)));
        assert!(matches!(not_found, AuthError::RefreshTokenNotFound(_)));
    }

    #[test]
    fn test_spent_refresh_token_maps_without_empty_cookie_header() {
        let auth_err = AuthError::from_internal_error(CredentialError::TokenInvalid.into());

        assert!(matches!(auth_err, AuthError::InvalidToken(_)));
        assert_eq!(auth_err.status_code(), 401);
        assert_eq!(auth_err.message(), "Invalid or expired refresh token");
    }

    #[test]
    fn test_expired_jwt_maps_to_expired_token() {
        let auth_err = AuthError::from_internal_error(CredentialError::ExpiredToken("jwt".to_string()).into());

        assert!(matches!(auth_err, AuthError::ExpiredToken(_)));
    }

    #[test]
    fn test_display_uses_message() {
        let auth_err = AuthError::invalid_credentials();

        assert_eq!(format!("{}", auth_err), "Invalid credentials");
    }
}
