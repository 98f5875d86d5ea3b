use crate::errors::internal::{ErrorKind, InternalError};
use poem_openapi::{ApiResponse, payload::Json};
use std::fmt;

use super::ApiErrorResponse;

/// Error responses for the business directory endpoints
#[derive(ApiResponse, Debug)]
pub enum BusinessApiError {
    #[oai(status = 400)]
    ValidationFailed(Json<ApiErrorResponse>),

    #[oai(status = 401)]
    Unauthorized(Json<ApiErrorResponse>),

    #[oai(status = 403)]
    Forbidden(Json<ApiErrorResponse>),

    #[oai(status = 404)]
    NotFound(Json<ApiErrorResponse>),

    #[oai(status = 409)]
    Duplicate(Json<ApiErrorResponse>),

    #[oai(status = 500)]
    InternalError(Json<ApiErrorResponse>),
}

impl BusinessApiError {
    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::ValidationFailed(Json(ApiErrorResponse::new("validation_error", message, 400)))
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(Json(ApiErrorResponse::new("unauthorized", message, 401)))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(Json(ApiErrorResponse::new("forbidden", message, 403)))
    }

    pub fn not_found() -> Self {
        Self::NotFound(Json(ApiErrorResponse::new("not_found", "Business not found", 404)))
    }

    pub fn duplicate() -> Self {
        Self::Duplicate(Json(ApiErrorResponse::new(
            "duplicate_business",
            "A business with the same name at this location already exists",
            409,
        )))
    }

    fn internal_server_error() -> Self {
        Self::InternalError(Json(ApiErrorResponse::new(
            "internal_error",
            "An internal error occurred",
            500,
        )))
    }

    /// Convert InternalError to BusinessApiError
    ///
    /// Validation messages from the domain are passed through; infrastructure
    /// failures are logged and replaced with a generic message.
    pub fn from_internal_error(err: InternalError) -> Self {
        match err.kind() {
            ErrorKind::Validation => {
                tracing::debug!("Business request rejected: {}", err);
                Self::validation_failed(err.to_string())
            }
            ErrorKind::Unauthenticated => {
                tracing::debug!("Unauthenticated business request: {}", err);
                Self::unauthorized(err.to_string())
            }
            ErrorKind::Forbidden => Self::forbidden(err.to_string()),
            ErrorKind::NotFound => Self::not_found(),
            ErrorKind::Conflict => {
                tracing::debug!("Duplicate business rejected: {}", err);
                Self::duplicate()
            }
            ErrorKind::Internal => {
                tracing::error!("Internal error in business operation: {}", err);
                Self::internal_server_error()
            }
        }
    }

    pub fn message(&self) -> String {
        self.body().message.clone()
    }

    pub fn status_code(&self) -> u16 {
        self.body().status_code
    }

    fn body(&self) -> &ApiErrorResponse {
        match self {
            Self::ValidationFailed(json)
            | Self::Unauthorized(json)
            | Self::Forbidden(json)
            | Self::NotFound(json)
            | Self::Duplicate(json)
            | Self::InternalError(json) => &json.0,
        }
    }
}

impl fmt::Display for BusinessApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::internal::{BusinessError, CatalogKind, CredentialError};
    use sea_orm::DbErr;

    #[test]
    fn test_duplicate_maps_to_conflict() {
        let err = BusinessApiError::from_internal_error(
            BusinessError::Duplicate { name: "Acme".to_string() }.into(),
        );

        assert!(matches!(err, BusinessApiError::Duplicate(_)));
        assert_eq!(err.status_code(), 409);
    }

    #[test]
    fn test_unknown_catalog_entry_is_validation_error_with_detail() {
        let err = BusinessApiError::from_internal_error(
            BusinessError::UnknownCatalogEntry { kind: CatalogKind::Service, id: 99 }.into(),
        );

        assert_eq!(err.status_code(), 400);
        assert_eq!(err.message(), "Unknown service id: 99");
    }

    #[test]
    fn test_not_found() {
        let err = BusinessApiError::from_internal_error(BusinessError::NotFound(7).into());

        assert_eq!(err.status_code(), 404);
        assert_eq!(err.message(), "Business not found");
    }

    #[test]
    fn test_expired_token_is_unauthorized() {
        let err = BusinessApiError::from_internal_error(
            CredentialError::ExpiredToken("jwt".to_string()).into(),
        );

        assert!(matches!(err, BusinessApiError::Unauthorized(_)));
    }

    #[test]
    fn test_database_error_is_masked() {
        let err = BusinessApiError::from_internal_error(InternalError::database(
            "insert_business",
            DbErr::Custom("disk I/O error".to_string()),
        ));

        assert_eq!(err.status_code(), 500);
        assert!(!err.message().contains("disk"));
    }
}
