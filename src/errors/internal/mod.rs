use thiserror::Error;

pub mod business;
pub mod credential;
pub mod database;

pub use business::{BusinessError, CatalogKind};
pub use credential::CredentialError;
pub use database::{is_unique_violation, DatabaseError};

/// Coarse error taxonomy used by the API layer to pick a status code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Unauthenticated,
    Forbidden,
    NotFound,
    Conflict,
    Internal,
}

/// Internal error type for store, provider and coordinator operations
///
/// Hybrid design separates infrastructure errors (shared) from domain errors (per area).
/// Not exposed via API - endpoints must convert to AuthError or BusinessApiError.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Parse error: failed to parse {value_type}: {message}")]
    Parse {
        value_type: String,
        message: String,
    },

    #[error("Crypto error: {operation} failed: {message}")]
    Crypto {
        operation: String,
        message: String,
    },

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Business(#[from] BusinessError),
}

impl InternalError {
    pub fn database(operation: &str, source: sea_orm::DbErr) -> Self {
        Self::Database(DatabaseError::Operation {
            operation: operation.to_string(),
            source,
        })
    }

    pub fn transaction_begin(source: sea_orm::DbErr) -> Self {
        Self::Database(DatabaseError::TransactionBegin { source })
    }

    pub fn transaction_commit(source: sea_orm::DbErr) -> Self {
        Self::Database(DatabaseError::TransactionCommit { source })
    }

    pub fn parse(value_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            value_type: value_type.into(),
            message: message.into(),
        }
    }

    pub fn crypto(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Crypto {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Classify this error for the API boundary
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Database(_) | Self::Parse { .. } | Self::Crypto { .. } => ErrorKind::Internal,
            Self::Credential(err) => match err {
                CredentialError::AlreadyExists => ErrorKind::Conflict,
                CredentialError::RoleNotFound(_) => ErrorKind::Validation,
                CredentialError::InvalidCredentials
                | CredentialError::AccountInactive
                | CredentialError::UserNotFound(_)
                | CredentialError::TokenMissing
                | CredentialError::TokenInvalid
                | CredentialError::InvalidToken { .. }
                | CredentialError::ExpiredToken(_) => ErrorKind::Unauthenticated,
                CredentialError::TokenNotFound => ErrorKind::NotFound,
            },
            Self::Business(err) => match err {
                BusinessError::Duplicate { .. } | BusinessError::CatalogEntryExists { .. } => {
                    ErrorKind::Conflict
                }
                BusinessError::NotFound(_) => ErrorKind::NotFound,
                BusinessError::UnknownCatalogEntry { .. }
                | BusinessError::UnknownLocation { .. }
                | BusinessError::IncompleteLocation(_)
                | BusinessError::IncompleteContact(_)
                | BusinessError::InvalidTime(_) => ErrorKind::Validation,
            },
        }
    }
}
