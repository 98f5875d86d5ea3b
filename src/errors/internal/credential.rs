use thiserror::Error;

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("User already exists")]
    AlreadyExists,

    #[error("Role not found: {0}")]
    RoleNotFound(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is inactive")]
    AccountInactive,

    #[error("User not found: {0}")]
    UserNotFound(i32),

    #[error("Refresh token missing")]
    TokenMissing,

    #[error("Invalid or expired refresh token")]
    TokenInvalid,

    #[error("Token not found or already revoked")]
    TokenNotFound,

    #[error("Invalid token: {token_type} - {reason}")]
    InvalidToken {
        token_type: String,
        reason: String,
    },

    #[error("Expired token: {0}")]
    ExpiredToken(String),
}

impl CredentialError {
    pub fn invalid_token(token_type: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidToken {
            token_type: token_type.into(),
            reason: reason.into(),
        }
    }
}
