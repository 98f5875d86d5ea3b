use poem_openapi::{ApiResponse, Enum, Object, payload::Json};
use serde::{Deserialize, Serialize};

use crate::types::internal::auth::{
    IssuedTokens, ROLE_ADMIN, ROLE_BUSINESS_OWNER, ROLE_USER, UserProfile,
};

use super::common::MessageResponse;

/// Roles a caller may request at signup
#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[oai(rename_all = "snake_case")]
pub enum SignupRole {
    #[default]
    User,
    BusinessOwner,
    Admin,
}

impl SignupRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignupRole::User => ROLE_USER,
            SignupRole::BusinessOwner => ROLE_BUSINESS_OWNER,
            SignupRole::Admin => ROLE_ADMIN,
        }
    }
}

/// Request model for account registration
#[derive(Object, Debug)]
pub struct SignupRequest {
    /// Email address, unique across accounts
    #[oai(validator(max_length = 255))]
    pub email: String,

    /// Password (at least 6 characters)
    #[oai(validator(min_length = 6))]
    pub password: String,

    /// Username, unique across accounts (at least 3 characters)
    #[oai(validator(min_length = 3, max_length = 100))]
    pub username: String,

    /// Role to assign, defaults to `user`
    pub role: Option<SignupRole>,

    /// Defaults to true
    pub is_active: Option<bool>,

    /// Defaults to false
    pub is_email_verified: Option<bool>,
}

/// Request model for user login
#[derive(Object, Debug)]
pub struct LoginRequest {
    pub email: String,

    pub password: String,
}

/// Access token issued to the client. The refresh token travels in a cookie.
#[derive(Object, Debug, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
pub struct TokenResponse {
    /// JWT access token for API authentication
    pub access_token: String,

    /// Number of seconds until the access token expires
    pub expires_in: i64,
}

impl From<&IssuedTokens> for TokenResponse {
    fn from(tokens: &IssuedTokens) -> Self {
        Self {
            access_token: tokens.access_token.clone(),
            expires_in: tokens.expires_in,
        }
    }
}

#[derive(Object, Debug)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub is_active: bool,
    pub is_email_verified: bool,
    pub roles: Vec<String>,
}

impl From<UserProfile> for UserResponse {
    fn from(user: UserProfile) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            is_active: user.is_active,
            is_email_verified: user.is_email_verified,
            roles: user.roles,
        }
    }
}

#[derive(Object, Debug)]
pub struct AuthData {
    pub tokens: TokenResponse,
    pub user: UserResponse,
}

/// Response body for signup and login
#[derive(Object, Debug)]
pub struct AuthResponse {
    pub success: bool,
    pub data: AuthData,
}

#[derive(Object, Debug)]
pub struct RefreshData {
    pub tokens: TokenResponse,
}

/// Response body for token refresh
#[derive(Object, Debug)]
pub struct RefreshResponse {
    pub success: bool,
    pub data: RefreshData,
}

/// API response for signup endpoint
#[derive(ApiResponse)]
pub enum SignupApiResponse {
    /// Account created, tokens issued
    #[oai(status = 201)]
    Created(Json<AuthResponse>, #[oai(header = "Set-Cookie")] String),
}

/// API response for login endpoint
#[derive(ApiResponse)]
pub enum LoginApiResponse {
    /// Authentication successful, tokens issued
    #[oai(status = 200)]
    Ok(Json<AuthResponse>, #[oai(header = "Set-Cookie")] String),
}

/// API response for refresh endpoint
#[derive(ApiResponse)]
pub enum RefreshApiResponse {
    /// Refresh token rotated, new access token issued
    #[oai(status = 200)]
    Ok(Json<RefreshResponse>, #[oai(header = "Set-Cookie")] String),
}

/// API response for revoke endpoint
#[derive(ApiResponse)]
pub enum RevokeApiResponse {
    /// Refresh token revoked and cookie cleared
    #[oai(status = 200)]
    Ok(Json<MessageResponse>, #[oai(header = "Set-Cookie")] String),
}
