use serde::{Deserialize, Serialize};

/// Role names seeded by the schema migration
pub const ROLE_USER: &str = "user";
pub const ROLE_BUSINESS_OWNER: &str = "business_owner";
pub const ROLE_ADMIN: &str = "admin";

/// JWT Claims structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub id: i32,

    pub email: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Input for account registration, already shape-validated by the API layer
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub username: String,
    pub role: String,
    pub is_active: bool,
    pub is_email_verified: bool,
}

/// User as exposed to callers. Never carries the password hash.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub is_active: bool,
    pub is_email_verified: bool,
    pub roles: Vec<String>,
}

/// Identity recovered from a refresh token
#[derive(Debug, Clone, PartialEq)]
pub struct TokenSubject {
    pub user_id: i32,
    pub email: String,
}

/// Access token plus the refresh token destined for the cookie
#[derive(Debug, Clone)]
pub struct IssuedTokens {
    pub access_token: String,
    pub expires_in: i64,
    pub refresh_token: String,
}

/// Principal resolved from a bearer token
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedUser {
    pub id: i32,
    pub email: String,
    pub roles: Vec<String>,
}

impl AuthenticatedUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(ROLE_ADMIN)
    }
}
