use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use rand::Rng;

use crate::config::SecretManager;
use crate::errors::InternalError;
use crate::errors::internal::CredentialError;
use crate::providers::CryptoProvider;
use crate::types::internal::auth::Claims;

/// Access token lifetime in seconds
pub const ACCESS_TOKEN_TTL_SECS: i64 = 60 * 60;
/// Refresh token lifetime in days
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 30;
/// Random bytes per refresh token before hex encoding
const REFRESH_TOKEN_BYTES: usize = 40;

/// Provides JWT generation and validation plus refresh token material
pub struct TokenProvider {
    secret_manager: Arc<SecretManager>,
    crypto: Arc<CryptoProvider>,
    jwt_expiration_secs: i64,
    refresh_expiration_days: i64,
}

impl TokenProvider {
    pub fn new(secret_manager: Arc<SecretManager>, crypto: Arc<CryptoProvider>) -> Self {
        Self {
            secret_manager,
            crypto,
            jwt_expiration_secs: ACCESS_TOKEN_TTL_SECS,
            refresh_expiration_days: REFRESH_TOKEN_TTL_DAYS,
        }
    }

    /// Sign an HS256 access token for the user
    ///
    /// # Returns
    /// * `(token, expires_in_seconds)`
    pub fn generate_jwt(&self, user_id: i32, email: &str) -> Result<(String, i64), InternalError> {
        let now = Utc::now().timestamp();

        let claims = Claims {
            id: user_id,
            email: email.to_string(),
            iat: now,
            exp: now + self.jwt_expiration_secs,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret_manager.jwt_secret().as_bytes()),
        )
        .map_err(|e| InternalError::crypto("jwt_generation", format!("Failed to generate JWT: {}", e)))?;

        Ok((token, self.jwt_expiration_secs))
    }

    /// Verify signature and expiry, returning the claims
    pub fn validate_jwt(&self, token: &str) -> Result<Claims, InternalError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret_manager.jwt_secret().as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            JwtErrorKind::ExpiredSignature => {
                tracing::debug!("Rejected expired access token");
                CredentialError::ExpiredToken("jwt".to_string()).into()
            }
            other => {
                tracing::debug!("Rejected access token: {:?}", other);
                CredentialError::invalid_token("jwt", "invalid signature or malformed").into()
            }
        })
    }

    /// Generate a cryptographically secure refresh token (hex encoded)
    pub fn generate_refresh_token(&self) -> String {
        let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
        rand::rng().fill(&mut bytes[..]);
        hex::encode(bytes)
    }

    /// Digest stored in place of the refresh token
    pub fn hash_refresh_token(&self, token: &str) -> Result<String, InternalError> {
        self.crypto.hmac_sha256_token(token)
    }

    /// Unix timestamp at which a refresh token issued now expires
    pub fn refresh_expiration(&self) -> i64 {
        Utc::now().timestamp() + self.refresh_expiration_days * 24 * 60 * 60
    }

    pub fn refresh_expiration_days(&self) -> i64 {
        self.refresh_expiration_days
    }
}

impl fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenProvider")
            .field("secret_manager", &"<redacted>")
            .field("jwt_expiration_secs", &self.jwt_expiration_secs)
            .field("refresh_expiration_days", &self.refresh_expiration_days)
            .finish()
    }
}

impl fmt::Display for TokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TokenProvider {{ jwt_expiration: {}s, refresh_expiration: {}days }}",
            self.jwt_expiration_secs, self.refresh_expiration_days
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{TEST_JWT_SECRET, test_secret_manager};

    fn create_test_token_provider() -> TokenProvider {
        let secret_manager = test_secret_manager();
        let crypto = Arc::new(CryptoProvider::new(secret_manager.clone()));
        TokenProvider::new(secret_manager, crypto)
    }

    #[test]
    fn test_jwt_expiration_is_one_hour() {
        let token_provider = create_test_token_provider();

        let (token, expires_in) = token_provider.generate_jwt(7, "a@example.com").unwrap();
        let claims = token_provider.validate_jwt(&token).unwrap();

        assert_eq!(expires_in, 3600);
        assert_eq!(claims.exp - claims.iat, 3600);
        assert_eq!(claims.id, 7);
        assert_eq!(claims.email, "a@example.com");
    }

    #[test]
    fn test_tampered_jwt_is_invalid() {
        let token_provider = create_test_token_provider();
        let (token, _) = token_provider.generate_jwt(1, "a@example.com").unwrap();

        let forged = encode(
            &Header::new(Algorithm::HS256),
            &Claims {
                id: 1,
                email: "a@example.com".to_string(),
                iat: 0,
                exp: i64::MAX / 2,
            },
            &EncodingKey::from_secret(b"attacker-guessed-secret-wrong-value"),
        )
        .unwrap();

        assert!(token_provider.validate_jwt(&token).is_ok());
        assert!(matches!(
            token_provider.validate_jwt(&forged),
            Err(InternalError::Credential(CredentialError::InvalidToken { .. }))
        ));
        assert!(token_provider.validate_jwt("not.a.jwt").is_err());
    }

    #[test]
    fn test_expired_jwt_is_reported_as_expired() {
        let token_provider = create_test_token_provider();
        let now = Utc::now().timestamp();

        let expired = encode(
            &Header::new(Algorithm::HS256),
            &Claims {
                id: 1,
                email: "a@example.com".to_string(),
                iat: now - 7200,
                exp: now - 3600,
            },
            &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            token_provider.validate_jwt(&expired),
            Err(InternalError::Credential(CredentialError::ExpiredToken(_)))
        ));
    }

    #[test]
    fn test_generate_refresh_token_creates_unique_hex_tokens() {
        let token_provider = create_test_token_provider();

        let token1 = token_provider.generate_refresh_token();
        let token2 = token_provider.generate_refresh_token();

        assert_ne!(token1, token2);
        // 40 bytes hex encoded
        assert_eq!(token1.len(), 80);
        assert!(token1.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_refresh_expiration_is_thirty_days_out() {
        let token_provider = create_test_token_provider();
        let now = Utc::now().timestamp();

        let expires_at = token_provider.refresh_expiration();

        let thirty_days = 30 * 24 * 60 * 60;
        assert!(expires_at >= now + thirty_days);
        assert!(expires_at <= now + thirty_days + 5);
    }

    #[test]
    fn test_debug_trait_does_not_expose_secrets() {
        let token_provider = create_test_token_provider();

        let debug_output = format!("{:?}", token_provider);

        assert!(!debug_output.contains(TEST_JWT_SECRET));
        assert!(debug_output.contains("<redacted>"));
    }
}
