use std::sync::Arc;

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::config::SecretManager;
use crate::errors::InternalError;

type HmacSha256 = Hmac<Sha256>;

/// Password hashing and keyed digests
///
/// Passwords are hashed with Argon2id using the password pepper as the Argon2
/// secret parameter, so a leaked database alone is not enough to test guesses.
pub struct CryptoProvider {
    secret_manager: Arc<SecretManager>,
}

impl CryptoProvider {
    pub fn new(secret_manager: Arc<SecretManager>) -> Self {
        Self { secret_manager }
    }

    fn argon2(&self) -> Result<Argon2<'_>, InternalError> {
        Argon2::new_with_secret(
            self.secret_manager.password_pepper().as_bytes(),
            Algorithm::Argon2id,
            Version::V0x13,
            Params::default(),
        )
        .map_err(|e| InternalError::crypto("argon2_init", e.to_string()))
    }

    /// Hash a password into a PHC string with a fresh random salt
    pub fn hash_password(&self, password: &str) -> Result<String, InternalError> {
        let salt = SaltString::generate(&mut rand_core::OsRng);

        let hash = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| InternalError::crypto("password_hash", e.to_string()))?
            .to_string();

        Ok(hash)
    }

    /// Check a password against a stored PHC string
    ///
    /// Returns `Ok(false)` on mismatch; errors only when the stored hash is unusable.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<bool, InternalError> {
        let parsed_hash = PasswordHash::new(stored_hash)
            .map_err(|e| InternalError::crypto("password_hash_parse", e.to_string()))?;

        Ok(self
            .argon2()?
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Compute HMAC-SHA256 of a token keyed by the refresh token secret, hex encoded
    pub fn hmac_sha256_token(&self, token: &str) -> Result<String, InternalError> {
        hmac_sha256_hex(self.secret_manager.refresh_token_secret(), token)
    }
}

/// Compute HMAC-SHA256 and return it as lowercase hex
pub fn hmac_sha256_hex(key: &str, message: &str) -> Result<String, InternalError> {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes())
        .map_err(|e| InternalError::crypto("hmac_init", e.to_string()))?;
    mac.update(message.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

impl std::fmt::Debug for CryptoProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoProvider")
            .field("secret_manager", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::test_secret_manager;

    #[test]
    fn test_hash_and_verify_password() {
        let crypto = CryptoProvider::new(test_secret_manager());

        let hash = crypto.hash_password("correct horse").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(crypto.verify_password("correct horse", &hash).unwrap());
        assert!(!crypto.verify_password("wrong horse", &hash).unwrap());
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let crypto = CryptoProvider::new(test_secret_manager());

        let first = crypto.hash_password("repeat-me").unwrap();
        let second = crypto.hash_password("repeat-me").unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        let crypto = CryptoProvider::new(test_secret_manager());

        assert!(crypto.verify_password("anything", "not-a-phc-string").is_err());
    }

    #[test]
    fn test_hmac_is_deterministic_and_keyed() {
        let a = hmac_sha256_hex("key-one", "token").unwrap();
        let b = hmac_sha256_hex("key-one", "token").unwrap();
        let c = hmac_sha256_hex("key-two", "token").unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        // 32 bytes = 64 hex characters
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|ch| ch.is_ascii_hexdigit()));
    }
}
