use std::fmt;

use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::errors::InternalError;

type HmacSha256 = Hmac<Sha256>;

/// Password hashing (Argon2id keyed with a server-side pepper) and token HMACs
pub struct CryptoProvider {
    password_pepper: String,
}

impl CryptoProvider {
    pub fn new(password_pepper: impl Into<String>) -> Self {
        Self {
            password_pepper: password_pepper.into(),
        }
    }

    fn argon2(&self) -> Result<Argon2<'_>, InternalError> {
        Argon2::new_with_secret(
            self.password_pepper.as_bytes(),
            Algorithm::Argon2id,
            Version::V0x13,
            Params::default(),
        )
        .map_err(|e| InternalError::crypto("argon2_init", e.to_string()))
    }

    /// Hash a password into a PHC string
    pub fn hash_password(&self, password: &str) -> Result<String, InternalError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| InternalError::crypto("password_hash", e.to_string()))?;
        Ok(hash.to_string())
    }

    /// Check a password against a stored hash; a malformed hash is an error, a mismatch is `false`
    pub fn verify_password(&self, password: &str, password_hash: &str) -> Result<bool, InternalError> {
        let parsed_hash = PasswordHash::new(password_hash)
            .map_err(|e| InternalError::crypto("password_hash_parse", e.to_string()))?;

        Ok(self
            .argon2()?
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

impl fmt::Debug for CryptoProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoProvider")
            .field("password_pepper", &"<redacted>")
            .finish()
    }
}

/// Compute HMAC-SHA256 of a token and return it as lowercase hex
pub fn hmac_sha256_token(key: &str, token: &str) -> Result<String, InternalError> {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes())
        .map_err(|e| InternalError::crypto("hmac_init", e.to_string()))?;
    mac.update(token.as_bytes());
    Ok(format!("{:x}", mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hmac_sha256_token_consistency() {
        let hash1 = hmac_sha256_token("test-secret-key", "test-token-12345").unwrap();
        let hash2 = hmac_sha256_token("test-secret-key", "test-token-12345").unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
        assert!(hash1.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hmac_sha256_token_different_keys_produce_different_hashes() {
        assert_ne!(
            hmac_sha256_token("key1", "token").unwrap(),
            hmac_sha256_token("key2", "token").unwrap()
        );
    }

    #[test]
    fn test_password_round_trip() {
        let crypto = CryptoProvider::new("test-pepper-for-unit-tests");
        let hash = crypto.hash_password("C0rrect-Horse").unwrap();

        assert!(hash.starts_with("$argon2id"));
        assert!(crypto.verify_password("C0rrect-Horse", &hash).unwrap());
        assert!(!crypto.verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn test_pepper_is_part_of_the_hash() {
        let hash = CryptoProvider::new("pepper-one").hash_password("C0rrect-Horse").unwrap();

        assert!(!CryptoProvider::new("pepper-two").verify_password("C0rrect-Horse", &hash).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        let crypto = CryptoProvider::new("pepper");

        assert!(crypto.verify_password("x", "not-a-phc-string").is_err());
    }
}
