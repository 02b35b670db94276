use std::fmt;

use base64::{Engine as _, engine::general_purpose};
use chrono::Utc;
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::prelude::*;
use uuid::Uuid;

use crate::config::ApplicationSettings;
use crate::errors::InternalError;
use crate::errors::internal::TokenError;
use crate::providers::crypto_provider;
use crate::types::internal::auth::Claims;

/// Provides JWT access tokens and opaque refresh tokens
pub struct TokenProvider {
    jwt_secret: String,
    refresh_token_secret: String,
    jwt_expiration_minutes: i64,
    refresh_expiration_days: i64,
}

impl TokenProvider {
    pub fn new(jwt_secret: impl Into<String>, refresh_token_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            refresh_token_secret: refresh_token_secret.into(),
            jwt_expiration_minutes: 15,
            refresh_expiration_days: 7,
        }
    }

    pub fn from_settings(settings: &ApplicationSettings) -> Self {
        Self::new(settings.jwt_secret(), settings.refresh_token_secret())
    }

    /// Seconds an access token stays valid
    pub fn access_token_lifetime(&self) -> i64 {
        self.jwt_expiration_minutes * 60
    }

    /// Issue an HS256 access token
    ///
    /// # Returns
    /// * `Ok((token, jti))` - The encoded JWT and its id
    pub fn create_access_token(
        &self,
        user_id: &str,
        username: &str,
        email: &str,
    ) -> Result<(String, String), InternalError> {
        let now = Utc::now().timestamp();
        let jti = Uuid::new_v4().to_string();

        let claims = Claims {
            sub: user_id.to_string(),
            name: username.to_string(),
            email: email.to_string(),
            exp: now + self.access_token_lifetime(),
            iat: now,
            jti: jti.clone(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| TokenError::Issue {
            reason: e.to_string(),
        })?;

        Ok((token, jti))
    }

    /// Validate signature and expiry, returning the claims
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.decode_claims(token, true)
    }

    /// Validate the signature only; used when exchanging a refresh token
    /// for a new pair after the access token has expired
    pub fn claims_from_expired_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.decode_claims(token, false)
    }

    fn decode_claims(&self, token: &str, validate_exp: bool) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = validate_exp;
        if !validate_exp {
            validation.required_spec_claims.clear();
        }

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            JwtErrorKind::ExpiredSignature => TokenError::Expired,
            JwtErrorKind::InvalidSignature => TokenError::invalid("invalid signature"),
            _ => TokenError::invalid("malformed"),
        })
    }

    /// Generate a refresh token: 32 random bytes, base64 encoded
    pub fn create_refresh_token(&self) -> String {
        let mut rng = rand::rng();
        let random_bytes: [u8; 32] = rng.random();
        general_purpose::STANDARD.encode(random_bytes)
    }

    /// HMAC-SHA256 of a refresh token, hex encoded; only the hash is stored
    pub fn hash_refresh_token(&self, token: &str) -> Result<String, InternalError> {
        crypto_provider::hmac_sha256_token(&self.refresh_token_secret, token)
    }

    /// Unix timestamp at which a refresh token issued now expires
    pub fn refresh_expiration(&self) -> i64 {
        Utc::now().timestamp() + self.refresh_expiration_days * 24 * 60 * 60
    }
}

impl fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenProvider")
            .field("jwt_secret", &"<redacted>")
            .field("refresh_token_secret", &"<redacted>")
            .field("jwt_expiration_minutes", &self.jwt_expiration_minutes)
            .field("refresh_expiration_days", &self.refresh_expiration_days)
            .finish()
    }
}

impl fmt::Display for TokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TokenProvider {{ jwt_expiration: {}min, refresh_expiration: {}days }}",
            self.jwt_expiration_minutes, self.refresh_expiration_days
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JWT_SECRET: &str = "test-secret-key-minimum-32-characters-long";
    const REFRESH_SECRET: &str = "test-refresh-secret-minimum-32-chars";

    fn create_test_token_provider() -> TokenProvider {
        TokenProvider::new(JWT_SECRET, REFRESH_SECRET)
    }

    fn expired_token() -> String {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "user-1".to_string(),
            name: "ada".to_string(),
            email: "ada@example.com".to_string(),
            exp: now - 120,
            iat: now - 1020,
            jti: "jti-1".to_string(),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_jwt_expiration_is_15_minutes() {
        let provider = create_test_token_provider();

        let (token, jti) = provider.create_access_token("user-1", "ada", "ada@example.com").unwrap();
        let claims = provider.validate_access_token(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, 900);
        assert_eq!(claims.jti, jti);
        assert_eq!(claims.name, "ada");
    }

    #[test]
    fn test_expired_token_rejected_but_claims_recoverable() {
        let provider = create_test_token_provider();
        let token = expired_token();

        assert_eq!(provider.validate_access_token(&token), Err(TokenError::Expired));
        assert_eq!(provider.claims_from_expired_token(&token).unwrap().sub, "user-1");
    }

    #[test]
    fn test_token_signed_with_other_secret_rejected() {
        let provider = create_test_token_provider();
        let other = TokenProvider::new("another-secret-key-minimum-32-characters", REFRESH_SECRET);
        let (token, _) = other.create_access_token("user-1", "ada", "ada@example.com").unwrap();

        assert!(matches!(provider.validate_access_token(&token), Err(TokenError::Invalid { .. })));
        assert!(matches!(provider.claims_from_expired_token(&token), Err(TokenError::Invalid { .. })));
    }

    #[test]
    fn test_generate_refresh_token_creates_unique_tokens() {
        let provider = create_test_token_provider();

        let token1 = provider.create_refresh_token();
        let token2 = provider.create_refresh_token();

        assert_ne!(token1, token2);
        assert_eq!(token1.len(), 44);
    }

    #[test]
    fn test_hmac_different_secrets_produce_different_hashes() {
        let provider1 = TokenProvider::new(JWT_SECRET, "refresh-secret-one-minimum-32-chars");
        let provider2 = TokenProvider::new(JWT_SECRET, "refresh-secret-two-minimum-32-chars");

        assert_ne!(
            provider1.hash_refresh_token("token").unwrap(),
            provider2.hash_refresh_token("token").unwrap()
        );
    }

    #[test]
    fn test_debug_trait_does_not_expose_secrets() {
        let debug_output = format!("{:?}", create_test_token_provider());

        assert!(!debug_output.contains("test-secret-key"));
        assert!(!debug_output.contains("test-refresh-secret"));
        assert_eq!(debug_output.matches("<redacted>").count(), 2);
    }

    #[test]
    fn test_display_trait_does_not_expose_secrets() {
        let display_output = format!("{}", create_test_token_provider());

        assert!(!display_output.contains("test-secret-key"));
        assert!(display_output.contains("15min"));
        assert!(display_output.contains("7days"));
    }
}
