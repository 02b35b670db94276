use std::sync::Arc;

use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::app_data::AppData;
use crate::errors::internal::CredentialError;
use crate::errors::{DomainError, DomainResult, InternalError};
use crate::providers::{CryptoProvider, TokenProvider};
use crate::stores::UserStore;
use crate::types::db::user::{self, UserStatus};
use crate::types::internal::RequestContext;
use crate::types::internal::accounts::{Login, RefreshTokens, TokenPair};

/// Login, token refresh and logout workflows
pub struct LoginCoordinator {
    db: DatabaseConnection,
    token_provider: Arc<TokenProvider>,
    crypto_provider: Arc<CryptoProvider>,
    user_store: UserStore,
}

impl LoginCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.connections.main.clone(),
            token_provider: app_data.token_provider.clone(),
            crypto_provider: app_data.crypto_provider.clone(),
            user_store: UserStore::new(app_data.clock.clone()),
        }
    }

    /// Issue an access token and a fresh refresh token; only the refresh token's hash is stored
    ///
    /// With `replaces`, the new hash is written only while the stored hash is
    /// still `replaces`, so a refresh token can be exchanged once.
    async fn issue_tokens(&self, user: user::Model, replaces: Option<&str>) -> Result<TokenPair, InternalError> {
        let (access_token, jti) = self
            .token_provider
            .create_access_token(&user.id, &user.username, &user.email)?;
        let refresh_token = self.token_provider.create_refresh_token();
        let refresh_hash = self.token_provider.hash_refresh_token(&refresh_token)?;
        let expires_at = self.token_provider.refresh_expiration();

        let user_id = user.id.clone();
        match replaces {
            None => {
                self.user_store
                    .store_refresh_token(&self.db, user, refresh_hash, expires_at)
                    .await?;
            }
            Some(previous) => {
                let rotated = self
                    .user_store
                    .rotate_refresh_token(&self.db, &user_id, previous, refresh_hash, expires_at)
                    .await?;
                if !rotated {
                    return Err(CredentialError::RefreshTokenRejected("already used".to_string()).into());
                }
            }
        }
        tracing::debug!("Issued access token {} for user {}", jti, user_id);

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: self.token_provider.access_token_lifetime(),
        })
    }

    /// Authenticate with username or email and password
    ///
    /// An unknown login and a wrong password fail the same way.
    pub async fn login(&self, ctx: &RequestContext, command: Login) -> DomainResult<TokenPair> {
        let user = self.user_store.find_by_login(&self.db, command.login.trim()).await?;

        let Some(user) = user else {
            tracing::info!(request_id = %ctx.request_id, "Login failed: unknown login");
            return Err(InternalError::from(CredentialError::InvalidCredentials).into());
        };

        if !self.crypto_provider.verify_password(&command.password, &user.password_hash)? {
            tracing::info!(request_id = %ctx.request_id, "Login failed for user {}: wrong password", user.id);
            return Err(InternalError::from(CredentialError::InvalidCredentials).into());
        }

        if user.status != UserStatus::Active {
            return Err(InternalError::from(CredentialError::AccountInactive(user.id)).into());
        }

        let user_id = user.id.clone();
        let tokens = self.issue_tokens(user, None).await?;
        tracing::info!(request_id = %ctx.request_id, "User {} logged in", user_id);
        Ok(tokens)
    }

    /// Exchange an expired (or still valid) access token plus the refresh token for a new pair
    ///
    /// The access token's signature must verify; its expiry is ignored. The
    /// refresh token is single use: a successful refresh rotates it.
    pub async fn refresh(&self, ctx: &RequestContext, command: RefreshTokens) -> DomainResult<TokenPair> {
        let claims = self
            .token_provider
            .claims_from_expired_token(&command.access_token)
            .map_err(InternalError::from)?;

        let rejected = |reason: &str| InternalError::from(CredentialError::RefreshTokenRejected(reason.to_string()));

        let Some(user) = self.user_store.find_by_id(&self.db, &claims.sub).await? else {
            return Err(rejected("unknown user").into());
        };
        if user.status != UserStatus::Active {
            return Err(InternalError::from(CredentialError::AccountInactive(user.id)).into());
        }

        let presented_hash = self.token_provider.hash_refresh_token(&command.refresh_token)?;
        match (&user.refresh_token_hash, user.refresh_token_expires_at) {
            (Some(stored), Some(expires_at)) if *stored == presented_hash => {
                if expires_at <= Utc::now().timestamp() {
                    return Err(rejected("expired").into());
                }
            }
            (None, _) => return Err(rejected("no refresh token issued").into()),
            _ => return Err(rejected("token mismatch").into()),
        }

        let user_id = user.id.clone();
        let tokens = self.issue_tokens(user, Some(&presented_hash)).await?;
        tracing::info!(request_id = %ctx.request_id, "Tokens refreshed for user {}", user_id);
        Ok(tokens)
    }

    /// Revoke the caller's refresh token
    pub async fn logout(&self, ctx: &RequestContext) -> DomainResult<()> {
        let Some(user_id) = ctx.user_id() else {
            return Err(DomainError::unauthorized("Auth.Unauthenticated", "Authentication is required").into());
        };

        if let Some(user) = self.user_store.find_by_id(&self.db, user_id).await? {
            self.user_store.revoke_refresh_token(&self.db, user).await?;
        }
        tracing::info!(request_id = %ctx.request_id, "User {} logged out", user_id);
        Ok(())
    }
}
