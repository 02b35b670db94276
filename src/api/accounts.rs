use std::sync::Arc;

use poem::Request;
use poem_openapi::param::{Path, Query};
use poem_openapi::payload::{Binary, Json};
use poem_openapi::{OpenApi, Tags};

use crate::api::access_guard::AccessGuard;
use crate::coordinators::{AccountCoordinator, LoginCoordinator};
use crate::errors::ApiError;
use crate::providers::authorization::permissions::routes;
use crate::types::dto::accounts::{
    AccountPageResponse, AccountResponse, AdjustLoyaltyRequest, AssignRolesRequest, AvatarResponse,
    ChangePasswordRequest, LoginRequest, LoyaltyResponse, ProfileResponse, RefreshRequest, RegisterRequest,
    SetStatusRequest, TokenResponse, UpdateProfileRequest,
};
use crate::types::dto::common::NoContentResponse;
use crate::types::internal::accounts::{
    AdjustLoyaltyPoints, AssignRoles, ChangePassword, ListAccounts, Login, RefreshTokens, RegisterAccount,
    SetAccountStatus, UpdateProfile, UploadAvatar,
};
use crate::types::internal::pagination::PageRequest;

/// Account, session and profile endpoints
pub struct AccountApi {
    guard: AccessGuard,
    accounts: Arc<AccountCoordinator>,
    login: Arc<LoginCoordinator>,
}

impl AccountApi {
    pub fn new(guard: AccessGuard, accounts: Arc<AccountCoordinator>, login: Arc<LoginCoordinator>) -> Self {
        Self { guard, accounts, login }
    }
}

#[derive(Tags)]
enum AccountTags {
    /// Registration, login and token refresh
    Authentication,
    /// The caller's own account
    Me,
    /// Account administration
    Accounts,
}

#[OpenApi(prefix_path = "/accounts")]
impl AccountApi {
    #[oai(path = "/register", method = "post", tag = "AccountTags::Authentication")]
    async fn register(&self, req: &Request, body: Json<RegisterRequest>) -> Result<Json<AccountResponse>, ApiError> {
        let ctx = self.guard.context(req);
        let body = body.0;
        let account = self
            .accounts
            .register(
                &ctx,
                RegisterAccount {
                    username: body.username,
                    email: body.email,
                    password: body.password,
                    first_name: body.first_name,
                    last_name: body.last_name,
                },
            )
            .await?;
        Ok(Json(account.into()))
    }

    /// Login with username or email and password
    #[oai(path = "/login", method = "post", tag = "AccountTags::Authentication")]
    async fn login(&self, req: &Request, body: Json<LoginRequest>) -> Result<Json<TokenResponse>, ApiError> {
        let ctx = self.guard.context(req);
        let body = body.0;
        let tokens = self
            .login
            .login(
                &ctx,
                Login {
                    login: body.login,
                    password: body.password,
                },
            )
            .await?;
        Ok(Json(tokens.into()))
    }

    /// Exchange an expired access token and the refresh token for a new pair
    #[oai(path = "/refresh", method = "post", tag = "AccountTags::Authentication")]
    async fn refresh(&self, req: &Request, body: Json<RefreshRequest>) -> Result<Json<TokenResponse>, ApiError> {
        let ctx = self.guard.context(req);
        let body = body.0;
        let tokens = self
            .login
            .refresh(
                &ctx,
                RefreshTokens {
                    access_token: body.access_token,
                    refresh_token: body.refresh_token,
                },
            )
            .await?;
        Ok(Json(tokens.into()))
    }

    /// Revoke the caller's refresh token
    #[oai(path = "/logout", method = "post", tag = "AccountTags::Authentication")]
    async fn logout(&self, req: &Request) -> Result<NoContentResponse, ApiError> {
        let ctx = self.guard.check(req, routes::AUTHENTICATED).await?;
        self.login.logout(&ctx).await?;
        Ok(NoContentResponse::NoContent)
    }

    #[oai(path = "/me", method = "get", tag = "AccountTags::Me")]
    async fn me(&self, req: &Request) -> Result<Json<AccountResponse>, ApiError> {
        let ctx = self.guard.check(req, routes::AUTHENTICATED).await?;
        let account = self.accounts.me(&ctx).await?;
        Ok(Json(account.into()))
    }

    #[oai(path = "/me/profile", method = "put", tag = "AccountTags::Me")]
    async fn update_profile(
        &self,
        req: &Request,
        body: Json<UpdateProfileRequest>,
    ) -> Result<Json<ProfileResponse>, ApiError> {
        let ctx = self.guard.check(req, routes::PROFILE_EDIT).await?;
        let body = body.0;
        let profile = self
            .accounts
            .update_profile(
                &ctx,
                UpdateProfile {
                    first_name: body.first_name,
                    last_name: body.last_name,
                    display_name: body.display_name,
                    phone_number: body.phone_number,
                    addresses: body.addresses.into_iter().map(Into::into).collect(),
                    preferences: body.preferences.into(),
                },
            )
            .await?;
        Ok(Json(profile.into()))
    }

    /// Upload an avatar image (raw bytes); replaces the current one
    #[oai(path = "/me/avatar", method = "put", tag = "AccountTags::Me")]
    async fn upload_avatar(
        &self,
        req: &Request,
        file_name: Query<String>,
        body: Binary<Vec<u8>>,
    ) -> Result<Json<AvatarResponse>, ApiError> {
        let ctx = self.guard.check(req, routes::PROFILE_EDIT).await?;
        let avatar_url = self
            .accounts
            .upload_avatar(
                &ctx,
                UploadAvatar {
                    file_name: file_name.0,
                    content: body.0,
                },
            )
            .await?;
        Ok(Json(AvatarResponse { avatar_url }))
    }

    #[oai(path = "/me/avatar", method = "delete", tag = "AccountTags::Me")]
    async fn delete_avatar(&self, req: &Request) -> Result<NoContentResponse, ApiError> {
        let ctx = self.guard.check(req, routes::PROFILE_EDIT).await?;
        self.accounts.delete_avatar(&ctx).await?;
        Ok(NoContentResponse::NoContent)
    }

    #[oai(path = "/me/password", method = "put", tag = "AccountTags::Me")]
    async fn change_password(
        &self,
        req: &Request,
        body: Json<ChangePasswordRequest>,
    ) -> Result<NoContentResponse, ApiError> {
        let ctx = self.guard.check(req, routes::AUTHENTICATED).await?;
        let body = body.0;
        self.accounts
            .change_password(
                &ctx,
                ChangePassword {
                    current_password: body.current_password,
                    new_password: body.new_password,
                },
            )
            .await?;
        Ok(NoContentResponse::NoContent)
    }

    #[oai(path = "/", method = "get", tag = "AccountTags::Accounts")]
    async fn list(
        &self,
        req: &Request,
        page_number: Query<Option<u64>>,
        page_size: Query<Option<u64>>,
    ) -> Result<Json<AccountPageResponse>, ApiError> {
        let ctx = self.guard.check(req, routes::ACCOUNTS_VIEW).await?;
        let page = self
            .accounts
            .list(
                &ctx,
                ListAccounts {
                    page: PageRequest::new(page_number.0, page_size.0),
                },
            )
            .await?;
        Ok(Json(page.into()))
    }

    #[oai(path = "/:id/status", method = "put", tag = "AccountTags::Accounts")]
    async fn set_status(
        &self,
        req: &Request,
        id: Path<String>,
        body: Json<SetStatusRequest>,
    ) -> Result<Json<AccountResponse>, ApiError> {
        let ctx = self.guard.check(req, routes::ACCOUNTS_MANAGE).await?;
        let account = self
            .accounts
            .set_status(
                &ctx,
                SetAccountStatus {
                    user_id: id.0,
                    status: body.0.status.into(),
                },
            )
            .await?;
        Ok(Json(account.into()))
    }

    /// Replace the account's roles
    #[oai(path = "/:id/roles", method = "put", tag = "AccountTags::Accounts")]
    async fn assign_roles(
        &self,
        req: &Request,
        id: Path<String>,
        body: Json<AssignRolesRequest>,
    ) -> Result<Json<AccountResponse>, ApiError> {
        let ctx = self.guard.check(req, routes::ACCOUNTS_ASSIGN_ROLES).await?;
        let account = self
            .accounts
            .assign_roles(
                &ctx,
                AssignRoles {
                    user_id: id.0,
                    role_names: body.0.roles,
                },
            )
            .await?;
        Ok(Json(account.into()))
    }

    /// Add (positive delta) or deduct (negative delta) loyalty points
    #[oai(path = "/:id/loyalty", method = "post", tag = "AccountTags::Accounts")]
    async fn adjust_loyalty(
        &self,
        req: &Request,
        id: Path<String>,
        body: Json<AdjustLoyaltyRequest>,
    ) -> Result<Json<LoyaltyResponse>, ApiError> {
        let ctx = self.guard.check(req, routes::ACCOUNTS_MANAGE).await?;
        let loyalty_points = self
            .accounts
            .adjust_loyalty_points(
                &ctx,
                AdjustLoyaltyPoints {
                    user_id: id.0,
                    delta: body.0.delta,
                },
            )
            .await?;
        Ok(Json(LoyaltyResponse { loyalty_points }))
    }
}
