use std::sync::Arc;

use sea_orm::{ConnectionTrait, DatabaseConnection, IntoActiveModel, Set};

use crate::app_data::AppData;
use crate::errors::internal::CredentialError;
use crate::errors::{DomainError, DomainErrors, DomainResult, InternalError};
use crate::providers::authorization::permissions::ROLE_CUSTOMER;
use crate::providers::validation::accounts::{
    validate_avatar, validate_change_password, validate_register, validate_update_profile,
};
use crate::providers::{CryptoProvider, DomainEventDispatcher, FileStorage};
use crate::stores::{AuditStamper, NewUser, ProfileStore, RoleStore, UnitOfWork, UserStore};
use crate::types::db::{user, user_profile};
use crate::types::internal::accounts::{
    AccountView, AdjustLoyaltyPoints, AssignRoles, ChangePassword, ListAccounts, ProfileView, RegisterAccount,
    SetAccountStatus, UpdateProfile, UploadAvatar,
};
use crate::types::internal::pagination::PaginatedList;
use crate::types::internal::profile::{
    addresses_from_json, addresses_to_json, preferences_from_json, preferences_to_json,
};
use crate::types::internal::{DomainEvent, RequestContext};

fn account_not_found(id: &str) -> DomainErrors {
    DomainError::not_found("Account.NotFound", format!("Account {} was not found", id)).into()
}

fn unauthenticated() -> DomainErrors {
    DomainError::unauthorized("Auth.Unauthenticated", "Authentication is required").into()
}

fn profile_view(model: user_profile::Model) -> Result<ProfileView, InternalError> {
    let addresses = addresses_from_json(&model.addresses)?;
    let preferences = preferences_from_json(&model.preferences)?;
    Ok(ProfileView::new(model, addresses, preferences))
}

/// Registration, profile and account administration workflows
pub struct AccountCoordinator {
    db: DatabaseConnection,
    crypto_provider: Arc<CryptoProvider>,
    file_storage: Arc<dyn FileStorage>,
    audit_stamper: Arc<AuditStamper>,
    event_dispatcher: Arc<DomainEventDispatcher>,
    user_store: UserStore,
    profile_store: ProfileStore,
    role_store: RoleStore,
}

impl AccountCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.connections.main.clone(),
            crypto_provider: app_data.crypto_provider.clone(),
            file_storage: app_data.file_storage.clone(),
            audit_stamper: app_data.audit_stamper.clone(),
            event_dispatcher: app_data.event_dispatcher.clone(),
            user_store: UserStore::new(app_data.clock.clone()),
            profile_store: ProfileStore::new(),
            role_store: RoleStore::new(app_data.clock.clone()),
        }
    }

    async fn begin(&self, ctx: &RequestContext) -> DomainResult<UnitOfWork> {
        Ok(UnitOfWork::begin(&self.db, self.audit_stamper.clone(), self.event_dispatcher.clone(), ctx).await?)
    }

    async fn account_view(&self, conn: &impl ConnectionTrait, user: user::Model) -> Result<AccountView, InternalError> {
        let roles = self.role_store.role_names_for_user(conn, &user.id).await?;
        let profile = match self.profile_store.find(conn, &user.id).await? {
            Some(model) => Some(profile_view(model)?),
            None => None,
        };
        Ok(AccountView::new(user, roles, profile))
    }

    async fn require_profile(&self, uow: &UnitOfWork, user_id: &str) -> DomainResult<user_profile::Model> {
        self.profile_store
            .find(uow.conn(), user_id)
            .await?
            .ok_or_else(|| account_not_found(user_id))
    }

    /// Create an active account with an empty profile and the customer role
    pub async fn register(&self, ctx: &RequestContext, command: RegisterAccount) -> DomainResult<AccountView> {
        validate_register(&command)?;

        let mut uow = self.begin(ctx).await?;
        let mut conflicts = Vec::new();
        if self.user_store.username_exists(uow.conn(), &command.username).await? {
            conflicts.push(DomainError::identity(
                Some("Identity.DuplicateUserName"),
                format!("Username '{}' is already taken", command.username),
            ));
        }
        if self.user_store.email_exists(uow.conn(), &command.email).await? {
            conflicts.push(DomainError::identity(
                Some("Identity.DuplicateEmail"),
                format!("Email '{}' is already registered", command.email),
            ));
        }
        if let Some(errors) = DomainErrors::from_vec(conflicts) {
            return Err(errors);
        }

        let password_hash = self
            .crypto_provider
            .hash_password(&command.password)
            .map_err(|e| InternalError::from(CredentialError::PasswordHashingFailed(e.to_string())))?;

        let user = self
            .user_store
            .create(
                uow.conn(),
                NewUser {
                    username: command.username,
                    email: command.email,
                    password_hash,
                },
            )
            .await?;
        let profile = self
            .profile_store
            .new_profile(&user.id, command.first_name, command.last_name)?;
        uow.add(profile).await?;

        match self.role_store.find_by_name(uow.conn(), ROLE_CUSTOMER).await? {
            Some(role) => self.role_store.add_user_to_role(uow.conn(), &user.id, &role).await?,
            None => tracing::warn!("Role {} does not exist; account {} has no roles", ROLE_CUSTOMER, user.id),
        }

        uow.raise(DomainEvent::UserRegistered {
            user_id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
        });
        let view = self.account_view(uow.conn(), user).await?;
        uow.commit().await?;

        tracing::info!(request_id = %ctx.request_id, "Account {} registered", view.id);
        Ok(view)
    }

    /// The caller's own account
    pub async fn me(&self, ctx: &RequestContext) -> DomainResult<AccountView> {
        let user_id = ctx.user_id().ok_or_else(unauthenticated)?;
        let user = self
            .user_store
            .find_by_id(&self.db, user_id)
            .await?
            .ok_or_else(|| account_not_found(user_id))?;
        Ok(self.account_view(&self.db, user).await?)
    }

    pub async fn update_profile(&self, ctx: &RequestContext, command: UpdateProfile) -> DomainResult<ProfileView> {
        let user_id = ctx.user_id().ok_or_else(unauthenticated)?.to_string();
        validate_update_profile(&command)?;

        let mut uow = self.begin(ctx).await?;
        let profile = self.require_profile(&uow, &user_id).await?;

        let mut model = profile.into_active_model();
        model.first_name = Set(command.first_name);
        model.last_name = Set(command.last_name);
        model.display_name = Set(command.display_name);
        model.phone_number = Set(command.phone_number);
        model.addresses = Set(addresses_to_json(&command.addresses)?);
        model.preferences = Set(preferences_to_json(&command.preferences)?);
        let updated = uow.modify(model).await?;
        uow.commit().await?;

        Ok(profile_view(updated)?)
    }

    /// Store a new avatar and replace the previous one; returns the avatar URL
    pub async fn upload_avatar(&self, ctx: &RequestContext, command: UploadAvatar) -> DomainResult<String> {
        let user_id = ctx.user_id().ok_or_else(unauthenticated)?.to_string();
        validate_avatar(&command)?;

        let url = self.file_storage.upload(&command.file_name, &command.content).await?;

        let saved = self.replace_avatar(ctx, &user_id, Some(url.clone())).await;
        match saved {
            Ok(previous) => {
                if let Some(previous) = previous {
                    self.remove_file(&previous).await;
                }
                Ok(url)
            }
            Err(errors) => {
                self.remove_file(&url).await;
                Err(errors)
            }
        }
    }

    pub async fn delete_avatar(&self, ctx: &RequestContext) -> DomainResult<()> {
        let user_id = ctx.user_id().ok_or_else(unauthenticated)?.to_string();

        match self.replace_avatar(ctx, &user_id, None).await? {
            Some(previous) => {
                self.remove_file(&previous).await;
                Ok(())
            }
            None => Err(DomainError::not_found("Avatar.NotFound", "The account has no avatar").into()),
        }
    }

    /// Set the avatar URL, returning the previous one
    async fn replace_avatar(&self, ctx: &RequestContext, user_id: &str, url: Option<String>) -> DomainResult<Option<String>> {
        let mut uow = self.begin(ctx).await?;
        let profile = self.require_profile(&uow, user_id).await?;
        let previous = profile.avatar_url.clone();
        if previous.is_none() && url.is_none() {
            return Ok(None);
        }

        let mut model = profile.into_active_model();
        model.avatar_url = Set(url);
        uow.modify(model).await?;
        uow.commit().await?;
        Ok(previous)
    }

    async fn remove_file(&self, url: &str) {
        if let Err(e) = self.file_storage.delete(url).await {
            tracing::warn!("Failed to delete stored file {}: {}", url, e);
        }
    }

    /// Change the caller's password; outstanding refresh tokens are revoked
    pub async fn change_password(&self, ctx: &RequestContext, command: ChangePassword) -> DomainResult<()> {
        let user_id = ctx.user_id().ok_or_else(unauthenticated)?;
        let user = self
            .user_store
            .find_by_id(&self.db, user_id)
            .await?
            .ok_or_else(|| account_not_found(user_id))?;

        validate_change_password(&command, &user.username)?;

        if !self
            .crypto_provider
            .verify_password(&command.current_password, &user.password_hash)?
        {
            return Err(InternalError::from(CredentialError::IncorrectPassword).into());
        }

        let password_hash = self
            .crypto_provider
            .hash_password(&command.new_password)
            .map_err(|e| InternalError::from(CredentialError::PasswordHashingFailed(e.to_string())))?;
        self.user_store.update_password(&self.db, user, password_hash).await?;

        tracing::info!(request_id = %ctx.request_id, "Password changed for user {}", user_id);
        Ok(())
    }

    pub async fn list(&self, _ctx: &RequestContext, query: ListAccounts) -> DomainResult<PaginatedList<AccountView>> {
        let page = self.user_store.list(&self.db, query.page).await?;

        let mut views = Vec::with_capacity(page.items.len());
        for user in page.items {
            views.push(self.account_view(&self.db, user).await?);
        }
        Ok(PaginatedList {
            items: views,
            page_number: page.page_number,
            total_pages: page.total_pages,
            total_count: page.total_count,
        })
    }

    /// Activate, suspend or deactivate an account; callers cannot change their own status
    pub async fn set_status(&self, ctx: &RequestContext, command: SetAccountStatus) -> DomainResult<AccountView> {
        if ctx.user_id() == Some(command.user_id.as_str()) {
            return Err(DomainError::conflict(
                "Account.SelfModification",
                "An account cannot change its own status",
            )
            .into());
        }

        let user = self
            .user_store
            .find_by_id(&self.db, &command.user_id)
            .await?
            .ok_or_else(|| account_not_found(&command.user_id))?;
        let user = self.user_store.set_status(&self.db, user, command.status).await?;

        tracing::info!(
            request_id = %ctx.request_id,
            actor = %ctx.actor_id,
            "Account {} status set to {:?}",
            user.id,
            command.status
        );
        Ok(self.account_view(&self.db, user).await?)
    }

    /// Make `role_names` the complete role set of an account
    pub async fn assign_roles(&self, ctx: &RequestContext, command: AssignRoles) -> DomainResult<AccountView> {
        let uow = self.begin(ctx).await?;
        let user = self
            .user_store
            .find_by_id(uow.conn(), &command.user_id)
            .await?
            .ok_or_else(|| account_not_found(&command.user_id))?;

        let roles = self.role_store.find_by_names(uow.conn(), &command.role_names).await?;
        let missing: Vec<DomainError> = command
            .role_names
            .iter()
            .filter(|name| !roles.iter().any(|r| &r.name == *name))
            .map(|name| DomainError::not_found("Role.NotFound", format!("Role '{}' does not exist", name)))
            .collect();
        if let Some(errors) = DomainErrors::from_vec(missing) {
            return Err(errors);
        }

        self.role_store.set_user_roles(uow.conn(), &user.id, &roles).await?;
        let view = self.account_view(uow.conn(), user).await?;
        uow.commit().await?;

        tracing::info!(actor = %ctx.actor_id, "Roles of account {} set to {:?}", view.id, view.roles);
        Ok(view)
    }

    /// Add or deduct loyalty points; the balance never goes below zero
    pub async fn adjust_loyalty_points(&self, ctx: &RequestContext, command: AdjustLoyaltyPoints) -> DomainResult<i32> {
        let mut uow = self.begin(ctx).await?;
        let profile = self.require_profile(&uow, &command.user_id).await?;

        let balance = match profile.loyalty_points.checked_add(command.delta) {
            Some(balance) if balance >= 0 => balance,
            _ => {
                return Err(DomainError::validation(
                    "Loyalty.InsufficientPoints",
                    format!(
                        "Cannot apply {} to a balance of {} points",
                        command.delta, profile.loyalty_points
                    ),
                )
                .into());
            }
        };

        let mut model = profile.into_active_model();
        model.loyalty_points = Set(balance);
        uow.modify(model).await?;
        uow.commit().await?;
        Ok(balance)
    }
}
