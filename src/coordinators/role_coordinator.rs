use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::app_data::AppData;
use crate::errors::{DomainError, DomainErrors, DomainResult};
use crate::providers::DomainEventDispatcher;
use crate::providers::validation::roles::{validate_create_role, validate_role_claims};
use crate::stores::{AuditStamper, RoleStore, UnitOfWork};
use crate::types::internal::RequestContext;
use crate::types::internal::roles::{CreateRole, RoleView, SetRoleClaims};

fn role_not_found(id: &str) -> DomainErrors {
    DomainError::not_found("Role.NotFound", format!("Role {} was not found", id)).into()
}

/// Role management workflows
pub struct RoleCoordinator {
    db: DatabaseConnection,
    audit_stamper: Arc<AuditStamper>,
    event_dispatcher: Arc<DomainEventDispatcher>,
    role_store: RoleStore,
}

impl RoleCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.connections.main.clone(),
            audit_stamper: app_data.audit_stamper.clone(),
            event_dispatcher: app_data.event_dispatcher.clone(),
            role_store: RoleStore::new(app_data.clock.clone()),
        }
    }

    async fn begin(&self, ctx: &RequestContext) -> DomainResult<UnitOfWork> {
        Ok(UnitOfWork::begin(&self.db, self.audit_stamper.clone(), self.event_dispatcher.clone(), ctx).await?)
    }

    pub async fn list(&self, _ctx: &RequestContext) -> DomainResult<Vec<RoleView>> {
        Ok(self.role_store.list(&self.db).await?)
    }

    pub async fn create(&self, ctx: &RequestContext, command: CreateRole) -> DomainResult<RoleView> {
        validate_create_role(&command)?;

        let uow = self.begin(ctx).await?;
        if self.role_store.find_by_name(uow.conn(), &command.name).await?.is_some() {
            return Err(DomainError::identity(
                Some("Identity.DuplicateRoleName"),
                format!("Role '{}' already exists", command.name),
            )
            .into());
        }
        let role = self
            .role_store
            .create(uow.conn(), &command.name, command.description)
            .await?;
        let view = self.role_store.view(uow.conn(), role).await?;
        uow.commit().await?;

        tracing::info!(actor = %ctx.actor_id, "Role {} created", view.name);
        Ok(view)
    }

    /// Delete a role; members lose it and its claims go with it
    pub async fn delete(&self, ctx: &RequestContext, role_id: &str) -> DomainResult<()> {
        let uow = self.begin(ctx).await?;
        let role = self
            .role_store
            .find_by_id(uow.conn(), role_id)
            .await?
            .ok_or_else(|| role_not_found(role_id))?;
        let name = role.name.clone();
        self.role_store.delete(uow.conn(), role).await?;
        uow.commit().await?;

        tracing::info!(actor = %ctx.actor_id, "Role {} deleted", name);
        Ok(())
    }

    /// Replace every permission and policy claim of a role
    pub async fn set_claims(&self, ctx: &RequestContext, command: SetRoleClaims) -> DomainResult<RoleView> {
        validate_role_claims(&command)?;

        let uow = self.begin(ctx).await?;
        let role = self
            .role_store
            .find_by_id(uow.conn(), &command.role_id)
            .await?
            .ok_or_else(|| role_not_found(&command.role_id))?;
        self.role_store
            .replace_claims(uow.conn(), &role.id, &command.permissions, &command.policies)
            .await?;
        let view = self.role_store.view(uow.conn(), role).await?;
        uow.commit().await?;

        tracing::info!(
            actor = %ctx.actor_id,
            "Claims of role {} set: permissions {:?}, policies {:?}",
            view.name,
            view.permissions,
            view.policies
        );
        Ok(view)
    }
}
