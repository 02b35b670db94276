use std::collections::BTreeSet;
use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::providers::Clock;
use crate::types::db::role_claim::{self, ClaimType};
use crate::types::db::{role, user_role};
use crate::types::internal::roles::RoleView;

/// Data access for roles, their claims and role membership
#[derive(Clone)]
pub struct RoleStore {
    clock: Arc<dyn Clock>,
}

fn view_of(role: role::Model, claims: Vec<role_claim::Model>) -> RoleView {
    let (mut permissions, mut policies) = (Vec::new(), Vec::new());
    for claim in claims {
        match claim.claim_type {
            ClaimType::Permission => permissions.push(claim.claim_value),
            ClaimType::Policy => policies.push(claim.claim_value),
        }
    }
    permissions.sort();
    policies.sort();

    RoleView {
        id: role.id,
        name: role.name,
        description: role.description,
        permissions,
        policies,
    }
}

impl RoleStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    pub async fn list(&self, conn: &impl ConnectionTrait) -> Result<Vec<RoleView>, InternalError> {
        let roles = role::Entity::find()
            .order_by_asc(role::Column::Name)
            .find_with_related(role_claim::Entity)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_roles", e))?;

        Ok(roles.into_iter().map(|(role, claims)| view_of(role, claims)).collect())
    }

    pub async fn find_by_id(&self, conn: &impl ConnectionTrait, role_id: &str) -> Result<Option<role::Model>, InternalError> {
        role::Entity::find_by_id(role_id.to_string())
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_role_by_id", e))
    }

    pub async fn find_by_name(&self, conn: &impl ConnectionTrait, name: &str) -> Result<Option<role::Model>, InternalError> {
        role::Entity::find()
            .filter(role::Column::Name.eq(name))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_role_by_name", e))
    }

    pub async fn find_by_names(&self, conn: &impl ConnectionTrait, names: &[String]) -> Result<Vec<role::Model>, InternalError> {
        role::Entity::find()
            .filter(role::Column::Name.is_in(names.iter().cloned()))
            .all(conn)
            .await
            .map_err(|e| InternalError::database("find_roles_by_name", e))
    }

    pub async fn view(&self, conn: &impl ConnectionTrait, role: role::Model) -> Result<RoleView, InternalError> {
        let claims = role
            .find_related(role_claim::Entity)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("find_role_claims", e))?;
        Ok(view_of(role, claims))
    }

    pub async fn create(
        &self,
        conn: &impl ConnectionTrait,
        name: &str,
        description: Option<String>,
    ) -> Result<role::Model, InternalError> {
        role::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            name: Set(name.to_string()),
            description: Set(description),
            created_at: Set(self.clock.now_utc().timestamp()),
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("create_role", e))
    }

    /// Delete a role; claims and memberships cascade
    pub async fn delete(&self, conn: &impl ConnectionTrait, role: role::Model) -> Result<(), InternalError> {
        role_claim::Entity::delete_many()
            .filter(role_claim::Column::RoleId.eq(role.id.clone()))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_role_claims", e))?;
        user_role::Entity::delete_many()
            .filter(user_role::Column::RoleId.eq(role.id.clone()))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_role_memberships", e))?;
        role.delete(conn)
            .await
            .map_err(|e| InternalError::database("delete_role", e))?;
        Ok(())
    }

    /// Replace every claim of a role
    pub async fn replace_claims(
        &self,
        conn: &impl ConnectionTrait,
        role_id: &str,
        permissions: &[String],
        policies: &[String],
    ) -> Result<(), InternalError> {
        role_claim::Entity::delete_many()
            .filter(role_claim::Column::RoleId.eq(role_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("clear_role_claims", e))?;

        let permissions: BTreeSet<&String> = permissions.iter().collect();
        let policies: BTreeSet<&String> = policies.iter().collect();
        if permissions.is_empty() && policies.is_empty() {
            return Ok(());
        }

        let claims = permissions
            .into_iter()
            .map(|v| (ClaimType::Permission, v))
            .chain(policies.into_iter().map(|v| (ClaimType::Policy, v)));
        let models = claims.map(|(claim_type, value)| role_claim::ActiveModel {
            role_id: Set(role_id.to_string()),
            claim_type: Set(claim_type),
            claim_value: Set(value.clone()),
            ..Default::default()
        });
        role_claim::Entity::insert_many(models)
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("insert_role_claims", e))?;
        Ok(())
    }

    pub async fn role_names_for_user(&self, conn: &impl ConnectionTrait, user_id: &str) -> Result<Vec<String>, InternalError> {
        let roles = role::Entity::find()
            .inner_join(user_role::Entity)
            .filter(user_role::Column::UserId.eq(user_id))
            .order_by_asc(role::Column::Name)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("find_user_roles", e))?;
        Ok(roles.into_iter().map(|r| r.name).collect())
    }

    /// Make `roles` the complete membership of a user
    pub async fn set_user_roles(
        &self,
        conn: &impl ConnectionTrait,
        user_id: &str,
        roles: &[role::Model],
    ) -> Result<(), InternalError> {
        user_role::Entity::delete_many()
            .filter(user_role::Column::UserId.eq(user_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("clear_user_roles", e))?;

        if roles.is_empty() {
            return Ok(());
        }
        let models = roles.iter().map(|r| user_role::ActiveModel {
            user_id: Set(user_id.to_string()),
            role_id: Set(r.id.clone()),
        });
        user_role::Entity::insert_many(models)
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("insert_user_roles", e))?;
        Ok(())
    }

    pub async fn add_user_to_role(&self, conn: &impl ConnectionTrait, user_id: &str, role: &role::Model) -> Result<(), InternalError> {
        user_role::ActiveModel {
            user_id: Set(user_id.to_string()),
            role_id: Set(role.id.clone()),
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("add_user_to_role", e))?;
        Ok(())
    }
}
