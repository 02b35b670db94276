use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::errors::InternalError;
use crate::providers::UserAuthorizationProvider;
use crate::providers::authorization::AuthorizationRecord;
use crate::types::db::role_claim::{self, ClaimType};
use crate::types::db::user::{self, UserStatus};
use crate::types::db::{role, user_role};

/// Resolves authorization records from roles and role claims
pub struct AuthorizationStore {
    db: DatabaseConnection,
}

impl AuthorizationStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserAuthorizationProvider for AuthorizationStore {
    /// Only active users have a record
    async fn fetch(&self, user_id: &str) -> Result<Option<AuthorizationRecord>, InternalError> {
        let user = user::Entity::find_by_id(user_id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("fetch_authorization_user", e))?;

        match user {
            Some(user) if user.status == UserStatus::Active => {}
            Some(user) => {
                tracing::debug!("No authorization record for {:?} user {}", user.status, user.id);
                return Ok(None);
            }
            None => return Ok(None),
        }

        let roles = role::Entity::find()
            .inner_join(user_role::Entity)
            .filter(user_role::Column::UserId.eq(user_id))
            .find_with_related(role_claim::Entity)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("fetch_authorization_roles", e))?;

        let mut record = AuthorizationRecord::default();
        for (role, claims) in roles {
            record.roles.insert(role.name);
            for claim in claims {
                match claim.claim_type {
                    ClaimType::Permission => record.permissions.insert(claim.claim_value),
                    ClaimType::Policy => record.policies.insert(claim.claim_value),
                };
            }
        }

        Ok(Some(record))
    }
}
