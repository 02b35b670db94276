use std::sync::Arc;

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::providers::Clock;
use crate::types::db::user::{self, UserStatus};
use crate::types::internal::pagination::{PageRequest, PaginatedList};

/// Data access for the users table
#[derive(Clone)]
pub struct UserStore {
    clock: Arc<dyn Clock>,
}

pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl UserStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    fn now(&self) -> i64 {
        self.clock.now_utc().timestamp()
    }

    pub async fn find_by_id(&self, conn: &impl ConnectionTrait, user_id: &str) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find_by_id(user_id.to_string())
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_by_id", e))
    }

    /// Look a user up by username or email, case-insensitively on email
    pub async fn find_by_login(&self, conn: &impl ConnectionTrait, login: &str) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find()
            .filter(
                Condition::any()
                    .add(user::Column::Username.eq(login))
                    .add(user::Column::Email.eq(login.to_lowercase())),
            )
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_by_login", e))
    }

    pub async fn username_exists(&self, conn: &impl ConnectionTrait, username: &str) -> Result<bool, InternalError> {
        let count = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_users_by_username", e))?;
        Ok(count > 0)
    }

    pub async fn email_exists(&self, conn: &impl ConnectionTrait, email: &str) -> Result<bool, InternalError> {
        let count = user::Entity::find()
            .filter(user::Column::Email.eq(email.to_lowercase()))
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_users_by_email", e))?;
        Ok(count > 0)
    }

    /// Insert an active user; email is stored lowercased
    pub async fn create(&self, conn: &impl ConnectionTrait, new_user: NewUser) -> Result<user::Model, InternalError> {
        let now = self.now();
        user::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            username: Set(new_user.username),
            email: Set(new_user.email.to_lowercase()),
            password_hash: Set(new_user.password_hash),
            status: Set(UserStatus::Active),
            refresh_token_hash: Set(None),
            refresh_token_expires_at: Set(None),
            last_login_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("create_user", e))
    }

    /// Record a login: store the new refresh token hash, replacing any previous one
    pub async fn store_refresh_token(
        &self,
        conn: &impl ConnectionTrait,
        user: user::Model,
        token_hash: String,
        expires_at: i64,
    ) -> Result<user::Model, InternalError> {
        let now = self.now();
        let mut model: user::ActiveModel = user.into();
        model.refresh_token_hash = Set(Some(token_hash));
        model.refresh_token_expires_at = Set(Some(expires_at));
        model.last_login_at = Set(Some(now));
        model.updated_at = Set(now);
        model
            .update(conn)
            .await
            .map_err(|e| InternalError::database("store_refresh_token", e))
    }

    /// Swap `previous_hash` for `token_hash` in one conditional update
    ///
    /// Returns false when the stored hash no longer matches, i.e. the token
    /// was already rotated or revoked.
    pub async fn rotate_refresh_token(
        &self,
        conn: &impl ConnectionTrait,
        user_id: &str,
        previous_hash: &str,
        token_hash: String,
        expires_at: i64,
    ) -> Result<bool, InternalError> {
        let result = user::Entity::update_many()
            .col_expr(user::Column::RefreshTokenHash, Expr::value(Some(token_hash)))
            .col_expr(user::Column::RefreshTokenExpiresAt, Expr::value(Some(expires_at)))
            .col_expr(user::Column::UpdatedAt, Expr::value(self.now()))
            .filter(user::Column::Id.eq(user_id))
            .filter(user::Column::RefreshTokenHash.eq(previous_hash))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("rotate_refresh_token", e))?;
        Ok(result.rows_affected == 1)
    }

    pub async fn revoke_refresh_token(&self, conn: &impl ConnectionTrait, user: user::Model) -> Result<user::Model, InternalError> {
        let mut model: user::ActiveModel = user.into();
        model.refresh_token_hash = Set(None);
        model.refresh_token_expires_at = Set(None);
        model.updated_at = Set(self.now());
        model
            .update(conn)
            .await
            .map_err(|e| InternalError::database("revoke_refresh_token", e))
    }

    /// Replace the password hash; outstanding refresh tokens are revoked
    pub async fn update_password(
        &self,
        conn: &impl ConnectionTrait,
        user: user::Model,
        password_hash: String,
    ) -> Result<user::Model, InternalError> {
        let mut model: user::ActiveModel = user.into();
        model.password_hash = Set(password_hash);
        model.refresh_token_hash = Set(None);
        model.refresh_token_expires_at = Set(None);
        model.updated_at = Set(self.now());
        model
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_password", e))
    }

    /// Change the account status; leaving `active` revokes the refresh token
    pub async fn set_status(
        &self,
        conn: &impl ConnectionTrait,
        user: user::Model,
        status: UserStatus,
    ) -> Result<user::Model, InternalError> {
        let mut model: user::ActiveModel = user.into();
        model.status = Set(status);
        if status != UserStatus::Active {
            model.refresh_token_hash = Set(None);
            model.refresh_token_expires_at = Set(None);
        }
        model.updated_at = Set(self.now());
        model
            .update(conn)
            .await
            .map_err(|e| InternalError::database("set_user_status", e))
    }

    pub async fn list(&self, conn: &impl ConnectionTrait, page: PageRequest) -> Result<PaginatedList<user::Model>, InternalError> {
        let paginator = user::Entity::find()
            .order_by_asc(user::Column::Username)
            .paginate(conn, page.page_size);

        let total_count = paginator
            .num_items()
            .await
            .map_err(|e| InternalError::database("count_users", e))?;
        let items = paginator
            .fetch_page(page.page_number - 1)
            .await
            .map_err(|e| InternalError::database("list_users", e))?;

        Ok(PaginatedList::new(items, page.page_number, page.page_size, total_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ManualClock;
    use crate::test::utils::setup_main_db;
    use chrono::{TimeZone, Utc};

    #[tokio::test]
    async fn test_rotation_only_replaces_the_expected_hash() {
        let db = setup_main_db().await;
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()));
        let store = UserStore::new(clock);
        let user = store
            .create(
                &db,
                NewUser {
                    username: "mira".to_string(),
                    email: "Mira@Example.com".to_string(),
                    password_hash: "hash".to_string(),
                },
            )
            .await
            .unwrap();
        let user = store
            .store_refresh_token(&db, user, "first".to_string(), 100)
            .await
            .unwrap();
        assert_eq!(user.email, "mira@example.com");
        assert_eq!(user.last_login_at, Some(user.created_at));

        assert!(store.rotate_refresh_token(&db, &user.id, "first", "second".to_string(), 200).await.unwrap());
        assert!(!store.rotate_refresh_token(&db, &user.id, "first", "third".to_string(), 300).await.unwrap());

        let stored = store.find_by_id(&db, &user.id).await.unwrap().unwrap();
        assert_eq!(stored.refresh_token_hash.as_deref(), Some("second"));
        assert_eq!(stored.refresh_token_expires_at, Some(200));
    }
}
