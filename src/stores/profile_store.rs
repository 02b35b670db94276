use sea_orm::{ConnectionTrait, EntityTrait, Set};

use crate::errors::InternalError;
use crate::types::db::user_profile;
use crate::types::internal::profile::{Preferences, preferences_to_json};

/// Data access for user profiles
#[derive(Debug, Default, Clone, Copy)]
pub struct ProfileStore;

impl ProfileStore {
    pub fn new() -> Self {
        Self
    }

    pub async fn find(&self, conn: &impl ConnectionTrait, user_id: &str) -> Result<Option<user_profile::Model>, InternalError> {
        user_profile::Entity::find_by_id(user_id.to_string())
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_profile", e))
    }

    /// Active model for a fresh profile; audit columns are left for the stamper
    pub fn new_profile(
        &self,
        user_id: &str,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> Result<user_profile::ActiveModel, InternalError> {
        let display_name = match (&first_name, &last_name) {
            (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
            (Some(first), None) => Some(first.clone()),
            _ => None,
        };

        Ok(user_profile::ActiveModel {
            user_id: Set(user_id.to_string()),
            first_name: Set(first_name),
            last_name: Set(last_name),
            display_name: Set(display_name),
            phone_number: Set(None),
            avatar_url: Set(None),
            addresses: Set("[]".to_string()),
            preferences: Set(preferences_to_json(&Preferences::default())?),
            loyalty_points: Set(0),
            ..Default::default()
        })
    }
}

