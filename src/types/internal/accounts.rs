use crate::types::db::user::{self, UserStatus};
use crate::types::db::user_profile;

use super::pagination::PageRequest;
use super::profile::{Address, Preferences};

// Commands

#[derive(Debug, Clone)]
pub struct RegisterAccount {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Login {
    /// Username or email
    pub login: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct RefreshTokens {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone)]
pub struct ChangePassword {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone)]
pub struct UpdateProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub display_name: Option<String>,
    pub phone_number: Option<String>,
    pub addresses: Vec<Address>,
    pub preferences: Preferences,
}

#[derive(Debug, Clone)]
pub struct UploadAvatar {
    pub file_name: String,
    pub content: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct SetAccountStatus {
    pub user_id: String,
    pub status: UserStatus,
}

#[derive(Debug, Clone)]
pub struct AssignRoles {
    pub user_id: String,
    pub role_names: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct AdjustLoyaltyPoints {
    pub user_id: String,
    pub delta: i32,
}

// Queries

#[derive(Debug, Clone, Copy)]
pub struct ListAccounts {
    pub page: PageRequest,
}

// Views

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileView {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub display_name: Option<String>,
    pub phone_number: Option<String>,
    pub avatar_url: Option<String>,
    pub addresses: Vec<Address>,
    pub preferences: Preferences,
    pub loyalty_points: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccountView {
    pub id: String,
    pub username: String,
    pub email: String,
    pub status: UserStatus,
    pub roles: Vec<String>,
    pub last_login_at: Option<i64>,
    pub profile: Option<ProfileView>,
}

impl AccountView {
    pub fn new(user: user::Model, roles: Vec<String>, profile: Option<ProfileView>) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            status: user.status,
            roles,
            last_login_at: user.last_login_at,
            profile,
        }
    }
}

impl ProfileView {
    pub fn new(model: user_profile::Model, addresses: Vec<Address>, preferences: Preferences) -> Self {
        Self {
            first_name: model.first_name,
            last_name: model.last_name,
            display_name: model.display_name,
            phone_number: model.phone_number,
            avatar_url: model.avatar_url,
            addresses,
            preferences,
            loyalty_points: model.loyalty_points,
        }
    }
}
