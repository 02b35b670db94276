use poem_openapi::{Enum, Object};
use serde::{Deserialize, Serialize};

use crate::types::db::user::UserStatus;
use crate::types::internal::accounts::{AccountView, ProfileView, TokenPair};
use crate::types::internal::PaginatedList;
use crate::types::internal::profile::{Address, Preferences};

/// Request model for account registration
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Request model for user login
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Username or email
    pub login: String,

    /// Password for authentication
    pub password: String,
}

/// Request model for token refresh
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RefreshRequest {
    /// The (possibly expired) access token the refresh token was issued with
    pub access_token: String,

    /// Refresh token to exchange for a new token pair
    pub refresh_token: String,
}

/// Response model containing authentication tokens
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// JWT access token for API authentication
    pub access_token: String,

    /// Refresh token for obtaining new access tokens
    pub refresh_token: String,

    /// Token type (always "Bearer")
    pub token_type: String,

    /// Number of seconds until the access token expires
    pub expires_in: i64,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: pair.expires_in,
        }
    }
}

/// Request model for changing the caller's password
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct AddressDto {
    /// Free-form label such as "Home" or "Work"
    pub label: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub region: Option<String>,
    pub postal_code: String,
    /// ISO 3166 alpha-2 country code
    pub country: String,
}

impl From<AddressDto> for Address {
    fn from(dto: AddressDto) -> Self {
        Self {
            label: dto.label,
            line1: dto.line1,
            line2: dto.line2,
            city: dto.city,
            region: dto.region,
            postal_code: dto.postal_code,
            country: dto.country,
        }
    }
}

impl From<Address> for AddressDto {
    fn from(address: Address) -> Self {
        Self {
            label: address.label,
            line1: address.line1,
            line2: address.line2,
            city: address.city,
            region: address.region,
            postal_code: address.postal_code,
            country: address.country,
        }
    }
}

#[derive(Object, Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreferencesDto {
    #[oai(default)]
    pub preferred_sizes: Vec<String>,
    #[oai(default)]
    pub favourite_brands: Vec<String>,
    pub preferred_currency: Option<String>,
    #[oai(default)]
    pub newsletter: bool,
}

impl From<PreferencesDto> for Preferences {
    fn from(dto: PreferencesDto) -> Self {
        Self {
            preferred_sizes: dto.preferred_sizes,
            favourite_brands: dto.favourite_brands,
            preferred_currency: dto.preferred_currency,
            newsletter: dto.newsletter,
        }
    }
}

impl From<Preferences> for PreferencesDto {
    fn from(preferences: Preferences) -> Self {
        Self {
            preferred_sizes: preferences.preferred_sizes,
            favourite_brands: preferences.favourite_brands,
            preferred_currency: preferences.preferred_currency,
            newsletter: preferences.newsletter,
        }
    }
}

/// Request model for replacing the caller's profile
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub display_name: Option<String>,
    pub phone_number: Option<String>,
    #[oai(default)]
    pub addresses: Vec<AddressDto>,
    #[oai(default)]
    pub preferences: PreferencesDto,
}

#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub display_name: Option<String>,
    pub phone_number: Option<String>,
    pub avatar_url: Option<String>,
    pub addresses: Vec<AddressDto>,
    pub preferences: PreferencesDto,
    pub loyalty_points: i32,
}

impl From<ProfileView> for ProfileResponse {
    fn from(view: ProfileView) -> Self {
        Self {
            first_name: view.first_name,
            last_name: view.last_name,
            display_name: view.display_name,
            phone_number: view.phone_number,
            avatar_url: view.avatar_url,
            addresses: view.addresses.into_iter().map(AddressDto::from).collect(),
            preferences: view.preferences.into(),
            loyalty_points: view.loyalty_points,
        }
    }
}

#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[oai(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AccountStatusDto {
    Active,
    Suspended,
    Deactivated,
}

impl From<UserStatus> for AccountStatusDto {
    fn from(status: UserStatus) -> Self {
        match status {
            UserStatus::Active => AccountStatusDto::Active,
            UserStatus::Suspended => AccountStatusDto::Suspended,
            UserStatus::Deactivated => AccountStatusDto::Deactivated,
        }
    }
}

impl From<AccountStatusDto> for UserStatus {
    fn from(status: AccountStatusDto) -> Self {
        match status {
            AccountStatusDto::Active => UserStatus::Active,
            AccountStatusDto::Suspended => UserStatus::Suspended,
            AccountStatusDto::Deactivated => UserStatus::Deactivated,
        }
    }
}

#[derive(Object, Debug, Serialize, Deserialize)]
pub struct AccountResponse {
    /// User ID (UUID)
    pub id: String,
    pub username: String,
    pub email: String,
    pub status: AccountStatusDto,
    pub roles: Vec<String>,
    /// Last successful login (Unix timestamp)
    pub last_login_at: Option<i64>,
    pub profile: Option<ProfileResponse>,
}

impl From<AccountView> for AccountResponse {
    fn from(view: AccountView) -> Self {
        Self {
            id: view.id,
            username: view.username,
            email: view.email,
            status: view.status.into(),
            roles: view.roles,
            last_login_at: view.last_login_at,
            profile: view.profile.map(ProfileResponse::from),
        }
    }
}

#[derive(Object, Debug, Serialize, Deserialize)]
pub struct AccountPageResponse {
    pub items: Vec<AccountResponse>,
    pub page_number: u64,
    pub total_pages: u64,
    pub total_count: u64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl From<PaginatedList<AccountView>> for AccountPageResponse {
    fn from(page: PaginatedList<AccountView>) -> Self {
        Self {
            has_previous_page: page.has_previous_page(),
            has_next_page: page.has_next_page(),
            page_number: page.page_number,
            total_pages: page.total_pages,
            total_count: page.total_count,
            items: page.items.into_iter().map(AccountResponse::from).collect(),
        }
    }
}

#[derive(Object, Debug, Serialize, Deserialize)]
pub struct SetStatusRequest {
    pub status: AccountStatusDto,
}

#[derive(Object, Debug, Serialize, Deserialize)]
pub struct AssignRolesRequest {
    /// Complete set of role names the account should hold
    pub roles: Vec<String>,
}

#[derive(Object, Debug, Serialize, Deserialize)]
pub struct AdjustLoyaltyRequest {
    /// Points to add (positive) or redeem (negative)
    pub delta: i32,
}

#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoyaltyResponse {
    pub loyalty_points: i32,
}

#[derive(Object, Debug, Serialize, Deserialize)]
pub struct AvatarResponse {
    pub avatar_url: String,
}
