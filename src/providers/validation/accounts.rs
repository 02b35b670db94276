use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::DomainResult;
use crate::types::internal::accounts::{ChangePassword, RegisterAccount, UpdateProfile, UploadAvatar};
use crate::types::internal::profile::{Address, Preferences};

use super::{ValidationErrors, check_max_length, check_required_text};

pub const PASSWORD_MIN_LENGTH: usize = 8;
pub const PASSWORD_MAX_LENGTH: usize = 128;
pub const AVATAR_MAX_BYTES: usize = 2 * 1024 * 1024;
const AVATAR_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

static USERNAME_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9._-]{3,64}$").expect("valid username regex"));
static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));
static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?[0-9 ()-]{7,20}$").expect("valid phone regex"));
static CURRENCY_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{3}$").expect("valid currency regex"));
static COUNTRY_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{2}$").expect("valid country regex"));

/// Postal code formats for the countries we ship to most; others only get a length check
static POSTAL_CODE_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    [
        ("US", r"^\d{5}(-\d{4})?$"),
        ("UK", r"^[A-Z]{1,2}\d{1,2}[A-Z]?\s?\d[A-Z]{2}$"),
        ("GB", r"^[A-Z]{1,2}\d{1,2}[A-Z]?\s?\d[A-Z]{2}$"),
        ("JP", r"^\d{3}-\d{4}$"),
        ("CA", r"^[A-Z]\d[A-Z]\s?\d[A-Z]\d$"),
        ("DE", r"^\d{5}$"),
    ]
    .into_iter()
    .map(|(country, pattern)| (country, Regex::new(pattern).expect("valid postal code regex")))
    .collect()
});

pub fn is_valid_postal_code(country: &str, postal_code: &str) -> bool {
    let normalized = postal_code.trim().to_ascii_uppercase();
    match POSTAL_CODE_PATTERNS.iter().find(|(code, _)| *code == country) {
        Some((_, pattern)) => pattern.is_match(&normalized),
        None => !normalized.is_empty() && normalized.len() <= 16,
    }
}

fn check_password(errors: &mut ValidationErrors, field: &str, password: &str, username: Option<&str>) {
    let length = password.chars().count();
    errors.check(
        length >= PASSWORD_MIN_LENGTH,
        &format!("{}.TooShort", field),
        format!("Password must be at least {} characters", PASSWORD_MIN_LENGTH),
    );
    errors.check(
        length <= PASSWORD_MAX_LENGTH,
        &format!("{}.TooLong", field),
        format!("Password must not exceed {} characters", PASSWORD_MAX_LENGTH),
    );
    errors.check(
        password.chars().any(|c| c.is_ascii_uppercase()),
        &format!("{}.RequiresUpper", field),
        "Password must contain an uppercase letter",
    );
    errors.check(
        password.chars().any(|c| c.is_ascii_lowercase()),
        &format!("{}.RequiresLower", field),
        "Password must contain a lowercase letter",
    );
    errors.check(
        password.chars().any(|c| c.is_ascii_digit()),
        &format!("{}.RequiresDigit", field),
        "Password must contain a digit",
    );
    errors.check(
        password.chars().any(|c| !c.is_alphanumeric()),
        &format!("{}.RequiresNonAlphanumeric", field),
        "Password must contain a symbol",
    );
    if let Some(username) = username.filter(|u| !u.is_empty()) {
        errors.check(
            !password.to_lowercase().contains(&username.to_lowercase()),
            &format!("{}.ContainsUsername", field),
            "Password must not contain the username",
        );
    }
}

pub fn validate_register(command: &RegisterAccount) -> DomainResult<()> {
    let mut errors = ValidationErrors::new();
    errors.check(
        USERNAME_PATTERN.is_match(&command.username),
        "Username.Invalid",
        "Username must be 3-64 letters, digits, '.', '_' or '-'",
    );
    errors.check(
        EMAIL_PATTERN.is_match(&command.email) && command.email.len() <= 256,
        "Email.Invalid",
        "Email address is invalid",
    );
    check_password(&mut errors, "Password", &command.password, Some(&command.username));
    if let Some(first_name) = &command.first_name {
        check_max_length(&mut errors, "FirstName", first_name, 128);
    }
    if let Some(last_name) = &command.last_name {
        check_max_length(&mut errors, "LastName", last_name, 128);
    }
    errors.finish()
}

pub fn validate_change_password(command: &ChangePassword, username: &str) -> DomainResult<()> {
    let mut errors = ValidationErrors::new();
    errors.check(
        !command.current_password.is_empty(),
        "CurrentPassword.Required",
        "Current password is required",
    );
    check_password(&mut errors, "NewPassword", &command.new_password, Some(username));
    errors.check(
        command.current_password != command.new_password,
        "NewPassword.Unchanged",
        "New password must differ from the current one",
    );
    errors.finish()
}

fn check_address(errors: &mut ValidationErrors, index: usize, address: &Address) {
    let field = format!("Addresses[{}]", index);
    check_required_text(errors, &format!("{}.Label", field), &address.label, 64);
    check_required_text(errors, &format!("{}.Line1", field), &address.line1, 256);
    check_required_text(errors, &format!("{}.City", field), &address.city, 128);

    if !COUNTRY_PATTERN.is_match(&address.country) {
        errors.check(
            false,
            &format!("{}.Country.Invalid", field),
            "Country must be a two letter code",
        );
        return;
    }
    errors.check(
        is_valid_postal_code(&address.country, &address.postal_code),
        &format!("{}.PostalCode.Invalid", field),
        format!("Postal code is not valid for {}", address.country),
    );
}

fn check_preferences(errors: &mut ValidationErrors, preferences: &Preferences) {
    if let Some(currency) = &preferences.preferred_currency {
        errors.check(
            CURRENCY_PATTERN.is_match(currency),
            "Preferences.PreferredCurrency.Invalid",
            "Currency must be a three letter ISO code",
        );
    }
    errors.check(
        preferences.preferred_sizes.len() <= 20 && preferences.favourite_brands.len() <= 50,
        "Preferences.TooMany",
        "Too many preferred sizes or favourite brands",
    );
}

pub fn validate_update_profile(command: &UpdateProfile) -> DomainResult<()> {
    let mut errors = ValidationErrors::new();
    for (field, value) in [
        ("FirstName", &command.first_name),
        ("LastName", &command.last_name),
        ("DisplayName", &command.display_name),
    ] {
        if let Some(value) = value {
            check_max_length(&mut errors, field, value, 128);
        }
    }
    if let Some(phone) = &command.phone_number {
        errors.check(PHONE_PATTERN.is_match(phone), "PhoneNumber.Invalid", "Phone number is invalid");
    }
    errors.check(command.addresses.len() <= 10, "Addresses.TooMany", "At most 10 addresses");
    for (index, address) in command.addresses.iter().enumerate() {
        check_address(&mut errors, index, address);
    }
    check_preferences(&mut errors, &command.preferences);
    errors.finish()
}

pub fn validate_avatar(command: &UploadAvatar) -> DomainResult<()> {
    let mut errors = ValidationErrors::new();
    errors.check(!command.content.is_empty(), "Avatar.Empty", "Avatar file is empty");
    errors.check(
        command.content.len() <= AVATAR_MAX_BYTES,
        "Avatar.TooLarge",
        "Avatar must not exceed 2 MiB",
    );
    let extension = command
        .file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    errors.check(
        AVATAR_EXTENSIONS.contains(&extension.as_str()),
        "Avatar.UnsupportedType",
        "Avatar must be a png, jpg, gif or webp image",
    );
    errors.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(password: &str) -> RegisterAccount {
        RegisterAccount {
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            password: password.to_string(),
            first_name: None,
            last_name: None,
        }
    }

    #[test]
    fn test_strong_password_accepted() {
        assert!(validate_register(&registration("Tr1cky-Pass")).is_ok());
    }

    #[test]
    fn test_weak_password_reports_each_rule() {
        let errors = validate_register(&registration("short")).unwrap_err();

        assert!(errors.contains_code("Password.TooShort"));
        assert!(errors.contains_code("Password.RequiresUpper"));
        assert!(errors.contains_code("Password.RequiresDigit"));
        assert!(errors.contains_code("Password.RequiresNonAlphanumeric"));
        assert!(!errors.contains_code("Password.RequiresLower"));
    }

    #[test]
    fn test_password_containing_username_rejected() {
        let errors = validate_register(&registration("Ada-Passw0rd")).unwrap_err();

        assert!(errors.contains_code("Password.ContainsUsername"));
    }

    #[test]
    fn test_postal_codes_per_country() {
        assert!(is_valid_postal_code("US", "12345-6789"));
        assert!(is_valid_postal_code("UK", "sw1a 1aa"));
        assert!(is_valid_postal_code("JP", "123-4567"));
        assert!(is_valid_postal_code("CA", "K1A 0B1"));
        assert!(!is_valid_postal_code("DE", "1234"));
        assert!(is_valid_postal_code("FR", "75001"));
    }

    #[test]
    fn test_profile_address_errors_are_indexed() {
        let command = UpdateProfile {
            first_name: None,
            last_name: None,
            display_name: None,
            phone_number: Some("call me".to_string()),
            addresses: vec![Address {
                label: "Home".to_string(),
                line1: "1 Main St".to_string(),
                line2: None,
                city: "Springfield".to_string(),
                region: None,
                postal_code: "ABCDE".to_string(),
                country: "US".to_string(),
            }],
            preferences: Preferences {
                preferred_currency: Some("usd".to_string()),
                ..Preferences::default()
            },
        };

        let errors = validate_update_profile(&command).unwrap_err();

        assert!(errors.contains_code("PhoneNumber.Invalid"));
        assert!(errors.contains_code("Addresses[0].PostalCode.Invalid"));
        assert!(errors.contains_code("Preferences.PreferredCurrency.Invalid"));
    }

    #[test]
    fn test_avatar_type_and_size() {
        let errors = validate_avatar(&UploadAvatar {
            file_name: "me.exe".to_string(),
            content: vec![],
        })
        .unwrap_err();

        assert!(errors.contains_code("Avatar.Empty"));
        assert!(errors.contains_code("Avatar.UnsupportedType"));
    }
}
