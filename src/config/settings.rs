use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use super::env_provider::EnvironmentProvider;

const MIN_SECRET_LENGTH: usize = 32;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Required setting '{0}' is missing")]
    Missing(String),

    #[error("Setting '{name}' must be at least {expected} characters, got {actual}")]
    TooShort {
        name: String,
        expected: usize,
        actual: usize,
    },
}

/// Credentials for the account created by `seed`
#[derive(Clone, PartialEq, Eq)]
pub struct SeedAdmin {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for SeedAdmin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeedAdmin")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Settings loaded once at startup
///
/// Secrets are only reachable through accessors and never printed.
#[derive(Clone)]
pub struct ApplicationSettings {
    database_url: String,
    activity_database_url: String,
    bind_address: String,
    storage_root: PathBuf,
    storage_base_url: String,
    jwt_secret: String,
    refresh_token_secret: String,
    password_pepper: String,
    seed_admin: Option<SeedAdmin>,
}

impl ApplicationSettings {
    pub const DEFAULT_DATABASE_URL: &'static str = "sqlite://fashion.db?mode=rwc";
    pub const DEFAULT_BIND_ADDRESS: &'static str = "0.0.0.0:3000";

    /// Load every setting, failing on the first missing or invalid secret
    pub fn from_env(env: &dyn EnvironmentProvider) -> Result<Self, SettingsError> {
        let database_url = env
            .get_var("DATABASE_URL")
            .unwrap_or_else(|| Self::DEFAULT_DATABASE_URL.to_string());
        let activity_database_url = env
            .get_var("ACTIVITY_DATABASE_URL")
            .unwrap_or_else(|| database_url.clone());

        let jwt_secret = load_secret(env, "JWT_SECRET", MIN_SECRET_LENGTH)?;
        let refresh_token_secret = load_secret(env, "REFRESH_TOKEN_SECRET", MIN_SECRET_LENGTH)?;
        let password_pepper = load_secret(env, "PASSWORD_PEPPER", 1)?;

        let seed_admin = match (
            env.get_var("SEED_ADMIN_USERNAME"),
            env.get_var("SEED_ADMIN_EMAIL"),
            env.get_var("SEED_ADMIN_PASSWORD"),
        ) {
            (Some(username), Some(email), Some(password)) => Some(SeedAdmin {
                username,
                email,
                password,
            }),
            _ => None,
        };

        Ok(Self {
            database_url,
            activity_database_url,
            bind_address: env
                .get_var("BIND_ADDRESS")
                .unwrap_or_else(|| Self::DEFAULT_BIND_ADDRESS.to_string()),
            storage_root: env
                .get_var("STORAGE_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./uploads")),
            storage_base_url: env
                .get_var("STORAGE_BASE_URL")
                .unwrap_or_else(|| "/files".to_string()),
            jwt_secret,
            refresh_token_secret,
            password_pepper,
            seed_admin,
        })
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn activity_database_url(&self) -> &str {
        &self.activity_database_url
    }

    pub fn bind_address(&self) -> &str {
        &self.bind_address
    }

    pub fn storage_root(&self) -> &PathBuf {
        &self.storage_root
    }

    pub fn storage_base_url(&self) -> &str {
        &self.storage_base_url
    }

    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    pub fn refresh_token_secret(&self) -> &str {
        &self.refresh_token_secret
    }

    pub fn password_pepper(&self) -> &str {
        &self.password_pepper
    }

    pub fn seed_admin(&self) -> Option<&SeedAdmin> {
        self.seed_admin.as_ref()
    }
}

fn load_secret(env: &dyn EnvironmentProvider, name: &str, min_length: usize) -> Result<String, SettingsError> {
    let value = env
        .get_var(name)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| SettingsError::Missing(name.to_string()))?;

    if value.len() < min_length {
        return Err(SettingsError::TooShort {
            name: name.to_string(),
            expected: min_length,
            actual: value.len(),
        });
    }
    Ok(value)
}

impl fmt::Debug for ApplicationSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplicationSettings")
            .field("database_url", &self.database_url)
            .field("activity_database_url", &self.activity_database_url)
            .field("bind_address", &self.bind_address)
            .field("storage_root", &self.storage_root)
            .field("storage_base_url", &self.storage_base_url)
            .field("jwt_secret", &"<redacted>")
            .field("refresh_token_secret", &"<redacted>")
            .field("password_pepper", &"<redacted>")
            .field("seed_admin", &self.seed_admin)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;

    fn secrets() -> MockEnvironment {
        MockEnvironment::empty().with_vars(&[
            ("JWT_SECRET", "jwt-secret-key-minimum-32-characters-long"),
            ("REFRESH_TOKEN_SECRET", "refresh-secret-minimum-32-characters-x"),
            ("PASSWORD_PEPPER", "pepper"),
        ])
    }

    #[test]
    fn test_defaults_applied() {
        let settings = ApplicationSettings::from_env(&secrets()).unwrap();

        assert_eq!(settings.database_url(), ApplicationSettings::DEFAULT_DATABASE_URL);
        assert_eq!(settings.activity_database_url(), settings.database_url());
        assert_eq!(settings.bind_address(), "0.0.0.0:3000");
        assert_eq!(settings.storage_base_url(), "/files");
        assert!(settings.seed_admin().is_none());
    }

    #[test]
    fn test_missing_jwt_secret_rejected() {
        let env = MockEnvironment::empty()
            .with_var("REFRESH_TOKEN_SECRET", "refresh-secret-minimum-32-characters-x")
            .with_var("PASSWORD_PEPPER", "pepper");

        assert_eq!(
            ApplicationSettings::from_env(&env).unwrap_err(),
            SettingsError::Missing("JWT_SECRET".to_string())
        );
    }

    #[test]
    fn test_short_secret_rejected() {
        let env = secrets().with_var("JWT_SECRET", "short");

        assert!(matches!(
            ApplicationSettings::from_env(&env),
            Err(SettingsError::TooShort { expected: 32, actual: 5, .. })
        ));
    }

    #[test]
    fn test_debug_does_not_expose_secrets() {
        let env = secrets().with_vars(&[
            ("SEED_ADMIN_USERNAME", "admin"),
            ("SEED_ADMIN_EMAIL", "admin@example.com"),
            ("SEED_ADMIN_PASSWORD", "Sup3r-Secret-Passw0rd"),
        ]);
        let settings = ApplicationSettings::from_env(&env).unwrap();

        let debug_output = format!("{:?}", settings);

        assert!(!debug_output.contains("jwt-secret-key"));
        assert!(!debug_output.contains("pepper\""));
        assert!(!debug_output.contains("Sup3r-Secret-Passw0rd"));
        assert!(debug_output.contains("admin@example.com"));
    }
}
