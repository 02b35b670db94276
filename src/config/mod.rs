mod database;
mod env_provider;
mod logging;
mod settings;

pub use database::DatabaseConnections;
pub use env_provider::{EnvironmentProvider, MockEnvironment, SystemEnvironment};
pub use logging::{LoggingConfig, LoggingError, init_logging};
pub use settings::{ApplicationSettings, SeedAdmin, SettingsError};
