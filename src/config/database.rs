use migration::{ActivityLogMigrator, AppMigrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use crate::errors::InternalError;

use super::settings::ApplicationSettings;

/// Connections to the main and activity-log databases; both may be the same database
#[derive(Debug, Clone)]
pub struct DatabaseConnections {
    pub main: DatabaseConnection,
    pub activity: DatabaseConnection,
}

impl DatabaseConnections {
    pub async fn connect(settings: &ApplicationSettings) -> Result<Self, InternalError> {
        let main = Database::connect(settings.database_url())
            .await
            .map_err(|e| InternalError::database("connect_database", e))?;
        tracing::debug!("Connected to main database: {}", settings.database_url());

        let activity = Database::connect(settings.activity_database_url())
            .await
            .map_err(|e| InternalError::database("connect_activity_database", e))?;
        tracing::debug!("Connected to activity database: {}", settings.activity_database_url());

        Ok(Self { main, activity })
    }

    /// Run every pending migration on both databases
    pub async fn migrate(&self) -> Result<(), InternalError> {
        AppMigrator::up(&self.main, None)
            .await
            .map_err(|e| InternalError::database("run_migrations", e))?;
        tracing::debug!("Main database migrations completed");

        ActivityLogMigrator::up(&self.activity, None)
            .await
            .map_err(|e| InternalError::database("run_activity_migrations", e))?;
        tracing::debug!("Activity database migrations completed");

        Ok(())
    }

    /// Migrated in-memory SQLite databases
    pub async fn in_memory() -> Result<Self, InternalError> {
        let main = Database::connect("sqlite::memory:")
            .await
            .map_err(|e| InternalError::database("connect_database", e))?;
        let activity = Database::connect("sqlite::memory:")
            .await
            .map_err(|e| InternalError::database("connect_activity_database", e))?;

        let connections = Self { main, activity };
        connections.migrate().await?;
        Ok(connections)
    }
}
