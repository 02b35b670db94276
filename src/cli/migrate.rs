use crate::config::{ApplicationSettings, DatabaseConnections};
use crate::errors::InternalError;

/// Connect to both databases and run every pending migration
///
/// Does not build the full AppData.
pub async fn run_migrations(settings: &ApplicationSettings) -> Result<(), InternalError> {
    tracing::info!("Running database migrations...");

    let connections = DatabaseConnections::connect(settings).await?;
    connections.migrate().await?;

    tracing::info!("All migrations completed successfully");
    Ok(())
}
