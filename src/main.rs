use std::sync::Arc;

use clap::Parser;
use poem::{Server, listener::TcpListener};

use fashion_backend::api;
use fashion_backend::app_data::AppData;
use fashion_backend::cli::{Cli, Commands, migrate, seed};
use fashion_backend::config::{ApplicationSettings, DatabaseConnections, LoggingConfig, SystemEnvironment, init_logging};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_logging(&LoggingConfig::from_env(&SystemEnvironment))?;

    let cli = Cli::parse();
    let settings = ApplicationSettings::from_env(&SystemEnvironment)?;
    tracing::debug!("Loaded settings: {:?}", settings);

    match cli.command() {
        Commands::Migrate => {
            migrate::run_migrations(&settings).await?;
        }
        Commands::Seed => {
            let connections = DatabaseConnections::connect(&settings).await?;
            connections.migrate().await?;
            let app_data = AppData::init(connections, settings);
            let report = seed::seed_defaults(&app_data).await?;
            println!("Roles created: {:?}", report.roles_created);
            if let Some(admin) = report.admin_created {
                println!("Admin account created: {}", admin);
            }
        }
        Commands::Serve => serve(settings).await?,
    }

    Ok(())
}

async fn serve(settings: ApplicationSettings) -> Result<(), Box<dyn std::error::Error>> {
    let connections = DatabaseConnections::connect(&settings).await?;
    connections.migrate().await?;
    tracing::info!("Database migrations completed");

    tokio::fs::create_dir_all(settings.storage_root()).await?;

    let bind_address = settings.bind_address().to_string();
    let app_data = Arc::new(AppData::init(connections, settings));
    let app = api::routes(app_data, "/api");

    tracing::info!("Starting server on http://{}", bind_address);
    tracing::info!("Swagger UI available at http://{}/swagger", bind_address);

    Server::new(TcpListener::bind(bind_address)).run(app).await?;
    Ok(())
}
