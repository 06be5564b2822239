use std::sync::Arc;

use clap::Parser;
use poem::{Route, Server, listener::TcpListener};

use cinemet_backend::AppData;
use cinemet_backend::api::api_service;
use cinemet_backend::cli::{Cli, Commands, execute_command};
use cinemet_backend::config::{BootstrapSettings, connect_database, init_logging, migrate_database};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_logging()?;

    let cli = Cli::parse();
    let settings = BootstrapSettings::from_env()?;
    tracing::info!("Bootstrap settings loaded: {:?}", settings);

    let db = connect_database(&settings).await?;
    migrate_database(&db).await?;

    if cli.command == Some(Commands::Migrate) {
        tracing::info!("Migrations complete");
        return Ok(());
    }

    let app_data = Arc::new(AppData::init(db).await?);

    if let Some(command) = cli.command {
        return execute_command(command, &app_data).await;
    }

    let server_address = settings.server_address();
    let api_service = api_service(app_data, &format!("http://{}/api", server_address));
    let ui = api_service.swagger_ui();

    // Compose routes: API under /api and Swagger UI under /swagger
    let app = Route::new().nest("/api", api_service).nest("/swagger", ui);

    tracing::info!("Starting server on http://{}", server_address);
    tracing::info!("Swagger UI available at http://{}/swagger", server_address);

    Server::new(TcpListener::bind(server_address)).run(app).await?;
    Ok(())
}
