use std::sync::Arc;

use clap::Parser;
use poem::{Server, listener::TcpListener};

use localbiz_backend::AppData;
use localbiz_backend::api::build_routes;
use localbiz_backend::cli::{CatalogCommands, Cli, Commands, catalog, migrate};
use localbiz_backend::config::{
    BootstrapSettings, EnvironmentProvider, SystemEnvironment, init_database, init_logging,
    migrate_database,
};
use localbiz_backend::stores::CatalogStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let env_provider: Arc<dyn EnvironmentProvider + Send + Sync> = Arc::new(SystemEnvironment);

    init_logging(env_provider.clone())?;

    let cli = Cli::parse();
    let settings = BootstrapSettings::from_env_provider(env_provider.clone())?;
    tracing::debug!("Bootstrap settings: {:?}", settings);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Migrate => migrate::run_migrations(&settings).await,
        Commands::Catalog(command) => {
            let db = init_database(&settings).await?;
            migrate_database(&db).await?;
            let catalog_store = CatalogStore::new(db);

            match command {
                CatalogCommands::Add { kind, name } => {
                    catalog::add_entry(&catalog_store, kind.into(), &name).await
                }
                CatalogCommands::List { kind } => {
                    catalog::list_entries(&catalog_store, kind.into()).await
                }
            }
        }
        Commands::Serve => serve(settings, env_provider).await,
    }
}

async fn serve(
    settings: BootstrapSettings,
    env_provider: Arc<dyn EnvironmentProvider + Send + Sync>,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = init_database(&settings).await?;
    migrate_database(&db).await?;

    let address = settings.server_address();
    let port = settings.server_port();
    let server_url = format!("http://localhost:{}/api", port);

    let app_data = Arc::new(AppData::init(db, settings, env_provider)?);
    let app = build_routes(app_data, &server_url);

    tracing::info!("Starting server on http://{}", address);
    tracing::info!("Swagger UI available at http://localhost:{}/swagger", port);

    Server::new(TcpListener::bind(address)).run(app).await?;

    Ok(())
}
