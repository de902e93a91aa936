use messagely::core::{AppState, Config, StorageKind};
use sqlx::mysql::MySqlPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Inizializza la configurazione
    let config = Config::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;
    config.print_info();

    let state = match config.storage {
        StorageKind::MySql => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or("DATABASE_URL must be set in .env file")?;
            let pool = MySqlPoolOptions::new()
                .max_connections(config.max_connections)
                .max_lifetime(Duration::from_secs(config.connection_lifetime_secs))
                .connect(database_url)
                .await?;
            info!("Connected to database");

            sqlx::migrate!("./migrations").run(&pool).await?;
            info!("Migrations applied");

            AppState::new(pool, config.jwt_secret.clone(), config.bcrypt_cost)
        }
        StorageKind::Memory => {
            info!("Using in-memory storage, data is lost on shutdown");
            AppState::in_memory(config.jwt_secret.clone(), config.bcrypt_cost)
        }
    };

    // Crea il router
    let app = messagely::create_router(Arc::new(state)).layer(CorsLayer::permissive());

    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    // Avvia il server
    axum::serve(listener, app).await?;

    Ok(())
}
