use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};

use user_records::{
    app::users::{MemoryUserStore, UserService, UserSource, UserStore},
    build_app, cors_layer,
    infrastructure::logger::Logger,
    AppState, Config,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    Logger::init();

    let config = Config::from_env()?;
    let store = open_store(&config).await?;

    let service = UserService::new(
        Arc::clone(&store),
        UserSource::new(&config.source),
        config.export.path.clone(),
    );
    let app = build_app(AppState::new(service), cors_layer(&config.http)?);

    let listener = TcpListener::bind(config.bind_address()).await?;
    info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    info!("Server stopped");
    Ok(())
}

#[cfg(feature = "database")]
async fn open_store(config: &Config) -> user_records::Result<Arc<dyn UserStore>> {
    use user_records::{app::users::PgUserStore, infrastructure::database::DatabaseManager};

    if config.database.url.is_none() {
        warn!("DATABASE_URL is not set, records are kept in memory only");
        return Ok(Arc::new(MemoryUserStore::new()));
    }

    let db = DatabaseManager::connect(&config.database).await?;
    db.ensure_schema().await?;
    info!("Connected to database");
    Ok(Arc::new(PgUserStore::new(db.into_pool())))
}

#[cfg(not(feature = "database"))]
async fn open_store(config: &Config) -> user_records::Result<Arc<dyn UserStore>> {
    if config.database.url.is_some() {
        warn!("built without the `database` feature, ignoring DATABASE_URL");
    }
    Ok(Arc::new(MemoryUserStore::new()))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
