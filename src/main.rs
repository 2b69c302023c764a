//! Newsportal - news portal backend

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use newsportal::{
    api::{self, AppState},
    config::Config,
    db::{self, schema},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration comes first: it carries the log filter
    let config_path = Config::default_path();
    let config = Config::load_with_env(&config_path)?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.logging.directives()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting newsportal...");
    tracing::info!("Configuration loaded from {}", config_path.display());

    // Initialize database
    let pool = db::create_pool(&config.database).await?;
    tracing::info!("Database connected: {:?}", config.database.driver);

    schema::ensure_schema(&pool).await?;

    let state = AppState::new(pool, &config.pagination);
    let app = api::build_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
