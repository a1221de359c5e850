use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use persistence::memory::InMemoryStore;
use persistence::Stores;
use portal_api::{app, config, middleware};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = config::Config::load()?;

    middleware::init_logging(&config.logging)?;
    middleware::init_metrics()?;

    info!("Starting Portal API v{}", env!("CARGO_PKG_VERSION"));

    let stores = if config.database.in_memory {
        info!("Using in-memory store; data is not persisted");
        Stores::in_memory(Arc::new(InMemoryStore::new()))
    } else {
        let pool = persistence::db::create_pool(&config.database.pool_config())
            .await
            .context("Failed to connect to database")?;

        info!("Running database migrations...");
        sqlx::migrate!("../persistence/src/migrations")
            .run(&pool)
            .await?;
        info!("Migrations completed");

        Stores::postgres(pool)
    };

    let addr = config.socket_addr()?;
    let app = app::create_app(config, stores)?;

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
