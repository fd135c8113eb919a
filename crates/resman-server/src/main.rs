//! Resource manager server entry point.

use anyhow::Context;
use resman_db::{DbManager, run_migrations};
use resman_server::{AppState, ServerConfig, build_router};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("resman=info")),
        )
        .json()
        .init();

    let config = ServerConfig::from_env().context("invalid configuration")?;

    let db = DbManager::connect(&config.db)
        .await
        .context("failed to connect to SurrealDB")?;
    run_migrations(db.client())
        .await
        .context("failed to apply migrations")?;

    let state = AppState::new(db.client().clone(), config.auth.clone());
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, "Resource manager listening");

    axum::serve(listener, app).await.context("server error")?;

    tracing::info!("Resource manager stopped");
    Ok(())
}
