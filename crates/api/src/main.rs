//! CareChat HTTP API.
//!
//! Exposes the chat pipeline, history, conversations, profiles and staff
//! endpoints as JSON over axum. User identity is supplied by an upstream
//! authenticating proxy.

mod auth;
mod config;
mod error;
mod routes;
mod state;

use std::sync::Arc;

use database::Database;
use orchestrator::Orchestrator;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,orchestrator=debug")),
        )
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting CareChat API");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    let orchestrator = Orchestrator::from_env(db.pool().clone());

    if config.prefetch_models {
        let registry = Arc::clone(orchestrator.registry());
        tokio::spawn(async move {
            let ready = registry.ensure_ready().await;
            info!(ready, "Provider warm-up finished");
        });
    }

    // Build application state
    let state = AppState::new(db, orchestrator, config.admin_key.clone());

    // Build router
    let app = routes::router(state);

    // Start server
    info!(addr = %config.addr, "CareChat API listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
