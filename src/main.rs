//! Server binary
//!
//! Wires up:
//! - SQLite record store
//! - Bunny Stream provider client
//! - HTTP JSON API

use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use vidsync::adapters::http;
use vidsync::{AppConfig, BunnyClient, SqliteVideoStore, VideoSyncService};

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    // 1. Adapters
    let store = match SqliteVideoStore::connect(&config.database).await {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, url = %config.database.url, "Failed to open database");
            std::process::exit(1);
        }
    };

    let provider = match BunnyClient::new(&config.provider) {
        Ok(p) => p,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build provider client");
            std::process::exit(1);
        }
    };

    // 2. Application Service
    let service = Arc::new(VideoSyncService::new(provider, store));

    // 3. HTTP Layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = http::router(service)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // 4. Start Server
    let address = config.bind_address();
    let listener = match tokio::net::TcpListener::bind(&address).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(error = %e, address = %address, "Failed to bind TCP listener");
            std::process::exit(1);
        }
    };
    tracing::info!(address = %address, library_id = %config.provider.library_id, "Listening");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
    tracing::info!("Server stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
