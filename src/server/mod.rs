//! Server module for Pixboard
//!
//! Contains configuration, store initialization and the HTTP runtime.

pub mod config;
mod init;
pub mod loader;

pub use init::{build_verifier, open_registry, open_store};
pub use loader::load_config;

use anyhow::{Context, Result};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::{api_router, CanvasState};

/// API router wrapped in tracing, CORS and response compression
pub fn build_app(state: CanvasState) -> Router {
    api_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .layer(CompressionLayer::new()),
    )
}

/// Start the HTTP server and run until Ctrl-C
pub async fn run() -> Result<()> {
    let config = load_config()?;
    let registry = open_registry(&config).await?;
    let verifier = build_verifier(&config.verification);
    info!(
        store = registry.store_name(),
        verifier = verifier.name(),
        "Canvas registry ready"
    );

    let app = build_app(CanvasState::new(registry, verifier));

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    info!("HTTP server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Pixboard server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
