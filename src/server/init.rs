//! Store and verifier initialization
//!
//! Shared by the HTTP server and the CLI seeding commands.

use super::config::{AppConfig, StorageBackend, VerificationConfig};
use anyhow::{Context, Result};
use pixboard_canvas::{
    AllowAllVerifier, CanvasRegistry, CanvasStore, ChallengeVerifier, HashChallengeVerifier,
    MemoryCanvasStore, SqliteCanvasStore,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Open the configured canvas store, creating tables as needed
pub async fn open_store(config: &AppConfig) -> Result<Arc<dyn CanvasStore>> {
    match config.storage.backend {
        StorageBackend::Sqlite => {
            let db_path = config.storage.db_path();
            let store = SqliteCanvasStore::from_path(&db_path)
                .await
                .context("Failed to initialize SQLite canvas store")?;
            Ok(Arc::new(store))
        }
        StorageBackend::Memory => {
            warn!("Using in-memory canvas store; canvases are lost on restart");
            Ok(Arc::new(MemoryCanvasStore::new()))
        }
    }
}

/// Open the store and wrap it in a registry
pub async fn open_registry(config: &AppConfig) -> Result<CanvasRegistry> {
    let store = open_store(config).await?;
    Ok(CanvasRegistry::with_config(
        store,
        config.canvas.registry_config(),
    ))
}

/// Build the challenge verifier for pixel writes
pub fn build_verifier(config: &VerificationConfig) -> Arc<dyn ChallengeVerifier> {
    if !config.enabled {
        warn!("Human verification disabled; every pixel write is accepted");
        return Arc::new(AllowAllVerifier);
    }
    if config.secret == "change-me" {
        warn!("Verification secret is the shipped default; set PIXBOARD_VERIFICATION__SECRET");
    }
    info!("Hash challenge verifier enabled");
    Arc::new(HashChallengeVerifier::new(config.secret.clone()))
}
