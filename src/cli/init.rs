//! `pixboard init`: prepare a fresh installation

use crate::server::{config::StorageBackend, load_config, open_store};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

const ENV_EXAMPLE: &str = include_str!("../../.env.example");

pub async fn run() -> Result<()> {
    println!("Pixboard setup\n");

    write_env_file(Path::new(".env"))?;

    let config = load_config()?;
    match config.storage.backend {
        StorageBackend::Sqlite => {
            let db_path = config.storage.db_path();
            let store = open_store(&config).await?;
            let canvases = store.list_canvases().await?;
            println!(
                "Database ready at {} ({} canvases)",
                db_path.display(),
                canvases.len()
            );
        }
        StorageBackend::Memory => {
            println!("Storage backend is `memory`; nothing to create");
        }
    }

    println!("\nNext: `pixboard add NAME WIDTH HEIGHT true` then `pixboard serve`");
    Ok(())
}

/// Write the `.env` template unless one already exists. Returns whether it wrote.
fn write_env_file(path: &Path) -> Result<bool> {
    if path.exists() {
        println!("{} already exists, leaving it unchanged", path.display());
        return Ok(false);
    }
    fs::write(path, ENV_EXAMPLE).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote {}; set PIXBOARD_VERIFICATION__SECRET before serving", path.display());
    Ok(true)
}
