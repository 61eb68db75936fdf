//! Canvas seeding commands

use crate::server::{load_config, open_registry};
use anyhow::{Context, Result};
use pixboard_canvas::{strip_marker, CanvasRegistry, CanvasSummary, NewCanvas};

/// `pixboard add NAME WIDTH HEIGHT HISTORY [--fill HEX]`
pub async fn add(
    name: String,
    width: u32,
    height: u32,
    history: bool,
    fill: Option<String>,
) -> Result<()> {
    let config = load_config()?;
    let registry = open_registry(&config).await?;
    let canvas = create(&registry, name, width, height, history, fill).await?;
    println!(
        "Created canvas #{} \"{}\" ({}x{}, history {})",
        canvas.id,
        canvas.name,
        canvas.width,
        canvas.height,
        if canvas.history_enabled { "on" } else { "off" }
    );
    Ok(())
}

/// `pixboard list`
pub async fn list() -> Result<()> {
    let config = load_config()?;
    let registry = open_registry(&config).await?;
    let canvases = registry
        .list_canvases()
        .await
        .context("Failed to list canvases")?;

    if canvases.is_empty() {
        println!("No canvases yet. Create one with `pixboard add`.");
        return Ok(());
    }
    for canvas in &canvases {
        println!("{}", format_row(canvas));
    }
    Ok(())
}

async fn create(
    registry: &CanvasRegistry,
    name: String,
    width: u32,
    height: u32,
    history: bool,
    fill: Option<String>,
) -> Result<CanvasSummary> {
    let mut request = NewCanvas::new(name.clone(), width, height).with_history(history);
    if let Some(fill) = fill {
        request = request.with_fill(strip_marker(&fill));
    }
    let canvas = registry
        .create_canvas(request)
        .await
        .with_context(|| format!("Failed to create canvas {name:?}"))?;
    Ok(canvas.summary())
}

fn format_row(canvas: &CanvasSummary) -> String {
    format!(
        "{:>4}  {:<30} {:>5}x{:<5} {}",
        canvas.id,
        canvas.name,
        canvas.width,
        canvas.height,
        if canvas.history_enabled {
            "history"
        } else {
            "-"
        }
    )
}
