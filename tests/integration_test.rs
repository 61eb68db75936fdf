//! Integration tests for Pixboard
//!
//! These tests drive the canvas core through its public API:
//! - SQLite persistence across registry restarts
//! - Edit log ordering and history rendering
//! - Concurrent pixel writers

use std::path::Path;
use std::sync::Arc;

use pixboard_canvas::{
    CanvasRegistry, CanvasStore, Error, FillPolicy, HistoryOptions, MemoryCanvasStore, NewCanvas,
    RegistryConfig, SqliteCanvasStore,
};

async fn file_registry(path: &Path) -> CanvasRegistry {
    let store = SqliteCanvasStore::from_path(path).await.unwrap();
    CanvasRegistry::new(Arc::new(store))
}

fn pixel(frame: &image::RgbImage, x: u32, y: u32) -> [u8; 3] {
    frame.get_pixel(x, y).0
}

// ============================================================================
// Persistence
// ============================================================================

#[tokio::test]
async fn test_canvas_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pixboard.db");

    let id = {
        let registry = file_registry(&path).await;
        let canvas = registry
            .create_canvas(NewCanvas::new("A", 2, 2).with_history(true))
            .await
            .unwrap();
        registry.write_pixel(canvas.id, 0, 0, "ff0000").await.unwrap();
        registry.write_pixel(canvas.id, 0, 0, "00ff00").await.unwrap();
        canvas.id
    };

    let registry = file_registry(&path).await;
    let canvas = registry.get_canvas(id).await.unwrap();
    assert_eq!(canvas.color_at(0, 0).unwrap().as_str(), "00ff00");
    assert_eq!(canvas.color_at(1, 1).unwrap().as_str(), "ffffff");

    let log = registry.edit_log(id).await.unwrap();
    let priors: Vec<&str> = log.iter().map(|e| e.color.as_str()).collect();
    assert_eq!(priors, vec!["ff0000", "ffffff"]);

    let found = registry.find_by_name("A").await.unwrap().unwrap();
    assert_eq!(found.id, id);
}

#[tokio::test]
async fn test_duplicate_name_across_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pixboard.db");
    {
        let registry = file_registry(&path).await;
        registry
            .create_canvas(NewCanvas::new("taken", 1, 1))
            .await
            .unwrap();
    }

    let registry = file_registry(&path).await;
    let err = registry
        .create_canvas(NewCanvas::new("taken", 4, 4))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateName(_)));
    assert_eq!(registry.list_canvases().await.unwrap().len(), 1);
}

// ============================================================================
// History
// ============================================================================

#[tokio::test]
async fn test_history_frames_end_on_current_grid() {
    let config = RegistryConfig {
        fill_policy: FillPolicy::Fallback,
        history: HistoryOptions {
            frame_delay_ms: 100,
            include_current: true,
        },
    };
    let store = SqliteCanvasStore::in_memory().await.unwrap();
    let registry = CanvasRegistry::with_config(Arc::new(store), config);

    let canvas = registry
        .create_canvas(NewCanvas::new("A", 2, 2).with_history(true))
        .await
        .unwrap();
    registry.write_pixel(canvas.id, 0, 0, "ff0000").await.unwrap();
    registry.write_pixel(canvas.id, 0, 0, "00ff00").await.unwrap();

    let frames = registry.render_history_frames(canvas.id).await.unwrap();
    assert_eq!(frames.len(), 3);
    assert_eq!(pixel(&frames[0], 0, 0), [255, 255, 255]);
    assert_eq!(pixel(&frames[1], 0, 0), [255, 0, 0]);
    assert_eq!(pixel(&frames[2], 0, 0), [0, 255, 0]);
    assert_eq!(pixel(&frames[2], 1, 1), [255, 255, 255]);

    let gif = registry.render_history(canvas.id).await.unwrap();
    assert!(gif.starts_with(b"GIF89a"));
}

#[tokio::test]
async fn test_history_errors() {
    let registry = CanvasRegistry::new(Arc::new(MemoryCanvasStore::new()));
    let plain = registry
        .create_canvas(NewCanvas::new("plain", 2, 2))
        .await
        .unwrap();
    let tracked = registry
        .create_canvas(NewCanvas::new("tracked", 2, 2).with_history(true))
        .await
        .unwrap();

    registry.write_pixel(plain.id, 1, 1, "123456").await.unwrap();
    assert!(matches!(
        registry.render_history(plain.id).await,
        Err(Error::NoHistory(_))
    ));
    assert!(matches!(
        registry.render_history(tracked.id).await,
        Err(Error::EmptyHistory(_))
    ));
    assert!(matches!(
        registry.render_history(999).await,
        Err(Error::NotFound(999))
    ));
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_writers_keep_every_edit() {
    let store: Arc<dyn CanvasStore> = Arc::new(SqliteCanvasStore::in_memory().await.unwrap());
    let registry = CanvasRegistry::new(Arc::clone(&store));
    let canvas = registry
        .create_canvas(NewCanvas::new("busy", 4, 4).with_history(true))
        .await
        .unwrap();

    let writers: Vec<_> = (0..32u32)
        .map(|i| {
            let registry = registry.clone();
            let id = canvas.id;
            tokio::spawn(async move {
                let color = format!("{:06x}", i + 1);
                registry
                    .write_pixel(id, i64::from(i % 4), 0, &color)
                    .await
            })
        })
        .collect();
    for writer in writers {
        writer.await.unwrap().unwrap();
    }

    assert_eq!(registry.history_len(canvas.id).await.unwrap(), 32);
    assert_eq!(store.count_edits(canvas.id).await.unwrap(), 32);

    // each column's prior colors chain: the oldest prior is the fill
    let log = registry.edit_log(canvas.id).await.unwrap();
    for x in 0..4u32 {
        let column: Vec<_> = log.iter().filter(|e| e.x == x).collect();
        assert_eq!(column.len(), 8);
        assert_eq!(column.last().unwrap().color.as_str(), "ffffff");
    }
}
