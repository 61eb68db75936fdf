//! Pixboard Canvas - Canvas State and History Engine
//!
//! This crate provides the core of the Pixboard pixel-canvas service:
//! - Color: hex color codec
//! - Canvas: fixed-size pixel grids
//! - Edit: append-only records of overwritten colors
//! - Store: SQLite and in-memory persistence
//! - Registry: per-canvas serialized writes and consistent reads
//! - Render: stylesheet, still GIF and history animation
//! - Verify: human-verification oracle
//! - Error: Error types for canvas operations
//!
//! ## Usage
//!
//! ```ignore
//! use pixboard_canvas::{CanvasRegistry, NewCanvas, SqliteCanvasStore};
//! use std::sync::Arc;
//!
//! let store = SqliteCanvasStore::from_path(&pixboard_canvas::default_db_path()).await?;
//! let registry = CanvasRegistry::new(Arc::new(store));
//!
//! let canvas = registry
//!     .create_canvas(NewCanvas::new("lobby", 32, 32).with_history(true))
//!     .await?;
//! registry.write_pixel(canvas.id, 3, 4, "ff0000").await?;
//! let gif = registry.render_history(canvas.id).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod canvas;
pub mod color;
pub mod edit;
pub mod error;
pub mod registry;
pub mod render;
pub mod store;
pub mod verify;

// Re-export main types
pub use canvas::{Canvas, CanvasSummary, FillPolicy, Grid, NewCanvas};
pub use color::{is_valid_color, strip_marker, to_rgb, Color};
pub use edit::{EditRecord, NewEdit};
pub use error::{Error, Result};
pub use registry::{CanvasRegistry, RegistryConfig};
pub use render::HistoryOptions;
pub use store::{
    default_data_dir, default_db_path, CanvasStore, MemoryCanvasStore, SqliteCanvasStore,
};
pub use verify::{AllowAllVerifier, ChallengeVerifier, HashChallengeVerifier};
