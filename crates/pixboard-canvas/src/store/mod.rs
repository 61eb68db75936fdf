//! Store - Canvas and edit-log persistence
//!
//! Canvases and their edit logs live in SQLite (via sqlx) or, for tests
//! and throwaway servers, in memory. Both backends implement
//! [`CanvasStore`] so the registry does not care which one it drives.

mod helpers;
mod memory;
mod sqlite;
mod traits;

#[cfg(test)]
mod tests;

pub use helpers::{default_data_dir, default_db_path};
pub use memory::MemoryCanvasStore;
pub use sqlite::SqliteCanvasStore;
pub use traits::CanvasStore;
