//! Trait for canvas storage backends

use futures::stream::BoxStream;

use crate::canvas::{Canvas, CanvasSummary, Grid};
use crate::edit::{EditRecord, NewEdit};
use crate::error::Result;

/// Trait for canvas storage backends
///
/// This trait allows different storage implementations (SQLite, in-memory)
/// to be used interchangeably.
#[async_trait::async_trait]
pub trait CanvasStore: Send + Sync {
    /// Insert a new canvas. Fails with `DuplicateName` if the name is taken.
    async fn insert_canvas(
        &self,
        name: &str,
        width: u32,
        height: u32,
        history_enabled: bool,
        grid: &Grid,
    ) -> Result<Canvas>;

    /// Load a canvas with its grid
    async fn load_canvas(&self, id: i64) -> Result<Option<Canvas>>;

    /// Look up a canvas ID by name
    async fn find_canvas_id(&self, name: &str) -> Result<Option<i64>>;

    /// List all canvases ordered by ID
    async fn list_canvases(&self) -> Result<Vec<CanvasSummary>>;

    /// Persist one pixel write.
    ///
    /// `canvas` carries the grid after the write. When `edit` is given it is
    /// appended to the log in the same transaction as the grid update, so
    /// either both land or neither does.
    async fn commit_write(&self, canvas: &Canvas, edit: Option<NewEdit>)
        -> Result<Option<EditRecord>>;

    /// Stream the edit log of a canvas, newest first.
    ///
    /// Order follows record IDs, which are assigned in commit order; the
    /// timestamp is carried as data and agrees with that order unless the
    /// wall clock steps back. Each call starts a fresh read.
    fn list_descending(&self, canvas_id: i64) -> BoxStream<'_, Result<EditRecord>>;

    /// Number of edit records for a canvas
    async fn count_edits(&self, canvas_id: i64) -> Result<u64>;

    /// Get the store name (for logging)
    fn name(&self) -> &str;
}
