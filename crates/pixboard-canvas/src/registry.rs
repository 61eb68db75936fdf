//! Canvas Registry
//!
//! The registry owns every canvas the service knows about and is the only
//! path through which a grid changes.
//!
//! Each loaded canvas sits behind its own `RwLock`:
//! - a pixel write holds the write lock while it snapshots the old color,
//!   commits grid and edit record in one storage transaction, and updates
//!   the cached grid
//! - renders hold the read lock only while copying the grid and draining
//!   the edit log, then encode outside the lock
//!
//! Writers on different canvases never share a lock.

use futures::TryStreamExt;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use crate::canvas::{filled_grid, Canvas, CanvasSummary, FillPolicy, NewCanvas};
use crate::color::Color;
use crate::edit::{EditRecord, NewEdit};
use crate::error::{Error, Result};
use crate::render::{self, HistoryOptions};
use crate::store::CanvasStore;

/// Registry behavior knobs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Handling of malformed fill colors at creation
    #[serde(default)]
    pub fill_policy: FillPolicy,

    /// History animation options
    #[serde(default)]
    pub history: HistoryOptions,
}

type CanvasSlot = Arc<RwLock<Canvas>>;

struct RegistryInner {
    store: Arc<dyn CanvasStore>,
    slots: RwLock<HashMap<i64, CanvasSlot>>,
    config: RegistryConfig,
}

/// Shared handle to all canvases
#[derive(Clone)]
pub struct CanvasRegistry {
    inner: Arc<RegistryInner>,
}

impl CanvasRegistry {
    /// Create a registry over a store with default settings
    #[must_use]
    pub fn new(store: Arc<dyn CanvasStore>) -> Self {
        Self::with_config(store, RegistryConfig::default())
    }

    /// Create a registry with explicit settings
    #[must_use]
    pub fn with_config(store: Arc<dyn CanvasStore>, config: RegistryConfig) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                store,
                slots: RwLock::new(HashMap::new()),
                config,
            }),
        }
    }

    /// Active settings
    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.inner.config
    }

    /// Name of the backing store
    #[must_use]
    pub fn store_name(&self) -> &str {
        self.inner.store.name()
    }

    /// Create a canvas filled with one color
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_canvas(&self, request: NewCanvas) -> Result<Canvas> {
        request.validate()?;
        let fill = self
            .inner
            .config
            .fill_policy
            .resolve(request.fill.as_deref())?;
        let grid = filled_grid(request.width, request.height, &fill);

        let canvas = self
            .inner
            .store
            .insert_canvas(
                &request.name,
                request.width,
                request.height,
                request.history_enabled,
                &grid,
            )
            .await?;

        self.inner.cache(canvas.clone()).await;

        info!(
            canvas_id = canvas.id,
            width = canvas.width,
            height = canvas.height,
            history = canvas.history_enabled,
            "Canvas created"
        );
        Ok(canvas)
    }

    /// Get a copy of a canvas
    pub async fn get_canvas(&self, id: i64) -> Result<Canvas> {
        let slot = self.inner.slot(id).await?;
        let canvas = slot.read().await;
        Ok(canvas.clone())
    }

    /// Summary of one canvas without copying its grid
    pub async fn canvas_summary(&self, id: i64) -> Result<CanvasSummary> {
        let slot = self.inner.slot(id).await?;
        let canvas = slot.read().await;
        Ok(canvas.summary())
    }

    /// Find a canvas by its unique name
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Canvas>> {
        match self.inner.store.find_canvas_id(name).await? {
            Some(id) => self.get_canvas(id).await.map(Some),
            None => Ok(None),
        }
    }

    /// List every canvas without grids
    pub async fn list_canvases(&self) -> Result<Vec<CanvasSummary>> {
        self.inner.store.list_canvases().await
    }

    /// Set one pixel.
    ///
    /// On a history-enabled canvas the overwritten color is appended to the
    /// edit log in the same transaction as the grid update.
    pub async fn write_pixel(&self, id: i64, x: i64, y: i64, color: &str) -> Result<()> {
        let inner = Arc::clone(&self.inner);
        let color = color.to_string();
        // Detached so a dropped caller cannot leave storage and cache apart.
        tokio::spawn(async move { inner.write_pixel(id, x, y, &color).await })
            .await
            .map_err(|e| Error::database(format!("pixel write task failed: {e}")))?
    }

    /// Set one pixel addressed by linear index `x + y * width`
    pub async fn write_pixel_at(&self, id: i64, pos: u64, color: &str) -> Result<()> {
        let (x, y) = {
            let slot = self.inner.slot(id).await?;
            let canvas = slot.read().await;
            canvas.position_to_xy(pos)?
        };
        self.write_pixel(id, x, y, color).await
    }

    /// Grid copy and edit log (newest first) taken under one read lock
    pub async fn snapshot(&self, id: i64) -> Result<(Canvas, Vec<EditRecord>)> {
        let slot = self.inner.slot(id).await?;
        let canvas = slot.read().await;
        let edits: Vec<EditRecord> = if canvas.history_enabled {
            self.inner.store.list_descending(id).try_collect().await?
        } else {
            Vec::new()
        };
        Ok((canvas.clone(), edits))
    }

    /// Edit log of a canvas, newest first
    pub async fn edit_log(&self, id: i64) -> Result<Vec<EditRecord>> {
        let (_, edits) = self.snapshot(id).await?;
        Ok(edits)
    }

    /// Number of recorded edits
    pub async fn history_len(&self, id: i64) -> Result<u64> {
        let slot = self.inner.slot(id).await?;
        let _canvas = slot.read().await;
        self.inner.store.count_edits(id).await
    }

    /// Stylesheet with one rule per pixel
    pub async fn render_stylesheet(&self, id: i64) -> Result<String> {
        let canvas = self.get_canvas(id).await?;
        Ok(render::render_stylesheet(&canvas))
    }

    /// Still GIF of the current grid
    #[instrument(skip(self))]
    pub async fn render_image(&self, id: i64) -> Result<Vec<u8>> {
        let canvas = self.get_canvas(id).await?;
        blocking(move || render::encode_gif(&render::render_image(&canvas))).await
    }

    /// Frames of the history animation, oldest state first
    pub async fn render_history_frames(&self, id: i64) -> Result<Vec<image::RgbImage>> {
        let (canvas, edits) = self.snapshot(id).await?;
        let options = self.inner.config.history.clone();
        blocking(move || render::render_history(&canvas, edits, &options)).await
    }

    /// Animated GIF replaying the canvas history
    #[instrument(skip(self))]
    pub async fn render_history(&self, id: i64) -> Result<Vec<u8>> {
        let (canvas, edits) = self.snapshot(id).await?;
        let options = self.inner.config.history.clone();
        let count = edits.len();
        let bytes = blocking(move || {
            let frames = render::render_history(&canvas, edits, &options)?;
            render::encode_animation(&frames, &options)
        })
        .await?;
        debug!(canvas_id = id, edits = count, bytes = bytes.len(), "History rendered");
        Ok(bytes)
    }
}

impl RegistryInner {
    /// Cached slot for a canvas, loading it from the store on first use.
    ///
    /// The map lock is not held while the store is read, so a cold load
    /// never stalls lookups of other canvases.
    async fn slot(&self, id: i64) -> Result<CanvasSlot> {
        if let Some(slot) = self.slots.read().await.get(&id) {
            return Ok(Arc::clone(slot));
        }

        let canvas = self
            .store
            .load_canvas(id)
            .await?
            .ok_or(Error::NotFound(id))?;
        Ok(self.cache(canvas).await)
    }

    /// Insert a loaded canvas unless another task cached it first
    async fn cache(&self, canvas: Canvas) -> CanvasSlot {
        let mut slots = self.slots.write().await;
        Arc::clone(
            slots
                .entry(canvas.id)
                .or_insert_with(|| Arc::new(RwLock::new(canvas))),
        )
    }

    async fn write_pixel(&self, id: i64, x: i64, y: i64, color: &str) -> Result<()> {
        let slot = self.slot(id).await?;
        let mut canvas = slot.write().await;

        let color = Color::parse(color)?;
        let (x, y) = canvas.check_bounds(x, y)?;

        let mut next = canvas.clone();
        let prior = next.replace(x, y, color);
        let edit = next.history_enabled.then(|| NewEdit::now(x, y, prior));
        self.store.commit_write(&next, edit).await?;
        *canvas = next;

        debug!(canvas_id = id, x, y, "Pixel written");
        Ok(())
    }
}

async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::rendering(format!("render task failed: {e}")))?
}
