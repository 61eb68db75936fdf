//! MemoryCanvasStore - in-process canvas storage
//!
//! Nothing survives a restart. Used by tests and by servers started with
//! `storage.backend = "memory"`.

use super::traits::CanvasStore;
use crate::canvas::{Canvas, CanvasSummary, Grid};
use crate::edit::{EditRecord, NewEdit};
use crate::error::{Error, Result};
use chrono::Utc;
use futures::stream::{self, BoxStream, StreamExt};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct MemoryState {
    canvases: BTreeMap<i64, Canvas>,
    edits: Vec<EditRecord>,
    next_canvas_id: i64,
    next_edit_id: i64,
}

/// Canvas store keeping everything in memory
#[derive(Default)]
pub struct MemoryCanvasStore {
    state: RwLock<MemoryState>,
}

impl MemoryCanvasStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl CanvasStore for MemoryCanvasStore {
    async fn insert_canvas(
        &self,
        name: &str,
        width: u32,
        height: u32,
        history_enabled: bool,
        grid: &Grid,
    ) -> Result<Canvas> {
        let mut state = self.state.write().await;
        if state.canvases.values().any(|c| c.name == name) {
            return Err(Error::DuplicateName(name.to_string()));
        }

        state.next_canvas_id += 1;
        let canvas = Canvas::from_parts(
            state.next_canvas_id,
            name,
            width,
            height,
            history_enabled,
            grid.clone(),
            Utc::now(),
        )?;
        state.canvases.insert(canvas.id, canvas.clone());
        Ok(canvas)
    }

    async fn load_canvas(&self, id: i64) -> Result<Option<Canvas>> {
        Ok(self.state.read().await.canvases.get(&id).cloned())
    }

    async fn find_canvas_id(&self, name: &str) -> Result<Option<i64>> {
        let state = self.state.read().await;
        Ok(state
            .canvases
            .values()
            .find(|c| c.name == name)
            .map(|c| c.id))
    }

    async fn list_canvases(&self) -> Result<Vec<CanvasSummary>> {
        let state = self.state.read().await;
        Ok(state.canvases.values().map(Canvas::summary).collect())
    }

    async fn commit_write(
        &self,
        canvas: &Canvas,
        edit: Option<NewEdit>,
    ) -> Result<Option<EditRecord>> {
        let mut state = self.state.write().await;
        if !state.canvases.contains_key(&canvas.id) {
            return Err(Error::NotFound(canvas.id));
        }

        let record = edit.map(|edit| {
            state.next_edit_id += 1;
            edit.into_record(state.next_edit_id, canvas.id)
        });
        if let Some(ref record) = record {
            state.edits.push(record.clone());
        }
        state.canvases.insert(canvas.id, canvas.clone());
        Ok(record)
    }

    fn list_descending(&self, canvas_id: i64) -> BoxStream<'_, Result<EditRecord>> {
        stream::once(async move {
            let state = self.state.read().await;
            let mut records: Vec<EditRecord> = state
                .edits
                .iter()
                .filter(|e| e.canvas_id == canvas_id)
                .cloned()
                .collect();
            records.sort_by(|a, b| b.id.cmp(&a.id));
            stream::iter(records.into_iter().map(Ok))
        })
        .flatten()
        .boxed()
    }

    async fn count_edits(&self, canvas_id: i64) -> Result<u64> {
        let state = self.state.read().await;
        Ok(state
            .edits
            .iter()
            .filter(|e| e.canvas_id == canvas_id)
            .count() as u64)
    }

    fn name(&self) -> &str {
        "memory"
    }
}
