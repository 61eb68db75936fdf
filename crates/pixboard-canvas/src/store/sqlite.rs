//! SqliteCanvasStore - SQLite-based canvas storage

use super::helpers::{format_timestamp, row_to_canvas, row_to_edit, row_to_summary};
use super::traits::CanvasStore;
use crate::canvas::{Canvas, CanvasSummary, Grid};
use crate::edit::{EditRecord, NewEdit};
use crate::error::{Error, Result};
use chrono::Utc;
use futures::stream::{BoxStream, StreamExt};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Canvas store persisting canvases and edits to SQLite
#[derive(Clone)]
pub struct SqliteCanvasStore {
    pool: SqlitePool,
}

impl SqliteCanvasStore {
    /// Create a new store with the given connection pool.
    ///
    /// Call [`SqliteCanvasStore::run_migrations`] before use.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new store from a database path
    ///
    /// This will create the database file if it doesn't exist and run migrations.
    pub async fn from_path(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Database(format!("failed to create directory: {e}")))?;
        }

        let db_url = format!("sqlite:{}?mode=rwc", db_path.display());
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&db_url)
            .await?;

        let store = Self { pool };
        store.run_migrations().await?;

        info!("SQLite canvas store initialized at {}", db_path.display());
        Ok(store)
    }

    /// Create a new in-memory store (for testing)
    pub async fn in_memory() -> Result<Self> {
        // A second connection would open a different, empty database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let store = Self { pool };
        store.run_migrations().await?;

        debug!("In-memory SQLite canvas store initialized");
        Ok(store)
    }

    /// Create the canvases and edits tables
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS canvases (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                width INTEGER NOT NULL,
                height INTEGER NOT NULL,
                history BOOLEAN NOT NULL,
                data TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS edits (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                x INTEGER NOT NULL,
                y INTEGER NOT NULL,
                color TEXT NOT NULL,
                date TEXT NOT NULL,
                canvas_id INTEGER NOT NULL,
                FOREIGN KEY (canvas_id) REFERENCES canvases(id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_edits_canvas
            ON edits(canvas_id, id DESC)
            "#,
        )
        .execute(&self.pool)
        .await?;

        debug!("Database migrations completed");
        Ok(())
    }

    /// Get a reference to the underlying connection pool
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait::async_trait]
impl CanvasStore for SqliteCanvasStore {
    #[instrument(skip(self, grid))]
    async fn insert_canvas(
        &self,
        name: &str,
        width: u32,
        height: u32,
        history_enabled: bool,
        grid: &Grid,
    ) -> Result<Canvas> {
        let data = serde_json::to_string(grid)?;
        let created_at = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO canvases (name, width, height, history, data, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(name)
        .bind(i64::from(width))
        .bind(i64::from(height))
        .bind(history_enabled)
        .bind(&data)
        .bind(format_timestamp(&created_at))
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                Error::DuplicateName(name.to_string())
            }
            other => Error::from(other),
        })?;

        let id = result.last_insert_rowid();
        debug!("Inserted canvas {} ({})", id, name);
        Canvas::from_parts(
            id,
            name,
            width,
            height,
            history_enabled,
            grid.clone(),
            created_at,
        )
    }

    #[instrument(skip(self))]
    async fn load_canvas(&self, id: i64) -> Result<Option<Canvas>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, width, height, history, data, created_at
            FROM canvases
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(row_to_canvas).transpose()
    }

    #[instrument(skip(self))]
    async fn find_canvas_id(&self, name: &str) -> Result<Option<i64>> {
        let row = sqlx::query("SELECT id FROM canvases WHERE name = ?1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.try_get("id")).transpose()?)
    }

    #[instrument(skip(self))]
    async fn list_canvases(&self) -> Result<Vec<CanvasSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, width, height, history
            FROM canvases
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_summary).collect()
    }

    #[instrument(skip(self, canvas, edit), fields(canvas_id = canvas.id))]
    async fn commit_write(
        &self,
        canvas: &Canvas,
        edit: Option<NewEdit>,
    ) -> Result<Option<EditRecord>> {
        let data = serde_json::to_string(canvas.grid())?;
        let mut tx = self.pool.begin().await?;

        // Both statements share the transaction; updating first lets a
        // missing canvas surface as NotFound instead of a foreign key error.
        let updated = sqlx::query("UPDATE canvases SET data = ?1 WHERE id = ?2")
            .bind(&data)
            .bind(canvas.id)
            .execute(&mut *tx)
            .await?;

        if updated.rows_affected() == 0 {
            return Err(Error::NotFound(canvas.id));
        }

        let record = match edit {
            Some(edit) => {
                let result = sqlx::query(
                    r#"
                    INSERT INTO edits (x, y, color, date, canvas_id)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                    "#,
                )
                .bind(i64::from(edit.x))
                .bind(i64::from(edit.y))
                .bind(edit.prior.as_str())
                .bind(format_timestamp(&edit.created_at))
                .bind(canvas.id)
                .execute(&mut *tx)
                .await?;
                Some(edit.into_record(result.last_insert_rowid(), canvas.id))
            }
            None => None,
        };

        tx.commit().await?;
        Ok(record)
    }

    fn list_descending(&self, canvas_id: i64) -> BoxStream<'_, Result<EditRecord>> {
        sqlx::query(
            r#"
            SELECT id, x, y, color, date, canvas_id
            FROM edits
            WHERE canvas_id = ?1
            ORDER BY id DESC
            "#,
        )
        .bind(canvas_id)
        .fetch(&self.pool)
        .map(|row| row_to_edit(row?))
        .boxed()
    }

    #[instrument(skip(self))]
    async fn count_edits(&self, canvas_id: i64) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM edits WHERE canvas_id = ?1")
            .bind(canvas_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.max(0) as u64)
    }

    fn name(&self) -> &str {
        "sqlite"
    }
}
