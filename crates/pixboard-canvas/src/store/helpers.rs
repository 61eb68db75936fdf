//! Helper functions for store module

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::canvas::{Canvas, CanvasSummary, Grid};
use crate::color::Color;
use crate::edit::EditRecord;
use crate::error::{Error, Result};

/// Fixed-width RFC 3339 so that text ordering matches time ordering
pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Serialization(format!("invalid timestamp: {e}")))
}

fn dimension(value: i64, what: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::Serialization(format!("invalid {what}: {value}")))
}

/// Convert a SQLite row to a Canvas
pub(crate) fn row_to_canvas(row: SqliteRow) -> Result<Canvas> {
    let data: String = row.try_get("data")?;
    let created_at: String = row.try_get("created_at")?;
    let grid: Grid = serde_json::from_str(&data)?;

    Canvas::from_parts(
        row.try_get("id")?,
        row.try_get::<String, _>("name")?,
        dimension(row.try_get("width")?, "width")?,
        dimension(row.try_get("height")?, "height")?,
        row.try_get("history")?,
        grid,
        parse_timestamp(&created_at)?,
    )
}

/// Convert a SQLite row to a CanvasSummary
pub(crate) fn row_to_summary(row: SqliteRow) -> Result<CanvasSummary> {
    Ok(CanvasSummary {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        width: dimension(row.try_get("width")?, "width")?,
        height: dimension(row.try_get("height")?, "height")?,
        history_enabled: row.try_get("history")?,
    })
}

/// Convert a SQLite row to an EditRecord
pub(crate) fn row_to_edit(row: SqliteRow) -> Result<EditRecord> {
    let color: String = row.try_get("color")?;
    let date: String = row.try_get("date")?;

    Ok(EditRecord {
        id: row.try_get("id")?,
        canvas_id: row.try_get("canvas_id")?,
        x: dimension(row.try_get("x")?, "x")?,
        y: dimension(row.try_get("y")?, "y")?,
        color: Color::parse(color)?,
        created_at: parse_timestamp(&date)?,
    })
}

/// Get the default data directory for Pixboard
pub fn default_data_dir() -> std::path::PathBuf {
    dirs::home_dir()
        .map(|p| p.join(".pixboard"))
        .unwrap_or_else(|| std::path::PathBuf::from(".pixboard"))
}

/// Get the default database path
pub fn default_db_path() -> std::path::PathBuf {
    default_data_dir().join("pixboard.db")
}
