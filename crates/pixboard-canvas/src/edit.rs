//! Edit records
//!
//! One record per pixel write on a history-enabled canvas, holding the
//! color that was overwritten.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::color::Color;

/// A historical pixel write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditRecord {
    /// Storage-assigned, increasing per append
    pub id: i64,
    /// Canvas the write belongs to
    pub canvas_id: i64,
    /// Column of the write
    pub x: u32,
    /// Row of the write
    pub y: u32,
    /// Color at (x, y) immediately before the write
    pub color: Color,
    /// When the write happened
    pub created_at: DateTime<Utc>,
}

/// An edit record before storage assigns its ID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEdit {
    /// Column of the write
    pub x: u32,
    /// Row of the write
    pub y: u32,
    /// Color being overwritten
    pub prior: Color,
    /// When the write happened
    pub created_at: DateTime<Utc>,
}

impl NewEdit {
    /// Snapshot the prior color at (x, y), stamped now
    #[must_use]
    pub fn now(x: u32, y: u32, prior: Color) -> Self {
        Self {
            x,
            y,
            prior,
            created_at: Utc::now(),
        }
    }

    /// Attach the storage identity
    #[must_use]
    pub fn into_record(self, id: i64, canvas_id: i64) -> EditRecord {
        EditRecord {
            id,
            canvas_id,
            x: self.x,
            y: self.y,
            color: self.prior,
            created_at: self.created_at,
        }
    }
}
