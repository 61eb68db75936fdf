//! Canvas Types
//!
//! This module defines the pixel canvas: a fixed-size grid of colors
//! with a history flag chosen at creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::{Error, Result};

/// Longest accepted canvas name
pub const MAX_NAME_LEN: usize = 60;

/// Row-major pixel grid, indexed `grid[y][x]`
pub type Grid = Vec<Vec<Color>>;

/// Build a `width` x `height` grid filled with one color
#[must_use]
pub fn filled_grid(width: u32, height: u32, fill: &Color) -> Grid {
    (0..height)
        .map(|_| vec![fill.clone(); width as usize])
        .collect()
}

/// A named pixel canvas
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Canvas {
    /// Storage-assigned identifier
    pub id: i64,

    /// Unique canvas name
    pub name: String,

    /// Grid width in pixels
    pub width: u32,

    /// Grid height in pixels
    pub height: u32,

    /// Whether pixel writes are recorded in the edit log
    pub history_enabled: bool,

    /// When the canvas was created
    pub created_at: DateTime<Utc>,

    grid: Grid,
}

impl Canvas {
    /// Assemble a canvas from stored parts, checking the grid shape
    pub fn from_parts(
        id: i64,
        name: impl Into<String>,
        width: u32,
        height: u32,
        history_enabled: bool,
        grid: Grid,
        created_at: DateTime<Utc>,
    ) -> Result<Self> {
        let name = name.into();
        let shape_ok = width > 0
            && height > 0
            && grid.len() == height as usize
            && grid.iter().all(|row| row.len() == width as usize);
        if !shape_ok {
            return Err(Error::Serialization(format!(
                "grid of canvas {name:?} does not match {width}x{height}"
            )));
        }
        Ok(Self {
            id,
            name,
            width,
            height,
            history_enabled,
            created_at,
            grid,
        })
    }

    /// Current pixel colors
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Color at (x, y), if inside the grid
    #[must_use]
    pub fn color_at(&self, x: u32, y: u32) -> Option<&Color> {
        self.grid.get(y as usize)?.get(x as usize)
    }

    /// Number of pixels on the canvas
    #[must_use]
    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Validate signed coordinates against the grid.
    ///
    /// Negative coordinates are rejected the same way as coordinates past
    /// the right or bottom edge.
    pub fn check_bounds(&self, x: i64, y: i64) -> Result<(u32, u32)> {
        let inside = (0..i64::from(self.width)).contains(&x)
            && (0..i64::from(self.height)).contains(&y);
        if !inside {
            return Err(Error::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok((x as u32, y as u32))
    }

    /// Map a linear pixel index (`x + y * width`) to coordinates
    pub fn position_to_xy(&self, pos: u64) -> Result<(i64, i64)> {
        let width = u64::from(self.width);
        let x = (pos % width) as i64;
        let y = i64::try_from(pos / width).unwrap_or(i64::MAX);
        self.check_bounds(x, y)?;
        Ok((x, y))
    }

    /// Replace the color at (x, y), returning the previous one.
    ///
    /// Callers must have bounds-checked the coordinates.
    pub(crate) fn replace(&mut self, x: u32, y: u32, color: Color) -> Color {
        std::mem::replace(&mut self.grid[y as usize][x as usize], color)
    }

    /// Listing view without the grid
    #[must_use]
    pub fn summary(&self) -> CanvasSummary {
        CanvasSummary {
            id: self.id,
            name: self.name.clone(),
            width: self.width,
            height: self.height,
            history_enabled: self.history_enabled,
        }
    }
}

/// Summary of a canvas for listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSummary {
    /// Canvas ID
    pub id: i64,
    /// Canvas name
    pub name: String,
    /// Grid width
    pub width: u32,
    /// Grid height
    pub height: u32,
    /// Whether history is recorded
    pub history_enabled: bool,
}

/// What to do when a canvas is created with a malformed fill color
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillPolicy {
    /// Substitute white and carry on
    #[default]
    Fallback,
    /// Fail with `InvalidColor`
    Reject,
}

impl FillPolicy {
    /// Turn a raw fill value into a color according to the policy
    pub fn resolve(self, raw: Option<&str>) -> Result<Color> {
        match (raw.map(Color::parse), self) {
            (Some(Ok(color)), _) => Ok(color),
            (None, _) => Ok(Color::white()),
            (Some(Err(_)), FillPolicy::Fallback) => {
                tracing::warn!(fill = ?raw, "invalid fill color, using {}", Color::WHITE_HEX);
                Ok(Color::white())
            }
            (Some(Err(err)), FillPolicy::Reject) => Err(err),
        }
    }
}

/// Request to create a canvas
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCanvas {
    /// Unique name
    pub name: String,
    /// Grid width
    pub width: u32,
    /// Grid height
    pub height: u32,
    /// Record pixel history
    #[serde(default)]
    pub history_enabled: bool,
    /// Initial color for every pixel, unvalidated
    #[serde(default)]
    pub fill: Option<String>,
}

impl NewCanvas {
    /// Create a request with a white fill and no history
    #[must_use]
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            history_enabled: false,
            fill: None,
        }
    }

    /// Enable or disable history tracking
    #[must_use]
    pub fn with_history(mut self, enabled: bool) -> Self {
        self.history_enabled = enabled;
        self
    }

    /// Set the fill color
    #[must_use]
    pub fn with_fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    /// Check the name and dimensions
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidName("name must not be empty".into()));
        }
        if self.name.chars().count() > MAX_NAME_LEN {
            return Err(Error::InvalidName(format!(
                "name is longer than {MAX_NAME_LEN} characters"
            )));
        }
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidDimensions(format!(
                "{}x{} has no pixels",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas(width: u32, height: u32) -> Canvas {
        let fill = Color::white();
        Canvas::from_parts(
            1,
            "test",
            width,
            height,
            true,
            filled_grid(width, height, &fill),
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn test_filled_grid_shape() {
        let grid = filled_grid(3, 2, &Color::parse("123456").unwrap());
        assert_eq!(grid.len(), 2);
        assert!(grid.iter().all(|row| row.len() == 3));
        assert!(grid.iter().flatten().all(|c| c.as_str() == "123456"));
    }

    #[test]
    fn test_from_parts_rejects_bad_shape() {
        let grid = filled_grid(2, 2, &Color::white());
        let err = Canvas::from_parts(1, "x", 3, 2, false, grid, Utc::now()).unwrap_err();
        assert_eq!(err.code(), "serialization_error");
    }

    #[test]
    fn test_check_bounds() {
        let c = canvas(4, 3);
        assert_eq!(c.check_bounds(3, 2).unwrap(), (3, 2));
        assert!(matches!(c.check_bounds(4, 0), Err(Error::OutOfBounds { .. })));
        assert!(matches!(c.check_bounds(0, 3), Err(Error::OutOfBounds { .. })));
        assert!(matches!(c.check_bounds(-1, 0), Err(Error::OutOfBounds { .. })));
        assert!(matches!(c.check_bounds(0, -1), Err(Error::OutOfBounds { .. })));
    }

    #[test]
    fn test_position_to_xy() {
        let c = canvas(4, 3);
        assert_eq!(c.position_to_xy(0).unwrap(), (0, 0));
        assert_eq!(c.position_to_xy(5).unwrap(), (1, 1));
        assert_eq!(c.position_to_xy(11).unwrap(), (3, 2));
        assert!(c.position_to_xy(12).is_err());
    }

    #[test]
    fn test_replace_returns_previous() {
        let mut c = canvas(2, 2);
        let red = Color::parse("ff0000").unwrap();
        let prev = c.replace(1, 0, red.clone());
        assert_eq!(prev, Color::white());
        assert_eq!(c.color_at(1, 0), Some(&red));
        assert_eq!(c.color_at(0, 0), Some(&Color::white()));
        assert_eq!(c.color_at(2, 0), None);
    }

    #[test]
    fn test_fill_policy() {
        assert_eq!(
            FillPolicy::Fallback.resolve(Some("nope")).unwrap(),
            Color::white()
        );
        assert_eq!(FillPolicy::Fallback.resolve(None).unwrap(), Color::white());
        assert_eq!(FillPolicy::Reject.resolve(None).unwrap(), Color::white());
        assert_eq!(
            FillPolicy::Reject.resolve(Some("00ff00")).unwrap().as_str(),
            "00ff00"
        );
        assert!(matches!(
            FillPolicy::Reject.resolve(Some("nope")),
            Err(Error::InvalidColor(_))
        ));
    }

    #[test]
    fn test_new_canvas_validate() {
        assert!(NewCanvas::new("ok", 1, 1).validate().is_ok());
        assert!(matches!(
            NewCanvas::new("", 1, 1).validate(),
            Err(Error::InvalidName(_))
        ));
        assert!(matches!(
            NewCanvas::new("flat", 0, 5).validate(),
            Err(Error::InvalidDimensions(_))
        ));
        assert!(matches!(
            NewCanvas::new("x".repeat(61), 1, 1).validate(),
            Err(Error::InvalidName(_))
        ));
    }
}
