//! Error types for pixboard-canvas
//!
//! This module provides the error taxonomy shared by the color codec,
//! the canvas store, the edit log and the renderers.

use thiserror::Error;

/// Canvas error type
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed hex color string
    #[error("invalid color: {0:?}")]
    InvalidColor(String),

    /// Coordinates outside the canvas grid
    #[error("pixel ({x}, {y}) is outside the {width}x{height} canvas")]
    OutOfBounds {
        /// Requested column
        x: i64,
        /// Requested row
        y: i64,
        /// Canvas width
        width: u32,
        /// Canvas height
        height: u32,
    },

    /// Canvas name already taken
    #[error("canvas name already exists: {0}")]
    DuplicateName(String),

    /// Canvas not found
    #[error("canvas not found: {0}")]
    NotFound(i64),

    /// History requested on a canvas without tracking
    #[error("history is not tracked for canvas {0}")]
    NoHistory(i64),

    /// History tracked but nothing recorded yet
    #[error("no history recorded for canvas {0}")]
    EmptyHistory(i64),

    /// Rejected canvas width or height at creation
    #[error("invalid canvas dimensions: {0}")]
    InvalidDimensions(String),

    /// Rejected canvas name at creation
    #[error("invalid canvas name: {0}")]
    InvalidName(String),

    /// Database error
    #[error("database error: {0}")]
    Database(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Rendering error
    #[error("rendering error: {0}")]
    Rendering(String),
}

impl Error {
    /// Create an invalid color error
    #[must_use]
    pub fn invalid_color(value: impl Into<String>) -> Self {
        Self::InvalidColor(value.into())
    }

    /// Create a database error
    #[must_use]
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Create a rendering error
    #[must_use]
    pub fn rendering(msg: impl Into<String>) -> Self {
        Self::Rendering(msg.into())
    }

    /// Whether the error was caused by the caller's input rather than
    /// by storage or rendering
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidColor(_)
                | Self::OutOfBounds { .. }
                | Self::DuplicateName(_)
                | Self::NotFound(_)
                | Self::NoHistory(_)
                | Self::EmptyHistory(_)
                | Self::InvalidDimensions(_)
                | Self::InvalidName(_)
        )
    }

    /// Get error code for API responses
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidColor(_) => "invalid_color",
            Self::OutOfBounds { .. } => "out_of_bounds",
            Self::DuplicateName(_) => "duplicate_name",
            Self::NotFound(_) => "not_found",
            Self::NoHistory(_) => "no_history",
            Self::EmptyHistory(_) => "empty_history",
            Self::InvalidDimensions(_) => "invalid_dimensions",
            Self::InvalidName(_) => "invalid_name",
            Self::Database(_) => "database_error",
            Self::Serialization(_) => "serialization_error",
            Self::Rendering(_) => "rendering_error",
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Self::Rendering(err.to_string())
    }
}

/// Result type alias for canvas operations
pub type Result<T> = std::result::Result<T, Error>;
