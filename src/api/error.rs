//! API error responses
//!
//! Maps canvas errors onto HTTP status codes with a JSON body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pixboard_canvas::Error;
use serde::Serialize;
use tracing::error;

/// JSON error body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    code: &'static str,
}

/// Errors returned by API handlers
#[derive(Debug)]
pub enum ApiError {
    /// Error from the canvas core
    Canvas(Error),
    /// Challenge answer missing or wrong
    Unverified,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unverified => StatusCode::UNAUTHORIZED,
            Self::Canvas(err) => match err {
                Error::NotFound(_) | Error::NoHistory(_) | Error::EmptyHistory(_) => {
                    StatusCode::NOT_FOUND
                }
                Error::InvalidColor(_)
                | Error::OutOfBounds { .. }
                | Error::InvalidDimensions(_)
                | Error::InvalidName(_) => StatusCode::BAD_REQUEST,
                Error::DuplicateName(_) => StatusCode::CONFLICT,
                Error::Database(_) | Error::Serialization(_) | Error::Rendering(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Unverified => "verification_failed",
            Self::Canvas(err) => err.code(),
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self::Canvas(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Unverified => "Human verification failed".to_string(),
            Self::Canvas(err) if status.is_server_error() => {
                error!("Canvas request failed: {}", err);
                "Internal server error".to_string()
            }
            Self::Canvas(err) => err.to_string(),
        };

        let body = ErrorResponse {
            success: false,
            error: message,
            code: self.code(),
        };
        (status, Json(body)).into_response()
    }
}
