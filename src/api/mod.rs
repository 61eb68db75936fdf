//! Web API module for Pixboard
//!
//! Provides HTTP endpoints for:
//! - Canvas listing and inspection
//! - Pixel writes behind human verification
//! - Stylesheet, image and history rendering
//! - Health checks

pub mod canvas;
pub mod error;
pub mod health;


use axum::Router;
use serde::Serialize;

pub use canvas::{canvas_routes, CanvasState};
pub use error::ApiError;
pub use health::health_routes;

/// Standard JSON envelope for API responses
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// Create the API router with all endpoints
pub fn api_router(state: CanvasState) -> Router {
    Router::new()
        .merge(canvas_routes(state))
        .merge(health_routes())
}
