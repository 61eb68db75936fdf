//! Canvas API endpoints
//!
//! GET  /                 - List canvases
//! GET  /draw/:id/        - Canvas details including the grid
//! POST /draw/:id/:pos/   - Set one pixel (form: color, captcha-hash, captcha-text)
//! GET  /css/:id          - One CSS rule per pixel
//! GET  /img/:id          - Current canvas as a GIF
//! GET  /history/:id      - Animated GIF of the edit history

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Redirect},
    routing::{get, post},
    Form, Json, Router,
};
use pixboard_canvas::{
    is_valid_color, strip_marker, Canvas, CanvasRegistry, CanvasSummary, ChallengeVerifier, Error,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

use super::{ApiError, ApiResponse};

/// Shared canvas API state
#[derive(Clone)]
pub struct CanvasState {
    registry: CanvasRegistry,
    verifier: Arc<dyn ChallengeVerifier>,
}

impl CanvasState {
    /// Create a new canvas API state
    pub fn new(registry: CanvasRegistry, verifier: Arc<dyn ChallengeVerifier>) -> Self {
        Self { registry, verifier }
    }
}

/// Pixel write form
#[derive(Debug, Deserialize)]
pub struct DrawForm {
    /// Color as `#rrggbb`
    #[serde(default)]
    pub color: String,
    /// Token issued with the challenge
    #[serde(rename = "captcha-hash", default)]
    pub captcha_hash: String,
    /// The user's answer
    #[serde(rename = "captcha-text", default)]
    pub captcha_text: String,
}

/// List all canvases
async fn list_canvases(
    State(state): State<CanvasState>,
) -> Result<Json<ApiResponse<Vec<CanvasSummary>>>, ApiError> {
    let canvases = state.registry.list_canvases().await?;
    Ok(Json(ApiResponse::success(canvases)))
}

/// Get one canvas with its grid
async fn get_canvas(
    State(state): State<CanvasState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Canvas>>, ApiError> {
    let canvas = state.registry.get_canvas(id).await?;
    Ok(Json(ApiResponse::success(canvas)))
}

/// Set one pixel and redirect back to the canvas
async fn draw_pixel(
    State(state): State<CanvasState>,
    Path((id, pos)): Path<(i64, u64)>,
    Form(form): Form<DrawForm>,
) -> Result<Redirect, ApiError> {
    // unknown canvases are reported before the challenge is checked
    state.registry.canvas_summary(id).await?;

    if !state.verifier.verify(&form.captcha_text, &form.captcha_hash) {
        debug!(canvas_id = id, "Rejected pixel write: verification failed");
        return Err(ApiError::Unverified);
    }

    let color = strip_marker(&form.color);
    if !is_valid_color(color) {
        debug!(canvas_id = id, color = %form.color, "Rejected pixel write: bad color");
        return Err(Error::invalid_color(form.color.clone()).into());
    }

    state.registry.write_pixel_at(id, pos, color).await?;
    info!(canvas_id = id, pos, "Pixel placed");
    Ok(Redirect::to(&format!("/draw/{id}/")))
}

/// Stylesheet for the HTML grid
async fn get_css(
    State(state): State<CanvasState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let css = state.registry.render_stylesheet(id).await?;
    Ok(([(header::CONTENT_TYPE, "text/css")], css))
}

/// Still image of the canvas
async fn get_image(
    State(state): State<CanvasState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let gif = state.registry.render_image(id).await?;
    Ok(([(header::CONTENT_TYPE, "image/gif")], gif))
}

/// History animation
async fn get_history(
    State(state): State<CanvasState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let gif = state.registry.render_history(id).await?;
    Ok(([(header::CONTENT_TYPE, "image/gif")], gif))
}

/// Create canvas routes
pub fn canvas_routes(state: CanvasState) -> Router {
    Router::new()
        .route("/", get(list_canvases))
        .route("/draw/:id/", get(get_canvas))
        .route("/draw/:id/:pos/", post(draw_pixel))
        .route("/css/:id", get(get_css))
        .route("/img/:id", get(get_image))
        .route("/history/:id", get(get_history))
        .with_state(state)
}
