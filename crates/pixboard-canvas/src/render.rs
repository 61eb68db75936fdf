//! Render Engine
//!
//! Derives the three published views of a canvas:
//! - a stylesheet with one rule per pixel
//! - a still GIF of the current grid
//! - an animated GIF replaying the edit log
//!
//! Everything here is a pure function of a canvas snapshot (and, for
//! history, its edit records); locking is the registry's job.

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, DynamicImage, Frame, ImageFormat, Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::io::Cursor;

use crate::canvas::{Canvas, Grid};
use crate::edit::EditRecord;
use crate::error::{Error, Result};

/// Options for history playback
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryOptions {
    /// Delay between animation frames in milliseconds
    #[serde(default = "default_frame_delay_ms")]
    pub frame_delay_ms: u32,

    /// Append the current grid as the final frame
    #[serde(default)]
    pub include_current: bool,
}

fn default_frame_delay_ms() -> u32 {
    500
}

impl Default for HistoryOptions {
    fn default() -> Self {
        Self {
            frame_delay_ms: default_frame_delay_ms(),
            include_current: false,
        }
    }
}

/// Render one CSS rule per pixel, row by row.
///
/// Pixel (j, i) gets the selector `#p{j + i * width}`.
#[must_use]
pub fn render_stylesheet(canvas: &Canvas) -> String {
    let width = canvas.width as usize;
    let mut css = String::with_capacity(canvas.pixel_count() as usize * 40);
    for (i, row) in canvas.grid().iter().enumerate() {
        for (j, color) in row.iter().enumerate() {
            let _ = write!(css, "#p{} {{background-color : #{}}} ", j + i * width, color);
        }
    }
    css
}

/// Rasterize a grid onto a white background
#[must_use]
pub fn render_grid(width: u32, height: u32, grid: &Grid) -> RgbImage {
    let mut frame = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
    for (y, row) in grid.iter().enumerate().take(height as usize) {
        for (x, color) in row.iter().enumerate().take(width as usize) {
            let (r, g, b) = color.rgb();
            frame.put_pixel(x as u32, y as u32, Rgb([r, g, b]));
        }
    }
    frame
}

/// Rasterize the current grid
#[must_use]
pub fn render_image(canvas: &Canvas) -> RgbImage {
    render_grid(canvas.width, canvas.height, canvas.grid())
}

/// Encode a still image as a single-frame GIF
pub fn encode_gif(image: &RgbImage) -> Result<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, ImageFormat::Gif)?;
    Ok(out.into_inner())
}

/// Reconstruct past states as frames, oldest first.
///
/// `records` must be newest first. Starting from the current image, each
/// record rolls its pixel back to the stored prior color and the result is
/// kept as a frame; the frames are then reversed. Each frame is the canvas
/// as it was just before one recorded write.
pub fn render_history<I>(
    canvas: &Canvas,
    records: I,
    options: &HistoryOptions,
) -> Result<Vec<RgbImage>>
where
    I: IntoIterator<Item = EditRecord>,
{
    if !canvas.history_enabled {
        return Err(Error::NoHistory(canvas.id));
    }

    let current = render_image(canvas);
    let mut working = current.clone();
    let mut frames = Vec::new();
    for record in records {
        if record.x >= canvas.width || record.y >= canvas.height {
            return Err(Error::Serialization(format!(
                "edit {} at ({}, {}) lies outside canvas {}",
                record.id, record.x, record.y, canvas.id
            )));
        }
        let (r, g, b) = record.color.rgb();
        working.put_pixel(record.x, record.y, Rgb([r, g, b]));
        frames.push(working.clone());
    }

    if frames.is_empty() {
        return Err(Error::EmptyHistory(canvas.id));
    }
    frames.reverse();
    if options.include_current {
        frames.push(current);
    }
    Ok(frames)
}

/// Encode frames as a looping animated GIF
pub fn encode_animation(frames: &[RgbImage], options: &HistoryOptions) -> Result<Vec<u8>> {
    if frames.is_empty() {
        return Err(Error::rendering("animation needs at least one frame"));
    }

    let delay = Delay::from_numer_denom_ms(options.frame_delay_ms, 1);
    let mut out = Vec::new();
    {
        let mut encoder = GifEncoder::new(&mut out);
        encoder.set_repeat(Repeat::Infinite)?;
        encoder.encode_frames(frames.iter().map(|frame| {
            let rgba = DynamicImage::ImageRgb8(frame.clone()).into_rgba8();
            Frame::from_parts(rgba, 0, 0, delay)
        }))?;
    }
    Ok(out)
}
