/// PNG export of rendered canvases
use anyhow::{Context, Result};
use facewire_core::Canvas;
use image::{ImageFormat, RgbImage};
use log::info;
use std::path::Path;

pub fn to_rgb_image(canvas: &Canvas) -> Result<RgbImage> {
    RgbImage::from_raw(canvas.width(), canvas.height(), canvas.pixels().to_vec())
        .context("canvas buffer does not match its dimensions")
}

/// Encode the canvas as an 8-bit RGB PNG at `path`
pub fn save_png(canvas: &Canvas, path: &Path) -> Result<()> {
    to_rgb_image(canvas)?
        .save_with_format(path, ImageFormat::Png)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(
        "wrote {}x{} image to {}",
        canvas.width(),
        canvas.height(),
        path.display()
    );
    Ok(())
}
