//! Raster loading, saving, and line drawing

use crate::io::error::{AnalysisError, Result};
use crate::io::table::create_parent;
use image::{GrayImage, Rgb, RgbImage};
use std::path::Path;

/// Load an image from disk as 8-bit grayscale
///
/// # Errors
///
/// Returns `ImageLoad` if the file cannot be opened or decoded
pub fn load_grayscale(path: &Path) -> Result<GrayImage> {
    let img = image::open(path).map_err(|e| AnalysisError::ImageLoad {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(img.to_luma8())
}

/// Replicate a grayscale image into three equal channels
pub fn gray_to_rgb(gray: &GrayImage) -> RgbImage {
    RgbImage::from_fn(gray.width(), gray.height(), |x, y| {
        let [v] = gray.get_pixel(x, y).0;
        Rgb([v, v, v])
    })
}

/// Save an RGB image, format chosen by extension
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or encoding fails
pub fn save_rgb(img: &RgbImage, path: &Path) -> Result<()> {
    create_parent(path)?;
    img.save(path).map_err(|e| AnalysisError::ImageExport {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Draw a one-pixel line from `start` to `end`, clipped to the image
///
/// `pattern` decides per step whether the pixel is painted, which gives dashed lines.
pub fn draw_segment(
    img: &mut RgbImage,
    start: (f64, f64),
    end: (f64, f64),
    color: Rgb<u8>,
    pattern: impl Fn(u32) -> bool,
) {
    if ![start.0, start.1, end.0, end.1].iter().all(|v| v.is_finite()) {
        return;
    }
    let (dx, dy) = (end.0 - start.0, end.1 - start.1);
    let steps = dx.abs().max(dy.abs()).ceil();
    if !steps.is_finite() {
        return;
    }
    // Degenerate segments still mark their start pixel
    let steps = steps.max(1.0) as u32;

    for step in 0..=steps {
        if !pattern(step) {
            continue;
        }
        let t = f64::from(step) / f64::from(steps);
        let x = dx.mul_add(t, start.0).round();
        let y = dy.mul_add(t, start.1).round();
        if x < 0.0 || y < 0.0 {
            continue;
        }
        if let Some(pixel) = img.get_pixel_mut_checked(x as u32, y as u32) {
            *pixel = color;
        }
    }
}

/// Line pattern painting every pixel
pub const fn solid(_step: u32) -> bool {
    true
}
