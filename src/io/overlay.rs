//! Orientation vectors drawn over grayscale micrographs

use crate::io::configuration::{VECTOR_COLOR, VECTOR_LENGTH_PX};
use crate::io::image::{draw_segment, gray_to_rgb, solid};
use crate::io::table::OrientedPoint;
use image::{GrayImage, Rgb, RgbImage};

/// Headless line segment for one oriented point
///
/// Image rows grow downwards, so the vertical component is negated to keep
/// positive angles counter-clockwise on screen.
pub fn vector_segment(point: &OrientedPoint, length: f64) -> ((f64, f64), (f64, f64)) {
    let (sin, cos) = point.orientation.to_radians().sin_cos();
    let end = (cos.mul_add(length, point.x), (-sin).mul_add(length, point.y));
    ((point.x, point.y), end)
}

/// Render every finite vector onto an RGB copy of `background`
///
/// Returns the image and the number of vectors drawn.
pub fn render_overlay(background: &GrayImage, points: &[OrientedPoint]) -> (RgbImage, usize) {
    let mut canvas = gray_to_rgb(background);
    let color = Rgb(VECTOR_COLOR);

    let mut drawn = 0;
    for point in points {
        if !(point.x.is_finite() && point.y.is_finite() && point.orientation.is_finite()) {
            continue;
        }
        let (start, end) = vector_segment(point, VECTOR_LENGTH_PX);
        draw_segment(&mut canvas, start, end, color, solid);
        drawn += 1;
    }

    (canvas, drawn)
}
