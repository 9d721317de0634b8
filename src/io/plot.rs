//! Raster line charts of correlation curves

use crate::correlation::CorrelationCurve;
use crate::io::configuration::{
    CHART_DASH_PERIOD, CHART_GRID_DIVISIONS, CHART_HEIGHT, CHART_MARGIN, CHART_WIDTH,
    SERIES_PALETTE,
};
use crate::io::error::{Result, invalid_parameter};
use crate::io::image::{draw_segment, save_rgb, solid};
use image::{Rgb, RgbImage};
use std::path::Path;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const FRAME: Rgb<u8> = Rgb([0, 0, 0]);
const GRID: Rgb<u8> = Rgb([200, 200, 200]);

/// Parse `#rrggbb` or a basic color name
///
/// # Errors
///
/// Returns `InvalidParameter` for unrecognized colors
pub fn parse_color(color: &str) -> Result<Rgb<u8>> {
    let named = match color.to_ascii_lowercase().as_str() {
        "black" => Some([0, 0, 0]),
        "blue" => Some([0, 0, 255]),
        "green" => Some([0, 128, 0]),
        "red" => Some([255, 0, 0]),
        "orange" => Some([255, 165, 0]),
        "purple" => Some([128, 0, 128]),
        "yellow" => Some([255, 255, 0]),
        "gray" | "grey" => Some([128, 128, 128]),
        _ => None,
    };
    if let Some(rgb) = named {
        return Ok(Rgb(rgb));
    }

    let invalid = || invalid_parameter("color", &color, &"expected #rrggbb or a basic color name");
    let hex = color.strip_prefix('#').ok_or_else(invalid)?;
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(invalid());
    }
    let channel = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|h| u8::from_str_radix(h, 16).ok())
            .ok_or_else(invalid)
    };
    Ok(Rgb([channel(0..2)?, channel(2..4)?, channel(4..6)?]))
}

/// Color for the `index`-th series when none was configured
pub fn palette_color(index: usize) -> Rgb<u8> {
    let hex = SERIES_PALETTE
        .get(index % SERIES_PALETTE.len())
        .copied()
        .unwrap_or("#000000");
    parse_color(hex).unwrap_or(FRAME)
}

/// Closed interval shown along one axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    /// Lower bound
    pub min: f64,
    /// Upper bound
    pub max: f64,
}

impl AxisRange {
    /// Create a range, widening an empty span so it can still be drawn
    pub fn new(min: f64, max: f64) -> Self {
        if max > min {
            Self { min, max }
        } else {
            let pad = if min.abs() > 0.0 { min.abs() * 0.05 } else { 1.0 };
            Self {
                min: min - pad,
                max: min + pad,
            }
        }
    }

    fn fraction(&self, value: f64) -> f64 {
        (value - self.min) / (self.max - self.min)
    }
}

/// One curve drawn on a chart
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// (x, y) samples in drawing order
    pub points: Vec<(f64, f64)>,
    /// Line color
    pub color: Rgb<u8>,
}

impl Series {
    /// Series from a correlation curve
    pub fn from_curve(curve: &CorrelationCurve, color: Rgb<u8>) -> Self {
        Self {
            points: curve
                .points()
                .iter()
                .map(|p| (p.bin_center, p.value))
                .collect(),
            color,
        }
    }
}

/// Line chart with fixed axis ranges
#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    /// Horizontal range
    pub x_range: AxisRange,
    /// Vertical range
    pub y_range: AxisRange,
    /// Curves in drawing order
    pub series: Vec<Series>,
}

impl LineChart {
    /// Chart whose ranges cover every sample of `series`
    pub fn fitted(series: Vec<Series>) -> Self {
        let bounds = series.iter().flat_map(|s| s.points.iter()).fold(
            (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
            |(x0, x1, y0, y1), &(x, y)| (x0.min(x), x1.max(x), y0.min(y), y1.max(y)),
        );
        let (x_min, x_max, y_min, y_max) = if bounds.0.is_finite() {
            bounds
        } else {
            (0.0, 1.0, 0.0, 1.0)
        };

        Self {
            x_range: AxisRange::new(x_min.min(0.0), x_max),
            y_range: AxisRange::new(y_min, y_max),
            series,
        }
    }

    /// Pixel position of a data point inside a `width x height` canvas
    pub fn to_pixel(&self, (x, y): (f64, f64), width: u32, height: u32) -> (f64, f64) {
        let (left, top, right, bottom) = plot_area(width, height);
        let px = self.x_range.fraction(x).mul_add(right - left, left);
        let py = self.y_range.fraction(y).mul_add(top - bottom, bottom);
        (px, py)
    }

    /// Rasterize the chart
    pub fn render(&self, width: u32, height: u32) -> RgbImage {
        let mut img = RgbImage::from_pixel(width, height, BACKGROUND);
        let (left, top, right, bottom) = plot_area(width, height);

        let dashed = |step: u32| step % CHART_DASH_PERIOD < CHART_DASH_PERIOD / 2;
        for division in 1..CHART_GRID_DIVISIONS {
            let t = f64::from(division) / f64::from(CHART_GRID_DIVISIONS);
            let gx = t.mul_add(right - left, left);
            let gy = t.mul_add(top - bottom, bottom);
            draw_segment(&mut img, (gx, top), (gx, bottom), GRID, dashed);
            draw_segment(&mut img, (left, gy), (right, gy), GRID, dashed);
        }

        for series in &self.series {
            for pair in series.points.windows(2) {
                if let [a, b] = pair {
                    if let Some((start, end)) = self.clip(*a, *b) {
                        let start = self.to_pixel(start, width, height);
                        let end = self.to_pixel(end, width, height);
                        draw_segment(&mut img, start, end, series.color, solid);
                    }
                }
            }
        }

        draw_segment(&mut img, (left, top), (right, top), FRAME, solid);
        draw_segment(&mut img, (left, bottom), (right, bottom), FRAME, solid);
        draw_segment(&mut img, (left, top), (left, bottom), FRAME, solid);
        draw_segment(&mut img, (right, top), (right, bottom), FRAME, solid);

        img
    }

    /// Render at the default size and save
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be written
    pub fn save(&self, path: &Path) -> Result<()> {
        save_rgb(&self.render(CHART_WIDTH, CHART_HEIGHT), path)
    }

    // Liang-Barsky clipping against the axis ranges
    fn clip(&self, a: (f64, f64), b: (f64, f64)) -> Option<((f64, f64), (f64, f64))> {
        let (dx, dy) = (b.0 - a.0, b.1 - a.1);
        let mut t0: f64 = 0.0;
        let mut t1: f64 = 1.0;

        for (p, q) in [
            (-dx, a.0 - self.x_range.min),
            (dx, self.x_range.max - a.0),
            (-dy, a.1 - self.y_range.min),
            (dy, self.y_range.max - a.1),
        ] {
            if !q.is_finite() {
                return None;
            }
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
        }

        (t0 <= t1).then(|| {
            (
                (dx.mul_add(t0, a.0), dy.mul_add(t0, a.1)),
                (dx.mul_add(t1, a.0), dy.mul_add(t1, a.1)),
            )
        })
    }
}

fn plot_area(width: u32, height: u32) -> (f64, f64, f64, f64) {
    let margin = f64::from(CHART_MARGIN);
    let right = (f64::from(width) - margin - 1.0).max(margin);
    let bottom = (f64::from(height) - margin - 1.0).max(margin);
    (margin, margin, right, bottom)
}
