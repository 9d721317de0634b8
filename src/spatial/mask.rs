//! Removal of table rows lying on masked pixels

use crate::io::configuration::{MASK_VALUE, POSITION_COLUMNS};
use crate::io::error::Result;
use crate::io::table::Table;
use image::GrayImage;

/// Row filter driven by a binary mask image
///
/// A row is masked when its integer-rounded `(X, Y)` lies inside the image on a pixel
/// equal to [`MASK_VALUE`]. Rows outside the image are never masked.
#[derive(Debug, Clone)]
pub struct MaskFilter {
    mask: GrayImage,
}

impl MaskFilter {
    /// Wrap a grayscale mask
    pub const fn new(mask: GrayImage) -> Self {
        Self { mask }
    }

    /// Mask dimensions as (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        self.mask.dimensions()
    }

    /// Whether the point rounds onto a masked pixel
    pub fn is_masked(&self, x: f64, y: f64) -> bool {
        let (col, row) = (x.round(), y.round());
        if !(col >= 0.0 && row >= 0.0) {
            return false;
        }

        self.mask
            .get_pixel_checked(col as u32, row as u32)
            .is_some_and(|pixel| pixel.0 == [MASK_VALUE])
    }

    /// Number of masked pixels
    pub fn masked_pixel_count(&self) -> usize {
        self.mask.pixels().filter(|p| p.0 == [MASK_VALUE]).count()
    }

    /// Drop masked rows from `table`, keeping every column, and return how many were removed
    ///
    /// # Errors
    ///
    /// Returns an error if the X or Y column is missing or holds a non-numeric cell
    pub fn apply(&self, table: &mut Table) -> Result<usize> {
        let [x_column, y_column] = POSITION_COLUMNS;
        let xs = table.numeric_column(x_column)?;
        let ys = table.numeric_column(y_column)?;

        let mut keep = xs
            .into_iter()
            .zip(ys)
            .map(|(x, y)| !self.is_masked(x, y));
        Ok(table.retain(|_| keep.next().unwrap_or(true)))
    }
}
