//! Pixel-space filtering of point tables

/// Mask-membership row filter
pub mod mask;

pub use mask::MaskFilter;
