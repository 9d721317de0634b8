//! Distance-binned orientation correlation for microscopy vector fields
//!
//! Pairwise similarity of displacement vectors is aggregated into distance bins and
//! normalized by the nearest bin, giving a distance-decay correlation curve per dataset.
//! Supporting tools filter point tables by image masks, overlay orientation vectors on
//! micrographs, and chart stored curves.

#![forbid(unsafe_code)]

/// Pairwise metrics, binning, and normalization
pub mod correlation;
/// Input/output operations and error handling
pub mod io;
/// Pixel-space filtering of point tables
pub mod spatial;

pub use io::error::{AnalysisError, Result};
