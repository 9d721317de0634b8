//! Distance-binned orientation correlation of displacement vector fields

/// Per-bin sums and normalization against the reference bin
pub mod aggregation;
/// Distance scaling and bin digitization
pub mod binning;
/// Pairwise distance and dot-product records
pub mod pairwise;
/// Full per-dataset correlation run
pub mod pipeline;

pub use aggregation::{CorrelationCurve, CurvePoint};
pub use pipeline::correlate;
