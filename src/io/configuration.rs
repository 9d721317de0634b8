//! Analysis constants, runtime defaults, and batch manifests

use crate::io::error::{AnalysisError, Result, file_system};
use serde::Deserialize;
use std::path::{Path, PathBuf};

// Correlation defaults
/// Number of equal-width distance bins
pub const DEFAULT_BIN_COUNT: usize = 100;

// Relative to the reference bin's mean squared dot product
/// Threshold under which the reference denominator counts as zero
pub const NORMALIZATION_EPSILON: f64 = 1e-12;

// Table schema
/// Position column names
pub const POSITION_COLUMNS: [&str; 2] = ["X", "Y"];
/// Displacement column names
pub const DISPLACEMENT_COLUMNS: [&str; 2] = ["DX", "DY"];
/// Orientation column name (degrees)
pub const ORIENTATION_COLUMN: &str = "Orientation";
/// Bin center column written to curve tables
pub const BIN_CENTER_COLUMN: &str = "Bin Center (µm)";
/// Normalized value column written to curve tables
pub const CORRELATION_COLUMN: &str = "Average Dot Product";

// Output settings
/// Default directory for curve tables
pub const DEFAULT_OUTPUT_DIR: &str = "average_data";
/// Suffix added to curve table filenames
pub const CURVE_SUFFIX: &str = "_renormalised";
/// Suffix added to overlay image filenames
pub const OVERLAY_SUFFIX: &str = "_overlay";
/// Extension of mask and background images
pub const IMAGE_EXTENSION: &str = "tif";

// Mask and overlay
/// Pixel value marking a masked location
pub const MASK_VALUE: u8 = 255;
/// Length of overlay vectors in pixels
pub const VECTOR_LENGTH_PX: f64 = 20.0;
/// Overlay vector color
pub const VECTOR_COLOR: [u8; 3] = [255, 255, 0];

// Chart rendering
/// Chart width in pixels
pub const CHART_WIDTH: u32 = 800;
/// Chart height in pixels
pub const CHART_HEIGHT: u32 = 600;
/// Blank border around the plot area
pub const CHART_MARGIN: u32 = 40;
/// Grid lines per axis
pub const CHART_GRID_DIVISIONS: u32 = 10;
/// Dash period of grid lines in pixels
pub const CHART_DASH_PERIOD: u32 = 6;
/// Fallback colors cycled through when a series has none
pub const SERIES_PALETTE: [&str; 6] = [
    "#1f77b4", "#d62728", "#2ca02c", "#ff7f0e", "#9467bd", "#8c564b",
];

// Progress bar display settings
/// Width of the batch progress bar in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;

/// Pipeline strategy for producing pairwise records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Materialize all n² records before binning
    #[default]
    Materialized,
    /// Generate records twice on demand, keeping only per-bin sums
    Streaming,
}

/// Parameters of a single correlation run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrelationConfig {
    /// Number of distance bins
    pub bin_count: usize,
    /// Physical units per pixel
    pub pixel_to_unit: f64,
    /// How pairwise records are produced
    pub strategy: Strategy,
}

impl CorrelationConfig {
    /// Create a configuration with the default bin count and strategy
    pub const fn new(pixel_to_unit: f64) -> Self {
        Self {
            bin_count: DEFAULT_BIN_COUNT,
            pixel_to_unit,
            strategy: Strategy::Materialized,
        }
    }

    /// Check parameter ranges
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the bin count is zero or the scale factor
    /// is not a finite positive number
    pub fn validate(&self) -> Result<()> {
        if self.bin_count == 0 {
            return Err(crate::io::error::invalid_parameter(
                "bin_count",
                &self.bin_count,
                &"at least one bin is required",
            ));
        }
        if !self.pixel_to_unit.is_finite() || self.pixel_to_unit <= 0.0 {
            return Err(crate::io::error::invalid_parameter(
                "pixel_to_unit",
                &self.pixel_to_unit,
                &"scale factor must be finite and positive",
            ));
        }
        Ok(())
    }
}

/// One dataset entry of a correlation manifest
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DatasetEntry {
    /// Point table path
    pub file: PathBuf,
    /// Physical units per pixel
    pub scale: f64,
    /// Curve color in the combined chart
    #[serde(default)]
    pub color: Option<String>,
}

/// Datasets sharing a label, e.g. one experimental condition
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DatasetGroup {
    /// Condition label used in reports and output names
    pub label: String,
    /// Datasets measured under this condition
    #[serde(rename = "dataset", default)]
    pub datasets: Vec<DatasetEntry>,
}

/// Batch of correlation datasets loaded from TOML
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CorrelationManifest {
    /// Bin count override
    #[serde(default)]
    pub bin_count: Option<usize>,
    /// Curve table directory override
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Dataset groups in processing order
    #[serde(rename = "group", default)]
    pub groups: Vec<DatasetGroup>,
}

/// Set of previously written curve tables drawn on one chart
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ReplotCategory {
    /// Category name, used as the chart file stem
    pub name: String,
    /// Curve tables in legend order
    pub files: Vec<PathBuf>,
    /// Per-file colors
    #[serde(default)]
    pub colors: Vec<String>,
}

/// Replot batch loaded from TOML
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ReplotManifest {
    /// Categories, one chart each
    #[serde(rename = "category", default)]
    pub categories: Vec<ReplotCategory>,
}

/// Read and parse a TOML manifest
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not match the manifest schema
pub fn load_manifest<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        std::fs::read_to_string(path).map_err(|e| file_system(path, "read manifest", e))?;
    parse_manifest(&content, path)
}

/// Parse manifest text, attributing errors to `path`
///
/// # Errors
///
/// Returns `Manifest` if the text does not match the manifest schema
pub fn parse_manifest<T: serde::de::DeserializeOwned>(content: &str, path: &Path) -> Result<T> {
    toml::from_str(content).map_err(|source| AnalysisError::Manifest {
        path: path.to_path_buf(),
        source,
    })
}
