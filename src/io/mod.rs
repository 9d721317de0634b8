//! Input/output, configuration, and error handling

/// Batch drivers for every command
pub mod batch;
/// Command-line parsing and dispatch
pub mod cli;
/// Constants, run parameters, and manifests
pub mod configuration;
/// Error taxonomy
pub mod error;
/// Raster loading, saving, and line drawing
pub mod image;
/// Orientation vector overlays
pub mod overlay;
/// Line chart rendering
pub mod plot;
/// Batch progress display
pub mod progress;
/// CSV point and curve tables
pub mod table;
