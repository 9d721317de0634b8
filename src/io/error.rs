//! Error types and dataset context for correlation analysis operations

use std::fmt;
use std::path::PathBuf;

/// Main error type for all analysis operations
#[derive(Debug)]
pub enum AnalysisError {
    /// Positions and displacements disagree in length, or are not sequences of 2-vectors
    ShapeMismatch {
        /// Shape of the position array (rows, cols)
        positions: (usize, usize),
        /// Shape of the displacement array (rows, cols)
        displacements: (usize, usize),
    },

    /// Dataset contains no points
    EmptyInput,

    /// No pairwise record fell into the reference bin
    ///
    /// Without bin 0 there is nothing to normalize against, so the dataset is skipped.
    EmptyReferenceBin {
        /// Number of records discarded during digitization
        discarded: usize,
    },

    /// Reference bin variance is zero, near zero, or not finite
    DegenerateNormalization {
        /// Computed reference denominator
        denominator: f64,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Required column is absent from a table header
    MissingColumn {
        /// Table the column was looked up in
        path: PathBuf,
        /// Name of the missing column
        column: &'static str,
    },

    /// Failed to load an image from the filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to save a rendered image
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Malformed CSV content
    Table {
        /// Table being read or written
        path: PathBuf,
        /// Underlying CSV error
        source: csv::Error,
    },

    /// Malformed TOML manifest
    Manifest {
        /// Manifest file
        path: PathBuf,
        /// Underlying parse error
        source: toml::de::Error,
    },

    /// Error raised while processing a named dataset
    Dataset {
        /// Label identifying the dataset within its batch
        label: String,
        /// Error that aborted the dataset
        source: Box<AnalysisError>,
    },
}

impl AnalysisError {
    /// Innermost error with any dataset wrapping removed
    pub fn root(&self) -> &Self {
        match self {
            Self::Dataset { source, .. } => source.root(),
            other => other,
        }
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShapeMismatch {
                positions,
                displacements,
            } => {
                write!(
                    f,
                    "Shape mismatch: positions are {}x{}, displacements are {}x{} (expected matching n x 2)",
                    positions.0, positions.1, displacements.0, displacements.1
                )
            }
            Self::EmptyInput => write!(f, "Input contains no points"),
            Self::EmptyReferenceBin { discarded } => {
                write!(
                    f,
                    "Reference bin 0 is empty ({discarded} records discarded during binning)"
                )
            }
            Self::DegenerateNormalization { denominator } => {
                write!(
                    f,
                    "Degenerate normalization: reference bin denominator is {denominator:e}"
                )
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::MissingColumn { path, column } => {
                write!(f, "Column '{column}' not found in '{}'", path.display())
            }
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::Table { path, source } => {
                write!(f, "Malformed table '{}': {source}", path.display())
            }
            Self::Manifest { path, source } => {
                write!(f, "Malformed manifest '{}': {source}", path.display())
            }
            Self::Dataset { label, source } => write!(f, "Dataset '{label}': {source}"),
        }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            Self::Table { source, .. } => Some(source),
            Self::Manifest { source, .. } => Some(source),
            Self::Dataset { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Convenience type alias for analysis results
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Attaches the dataset label to errors crossing the dataset boundary
pub trait WithDataset<T> {
    /// Wrap the error in [`AnalysisError::Dataset`]
    ///
    /// # Errors
    ///
    /// Propagates the original error wrapped with the dataset label
    fn for_dataset(self, label: &str) -> Result<T>;
}

impl<T, E> WithDataset<T> for std::result::Result<T, E>
where
    E: Into<AnalysisError>,
{
    fn for_dataset(self, label: &str) -> Result<T> {
        self.map_err(|e| match e.into() {
            // Keep the innermost label
            wrapped @ AnalysisError::Dataset { .. } => wrapped,
            error => AnalysisError::Dataset {
                label: label.to_string(),
                source: Box::new(error),
            },
        })
    }
}

impl From<std::io::Error> for AnalysisError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> AnalysisError {
    AnalysisError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a file system error for `path`
pub fn file_system(
    path: impl Into<PathBuf>,
    operation: &'static str,
    source: std::io::Error,
) -> AnalysisError {
    AnalysisError::FileSystem {
        path: path.into(),
        operation,
        source,
    }
}

/// Create a table error for `path`
pub fn table_error(path: impl Into<PathBuf>, source: csv::Error) -> AnalysisError {
    AnalysisError::Table {
        path: path.into(),
        source,
    }
}
