//! CSV point tables and curve tables

use crate::correlation::{CorrelationCurve, CurvePoint};
use crate::io::configuration::{
    BIN_CENTER_COLUMN, CORRELATION_COLUMN, DISPLACEMENT_COLUMNS, ORIENTATION_COLUMN,
    POSITION_COLUMNS,
};
use crate::io::error::{AnalysisError, Result, file_system, invalid_parameter, table_error};
use csv::StringRecord;
use ndarray::Array2;
use std::path::{Path, PathBuf};

/// Headered CSV table kept as raw text so unknown columns survive a rewrite
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    path: PathBuf,
    headers: StringRecord,
    rows: Vec<StringRecord>,
}

impl Table {
    /// Build a table in memory, attributing later errors to `path`
    pub fn new(path: impl Into<PathBuf>, headers: StringRecord, rows: Vec<StringRecord>) -> Self {
        Self {
            path: path.into(),
            headers,
            rows,
        }
    }

    /// Read a headered CSV file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or is not valid CSV
    pub fn read(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| table_error(path, e))?;

        let headers = reader.headers().map_err(|e| table_error(path, e))?.clone();
        let rows = reader
            .records()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| table_error(path, e))?;

        Ok(Self::new(path, headers, rows))
    }

    /// Write the table as CSV, creating parent directories as needed
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be created or written
    pub fn write(&self, path: &Path) -> Result<()> {
        create_parent(path)?;

        let mut writer = csv::Writer::from_path(path).map_err(|e| table_error(path, e))?;
        writer
            .write_record(&self.headers)
            .map_err(|e| table_error(path, e))?;
        for row in &self.rows {
            writer.write_record(row).map_err(|e| table_error(path, e))?;
        }
        writer.flush().map_err(|e| file_system(path, "flush table", e))?;

        Ok(())
    }

    /// Source path of the table
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Column names
    pub const fn headers(&self) -> &StringRecord {
        &self.headers
    }

    /// Data rows
    pub fn rows(&self) -> &[StringRecord] {
        &self.rows
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether a column with this name exists
    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }

    /// Position of a named column
    ///
    /// # Errors
    ///
    /// Returns `MissingColumn` if no header matches
    pub fn column_index(&self, column: &'static str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| AnalysisError::MissingColumn {
                path: self.path.clone(),
                column,
            })
    }

    /// Parse a named column as floating point values
    ///
    /// # Errors
    ///
    /// Returns an error if the column is missing or a cell is not a number
    pub fn numeric_column(&self, column: &'static str) -> Result<Vec<f64>> {
        let index = self.column_index(column)?;
        self.rows
            .iter()
            .enumerate()
            .map(|(row, record)| parse_cell(record, index, row, column))
            .collect()
    }

    /// Keep only the rows for which `keep` returns true, returning the number removed
    pub fn retain(&mut self, mut keep: impl FnMut(&StringRecord) -> bool) -> usize {
        let before = self.rows.len();
        self.rows.retain(|row| keep(row));
        before - self.rows.len()
    }
}

/// Index-aligned positions and displacements read from one table
#[derive(Debug, Clone, PartialEq)]
pub struct PointTable {
    /// `n x 2` positions in pixels
    pub positions: Array2<f64>,
    /// `n x 2` displacement components
    pub displacements: Array2<f64>,
}

impl PointTable {
    /// Extract the X, Y, DX, DY columns
    ///
    /// Both arrays are filled row by row from the same records, so index `i` of one
    /// always belongs to index `i` of the other.
    ///
    /// # Errors
    ///
    /// Returns an error if a column is missing or a cell is not a number
    pub fn from_table(table: &Table) -> Result<Self> {
        let [x, y] = POSITION_COLUMNS.map(|c| table.numeric_column(c));
        let [dx, dy] = DISPLACEMENT_COLUMNS.map(|c| table.numeric_column(c));

        Ok(Self {
            positions: stack_columns(x?, y?),
            displacements: stack_columns(dx?, dy?),
        })
    }

    /// Read a point table from CSV
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or lacks the required columns
    pub fn read(path: &Path) -> Result<Self> {
        Self::from_table(&Table::read(path)?)
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.positions.nrows()
    }

    /// Whether the table holds no points
    pub fn is_empty(&self) -> bool {
        self.positions.nrows() == 0
    }
}

/// Position and orientation angle (degrees) of one vector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedPoint {
    /// Column coordinate in pixels
    pub x: f64,
    /// Row coordinate in pixels
    pub y: f64,
    /// Orientation in degrees, counter-clockwise from the x axis
    pub orientation: f64,
}

/// Extract X, Y, and Orientation columns
///
/// # Errors
///
/// Returns an error if a column is missing or a cell is not a number
pub fn oriented_points(table: &Table) -> Result<Vec<OrientedPoint>> {
    let [x, y] = POSITION_COLUMNS.map(|c| table.numeric_column(c));
    let orientation = table.numeric_column(ORIENTATION_COLUMN)?;

    Ok(x?
        .into_iter()
        .zip(y?)
        .zip(orientation)
        .map(|((x, y), orientation)| OrientedPoint { x, y, orientation })
        .collect())
}

/// Write a curve as a two-column CSV
///
/// # Errors
///
/// Returns an error if the file cannot be created or written
pub fn write_curve(path: &Path, curve: &CorrelationCurve) -> Result<()> {
    let rows = curve
        .points()
        .iter()
        .map(|p| StringRecord::from(vec![p.bin_center.to_string(), p.value.to_string()]))
        .collect();

    Table::new(
        path,
        StringRecord::from(vec![BIN_CENTER_COLUMN, CORRELATION_COLUMN]),
        rows,
    )
    .write(path)
}

/// Read a curve written by [`write_curve`]
///
/// # Errors
///
/// Returns an error if the file cannot be read or lacks the curve columns
pub fn read_curve(path: &Path) -> Result<CorrelationCurve> {
    let table = Table::read(path)?;
    let centers = table.numeric_column(BIN_CENTER_COLUMN)?;
    let values = table.numeric_column(CORRELATION_COLUMN)?;

    Ok(CorrelationCurve::from_points(
        centers
            .into_iter()
            .zip(values)
            .map(|(bin_center, value)| CurvePoint { bin_center, value })
            .collect(),
    ))
}

/// Create the parent directory of `path` if it has one
///
/// # Errors
///
/// Returns `FileSystem` if the directory cannot be created
pub fn create_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)
            .map_err(|e| file_system(parent, "create directory", e)),
        _ => Ok(()),
    }
}

fn parse_cell(record: &StringRecord, index: usize, row: usize, column: &'static str) -> Result<f64> {
    let cell = record.get(index).unwrap_or_default();
    cell.parse::<f64>().map_err(|e| {
        invalid_parameter(column, &cell, &format!("row {} is not a number: {e}", row + 1))
    })
}

fn stack_columns(first: Vec<f64>, second: Vec<f64>) -> Array2<f64> {
    let mut stacked = Array2::zeros((first.len(), 2));
    for (mut row, (a, b)) in stacked.rows_mut().into_iter().zip(first.into_iter().zip(second)) {
        if let Some(cell) = row.get_mut(0) {
            *cell = a;
        }
        if let Some(cell) = row.get_mut(1) {
            *cell = b;
        }
    }
    stacked
}
