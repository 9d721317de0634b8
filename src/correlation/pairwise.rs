//! Pairwise distances and absolute-component dot products over all ordered point pairs

use crate::io::error::{AnalysisError, Result};
use ndarray::{Array1, ArrayView2};

/// Distance and similarity scores for one ordered pair of points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairwiseRecord {
    /// Euclidean distance between the two positions, in pixels
    pub distance: f64,
    /// Dot product of the component-wise absolute displacements
    pub raw_dot: f64,
    /// Square of `raw_dot`
    pub squared_dot: f64,
}

impl PairwiseRecord {
    // Self-pairs score 1 regardless of displacement magnitude
    const SELF_PAIR: Self = Self {
        distance: 0.0,
        raw_dot: 1.0,
        squared_dot: 1.0,
    };
}

/// All pairwise records of a dataset, row-major over `(i, j)`
#[derive(Debug, Clone, PartialEq)]
pub struct PairwiseMetrics {
    /// Pixel distances
    pub distances: Array1<f64>,
    /// Squared dot products
    pub squared_dots: Array1<f64>,
    /// Raw dot products
    pub raw_dots: Array1<f64>,
}

impl PairwiseMetrics {
    /// Number of records (n²)
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    /// Whether no records are held
    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }
}

/// Lazy producer of pairwise records, `i` outer and `j` inner
///
/// Yields exactly the records [`compute_pairwise`] stores, in the same order.
#[derive(Debug, Clone)]
pub struct PairwiseRecords<'a> {
    positions: ArrayView2<'a, f64>,
    displacements: ArrayView2<'a, f64>,
    n: usize,
    i: usize,
    j: usize,
}

impl<'a> PairwiseRecords<'a> {
    /// Validate inputs and create the producer
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch` if either array is not `n x 2` or their lengths differ,
    /// and `EmptyInput` if there are no points
    pub fn new(positions: ArrayView2<'a, f64>, displacements: ArrayView2<'a, f64>) -> Result<Self> {
        let n = validate_shapes(&positions, &displacements)?;
        Ok(Self {
            positions,
            displacements,
            n,
            i: 0,
            j: 0,
        })
    }

    /// Number of points
    pub const fn point_count(&self) -> usize {
        self.n
    }

    fn record(&self, i: usize, j: usize) -> PairwiseRecord {
        if i == j {
            return PairwiseRecord::SELF_PAIR;
        }

        let xi = self.positions.get([i, 0]).copied().unwrap_or(f64::NAN);
        let yi = self.positions.get([i, 1]).copied().unwrap_or(f64::NAN);
        let xj = self.positions.get([j, 0]).copied().unwrap_or(f64::NAN);
        let yj = self.positions.get([j, 1]).copied().unwrap_or(f64::NAN);
        let distance = (xi - xj).hypot(yi - yj);

        let dxi = self.displacements.get([i, 0]).copied().unwrap_or(f64::NAN);
        let dyi = self.displacements.get([i, 1]).copied().unwrap_or(f64::NAN);
        let dxj = self.displacements.get([j, 0]).copied().unwrap_or(f64::NAN);
        let dyj = self.displacements.get([j, 1]).copied().unwrap_or(f64::NAN);
        // Absolute value per component, before the product
        let raw_dot = dxi.abs().mul_add(dxj.abs(), dyi.abs() * dyj.abs());

        PairwiseRecord {
            distance,
            raw_dot,
            squared_dot: raw_dot * raw_dot,
        }
    }
}

impl Iterator for PairwiseRecords<'_> {
    type Item = PairwiseRecord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.i >= self.n {
            return None;
        }

        let record = self.record(self.i, self.j);
        self.j += 1;
        if self.j == self.n {
            self.j = 0;
            self.i += 1;
        }
        Some(record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.n - self.i.min(self.n)) * self.n - self.j;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PairwiseRecords<'_> {}

/// Compute every ordered pairwise record, self-pairs included
///
/// # Errors
///
/// Returns `ShapeMismatch` if either array is not `n x 2` or their lengths differ,
/// and `EmptyInput` if there are no points
pub fn compute_pairwise<'a>(
    positions: ArrayView2<'a, f64>,
    displacements: ArrayView2<'a, f64>,
) -> Result<PairwiseMetrics> {
    let records = PairwiseRecords::new(positions, displacements)?;
    let total = records.len();

    let mut distances = Vec::with_capacity(total);
    let mut squared_dots = Vec::with_capacity(total);
    let mut raw_dots = Vec::with_capacity(total);
    for record in records {
        distances.push(record.distance);
        squared_dots.push(record.squared_dot);
        raw_dots.push(record.raw_dot);
    }

    Ok(PairwiseMetrics {
        distances: Array1::from(distances),
        squared_dots: Array1::from(squared_dots),
        raw_dots: Array1::from(raw_dots),
    })
}

fn validate_shapes(
    positions: &ArrayView2<'_, f64>,
    displacements: &ArrayView2<'_, f64>,
) -> Result<usize> {
    let position_shape = positions.dim();
    let displacement_shape = displacements.dim();

    if position_shape.1 != 2 || displacement_shape.1 != 2 || position_shape.0 != displacement_shape.0
    {
        return Err(AnalysisError::ShapeMismatch {
            positions: position_shape,
            displacements: displacement_shape,
        });
    }
    if position_shape.0 == 0 {
        return Err(AnalysisError::EmptyInput);
    }

    Ok(position_shape.0)
}
