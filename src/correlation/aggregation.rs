//! Per-bin aggregation and normalization against the reference bin

use crate::correlation::binning::DistanceBins;
use crate::io::configuration::NORMALIZATION_EPSILON;
use crate::io::error::{AnalysisError, Result};

/// Running sums for one distance bin
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BinSums {
    /// Records added
    pub count: usize,
    /// Sum of raw dot products
    pub raw_dot: f64,
    /// Sum of squared dot products
    pub squared_dot: f64,
}

impl BinSums {
    /// Mean raw dot product, `None` for an empty bin
    pub fn mean_raw_dot(&self) -> Option<f64> {
        (self.count > 0).then(|| self.raw_dot / self.count as f64)
    }

    /// Mean squared dot product, `None` for an empty bin
    pub fn mean_squared_dot(&self) -> Option<f64> {
        (self.count > 0).then(|| self.squared_dot / self.count as f64)
    }

    /// `mean(squared) - mean(raw)^2`, the spread of raw dot products in the bin
    pub fn spread(&self) -> Option<f64> {
        let mean_raw = self.mean_raw_dot()?;
        let mean_squared = self.mean_squared_dot()?;
        Some(mean_raw.mul_add(-mean_raw, mean_squared))
    }
}

/// Per-bin sums accumulated in record order
///
/// Both pipeline strategies push records in the same order, so their sums match bit for bit.
#[derive(Debug, Clone, PartialEq)]
pub struct BinAccumulator {
    bins: Vec<BinSums>,
    discarded: usize,
}

impl BinAccumulator {
    /// Create an accumulator with `bin_count` empty bins
    pub fn new(bin_count: usize) -> Self {
        Self {
            bins: vec![BinSums::default(); bin_count],
            discarded: 0,
        }
    }

    /// Add a record to bin `index`; `None` or an out-of-range index counts as discarded
    pub fn push(&mut self, index: Option<usize>, raw_dot: f64, squared_dot: f64) {
        match index.and_then(|b| self.bins.get_mut(b)) {
            Some(sums) => {
                sums.count += 1;
                sums.raw_dot += raw_dot;
                sums.squared_dot += squared_dot;
            }
            None => self.discarded += 1,
        }
    }

    /// Sums of bin `index`
    pub fn bin(&self, index: usize) -> Option<&BinSums> {
        self.bins.get(index)
    }

    /// Records that landed in no bin
    pub const fn discarded(&self) -> usize {
        self.discarded
    }

    /// All records pushed so far
    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum::<usize>() + self.discarded
    }
}

/// One point of the normalized distance-decay curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    /// Bin midpoint in physical units
    pub bin_center: f64,
    /// Bin spread relative to the reference bin
    pub value: f64,
}

/// Normalized correlation curve, ascending in bin center
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorrelationCurve {
    points: Vec<CurvePoint>,
}

impl CorrelationCurve {
    /// Wrap points already sorted by bin center
    pub const fn from_points(points: Vec<CurvePoint>) -> Self {
        Self { points }
    }

    /// Curve points
    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    /// Number of non-empty bins
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the curve holds no points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Smallest and largest value, `None` for an empty curve
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let first = self.points.first()?.value;
        Some(self.points.iter().fold((first, first), |(lo, hi), p| {
            (lo.min(p.value), hi.max(p.value))
        }))
    }

    /// Largest bin center, `None` for an empty curve
    pub fn max_bin_center(&self) -> Option<f64> {
        self.points.last().map(|p| p.bin_center)
    }
}

/// Normalize every non-empty bin by the reference bin 0
///
/// # Errors
///
/// Returns `EmptyReferenceBin` if bin 0 received no records, and
/// `DegenerateNormalization` if the reference spread is too small to divide by
/// while other bins still need it
pub fn normalize(accumulator: &BinAccumulator, bins: &DistanceBins) -> Result<CorrelationCurve> {
    let reference = accumulator
        .bin(0)
        .and_then(BinSums::spread)
        .ok_or(AnalysisError::EmptyReferenceBin {
            discarded: accumulator.discarded(),
        })?;

    let reference_squared = accumulator
        .bin(0)
        .and_then(BinSums::mean_squared_dot)
        .unwrap_or(1.0);
    let degenerate = !reference.is_finite()
        || reference.abs() <= NORMALIZATION_EPSILON * reference_squared.abs().max(1.0);

    let occupied: Vec<(usize, &BinSums)> = accumulator
        .bins
        .iter()
        .enumerate()
        .filter(|(_, sums)| sums.count > 0)
        .collect();

    if degenerate {
        // The reference bin alone is 1 by definition and needs no division
        return match occupied.as_slice() {
            [(0, _)] => Ok(CorrelationCurve::from_points(vec![CurvePoint {
                bin_center: bins.center(0).unwrap_or(0.0),
                value: 1.0,
            }])),
            _ => Err(AnalysisError::DegenerateNormalization {
                denominator: reference,
            }),
        };
    }

    let points = occupied
        .into_iter()
        .filter_map(|(index, sums)| {
            Some(CurvePoint {
                bin_center: bins.center(index)?,
                value: sums.spread()? / reference,
            })
        })
        .collect();

    Ok(CorrelationCurve::from_points(points))
}
