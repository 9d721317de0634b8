//! Distance scaling and equal-width bin digitization

use crate::io::error::{Result, invalid_parameter};
use ndarray::Array1;

/// Equal-width partition of `[0, max_distance]`
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceBins {
    edges: Vec<f64>,
}

impl DistanceBins {
    /// Build `bin_count + 1` edges by linear subdivision of `[0, max_distance]`
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `bin_count` is zero or `max_distance` is
    /// negative or not finite
    pub fn new(max_distance: f64, bin_count: usize) -> Result<Self> {
        if bin_count == 0 {
            return Err(invalid_parameter(
                "bin_count",
                &bin_count,
                &"at least one bin is required",
            ));
        }
        if !max_distance.is_finite() || max_distance < 0.0 {
            return Err(invalid_parameter(
                "max_distance",
                &max_distance,
                &"must be finite and non-negative",
            ));
        }

        let step = max_distance / bin_count as f64;
        let mut edges: Vec<f64> = (0..bin_count).map(|k| k as f64 * step).collect();
        // Pin the final edge so rounding in the step never drops the maximum
        edges.push(max_distance);

        Ok(Self { edges })
    }

    /// Number of bins
    pub fn bin_count(&self) -> usize {
        self.edges.len() - 1
    }

    /// Bin boundaries, `bin_count + 1` values
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Upper bound of the partitioned range
    pub fn max_distance(&self) -> f64 {
        self.edges.last().copied().unwrap_or(0.0)
    }

    /// Midpoint of bin `index`
    pub fn center(&self, index: usize) -> Option<f64> {
        let lower = self.edges.get(index)?;
        let upper = self.edges.get(index + 1)?;
        Some((lower + upper) / 2.0)
    }

    /// Bin containing `distance`, or `None` when it falls outside the partition
    ///
    /// Bins are half-open `[lower, upper)`; values at or above the last edge land in the
    /// last bin. Negative and NaN distances have no bin.
    pub fn index_of(&self, distance: f64) -> Option<usize> {
        if distance.is_nan() || distance < 0.0 {
            return None;
        }

        let last = self.bin_count() - 1;
        if self.max_distance() <= 0.0 {
            // Zero-width partition: only exact zeros are in range
            return (distance == 0.0).then_some(0);
        }

        // Count of edges at or below the distance, minus one
        let index = self.edges.partition_point(|&edge| edge <= distance);
        index.checked_sub(1).map(|bin| bin.min(last))
    }
}

/// Bin index of every record, with the count of records that fell outside
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinAssignment {
    /// Bin per record; `None` for discarded records
    pub indices: Vec<Option<usize>>,
    /// Records assigned to each bin
    pub counts: Vec<usize>,
    /// Records without a valid bin
    pub discarded: usize,
}

impl BinAssignment {
    /// Total records, binned or discarded
    pub fn total(&self) -> usize {
        self.counts.iter().sum::<usize>() + self.discarded
    }
}

/// Convert pixel distances to physical units
pub fn scale_distances(distances: &Array1<f64>, pixel_to_unit: f64) -> Array1<f64> {
    distances.mapv(|d| d * pixel_to_unit)
}

/// Largest distance, ignoring NaN; zero for an empty sequence
pub fn max_distance(distances: impl IntoIterator<Item = f64>) -> f64 {
    distances.into_iter().fold(0.0, f64::max)
}

/// Digitize every distance against `bins`
pub fn assign_bins(distances: &Array1<f64>, bins: &DistanceBins) -> BinAssignment {
    let mut counts = vec![0; bins.bin_count()];
    let mut discarded = 0;

    let indices = distances
        .iter()
        .map(|&d| {
            let index = bins.index_of(d);
            match index.and_then(|b| counts.get_mut(b)) {
                Some(count) => *count += 1,
                None => discarded += 1,
            }
            index
        })
        .collect();

    BinAssignment {
        indices,
        counts,
        discarded,
    }
}
