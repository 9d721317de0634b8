//! End-to-end correlation of one dataset: pairwise records, scaling, binning, normalization

use crate::correlation::aggregation::{BinAccumulator, CorrelationCurve, normalize};
use crate::correlation::binning::{DistanceBins, assign_bins, max_distance, scale_distances};
use crate::correlation::pairwise::{PairwiseRecords, compute_pairwise};
use crate::io::configuration::{CorrelationConfig, Strategy};
use crate::io::error::Result;
use ndarray::ArrayView2;

/// Compute the normalized distance-decay curve for one dataset
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the inputs are empty or
/// misshapen, or normalization against bin 0 is impossible
pub fn correlate<'a>(
    positions: ArrayView2<'a, f64>,
    displacements: ArrayView2<'a, f64>,
    config: &CorrelationConfig,
) -> Result<CorrelationCurve> {
    config.validate()?;

    let (bins, accumulator) = match config.strategy {
        Strategy::Materialized => materialized(positions, displacements, config)?,
        Strategy::Streaming => streaming(positions, displacements, config)?,
    };

    normalize(&accumulator, &bins)
}

fn materialized<'a>(
    positions: ArrayView2<'a, f64>,
    displacements: ArrayView2<'a, f64>,
    config: &CorrelationConfig,
) -> Result<(DistanceBins, BinAccumulator)> {
    let metrics = compute_pairwise(positions, displacements)?;
    let scaled = scale_distances(&metrics.distances, config.pixel_to_unit);
    let bins = DistanceBins::new(max_distance(scaled.iter().copied()), config.bin_count)?;
    let assignment = assign_bins(&scaled, &bins);

    let mut accumulator = BinAccumulator::new(config.bin_count);
    for ((index, raw_dot), squared_dot) in assignment
        .indices
        .iter()
        .zip(&metrics.raw_dots)
        .zip(&metrics.squared_dots)
    {
        accumulator.push(*index, *raw_dot, *squared_dot);
    }

    Ok((bins, accumulator))
}

// Two passes over the lazy producer: the first fixes the bin edges, the second fills them
fn streaming<'a>(
    positions: ArrayView2<'a, f64>,
    displacements: ArrayView2<'a, f64>,
    config: &CorrelationConfig,
) -> Result<(DistanceBins, BinAccumulator)> {
    let records = PairwiseRecords::new(positions, displacements)?;
    let scale = config.pixel_to_unit;

    let max = max_distance(records.clone().map(|r| r.distance * scale));
    let bins = DistanceBins::new(max, config.bin_count)?;

    let mut accumulator = BinAccumulator::new(config.bin_count);
    for record in records {
        let index = bins.index_of(record.distance * scale);
        accumulator.push(index, record.raw_dot, record.squared_dot);
    }

    Ok((bins, accumulator))
}
