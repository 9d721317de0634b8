//! Tests for bin sums and reference-bin normalization

#[cfg(test)]
mod tests {
    use vectorcorr::AnalysisError;
    use vectorcorr::correlation::aggregation::{BinAccumulator, BinSums, normalize};
    use vectorcorr::correlation::binning::DistanceBins;

    fn two_bins() -> DistanceBins {
        let Ok(bins) = DistanceBins::new(10.0, 2) else {
            unreachable!("valid range must succeed");
        };
        bins
    }

    // Tests means and spread of a populated bin
    // Verified by squaring the mean squared dot instead of the mean raw dot
    #[test]
    fn test_bin_sums_statistics() {
        let sums = BinSums {
            count: 4,
            raw_dot: 2.0,
            squared_dot: 3.0,
        };

        assert_eq!(sums.mean_raw_dot(), Some(0.5));
        assert_eq!(sums.mean_squared_dot(), Some(0.75));
        assert_eq!(sums.spread(), Some(0.5));
        assert_eq!(BinSums::default().spread(), None);
    }

    // Tests records outside the bins are counted, not aggregated
    // Verified by pushing out-of-range indices into the last bin
    #[test]
    fn test_accumulator_discards_out_of_range() {
        let mut acc = BinAccumulator::new(2);
        acc.push(Some(0), 1.0, 1.0);
        acc.push(Some(1), 0.5, 0.25);
        acc.push(None, 9.0, 81.0);
        acc.push(Some(7), 9.0, 81.0);

        assert_eq!(acc.discarded(), 2);
        assert_eq!(acc.total(), 4);
        assert_eq!(acc.bin(1).map(|b| b.count), Some(1));
        assert!(acc.bin(2).is_none());
    }

    // Tests normalization by the reference spread, with values above 1 preserved
    // Verified by dividing by the current bin's own mean raw dot
    #[test]
    fn test_normalize_against_reference() {
        let bins = two_bins();
        let mut acc = BinAccumulator::new(2);
        acc.push(Some(0), 1.0, 1.0);
        acc.push(Some(0), 0.0, 0.0);
        acc.push(Some(1), 2.0, 4.0);
        acc.push(Some(1), 0.0, 0.0);

        let Ok(curve) = normalize(&acc, &bins) else {
            unreachable!("reference bin is populated");
        };

        let points = curve.points();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].bin_center, 2.5);
        assert_eq!(points[0].value, 1.0);
        assert_eq!(points[1].bin_center, 7.5);
        assert_eq!(points[1].value, 4.0);
        assert_eq!(curve.value_range(), Some((1.0, 4.0)));
        assert_eq!(curve.max_bin_center(), Some(7.5));
    }

    // Tests empty bins produce no curve point
    // Verified by emitting zero for empty bins
    #[test]
    fn test_empty_bins_are_skipped() {
        let Ok(bins) = DistanceBins::new(10.0, 5) else {
            unreachable!("valid range must succeed");
        };
        let mut acc = BinAccumulator::new(5);
        acc.push(Some(0), 1.0, 1.0);
        acc.push(Some(0), 0.5, 0.25);
        acc.push(Some(3), 0.5, 0.25);

        let Ok(curve) = normalize(&acc, &bins) else {
            unreachable!("reference bin is populated");
        };

        let centers: Vec<f64> = curve.points().iter().map(|p| p.bin_center).collect();
        assert_eq!(centers, vec![1.0, 7.0]);
        assert_eq!(curve.points()[1].value, 0.0);
    }

    // Tests an empty reference bin aborts normalization
    // Verified by falling back to the first populated bin
    #[test]
    fn test_empty_reference_bin() {
        let bins = two_bins();
        let mut acc = BinAccumulator::new(2);
        acc.push(Some(1), 0.5, 0.25);
        acc.push(None, 0.5, 0.25);

        assert!(matches!(
            normalize(&acc, &bins),
            Err(AnalysisError::EmptyReferenceBin { discarded: 1 })
        ));
    }

    // Tests a zero reference spread is reported instead of producing infinities
    // Verified by removing the degenerate denominator check
    #[test]
    fn test_degenerate_reference() {
        let bins = two_bins();
        let mut acc = BinAccumulator::new(2);
        acc.push(Some(0), 1.0, 1.0);
        acc.push(Some(0), 1.0, 1.0);
        acc.push(Some(1), 2.0, 4.0);
        acc.push(Some(1), 0.0, 0.0);

        assert!(matches!(
            normalize(&acc, &bins),
            Err(AnalysisError::DegenerateNormalization { .. })
        ));
    }

    // Tests a lone reference bin needs no division and is exactly 1
    // Verified by dividing the zero spread by itself
    #[test]
    fn test_lone_reference_bin() {
        let bins = two_bins();
        let mut acc = BinAccumulator::new(2);
        acc.push(Some(0), 1.0, 1.0);

        let Ok(curve) = normalize(&acc, &bins) else {
            unreachable!("lone reference bin must normalize");
        };

        assert_eq!(curve.len(), 1);
        assert_eq!(curve.points()[0].value, 1.0);
        assert_eq!(curve.points()[0].bin_center, 2.5);
    }
}
