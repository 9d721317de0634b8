//! Tests for mask-driven row filtering

#[cfg(test)]
mod tests {
    use csv::StringRecord;
    use image::{GrayImage, Luma};
    use vectorcorr::AnalysisError;
    use vectorcorr::io::table::Table;
    use vectorcorr::spatial::MaskFilter;

    fn mask_with_pixel(x: u32, y: u32) -> MaskFilter {
        let mut img = GrayImage::new(5, 5);
        img.put_pixel(x, y, Luma([255]));
        MaskFilter::new(img)
    }

    fn table(rows: &[[&str; 3]]) -> Table {
        Table::new(
            "points.csv",
            StringRecord::from(vec!["X", "Y", "Label"]),
            rows.iter().map(|r| StringRecord::from(r.to_vec())).collect(),
        )
    }

    // Tests coordinates are rounded before the lookup
    // Verified by truncating instead of rounding
    #[test]
    fn test_is_masked_rounds() {
        let filter = mask_with_pixel(1, 2);

        assert!(filter.is_masked(1.0, 2.0));
        assert!(filter.is_masked(1.4, 2.2));
        assert!(filter.is_masked(0.6, 1.5));
        assert!(!filter.is_masked(2.0, 2.0));
        assert!(!filter.is_masked(1.6, 2.0));
    }

    // Tests points outside the image or non-finite are kept
    // Verified by clamping coordinates to the image
    #[test]
    fn test_outside_never_masked() {
        let filter = mask_with_pixel(0, 0);

        assert!(filter.is_masked(0.0, 0.0));
        assert!(!filter.is_masked(-0.6, 0.0));
        assert!(!filter.is_masked(10.0, 10.0));
        assert!(!filter.is_masked(f64::NAN, 0.0));
        assert_eq!(filter.dimensions(), (5, 5));
        assert_eq!(filter.masked_pixel_count(), 1);
    }

    // Tests only exact white counts as masked
    // Verified by masking any non-zero pixel
    #[test]
    fn test_only_white_is_masked() {
        let mut img = GrayImage::new(3, 3);
        img.put_pixel(1, 1, Luma([254]));
        let filter = MaskFilter::new(img);

        assert!(!filter.is_masked(1.0, 1.0));
        assert_eq!(filter.masked_pixel_count(), 0);
    }

    // Tests masked rows are removed and other columns survive
    // Verified by dropping the label column
    #[test]
    fn test_apply() {
        let filter = mask_with_pixel(1, 2);
        let mut points = table(&[
            ["1", "2", "a"],
            ["2", "2", "b"],
            ["1.4", "2.2", "c"],
            ["10", "10", "d"],
        ]);

        let Ok(removed) = filter.apply(&mut points) else {
            unreachable!("columns are numeric");
        };

        assert_eq!(removed, 2);
        assert_eq!(points.len(), 2);
        let labels: Vec<_> = points.rows().iter().filter_map(|r| r.get(2)).collect();
        assert_eq!(labels, vec!["b", "d"]);
    }

    // Tests a table without positions is rejected and left untouched
    // Verified by treating missing columns as unmasked
    #[test]
    fn test_apply_missing_column() {
        let filter = mask_with_pixel(0, 0);
        let mut points = Table::new(
            "points.csv",
            StringRecord::from(vec!["X", "Label"]),
            vec![StringRecord::from(vec!["0", "a"])],
        );

        assert!(matches!(
            filter.apply(&mut points),
            Err(AnalysisError::MissingColumn { column: "Y", .. })
        ));
        assert_eq!(points.len(), 1);
    }
}
