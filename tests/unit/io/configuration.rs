//! Tests for run parameters, constants, and TOML manifests

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use vectorcorr::AnalysisError;
    use vectorcorr::io::configuration::{
        CorrelationConfig, CorrelationManifest, DEFAULT_BIN_COUNT, MASK_VALUE,
        NORMALIZATION_EPSILON, ReplotManifest, Strategy, VECTOR_LENGTH_PX, parse_manifest,
    };

    // Tests default constants
    // Verified by changing constant values
    #[test]
    fn test_defaults() {
        assert_eq!(DEFAULT_BIN_COUNT, 100);
        assert_eq!(MASK_VALUE, 255);
        assert!((VECTOR_LENGTH_PX - 20.0).abs() < f64::EPSILON);
        assert!(NORMALIZATION_EPSILON > 0.0 && NORMALIZATION_EPSILON < 1e-6);
    }

    // Tests the convenience constructor uses default bins and the eager strategy
    // Verified by defaulting to the streaming strategy
    #[test]
    fn test_config_new() {
        let config = CorrelationConfig::new(0.3236);

        assert_eq!(config.bin_count, DEFAULT_BIN_COUNT);
        assert_eq!(config.strategy, Strategy::Materialized);
        assert!(config.validate().is_ok());
    }

    // Tests validation of bin count and scale factor
    // Verified by accepting zero scale
    #[test]
    fn test_config_validation() {
        let mut config = CorrelationConfig::new(0.0);
        assert!(matches!(
            config.validate(),
            Err(AnalysisError::InvalidParameter {
                parameter: "pixel_to_unit",
                ..
            })
        ));

        config.pixel_to_unit = f64::INFINITY;
        assert!(config.validate().is_err());

        config.pixel_to_unit = 1.0;
        config.bin_count = 0;
        assert!(matches!(
            config.validate(),
            Err(AnalysisError::InvalidParameter {
                parameter: "bin_count",
                ..
            })
        ));
    }

    // Tests a correlation manifest with groups, datasets, and overrides
    // Verified by renaming the dataset table
    #[test]
    fn test_parse_correlation_manifest() {
        let text = r#"
            bin_count = 50
            output_dir = "curves"

            [[group]]
            label = "0.7% Agar (10x)"

            [[group.dataset]]
            file = "tables/10xBF_0.csv"
            scale = 0.6510001
            color = "blue"

            [[group.dataset]]
            file = "tables/10xBF_1.csv"
            scale = 0.6510001

            [[group]]
            label = "1.7% Agar (20x)"
        "#;

        let Ok(manifest) = parse_manifest::<CorrelationManifest>(text, Path::new("m.toml")) else {
            unreachable!("manifest is well formed");
        };

        assert_eq!(manifest.bin_count, Some(50));
        assert_eq!(manifest.output_dir, Some(PathBuf::from("curves")));
        assert_eq!(manifest.groups.len(), 2);
        assert_eq!(manifest.groups[0].datasets.len(), 2);
        assert_eq!(manifest.groups[0].datasets[0].color.as_deref(), Some("blue"));
        assert_eq!(manifest.groups[0].datasets[1].color, None);
        assert!(manifest.groups[1].datasets.is_empty());
    }

    // Tests unknown keys are rejected with the manifest path
    // Verified by allowing unknown fields
    #[test]
    fn test_unknown_manifest_key() {
        let text = "bins = 10\n";

        let result = parse_manifest::<CorrelationManifest>(text, Path::new("bad.toml"));
        match result {
            Err(AnalysisError::Manifest { path, .. }) => {
                assert_eq!(path, PathBuf::from("bad.toml"));
            }
            _ => unreachable!("unknown key must be rejected"),
        }
    }

    // Tests replot categories with optional colors
    // Verified by making colors required
    #[test]
    fn test_parse_replot_manifest() {
        let text = r##"
            [[category]]
            name = "0.7_early"
            files = ["a.csv", "b.csv"]
            colors = ["#1f77b4", "#4a90e2"]

            [[category]]
            name = "1.7_late"
            files = ["c.csv"]
        "##;

        let Ok(manifest) = parse_manifest::<ReplotManifest>(text, Path::new("r.toml")) else {
            unreachable!("manifest is well formed");
        };

        assert_eq!(manifest.categories.len(), 2);
        assert_eq!(manifest.categories[0].files.len(), 2);
        assert_eq!(manifest.categories[0].colors[1], "#4a90e2");
        assert!(manifest.categories[1].colors.is_empty());
    }
}
