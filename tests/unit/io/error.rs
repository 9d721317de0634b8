//! Tests for error formatting, source chaining, and dataset context

#[cfg(test)]
mod tests {
    use std::error::Error;
    use vectorcorr::AnalysisError;
    use vectorcorr::io::error::{WithDataset, file_system, invalid_parameter};

    // Tests the dataset label and inner message both appear
    // Verified by omitting the label from the message
    #[test]
    fn test_dataset_error_message() {
        let result: Result<(), AnalysisError> = Err(AnalysisError::EmptyReferenceBin { discarded: 3 });

        let Err(error) = result.for_dataset("1.7% Agar (20x) (Dataset 2)") else {
            unreachable!("error must propagate");
        };

        let message = error.to_string();
        assert!(message.contains("1.7% Agar (20x) (Dataset 2)"));
        assert!(message.contains("Reference bin 0 is empty"));
        assert!(message.contains('3'));
        assert!(matches!(
            error.root(),
            AnalysisError::EmptyReferenceBin { discarded: 3 }
        ));
    }

    // Tests the dataset wrapper exposes its cause
    // Verified by returning None from source for Dataset
    #[test]
    fn test_dataset_source_chain() {
        let result: Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));

        let Err(error) = result.for_dataset("d") else {
            unreachable!("error must propagate");
        };

        let inner = error.source();
        assert!(inner.is_some());
        assert!(inner.and_then(|e| e.source()).is_some());
    }

    // Tests shape mismatch reports both shapes
    // Verified by printing only the position shape
    #[test]
    fn test_shape_mismatch_message() {
        let error = AnalysisError::ShapeMismatch {
            positions: (5, 2),
            displacements: (4, 2),
        };

        let message = error.to_string();
        assert!(message.contains("5x2"));
        assert!(message.contains("4x2"));
    }

    // Tests degenerate normalization shows the denominator
    // Verified by omitting the value
    #[test]
    fn test_degenerate_message() {
        let error = AnalysisError::DegenerateNormalization { denominator: 0.0 };
        assert!(error.to_string().contains("0e0"));
        assert!(error.source().is_none());
    }

    // Tests helper constructors fill every field
    // Verified by swapping value and reason
    #[test]
    fn test_helpers() {
        let error = invalid_parameter("bin_count", &0, &"at least one bin is required");
        let message = error.to_string();
        assert!(message.contains("bin_count"));
        assert!(message.contains("'0'"));
        assert!(message.contains("at least one bin"));

        let fs_error = file_system(
            "/tmp/x.csv",
            "read",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(fs_error.to_string().contains("/tmp/x.csv"));
        assert!(fs_error.source().is_some());
    }
}
