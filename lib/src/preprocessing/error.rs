//! Error types for preprocessing operations.

use crate::dataset::TripId;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result alias used by every fallible operation in this crate.
pub type PreprocessingResult<T> = Result<T, PreprocessingError>;

/// Error type for preprocessing operations.
///
/// `CoordinateOutOfZone` is not an error here: it is advisory only and is
/// reported through [`Advisory`](crate::pipeline::Advisory).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PreprocessingError {
    /// Coordinate is non-finite or outside its WGS84 range.
    #[error("Invalid coordinate: {field} = {value} is non-finite or outside its valid range")]
    InvalidCoordinate {
        /// Which value failed (`"latitude"`, `"longitude"`, `"angle"`).
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// Reference system identifier not recognized by the projection engine.
    #[error("Unsupported CRS: EPSG:{code} (supported: {supported})")]
    UnsupportedCrs {
        /// Requested EPSG code.
        code: u32,
        /// Human readable list of supported codes.
        supported: &'static str,
    },
    /// A scaled dimension has zero range and the active policy rejects it.
    #[error("Degenerate scale: column {column} has zero range (constant value {value})")]
    DegenerateScale {
        /// Index of the zero-variance column.
        column: usize,
        /// The constant value observed in that column.
        value: f64,
    },
    /// The projection engine could not transform a coordinate.
    #[error("Projection failed during {operation}: {message}")]
    ProjectionFailed {
        /// `"forward"` or `"inverse"`.
        operation: &'static str,
        /// Failure details.
        message: String,
    },
    /// Data contains NaN or infinite values where finite ones are required.
    #[error("Missing values: {0}")]
    MissingValues(String),
    /// Invalid hyperparameter or configuration value.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// Empty data provided where non-empty was required.
    #[error("Empty data: {0}")]
    EmptyData(String),
    /// Feature dimension mismatch.
    #[error("Feature mismatch: expected {expected_features} features, got {got_features}")]
    FeatureMismatch {
        /// Number of features seen during fit.
        expected_features: usize,
        /// Number of features provided.
        got_features: usize,
    },
    /// A stage tried to write a feature that already exists on the record.
    #[error("Feature '{feature}' already set for trip {trip_id}")]
    FeatureOverwrite {
        /// Trip owning the record.
        trip_id: TripId,
        /// Name of the duplicated feature.
        feature: &'static str,
    },
    /// A record was finalized without a column its schema requires.
    #[error("Feature '{feature}' missing for trip {trip_id}")]
    MissingFeature {
        /// Trip owning the record.
        trip_id: TripId,
        /// Name of the absent feature.
        feature: &'static str,
    },
    /// Two trips in one batch share an identifier.
    #[error("Duplicate trip id: {0}")]
    DuplicateTripId(TripId),
    /// Serialization or deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
    /// Delimited-table read or write error.
    #[error("CSV error: {0}")]
    CsvError(String),
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    IoError(String),
}

impl PreprocessingError {
    /// Whether the error comes from bad input values rather than the environment.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PreprocessingError::InvalidCoordinate { .. }
                | PreprocessingError::MissingValues(_)
                | PreprocessingError::DuplicateTripId(_)
        )
    }
}

/// What happens when one trip cannot be processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Drop the trip, record a [`RowFailure`], keep going.
    #[default]
    SkipAndReport,
    /// Abort the run with the first error, in input order.
    FailFast,
}

impl ErrorPolicy {
    /// Either propagate `error` or record it as a failure of `row`.
    pub(crate) fn handle(
        self,
        row: usize,
        trip_id: Option<TripId>,
        error: PreprocessingError,
        failures: &mut Vec<RowFailure>,
    ) -> PreprocessingResult<()> {
        match self {
            ErrorPolicy::FailFast => Err(error),
            ErrorPolicy::SkipAndReport => {
                log::warn!("Skipping row {}: {}", row, error);
                failures.push(RowFailure {
                    row,
                    trip_id,
                    error,
                });
                Ok(())
            }
        }
    }
}

/// A trip dropped under [`ErrorPolicy::SkipAndReport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RowFailure {
    /// Zero-based position in the input the failure was found in.
    pub row: usize,
    /// Identifier, if the row got far enough to have one.
    pub trip_id: Option<TripId>,
    pub error: PreprocessingError,
}

impl fmt::Display for RowFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.trip_id {
            Some(id) => write!(f, "row {} (trip {}): {}", self.row, id, self.error),
            None => write!(f, "row {}: {}", self.row, self.error),
        }
    }
}

impl From<std::io::Error> for PreprocessingError {
    fn from(err: std::io::Error) -> Self {
        PreprocessingError::IoError(err.to_string())
    }
}

impl From<bincode::Error> for PreprocessingError {
    fn from(err: bincode::Error) -> Self {
        PreprocessingError::SerializationError(err.to_string())
    }
}

impl From<serde_json::Error> for PreprocessingError {
    fn from(err: serde_json::Error) -> Self {
        PreprocessingError::SerializationError(err.to_string())
    }
}

impl From<csv::Error> for PreprocessingError {
    fn from(err: csv::Error) -> Self {
        PreprocessingError::CsvError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_coordinate() {
        let err = PreprocessingError::InvalidCoordinate {
            field: "latitude",
            value: 91.0,
        };
        assert!(err.to_string().contains("latitude = 91"));
    }

    #[test]
    fn test_error_display_unsupported_crs() {
        let err = PreprocessingError::UnsupportedCrs {
            code: 2263,
            supported: "4326",
        };
        assert!(err.to_string().contains("EPSG:2263"));
    }

    #[test]
    fn test_error_display_degenerate_scale() {
        let err = PreprocessingError::DegenerateScale {
            column: 1,
            value: 5.0,
        };
        assert!(err.to_string().contains("column 1"));
    }

    #[test]
    fn test_error_display_feature_mismatch() {
        let err = PreprocessingError::FeatureMismatch {
            expected_features: 2,
            got_features: 3,
        };
        assert!(err.to_string().contains("Feature mismatch"));
    }

    #[test]
    fn test_error_display_overwrite() {
        let err = PreprocessingError::FeatureOverwrite {
            trip_id: 7,
            feature: "distance_km",
        };
        assert!(err.to_string().contains("trip 7"));
    }

    #[test]
    fn test_error_policy_handle() {
        let mut failures = Vec::new();
        let err = PreprocessingError::DuplicateTripId(3);
        ErrorPolicy::SkipAndReport
            .handle(4, Some(3), err.clone(), &mut failures)
            .unwrap();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].to_string(), "row 4 (trip 3): Duplicate trip id: 3");

        let result = ErrorPolicy::FailFast.handle(5, None, err, &mut failures);
        assert!(matches!(result, Err(PreprocessingError::DuplicateTripId(3))));
        assert_eq!(failures.len(), 1);
    }

    #[test]
    fn test_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: PreprocessingError = io_err.into();
        assert!(matches!(err, PreprocessingError::IoError(_)));
    }

    #[test]
    fn test_error_from_bincode_error() {
        let bad_bytes: &[u8] = &[0xff, 0xff, 0xff, 0xff];
        let bincode_result: Result<String, bincode::Error> = bincode::deserialize(bad_bytes);
        if let Err(e) = bincode_result {
            let err: PreprocessingError = e.into();
            assert!(matches!(err, PreprocessingError::SerializationError(_)));
        }
    }

    #[test]
    fn test_error_from_json_error() {
        let json_err = serde_json::from_str::<Vec<f64>>("not json").unwrap_err();
        let err: PreprocessingError = json_err.into();
        assert!(matches!(err, PreprocessingError::SerializationError(_)));
    }

    #[test]
    fn test_validation_classification() {
        assert!(PreprocessingError::DuplicateTripId(1).is_validation());
        assert!(!PreprocessingError::IoError("x".into()).is_validation());
    }

    #[test]
    fn test_error_is_std_error() {
        let err = PreprocessingError::InvalidParameter("test".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
