//! What happened during a run besides the features themselves.

use crate::dataset::TripId;
use crate::preprocessing::error::RowFailure;
use std::fmt;

/// A non-fatal observation about the input.
#[derive(Debug, Clone, PartialEq)]
pub enum Advisory {
    /// A point lies outside the target UTM zone. It is still projected, with
    /// growing distortion.
    CoordinateOutOfZone {
        trip_id: TripId,
        lon: f64,
        lat: f64,
        central_meridian: f64,
        offset_deg: f64,
    },
    /// A scaled column had zero range and was mapped to the lower bound.
    DegenerateScale { column: &'static str, value: f64 },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::CoordinateOutOfZone {
                trip_id,
                lon,
                lat,
                central_meridian,
                offset_deg,
            } => write!(
                f,
                "trip {}: ({}, {}) is {:.3}° from central meridian {}",
                trip_id, lon, lat, offset_deg, central_meridian
            ),
            Advisory::DegenerateScale { column, value } => {
                write!(f, "column {} is constant ({}); scaled to lower bound", column, value)
            }
        }
    }
}

/// Counts, failures and advisories of one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineReport {
    pub rows_in: usize,
    pub rows_out: usize,
    pub failures: Vec<RowFailure>,
    pub advisories: Vec<Advisory>,
}

impl PipelineReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.advisories.is_empty()
    }

    pub fn skipped(&self) -> usize {
        self.failures.len()
    }

    /// Trips flagged as outside the target zone.
    pub fn out_of_zone(&self) -> impl Iterator<Item = TripId> + '_ {
        self.advisories.iter().filter_map(|a| match a {
            Advisory::CoordinateOutOfZone { trip_id, .. } => Some(*trip_id),
            _ => None,
        })
    }

    /// Columns reported as degenerate.
    pub fn degenerate_columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.advisories.iter().filter_map(|a| match a {
            Advisory::DegenerateScale { column, .. } => Some(*column),
            _ => None,
        })
    }

    /// Prepend failures found before the run, e.g. while reading input.
    ///
    /// Their `row` refers to the raw input; the run's own failures keep
    /// referring to positions in the batch.
    pub fn with_input_failures(mut self, failures: Vec<RowFailure>) -> Self {
        self.rows_in += failures.len();
        let mut merged = failures;
        merged.append(&mut self.failures);
        self.failures = merged;
        self
    }
}

impl fmt::Display for PipelineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows in, {} rows out, {} skipped, {} advisories",
            self.rows_in,
            self.rows_out,
            self.failures.len(),
            self.advisories.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::error::PreprocessingError;

    #[test]
    fn test_report_helpers() {
        let report = PipelineReport {
            rows_in: 3,
            rows_out: 2,
            failures: vec![RowFailure {
                row: 1,
                trip_id: Some(5),
                error: PreprocessingError::DuplicateTripId(5),
            }],
            advisories: vec![
                Advisory::CoordinateOutOfZone {
                    trip_id: 7,
                    lon: -80.0,
                    lat: 40.0,
                    central_meridian: -75.0,
                    offset_deg: -5.0,
                },
                Advisory::DegenerateScale {
                    column: "pickup_x_scaled",
                    value: 1.0,
                },
            ],
        };
        assert!(!report.is_clean());
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.out_of_zone().collect::<Vec<_>>(), vec![7]);
        assert_eq!(report.degenerate_columns().collect::<Vec<_>>(), vec!["pickup_x_scaled"]);
        assert_eq!(report.to_string(), "3 rows in, 2 rows out, 1 skipped, 2 advisories");
    }

    #[test]
    fn test_with_input_failures_prepends() {
        let run = PipelineReport {
            rows_in: 2,
            rows_out: 1,
            failures: vec![RowFailure {
                row: 3,
                trip_id: Some(4),
                error: PreprocessingError::EmptyData("x".into()),
            }],
            advisories: vec![],
        };
        let merged = run.with_input_failures(vec![RowFailure {
            row: 0,
            trip_id: None,
            error: PreprocessingError::CsvError("bad".into()),
        }]);
        assert_eq!(merged.rows_in, 3);
        assert_eq!(merged.failures.iter().map(|f| f.row).collect::<Vec<_>>(), vec![0, 3]);
        assert!(merged.failures[0].to_string().starts_with("row 0:"));
    }

    #[test]
    fn test_advisory_display() {
        let advisory = Advisory::CoordinateOutOfZone {
            trip_id: 1,
            lon: -80.0,
            lat: 40.0,
            central_meridian: -75.0,
            offset_deg: -5.0,
        };
        assert!(advisory.to_string().contains("-5.000°"));
    }
}
