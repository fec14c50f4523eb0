//! Delimited-table input: `trip_id,pickup_lat,pickup_lon,dropoff_lat,dropoff_lon`.

use super::{Trip, TripBatch, TripId};
use crate::preprocessing::error::{ErrorPolicy, PreprocessingError, PreprocessingResult, RowFailure};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One unvalidated input row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTrip {
    pub trip_id: TripId,
    pub pickup_lat: f64,
    pub pickup_lon: f64,
    pub dropoff_lat: f64,
    pub dropoff_lon: f64,
}

impl RawTrip {
    /// Validate coordinates and build a [`Trip`].
    pub fn validate(&self) -> PreprocessingResult<Trip> {
        Trip::from_degrees(
            self.trip_id,
            self.pickup_lat,
            self.pickup_lon,
            self.dropoff_lat,
            self.dropoff_lon,
        )
    }
}

/// Columns every input table must carry.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    "trip_id",
    "pickup_lat",
    "pickup_lon",
    "dropoff_lat",
    "dropoff_lon",
];

impl TripBatch {
    /// Validate raw rows into a batch.
    ///
    /// Under [`ErrorPolicy::SkipAndReport`] invalid rows (bad coordinates or a
    /// repeated id) are dropped and returned as failures. Under
    /// [`ErrorPolicy::FailFast`] the first invalid row aborts.
    pub fn from_raw_rows<I>(
        rows: I,
        policy: ErrorPolicy,
    ) -> PreprocessingResult<(TripBatch, Vec<RowFailure>)>
    where
        I: IntoIterator<Item = RawTrip>,
    {
        Self::from_parsed_rows(rows.into_iter().map(Ok), policy)
    }

    /// Rows that failed before validation (e.g. unparseable fields) are
    /// handled under the same policy, in input order.
    fn from_parsed_rows<I>(
        rows: I,
        policy: ErrorPolicy,
    ) -> PreprocessingResult<(TripBatch, Vec<RowFailure>)>
    where
        I: IntoIterator<Item = PreprocessingResult<RawTrip>>,
    {
        let mut batch = TripBatch::new();
        let mut failures = Vec::new();

        for (row, parsed) in rows.into_iter().enumerate() {
            let raw = match parsed {
                Ok(raw) => raw,
                Err(error) => {
                    policy.handle(row, None, error, &mut failures)?;
                    continue;
                }
            };
            if let Err(error) = raw.validate().and_then(|trip| batch.push(trip)) {
                policy.handle(row, Some(raw.trip_id), error, &mut failures)?;
            }
        }

        Ok((batch, failures))
    }
}

/// Read trips from CSV with a header row.
///
/// Rows that fail to parse are handled like invalid coordinates: skipped and
/// reported, or fatal, depending on `policy`. Header errors, including a
/// missing [required column](REQUIRED_COLUMNS), are always fatal.
pub fn read_trips<R: Read>(
    reader: R,
    policy: ErrorPolicy,
) -> PreprocessingResult<(TripBatch, Vec<RowFailure>)> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|name| !headers.iter().any(|h| h == *name))
        .collect();
    if !missing.is_empty() {
        return Err(PreprocessingError::CsvError(format!(
            "missing required column(s): {}",
            missing.join(", ")
        )));
    }

    let rows = csv_reader.records().map(|record| {
        record
            .map_err(PreprocessingError::from)
            .and_then(|r| r.deserialize::<RawTrip>(Some(&headers)).map_err(Into::into))
    });
    let (batch, failures) = TripBatch::from_parsed_rows(rows, policy)?;

    log::debug!(
        "Read {} trips ({} rejected rows)",
        batch.len(),
        failures.len()
    );
    Ok((batch, failures))
}

/// Read trips from a CSV file. See [`read_trips`].
pub fn read_trips_from_path<P: AsRef<Path>>(
    path: P,
    policy: ErrorPolicy,
) -> PreprocessingResult<(TripBatch, Vec<RowFailure>)> {
    let file = File::open(path)?;
    read_trips(file, policy)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
trip_id,pickup_lat,pickup_lon,dropoff_lat,dropoff_lon
1,40.7580,-73.9855,40.6900,-73.9700
2,40.7600,-73.9840,40.6920,-73.9680
3,95.0,-73.9840,40.6920,-73.9680
4,40.7550,-73.9870,40.6880,-73.9720
";

    #[test]
    fn test_read_trips_skip_and_report() {
        let (batch, failures) = read_trips(CSV.as_bytes(), ErrorPolicy::SkipAndReport).unwrap();
        let ids: Vec<TripId> = batch.iter().map(|t| t.id()).collect();
        assert_eq!(ids, vec![1, 2, 4]);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].row, 2);
        assert_eq!(failures[0].trip_id, Some(3));
        assert!(matches!(
            failures[0].error,
            PreprocessingError::InvalidCoordinate { field: "latitude", .. }
        ));
    }

    #[test]
    fn test_read_trips_fail_fast() {
        let result = read_trips(CSV.as_bytes(), ErrorPolicy::FailFast);
        assert!(matches!(
            result,
            Err(PreprocessingError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn test_read_trips_unparseable_row() {
        let data = "trip_id,pickup_lat,pickup_lon,dropoff_lat,dropoff_lon\n1,abc,0,0,0\n2,1,1,2,2\n";
        let (batch, failures) = read_trips(data.as_bytes(), ErrorPolicy::SkipAndReport).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].trip_id, None);
        assert!(matches!(failures[0].error, PreprocessingError::CsvError(_)));
    }

    #[test]
    fn test_read_trips_duplicate_id() {
        let data = "trip_id,pickup_lat,pickup_lon,dropoff_lat,dropoff_lon\n7,1,1,2,2\n7,1,1,2,2\n";
        let (batch, failures) = read_trips(data.as_bytes(), ErrorPolicy::SkipAndReport).unwrap();
        assert_eq!(batch.len(), 1);
        assert!(matches!(
            failures[0].error,
            PreprocessingError::DuplicateTripId(7)
        ));
    }

    #[test]
    fn test_from_raw_rows() {
        let rows = vec![
            RawTrip {
                trip_id: 1,
                pickup_lat: 10.0,
                pickup_lon: 10.0,
                dropoff_lat: 11.0,
                dropoff_lon: 11.0,
            },
            RawTrip {
                trip_id: 2,
                pickup_lat: 10.0,
                pickup_lon: f64::NAN,
                dropoff_lat: 11.0,
                dropoff_lon: 11.0,
            },
        ];
        let (batch, failures) =
            TripBatch::from_raw_rows(rows.clone(), ErrorPolicy::SkipAndReport).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(failures.len(), 1);

        assert!(TripBatch::from_raw_rows(rows, ErrorPolicy::FailFast).is_err());
    }

    #[test]
    fn test_read_trips_missing_column_is_fatal() {
        let data = "trip_id,pickup_lat,pickup_lon,dropoff_lat\n1,1,1,2\n2,1,1,2\n";
        let result = read_trips(data.as_bytes(), ErrorPolicy::SkipAndReport);
        match result {
            Err(PreprocessingError::CsvError(msg)) => assert!(msg.contains("dropoff_lon"), "{}", msg),
            other => panic!("expected CsvError, got {:?}", other),
        }
    }

    #[test]
    fn test_read_trips_extra_columns_and_order() {
        let data = "vendor,dropoff_lon,dropoff_lat,pickup_lon,pickup_lat,trip_id\nA,2,2,1,1,9\n";
        let (batch, failures) = read_trips(data.as_bytes(), ErrorPolicy::FailFast).unwrap();
        assert!(failures.is_empty());
        assert_eq!(batch.iter().map(|t| t.id()).collect::<Vec<_>>(), vec![9]);
    }

    #[test]
    fn test_read_trips_fail_fast_stops_at_first_bad_row() {
        let data = "trip_id,pickup_lat,pickup_lon,dropoff_lat,dropoff_lon\n1,abc,0,0,0\n2,95,0,0,0\n";
        let result = read_trips(data.as_bytes(), ErrorPolicy::FailFast);
        assert!(matches!(result, Err(PreprocessingError::CsvError(_))));
    }

    #[test]
    fn test_read_trips_missing_file() {
        let result = read_trips_from_path("/nonexistent/trips.csv", ErrorPolicy::FailFast);
        assert!(matches!(result, Err(PreprocessingError::IoError(_))));
    }
}
