//! Trip data model: validated coordinates, trips and ordered trip batches.
//!
//! # Core Concepts
//!
//! - **CoordinatePair**: a WGS84 latitude/longitude pair in degrees. Construction
//!   validates both ranges; out-of-range or non-finite input is an error, never clamped.
//! - **Trip**: an identifier plus pickup and dropoff coordinates. Immutable once built.
//! - **TripBatch**: an ordered sequence of trips with unique identifiers. Output
//!   features are produced in the same order.
//!
//! # Example
//!
//! ```rust
//! use geofeatures::dataset::{Trip, TripBatch};
//!
//! let trip = Trip::from_degrees(1, 40.7580, -73.9855, 40.6900, -73.9700).unwrap();
//! let batch = TripBatch::from_trips(vec![trip]).unwrap();
//! assert_eq!(batch.len(), 1);
//! ```

use crate::preprocessing::error::{PreprocessingError, PreprocessingResult};
use serde::{Deserialize, Serialize};

mod batch;
pub mod reader;

pub use batch::TripBatch;
pub use reader::{read_trips, read_trips_from_path, RawTrip};

/// Stable trip identifier.
pub type TripId = u64;

/// Valid latitude range in degrees.
pub const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);

/// Valid longitude range in degrees.
pub const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);

/// Check that `lat` is finite and inside [`LATITUDE_RANGE`].
pub fn validate_latitude(lat: f64) -> PreprocessingResult<f64> {
    validate_range("latitude", lat, LATITUDE_RANGE)
}

/// Check that `lon` is finite and inside [`LONGITUDE_RANGE`].
pub fn validate_longitude(lon: f64) -> PreprocessingResult<f64> {
    validate_range("longitude", lon, LONGITUDE_RANGE)
}

fn validate_range(field: &'static str, value: f64, (min, max): (f64, f64)) -> PreprocessingResult<f64> {
    // NaN fails `contains`, infinities fall outside the range.
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(PreprocessingError::InvalidCoordinate { field, value })
    }
}

/// A validated WGS84 coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoordinatePair {
    lat: f64,
    lon: f64,
}

impl CoordinatePair {
    /// Create a coordinate, rejecting non-finite or out-of-range values.
    ///
    /// # Errors
    /// Returns [`PreprocessingError::InvalidCoordinate`] naming the offending field.
    pub fn new(lat: f64, lon: f64) -> PreprocessingResult<Self> {
        Ok(Self {
            lat: validate_latitude(lat)?,
            lon: validate_longitude(lon)?,
        })
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// `(lat, lon)` converted to radians.
    pub fn to_radians(&self) -> (f64, f64) {
        (self.lat.to_radians(), self.lon.to_radians())
    }
}

/// A single trip: the canonical unit of input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trip {
    id: TripId,
    pickup: CoordinatePair,
    dropoff: CoordinatePair,
}

impl Trip {
    /// Create a trip from already validated coordinates.
    pub fn new(id: TripId, pickup: CoordinatePair, dropoff: CoordinatePair) -> Self {
        Self {
            id,
            pickup,
            dropoff,
        }
    }

    /// Create a trip from raw degree values.
    ///
    /// # Errors
    /// Returns [`PreprocessingError::InvalidCoordinate`] if any value is invalid.
    pub fn from_degrees(
        id: TripId,
        pickup_lat: f64,
        pickup_lon: f64,
        dropoff_lat: f64,
        dropoff_lon: f64,
    ) -> PreprocessingResult<Self> {
        Ok(Self::new(
            id,
            CoordinatePair::new(pickup_lat, pickup_lon)?,
            CoordinatePair::new(dropoff_lat, dropoff_lon)?,
        ))
    }

    /// Trip identifier.
    pub fn id(&self) -> TripId {
        self.id
    }

    /// Pickup location.
    pub fn pickup(&self) -> &CoordinatePair {
        &self.pickup
    }

    /// Dropoff location.
    pub fn dropoff(&self) -> &CoordinatePair {
        &self.dropoff
    }
}

/// Which end of a trip a feature describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripEndpoint {
    /// Trip start.
    Pickup,
    /// Trip end.
    Dropoff,
}

impl TripEndpoint {
    /// Select this endpoint's coordinate from a trip.
    pub fn of<'a>(&self, trip: &'a Trip) -> &'a CoordinatePair {
        match self {
            TripEndpoint::Pickup => trip.pickup(),
            TripEndpoint::Dropoff => trip.dropoff(),
        }
    }
}
