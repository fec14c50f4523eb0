//! Haversine distance on a spherical Earth.
//!
//! ```text
//! a = sin²(Δlat/2) + cos(lat1)·cos(lat2)·sin²(Δlon/2)
//! c = 2·asin(√a)
//! d = R·c
//! ```
//!
//! `a` is clamped to `[0, 1]` before the square root so rounding near
//! antipodal points cannot produce NaN.

use crate::dataset::CoordinatePair;
use crate::preprocessing::error::{PreprocessingError, PreprocessingResult};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance on a sphere of radius `radius_km`.
///
/// Inputs are validated coordinates in degrees, so the result is always finite.
pub fn haversine_km(pickup: &CoordinatePair, dropoff: &CoordinatePair, radius_km: f64) -> f64 {
    let (lat1, lon1) = pickup.to_radians();
    let (lat2, lon2) = dropoff.to_radians();

    let half_dlat = ((lat2 - lat1) / 2.0).sin();
    let half_dlon = ((lon2 - lon1) / 2.0).sin();
    let a = half_dlat * half_dlat + lat1.cos() * lat2.cos() * half_dlon * half_dlon;
    let c = 2.0 * a.clamp(0.0, 1.0).sqrt().asin();

    radius_km * c
}

/// Stateless great-circle distance estimator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HaversineEstimator {
    radius_km: f64,
}

impl Default for HaversineEstimator {
    fn default() -> Self {
        Self {
            radius_km: EARTH_RADIUS_KM,
        }
    }
}

impl HaversineEstimator {
    /// Estimator using [`EARTH_RADIUS_KM`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Estimator with an explicit sphere radius.
    ///
    /// # Errors
    /// Returns [`PreprocessingError::InvalidParameter`] unless the radius is
    /// finite and positive.
    pub fn with_radius_km(radius_km: f64) -> PreprocessingResult<Self> {
        if !(radius_km.is_finite() && radius_km > 0.0) {
            return Err(PreprocessingError::InvalidParameter(format!(
                "earth radius must be finite and positive, got {}",
                radius_km
            )));
        }
        Ok(Self { radius_km })
    }

    /// Sphere radius in kilometres.
    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    /// Largest possible distance: half the great circle, `π·R`.
    pub fn max_distance_km(&self) -> f64 {
        PI * self.radius_km
    }

    /// Distance in kilometres between two points given in degrees.
    ///
    /// # Errors
    /// Returns [`PreprocessingError::InvalidCoordinate`] if any value is
    /// non-finite or out of range.
    pub fn distance(&self, lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> PreprocessingResult<f64> {
        Ok(self.distance_between(
            &CoordinatePair::new(lat1, lon1)?,
            &CoordinatePair::new(lat2, lon2)?,
        ))
    }

    /// Distance in kilometres between two validated coordinates.
    pub fn distance_between(&self, a: &CoordinatePair, b: &CoordinatePair) -> f64 {
        haversine_km(a, b, self.radius_km)
    }
}
