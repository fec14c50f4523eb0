//! Cyclical (sin, cos) encoding of angles.
//!
//! Longitude wraps at ±180°, so raw degrees put two neighbouring points on
//! opposite ends of the feature range. Encoding an angle as `(sin θ, cos θ)`
//! maps it onto the unit circle where 179.9° and -179.9° are close.

use crate::dataset::CoordinatePair;
use crate::preprocessing::error::{PreprocessingError, PreprocessingResult};
use serde::{Deserialize, Serialize};

/// An angle on the unit circle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphericalEncoding {
    /// `sin θ`.
    pub sin: f64,
    /// `cos θ`.
    pub cos: f64,
}

impl SphericalEncoding {
    /// Encode an angle given in degrees.
    ///
    /// # Errors
    /// Returns [`PreprocessingError::InvalidCoordinate`] for NaN or infinite input.
    pub fn encode(angle_deg: f64) -> PreprocessingResult<Self> {
        if !angle_deg.is_finite() {
            return Err(PreprocessingError::InvalidCoordinate {
                field: "angle",
                value: angle_deg,
            });
        }
        let (sin, cos) = angle_deg.to_radians().sin_cos();
        Ok(Self { sin, cos })
    }

    /// Recover the angle in degrees, in `(-180, 180]`.
    pub fn angle_degrees(&self) -> f64 {
        self.sin.atan2(self.cos).to_degrees()
    }
}

/// Both components of an encoded coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EncodedCoordinate {
    pub lon: SphericalEncoding,
    pub lat: SphericalEncoding,
}

/// Stateless encoder for latitude and longitude.
#[derive(Debug, Clone, Copy, Default)]
pub struct SphericalEncoder;

impl SphericalEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Encode a single angle. See [`SphericalEncoding::encode`].
    pub fn encode(&self, angle_deg: f64) -> PreprocessingResult<SphericalEncoding> {
        SphericalEncoding::encode(angle_deg)
    }

    /// Encode latitude and longitude independently.
    pub fn encode_pair(&self, coord: &CoordinatePair) -> PreprocessingResult<EncodedCoordinate> {
        Ok(EncodedCoordinate {
            lon: SphericalEncoding::encode(coord.lon())?,
            lat: SphericalEncoding::encode(coord.lat())?,
        })
    }
}
