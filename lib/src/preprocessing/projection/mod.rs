//! Planar projection of geographic coordinates.
//!
//! Supported reference systems, identified by EPSG code:
//! - WGS84 geographic (EPSG:4326)
//! - Web Mercator (EPSG:3857, legacy alias 900913)
//! - UTM north (EPSG:32601-32660) and south (EPSG:32701-32760)
//!
//! UTM uses the Karney (2011) Krüger series on the WGS84 ellipsoid, so a
//! planar round trip reproduces the input to well under a millimetre.
//!
//! # Example
//!
//! ```rust
//! use geofeatures::preprocessing::projection::{BuiltinProjector, Crs, Projector};
//!
//! let engine = BuiltinProjector::new();
//! let (x, y) = engine
//!     .transform(-73.9855, 40.7580, Crs::WGS84, Crs::from_epsg(32618).unwrap())
//!     .unwrap();
//! assert!(x > 580_000.0 && y > 4_500_000.0);
//! ```

pub mod ellipsoid;
mod math_utils;
mod projector;
pub mod transverse_mercator;
pub mod web_mercator;

pub use ellipsoid::Ellipsoid;
pub use projector::{BuiltinProjector, PlanarProjector, Projector, ZoneDeviation, UTM_ZONE_HALF_WIDTH};

use crate::preprocessing::error::{PreprocessingError, PreprocessingResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use transverse_mercator::utm_central_meridian;

const SUPPORTED_CODES: &str = "4326, 3857, 900913, 32601-32660, 32701-32760";

/// A coordinate reference system.
///
/// Serialized as its EPSG code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Crs {
    /// WGS84 longitude/latitude in degrees.
    Geographic,
    /// Spherical Web Mercator in metres.
    WebMercator,
    /// Universal Transverse Mercator in metres.
    Utm {
        /// Zone number, 1..=60.
        zone: u8,
        /// Northern hemisphere.
        north: bool,
    },
}

impl Crs {
    /// EPSG:4326.
    pub const WGS84: Crs = Crs::Geographic;

    /// Parse an EPSG code.
    ///
    /// # Errors
    /// Returns [`PreprocessingError::UnsupportedCrs`] for any other code.
    pub fn from_epsg(code: u32) -> PreprocessingResult<Self> {
        match code {
            4326 => Ok(Crs::Geographic),
            3857 | 900913 => Ok(Crs::WebMercator),
            32601..=32660 => Ok(Crs::Utm {
                zone: (code - 32600) as u8,
                north: true,
            }),
            32701..=32760 => Ok(Crs::Utm {
                zone: (code - 32700) as u8,
                north: false,
            }),
            _ => Err(PreprocessingError::UnsupportedCrs {
                code,
                supported: SUPPORTED_CODES,
            }),
        }
    }

    /// EPSG code of this system.
    pub fn to_epsg(&self) -> u32 {
        match self {
            Crs::Geographic => 4326,
            Crs::WebMercator => 3857,
            Crs::Utm { zone, north: true } => 32600 + u32::from(*zone),
            Crs::Utm { zone, north: false } => 32700 + u32::from(*zone),
        }
    }

    /// UTM zone `zone` in the given hemisphere.
    ///
    /// # Errors
    /// Returns [`PreprocessingError::InvalidParameter`] unless `1 <= zone <= 60`.
    pub fn utm(zone: u8, north: bool) -> PreprocessingResult<Self> {
        if !(1..=60).contains(&zone) {
            return Err(PreprocessingError::InvalidParameter(format!(
                "UTM zone must be in 1..=60, got {}",
                zone
            )));
        }
        Ok(Crs::Utm { zone, north })
    }

    /// The standard UTM zone containing a point.
    pub fn utm_for(lon: f64, lat: f64) -> Self {
        let zone = (((lon + 180.0) / 6.0).floor() as i32 + 1).clamp(1, 60) as u8;
        Crs::Utm {
            zone,
            north: lat >= 0.0,
        }
    }

    /// Whether coordinates are in degrees rather than metres.
    pub fn is_geographic(&self) -> bool {
        matches!(self, Crs::Geographic)
    }

    /// Central meridian for UTM systems.
    pub fn central_meridian(&self) -> Option<f64> {
        match self {
            Crs::Utm { zone, .. } => Some(utm_central_meridian(*zone)),
            _ => None,
        }
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.to_epsg())
    }
}

impl TryFrom<u32> for Crs {
    type Error = PreprocessingError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        Crs::from_epsg(code)
    }
}

impl From<Crs> for u32 {
    fn from(crs: Crs) -> u32 {
        crs.to_epsg()
    }
}

impl FromStr for Crs {
    type Err = PreprocessingError;

    /// Accepts `"32618"` or `"EPSG:32618"`, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = match trimmed.get(..5) {
            Some(prefix) if prefix.eq_ignore_ascii_case("epsg:") => &trimmed[5..],
            _ => trimmed,
        };
        let code = digits.parse::<u32>().map_err(|_| {
            PreprocessingError::InvalidParameter(format!("'{}' is not an EPSG code", s))
        })?;
        Crs::from_epsg(code)
    }
}
