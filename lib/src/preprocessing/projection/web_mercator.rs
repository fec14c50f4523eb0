//! Spherical (pseudo) Mercator, EPSG:3857.
//!
//! Treats the Earth as a sphere of radius `a`. Suitable for map tiles and
//! visual alignment, not for distance measurement at high latitude.

use super::ellipsoid::Ellipsoid;
use crate::preprocessing::error::{PreprocessingError, PreprocessingResult};
use std::f64::consts::FRAC_PI_4;

/// Sphere radius used by Web Mercator: the WGS84 semi-major axis.
pub const WEB_MERCATOR_RADIUS: f64 = Ellipsoid::WGS84.a;

/// Latitude at which the projected square world ends, in degrees.
pub const WEB_MERCATOR_MAX_LAT: f64 = 85.051_128_779_806_59;

/// Geographic degrees to Web Mercator metres.
///
/// # Errors
/// Latitudes beyond [`WEB_MERCATOR_MAX_LAT`] have no representation and fail
/// with [`PreprocessingError::ProjectionFailed`]; they are never clamped.
pub fn forward(lon: f64, lat: f64) -> PreprocessingResult<(f64, f64)> {
    if !(lat.abs() <= WEB_MERCATOR_MAX_LAT) {
        return Err(PreprocessingError::ProjectionFailed {
            operation: "forward",
            message: format!(
                "latitude {} outside Web Mercator limit ±{}",
                lat, WEB_MERCATOR_MAX_LAT
            ),
        });
    }
    let x = WEB_MERCATOR_RADIUS * lon.to_radians();
    let y = WEB_MERCATOR_RADIUS * (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
    Ok((x, y))
}

/// Web Mercator metres back to geographic degrees.
pub fn inverse(x: f64, y: f64) -> PreprocessingResult<(f64, f64)> {
    if !(x.is_finite() && y.is_finite()) {
        return Err(PreprocessingError::ProjectionFailed {
            operation: "inverse",
            message: format!("non-finite planar coordinate ({}, {})", x, y),
        });
    }
    let lon = (x / WEB_MERCATOR_RADIUS).to_degrees();
    let lat = (2.0 * (y / WEB_MERCATOR_RADIUS).exp().atan() - 2.0 * FRAC_PI_4).to_degrees();
    Ok((lon, lat))
}
