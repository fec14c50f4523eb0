//! The projection engine interface and the planar projector built on it.

use super::math_utils::ang_diff;
use super::transverse_mercator::{KruegerSeries, TransverseMercator};
use super::{web_mercator, Crs};
use crate::dataset::{validate_latitude, validate_longitude, CoordinatePair};
use crate::preprocessing::error::{PreprocessingError, PreprocessingResult};
use std::fmt;
use std::sync::Arc;

/// Half the width of a UTM zone in degrees of longitude.
pub const UTM_ZONE_HALF_WIDTH: f64 = 3.0;

/// A coordinate transformation engine.
///
/// Geographic coordinates are passed as `(lon, lat)` in degrees, planar
/// ones as `(x, y)` in metres.
pub trait Projector: Send + Sync {
    /// Short engine identifier for logs.
    fn name(&self) -> &str;

    /// Transform one point from `from` to `to`.
    fn transform(&self, x: f64, y: f64, from: Crs, to: Crs) -> PreprocessingResult<(f64, f64)>;

    /// Transform one point between systems given as EPSG codes.
    fn transform_epsg(&self, x: f64, y: f64, from: u32, to: u32) -> PreprocessingResult<(f64, f64)> {
        self.transform(x, y, Crs::from_epsg(from)?, Crs::from_epsg(to)?)
    }

    /// Transform many points. Fails on the first point that cannot be transformed.
    fn project(&self, points: &[(f64, f64)], from: Crs, to: Crs) -> PreprocessingResult<Vec<(f64, f64)>> {
        points
            .iter()
            .map(|&(x, y)| self.transform(x, y, from, to))
            .collect()
    }
}

/// Pure-Rust engine: Krüger-series UTM and spherical Web Mercator on WGS84.
#[derive(Debug, Clone, Default)]
pub struct BuiltinProjector {
    series: KruegerSeries,
}

impl BuiltinProjector {
    pub fn new() -> Self {
        Self::default()
    }

    fn to_geographic(&self, x: f64, y: f64, from: Crs) -> PreprocessingResult<(f64, f64)> {
        match from {
            Crs::Geographic => Ok((validate_longitude(x)?, validate_latitude(y)?)),
            Crs::WebMercator => web_mercator::inverse(x, y),
            Crs::Utm { zone, north } => TransverseMercator::utm(&self.series, zone, north).inverse(x, y),
        }
    }

    fn from_geographic(&self, lon: f64, lat: f64, to: Crs) -> PreprocessingResult<(f64, f64)> {
        match to {
            Crs::Geographic => Ok((lon, lat)),
            Crs::WebMercator => web_mercator::forward(lon, lat),
            Crs::Utm { zone, north } => TransverseMercator::utm(&self.series, zone, north).forward(lon, lat),
        }
    }
}

impl Projector for BuiltinProjector {
    fn name(&self) -> &str {
        "builtin"
    }

    fn transform(&self, x: f64, y: f64, from: Crs, to: Crs) -> PreprocessingResult<(f64, f64)> {
        if from == to && !from.is_geographic() {
            return Ok((x, y));
        }
        let (lon, lat) = self.to_geographic(x, y, from)?;
        self.from_geographic(lon, lat, to)
    }
}

/// How far a point lies from the central meridian of the target UTM zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneDeviation {
    /// Central meridian of the target zone, degrees.
    pub central_meridian: f64,
    /// Signed longitude offset from the central meridian, degrees.
    pub offset_deg: f64,
}

/// Projects validated trip coordinates into a fixed planar target system.
///
/// The target system is always a parameter. Points outside the target UTM
/// zone are still projected; [`PlanarProjector::zone_deviation`] flags them.
#[derive(Clone)]
pub struct PlanarProjector {
    engine: Arc<dyn Projector>,
    source: Crs,
    target: Crs,
    zone_slack_deg: f64,
}

impl fmt::Debug for PlanarProjector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlanarProjector")
            .field("engine", &self.engine.name())
            .field("source", &self.source)
            .field("target", &self.target)
            .field("zone_slack_deg", &self.zone_slack_deg)
            .finish()
    }
}

impl PlanarProjector {
    /// Projector using [`BuiltinProjector`] and no zone slack.
    ///
    /// # Errors
    /// Returns [`PreprocessingError::InvalidParameter`] if `source` is not
    /// geographic: trip coordinates are always WGS84 degrees.
    pub fn new(source: Crs, target: Crs) -> PreprocessingResult<Self> {
        if !source.is_geographic() {
            return Err(PreprocessingError::InvalidParameter(format!(
                "projection source must be geographic, got {}",
                source
            )));
        }
        Ok(Self {
            engine: Arc::new(BuiltinProjector::new()),
            source,
            target,
            zone_slack_deg: 0.0,
        })
    }

    /// Replace the projection engine.
    pub fn with_engine(mut self, engine: Arc<dyn Projector>) -> Self {
        self.engine = engine;
        self
    }

    /// Extra degrees beyond the zone half-width before a point is flagged.
    ///
    /// # Panics
    /// Panics if `slack_deg` is negative or not finite.
    pub fn with_zone_slack(mut self, slack_deg: f64) -> Self {
        assert!(
            slack_deg.is_finite() && slack_deg >= 0.0,
            "zone slack must be finite and non-negative"
        );
        self.zone_slack_deg = slack_deg;
        self
    }

    pub fn source(&self) -> Crs {
        self.source
    }

    pub fn target(&self) -> Crs {
        self.target
    }

    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    /// Project one coordinate to `(x, y)` in the target system.
    pub fn project(&self, coord: &CoordinatePair) -> PreprocessingResult<(f64, f64)> {
        self.engine
            .transform(coord.lon(), coord.lat(), self.source, self.target)
    }

    /// Project many coordinates, preserving order.
    pub fn project_all(&self, coords: &[CoordinatePair]) -> PreprocessingResult<Vec<(f64, f64)>> {
        coords.iter().map(|c| self.project(c)).collect()
    }

    /// Transform a target-system point back to `(lon, lat)` degrees.
    pub fn unproject(&self, x: f64, y: f64) -> PreprocessingResult<(f64, f64)> {
        self.engine.transform(x, y, self.target, self.source)
    }

    /// Offset from the target zone when it exceeds the half-width plus slack.
    ///
    /// Always `None` for non-UTM targets.
    pub fn zone_deviation(&self, coord: &CoordinatePair) -> Option<ZoneDeviation> {
        let central_meridian = self.target.central_meridian()?;
        let offset_deg = ang_diff(central_meridian, coord.lon());
        if offset_deg.abs() > UTM_ZONE_HALF_WIDTH + self.zone_slack_deg {
            Some(ZoneDeviation {
                central_meridian,
                offset_deg,
            })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utm18() -> Crs {
        Crs::from_epsg(32618).unwrap()
    }

    #[test]
    fn test_builtin_geographic_to_utm_and_back() {
        let engine = BuiltinProjector::new();
        let (x, y) = engine.transform(-73.9855, 40.7580, Crs::WGS84, utm18()).unwrap();
        assert!((x - 585_632.974).abs() < 0.01, "x = {}", x);
        assert!((y - 4_512_388.313).abs() < 0.01, "y = {}", y);

        let (lon, lat) = engine.transform(x, y, utm18(), Crs::WGS84).unwrap();
        assert!((lon + 73.9855).abs() < 1e-9);
        assert!((lat - 40.7580).abs() < 1e-9);
    }

    #[test]
    fn test_builtin_between_planar_systems() {
        let engine = BuiltinProjector::new();
        let (x, y) = engine.transform(-73.9855, 40.7580, Crs::WGS84, utm18()).unwrap();
        let (mx, my) = engine.transform(x, y, utm18(), Crs::WebMercator).unwrap();
        let (ex, ey) = engine
            .transform(-73.9855, 40.7580, Crs::WGS84, Crs::WebMercator)
            .unwrap();
        assert!((mx - ex).abs() < 1e-3 && (my - ey).abs() < 1e-3);
    }

    #[test]
    fn test_transform_epsg_unsupported() {
        let engine = BuiltinProjector::new();
        assert!(matches!(
            engine.transform_epsg(0.0, 0.0, 4326, 2263),
            Err(PreprocessingError::UnsupportedCrs { code: 2263, .. })
        ));
    }

    #[test]
    fn test_geographic_identity_validates() {
        let engine = BuiltinProjector::new();
        assert_eq!(
            engine.transform(10.0, 20.0, Crs::WGS84, Crs::WGS84).unwrap(),
            (10.0, 20.0)
        );
        assert!(engine.transform(10.0, 95.0, Crs::WGS84, Crs::WGS84).is_err());
    }

    #[test]
    fn test_project_batch() {
        let engine = BuiltinProjector::new();
        let out = engine
            .project(&[(0.0, 0.0), (1.0, 1.0)], Crs::WGS84, Crs::WebMercator)
            .unwrap();
        assert_eq!(out.len(), 2);
        assert!(engine
            .project(&[(0.0, 0.0), (0.0, 89.5)], Crs::WGS84, Crs::WebMercator)
            .is_err());
    }

    #[test]
    fn test_planar_projector_round_trip() {
        let projector = PlanarProjector::new(Crs::WGS84, utm18()).unwrap();
        let coord = CoordinatePair::new(40.6900, -73.9700).unwrap();
        let (x, y) = projector.project(&coord).unwrap();
        let (lon, lat) = projector.unproject(x, y).unwrap();
        assert!((lon - coord.lon()).abs() < 1e-9);
        assert!((lat - coord.lat()).abs() < 1e-9);
        assert_eq!(projector.engine_name(), "builtin");
    }

    #[test]
    fn test_planar_projector_requires_geographic_source() {
        assert!(PlanarProjector::new(Crs::WebMercator, utm18()).is_err());
    }

    #[test]
    fn test_zone_deviation() {
        let projector = PlanarProjector::new(Crs::WGS84, utm18()).unwrap();
        let inside = CoordinatePair::new(40.0, -72.5).unwrap();
        assert!(projector.zone_deviation(&inside).is_none());

        let outside = CoordinatePair::new(34.05, -118.24).unwrap();
        let deviation = projector.zone_deviation(&outside).unwrap();
        assert_eq!(deviation.central_meridian, -75.0);
        assert!((deviation.offset_deg + 43.24).abs() < 1e-9);

        // Still projected, just flagged.
        assert!(projector.project(&outside).is_ok());

        let lenient = projector.clone().with_zone_slack(1.0);
        let edge = CoordinatePair::new(40.0, -71.5).unwrap();
        assert!(projector.zone_deviation(&edge).is_some());
        assert!(lenient.zone_deviation(&edge).is_none());
    }

    #[test]
    fn test_zone_deviation_non_utm_target() {
        let projector = PlanarProjector::new(Crs::WGS84, Crs::WebMercator).unwrap();
        let far = CoordinatePair::new(0.0, 120.0).unwrap();
        assert!(projector.zone_deviation(&far).is_none());
    }

    struct FixedProjector;

    impl Projector for FixedProjector {
        fn name(&self) -> &str {
            "fixed"
        }

        fn transform(&self, _x: f64, _y: f64, _from: Crs, _to: Crs) -> PreprocessingResult<(f64, f64)> {
            Ok((1.0, 2.0))
        }
    }

    #[test]
    fn test_custom_engine() {
        let projector = PlanarProjector::new(Crs::WGS84, utm18())
            .unwrap()
            .with_engine(Arc::new(FixedProjector));
        let coord = CoordinatePair::new(0.0, 0.0).unwrap();
        assert_eq!(projector.project(&coord).unwrap(), (1.0, 2.0));
        assert!(format!("{:?}", projector).contains("fixed"));
    }
}
