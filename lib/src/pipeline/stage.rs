//! Row-wise feature stages.
//!
//! Each stage reads one [`Trip`] and adds its columns to the trip's open
//! record. Stages never depend on other rows, so they can run in any order
//! and in parallel. Scaling is batch-wide and lives in the runner.

use super::report::Advisory;
use crate::dataset::{Trip, TripEndpoint};
use crate::features::{EndpointColumns, FeatureRecord, Open, DISTANCE_KM};
use crate::preprocessing::distance::HaversineEstimator;
use crate::preprocessing::encoding::SphericalEncoder;
use crate::preprocessing::error::PreprocessingResult;
use crate::preprocessing::projection::PlanarProjector;

/// A pure per-trip transform.
pub trait FeatureStage: Send + Sync {
    /// Name for logs.
    fn stage_name(&self) -> &'static str;

    /// Columns this stage adds.
    fn output_columns(&self) -> Vec<&'static str>;

    /// Add this stage's features for `trip` to `record`.
    ///
    /// Non-fatal findings go into `advisories`.
    fn apply(
        &self,
        trip: &Trip,
        record: &mut FeatureRecord<Open>,
        advisories: &mut Vec<Advisory>,
    ) -> PreprocessingResult<()>;
}

/// Pickup to dropoff great-circle distance.
#[derive(Debug, Clone, Default)]
pub struct DistanceStage {
    estimator: HaversineEstimator,
}

impl DistanceStage {
    pub fn new(estimator: HaversineEstimator) -> Self {
        Self { estimator }
    }
}

impl FeatureStage for DistanceStage {
    fn stage_name(&self) -> &'static str {
        "haversine_distance"
    }

    fn output_columns(&self) -> Vec<&'static str> {
        vec![DISTANCE_KM]
    }

    fn apply(
        &self,
        trip: &Trip,
        record: &mut FeatureRecord<Open>,
        _advisories: &mut Vec<Advisory>,
    ) -> PreprocessingResult<()> {
        let km = self.estimator.distance_between(trip.pickup(), trip.dropoff());
        record.insert(DISTANCE_KM, km)
    }
}

/// Planar `(x, y)` in metres for each configured endpoint.
#[derive(Debug, Clone)]
pub struct ProjectionStage {
    projector: PlanarProjector,
    endpoints: &'static [TripEndpoint],
}

impl ProjectionStage {
    pub fn new(projector: PlanarProjector, endpoints: &'static [TripEndpoint]) -> Self {
        Self {
            projector,
            endpoints,
        }
    }
}

impl FeatureStage for ProjectionStage {
    fn stage_name(&self) -> &'static str {
        "planar_projection"
    }

    fn output_columns(&self) -> Vec<&'static str> {
        self.endpoints
            .iter()
            .flat_map(|&e| {
                let cols = EndpointColumns::of(e);
                [cols.x_meters, cols.y_meters]
            })
            .collect()
    }

    fn apply(
        &self,
        trip: &Trip,
        record: &mut FeatureRecord<Open>,
        advisories: &mut Vec<Advisory>,
    ) -> PreprocessingResult<()> {
        for &endpoint in self.endpoints {
            let coord = endpoint.of(trip);
            let cols = EndpointColumns::of(endpoint);

            let (x, y) = self.projector.project(coord)?;
            record.insert(cols.x_meters, x)?;
            record.insert(cols.y_meters, y)?;

            if let Some(deviation) = self.projector.zone_deviation(coord) {
                let advisory = Advisory::CoordinateOutOfZone {
                    trip_id: trip.id(),
                    lon: coord.lon(),
                    lat: coord.lat(),
                    central_meridian: deviation.central_meridian,
                    offset_deg: deviation.offset_deg,
                };
                log::warn!("Coordinate out of zone {}: {}", self.projector.target(), advisory);
                advisories.push(advisory);
            }
        }
        Ok(())
    }
}

/// `(sin, cos)` of longitude and latitude for each configured endpoint.
#[derive(Debug, Clone)]
pub struct SphericalStage {
    encoder: SphericalEncoder,
    endpoints: &'static [TripEndpoint],
}

impl SphericalStage {
    pub fn new(endpoints: &'static [TripEndpoint]) -> Self {
        Self {
            encoder: SphericalEncoder::new(),
            endpoints,
        }
    }
}

impl FeatureStage for SphericalStage {
    fn stage_name(&self) -> &'static str {
        "spherical_encoding"
    }

    fn output_columns(&self) -> Vec<&'static str> {
        self.endpoints
            .iter()
            .flat_map(|&e| {
                let cols = EndpointColumns::of(e);
                [cols.lon_sin, cols.lon_cos, cols.lat_sin, cols.lat_cos]
            })
            .collect()
    }

    fn apply(
        &self,
        trip: &Trip,
        record: &mut FeatureRecord<Open>,
        _advisories: &mut Vec<Advisory>,
    ) -> PreprocessingResult<()> {
        for &endpoint in self.endpoints {
            let encoded = self.encoder.encode_pair(endpoint.of(trip))?;
            let cols = EndpointColumns::of(endpoint);
            record.insert(cols.lon_sin, encoded.lon.sin)?;
            record.insert(cols.lon_cos, encoded.lon.cos)?;
            record.insert(cols.lat_sin, encoded.lat.sin)?;
            record.insert(cols.lat_cos, encoded.lat.cos)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::projection::Crs;
    use crate::preprocessing::PreprocessingError;

    fn trip() -> Trip {
        Trip::from_degrees(1, 40.7580, -73.9855, 40.6900, -73.9700).unwrap()
    }

    fn projector() -> PlanarProjector {
        PlanarProjector::new(Crs::WGS84, Crs::from_epsg(32618).unwrap()).unwrap()
    }

    #[test]
    fn test_distance_stage() {
        let mut record = FeatureRecord::new(1);
        let mut advisories = Vec::new();
        DistanceStage::default()
            .apply(&trip(), &mut record, &mut advisories)
            .unwrap();
        let km = record.get(DISTANCE_KM).unwrap();
        assert!((km - 7.673).abs() < 1e-3, "got {}", km);
    }

    #[test]
    fn test_projection_stage_both_endpoints() {
        let stage = ProjectionStage::new(projector(), &[TripEndpoint::Pickup, TripEndpoint::Dropoff]);
        assert_eq!(
            stage.output_columns(),
            vec!["pickup_x_meters", "pickup_y_meters", "dropoff_x_meters", "dropoff_y_meters"]
        );

        let mut record = FeatureRecord::new(1);
        let mut advisories = Vec::new();
        stage.apply(&trip(), &mut record, &mut advisories).unwrap();
        assert_eq!(record.len(), 4);
        assert!(advisories.is_empty());
        assert!(record.get("pickup_y_meters").unwrap() > record.get("dropoff_y_meters").unwrap());
    }

    #[test]
    fn test_projection_stage_flags_out_of_zone() {
        let stage = ProjectionStage::new(projector(), &[TripEndpoint::Pickup]);
        let la = Trip::from_degrees(2, 34.05, -118.24, 34.0, -118.0).unwrap();
        let mut record = FeatureRecord::new(2);
        let mut advisories = Vec::new();
        stage.apply(&la, &mut record, &mut advisories).unwrap();
        assert!(matches!(
            advisories.as_slice(),
            [Advisory::CoordinateOutOfZone { trip_id: 2, .. }]
        ));
        assert!(record.contains("pickup_x_meters"));
    }

    #[test]
    fn test_spherical_stage() {
        let stage = SphericalStage::new(&[TripEndpoint::Pickup]);
        let mut record = FeatureRecord::new(1);
        let mut advisories = Vec::new();
        stage.apply(&trip(), &mut record, &mut advisories).unwrap();
        let (s, c) = (record.get("pickup_lat_sin").unwrap(), record.get("pickup_lat_cos").unwrap());
        assert!((s * s + c * c - 1.0).abs() < 1e-12);
        assert_eq!(stage.output_columns().len(), 4);
    }

    #[test]
    fn test_stage_applied_twice_is_overwrite() {
        let stage = DistanceStage::default();
        let mut record = FeatureRecord::new(1);
        let mut advisories = Vec::new();
        stage.apply(&trip(), &mut record, &mut advisories).unwrap();
        assert!(matches!(
            stage.apply(&trip(), &mut record, &mut advisories),
            Err(PreprocessingError::FeatureOverwrite { .. })
        ));
    }
}
