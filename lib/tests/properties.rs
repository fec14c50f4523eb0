use geofeatures::dataset::CoordinatePair;
use geofeatures::preprocessing::{
    Crs, FittedTransformer, HaversineEstimator, PlanarProjector, RangeScaler, SphericalEncoding,
    Transformer,
};
use ndarray::Array2;
use proptest::prelude::*;
use std::f64::consts::PI;

fn coordinate() -> impl Strategy<Value = CoordinatePair> {
    (-90.0..=90.0f64, -180.0..=180.0f64)
        .prop_map(|(lat, lon)| CoordinatePair::new(lat, lon).unwrap())
}

proptest! {
    #[test]
    fn haversine_is_symmetric(a in coordinate(), b in coordinate()) {
        let est = HaversineEstimator::new();
        let ab = est.distance_between(&a, &b);
        let ba = est.distance_between(&b, &a);
        prop_assert!((ab - ba).abs() <= 1e-9 * ab.max(1.0));
    }

    #[test]
    fn haversine_self_distance_is_zero(a in coordinate()) {
        prop_assert_eq!(HaversineEstimator::new().distance_between(&a, &a), 0.0);
    }

    #[test]
    fn haversine_is_bounded(a in coordinate(), b in coordinate()) {
        let est = HaversineEstimator::new();
        let d = est.distance_between(&a, &b);
        prop_assert!(d >= 0.0);
        prop_assert!(d <= PI * est.radius_km() + 1e-9);
    }

    #[test]
    fn spherical_encoding_on_unit_circle(angle in -180.0..=180.0f64) {
        let e = SphericalEncoding::encode(angle).unwrap();
        prop_assert!((e.sin * e.sin + e.cos * e.cos - 1.0).abs() < 1e-12);
        prop_assert!((-1.0..=1.0).contains(&e.sin) && (-1.0..=1.0).contains(&e.cos));
    }

    #[test]
    fn spherical_encoding_continuous_at_antimeridian(delta in 0.0..0.1f64) {
        let east = SphericalEncoding::encode(180.0 - delta).unwrap();
        let west = SphericalEncoding::encode(-180.0 + delta).unwrap();
        prop_assert!((east.sin - west.sin).abs() < 0.01);
        prop_assert!((east.cos - west.cos).abs() < 0.01);
    }

    #[test]
    fn scaler_output_within_unit_range(
        values in prop::collection::vec((-1e7..1e7f64, -1e7..1e7f64), 2..50)
    ) {
        let data = Array2::from_shape_fn((values.len(), 2), |(i, j)| {
            if j == 0 { values[i].0 } else { values[i].1 }
        });
        let state = RangeScaler::new().fit(&data).unwrap();
        let scaled = state.transform(&data).unwrap();
        prop_assert!(scaled.iter().all(|v| (0.0..=1.0).contains(v)));

        for col in 0..2 {
            if state.is_degenerate(col) {
                continue;
            }
            let column = data.column(col);
            let (argmin, argmax) = (0..values.len()).fold((0, 0), |(lo, hi), i| {
                (
                    if column[i] < column[lo] { i } else { lo },
                    if column[i] > column[hi] { i } else { hi },
                )
            });
            prop_assert_eq!(scaled[[argmin, col]], 0.0);
            prop_assert_eq!(scaled[[argmax, col]], 1.0);
        }
    }

    #[test]
    fn utm_round_trip_within_zone(
        zone in 1u8..=60,
        offset in -3.0..3.0f64,
        lat in -80.0..84.0f64,
    ) {
        let target = Crs::utm(zone, lat >= 0.0).unwrap();
        let lon = target.central_meridian().unwrap() + offset;
        let projector = PlanarProjector::new(Crs::WGS84, target).unwrap();
        let coord = CoordinatePair::new(lat, lon).unwrap();

        let (x, y) = projector.project(&coord).unwrap();
        let (lon2, lat2) = projector.unproject(x, y).unwrap();
        prop_assert!((lat2 - lat).abs() < 1e-9, "lat {} -> {}", lat, lat2);
        prop_assert!((lon2 - lon).abs() < 1e-9, "lon {} -> {}", lon, lon2);
    }

    #[test]
    fn web_mercator_round_trip(lat in -85.0..85.0f64, lon in -179.0..179.0f64) {
        let projector = PlanarProjector::new(Crs::WGS84, Crs::WebMercator).unwrap();
        let coord = CoordinatePair::new(lat, lon).unwrap();
        let (x, y) = projector.project(&coord).unwrap();
        let (lon2, lat2) = projector.unproject(x, y).unwrap();
        prop_assert!((lat2 - lat).abs() < 1e-9);
        prop_assert!((lon2 - lon).abs() < 1e-9);
    }
}
