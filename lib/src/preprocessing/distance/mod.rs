//! Great-circle distance between trip endpoints.

pub mod haversine;

pub use haversine::{haversine_km, HaversineEstimator, EARTH_RADIUS_KM};
