//! Synthetic trip data for benchmarks.

mod synthetic;

pub use synthetic::{SyntheticTrips, NYC_CENTER, SPREAD_DEG};
