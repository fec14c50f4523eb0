//! Benchmark utilities for the geofeatures transform stages.
//!
//! - Seeded synthetic trip generation around a city center
//! - Timing and benchmarking utilities

pub mod data;
pub mod utils;

pub use data::{SyntheticTrips, NYC_CENTER, SPREAD_DEG};
pub use utils::{benchmark_fn, benchmark_with_warmup, time_fn, BenchmarkStats};
