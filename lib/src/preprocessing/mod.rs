//! Coordinate transforms that turn raw trip coordinates into model features.
//!
//! # Components
//!
//! | Component | Kind | Output per coordinate |
//! |-----------|------|-----------------------|
//! | [`HaversineEstimator`] | stateless | one distance per trip, km |
//! | [`PlanarProjector`] | stateless | `(x, y)` metres in a target CRS |
//! | [`SphericalEncoder`] | stateless | `(sin, cos)` for lon and lat |
//! | [`RangeScaler`] | fitted | projected metres mapped onto `[0, 1]` |
//!
//! Only the range scaler learns anything. Its learned [`ScalerState`] is an
//! ordinary owned value returned by [`Transformer::fit`]; nothing is cached
//! inside the scaler, so scaling a second batch with the first batch's state
//! is always an explicit call.
//!
//! # Example
//!
//! ```rust
//! use geofeatures::dataset::CoordinatePair;
//! use geofeatures::preprocessing::{
//!     Crs, FittedTransformer, HaversineEstimator, PlanarProjector, RangeScaler, Transformer,
//! };
//! use ndarray::Array2;
//!
//! let a = CoordinatePair::new(40.7580, -73.9855).unwrap();
//! let b = CoordinatePair::new(40.6900, -73.9700).unwrap();
//! let km = HaversineEstimator::new().distance_between(&a, &b);
//! assert!(km > 7.0 && km < 8.0);
//!
//! let projector = PlanarProjector::new(Crs::WGS84, Crs::from_epsg(32618).unwrap()).unwrap();
//! let points = projector.project_all(&[a, b]).unwrap();
//! let matrix = Array2::from_shape_fn((2, 2), |(i, j)| if j == 0 { points[i].0 } else { points[i].1 });
//!
//! let state = RangeScaler::new().fit(&matrix).unwrap();
//! let scaled = state.transform(&matrix).unwrap();
//! assert_eq!(scaled[[0, 1]], 1.0);
//! ```

pub mod distance;
pub mod encoding;
pub mod error;
pub mod projection;
pub mod scaling;
pub mod traits;

pub use distance::{haversine_km, HaversineEstimator, EARTH_RADIUS_KM};
pub use encoding::{EncodedCoordinate, SphericalEncoder, SphericalEncoding};
pub use error::{ErrorPolicy, PreprocessingError, PreprocessingResult, RowFailure};
pub use projection::{BuiltinProjector, Crs, PlanarProjector, Projector, ZoneDeviation};
pub use scaling::{DegeneratePolicy, RangeScaler, RangeScalerConfig, ScalerState};
pub use traits::{FittedTransformer, Transformer};
