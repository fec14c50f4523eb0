//! Cyclical encoding of coordinates.
//!
//! ```text
//! lon = 179.9   ->  (sin, cos) = ( 0.0017, -0.99999)
//! lon = -179.9  ->  (sin, cos) = (-0.0017, -0.99999)
//! ```

mod spherical;

pub use spherical::{EncodedCoordinate, SphericalEncoder, SphericalEncoding};
