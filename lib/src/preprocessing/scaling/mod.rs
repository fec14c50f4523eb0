//! Range scaling for planar coordinates.
//!
//! | Type | Role |
//! |------|------|
//! | [`RangeScaler`] | Unfitted scaler: target range plus [`DegeneratePolicy`] |
//! | [`ScalerState`] | Learned per-column min/max, owned by the caller |

pub mod minmax;

pub use minmax::{DegeneratePolicy, RangeScaler, RangeScalerConfig, ScalerState};
