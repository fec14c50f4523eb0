//! Lifecycle markers for [`FeatureRecord`](super::FeatureRecord).
//!
//! ```text
//! Open --finalize()--> Finalized
//!  |                      |
//!  +-- insert()           +-- read-only
//! ```

/// Marker trait for record states.
pub trait RecordState: Clone + Copy + Default + std::fmt::Debug + Send + Sync + 'static {}

/// Stages are still adding features.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct Open;

impl RecordState for Open {}

/// All columns present and ordered; no further writes.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct Finalized;

impl RecordState for Finalized {}
