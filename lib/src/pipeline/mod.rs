//! Orchestration: config, row stages, batch-wide scaling and reporting.
//!
//! ```text
//! TripBatch
//!   |-- DistanceStage      -> distance_km
//!   |-- ProjectionStage    -> *_x_meters, *_y_meters   (+ out-of-zone advisories)
//!   |-- SphericalStage     -> *_lon_sin/cos, *_lat_sin/cos
//!   '-- RangeScaler (fit over the batch, or a supplied ScalerState)
//!                          -> *_x_scaled, *_y_scaled
//!        => FeatureTable + ScalerState + PipelineReport
//! ```

mod config;
mod report;
mod runner;
mod stage;

pub use crate::preprocessing::error::{ErrorPolicy, RowFailure};
pub use config::PipelineConfig;
pub use report::{Advisory, PipelineReport};
pub use runner::{FeaturePipeline, FeatureRun};
pub use stage::{DistanceStage, FeatureStage, ProjectionStage, SphericalStage};
