//! # geofeatures
//!
//! Turn raw WGS84 trip coordinates into features a model can learn from.
//!
//! Raw degrees are a poor model input: they are not linear in distance, they
//! wrap at the antimeridian, and their dynamic range suits gradient descent
//! badly. This crate provides four composable fixes and the data flow between
//! them.
//!
//! ## Core Design Principles
//!
//! - **Validated inputs**: coordinates are checked once, at construction
//!   ([`dataset::CoordinatePair`]); nothing downstream clamps or guesses.
//! - **Explicit learned state**: the only learned transform, the range scaler,
//!   returns its [`ScalerState`](preprocessing::ScalerState) as an owned value.
//!   Reusing it on another batch is always an explicit call.
//! - **Parameterized projection**: the target CRS is configuration, and the
//!   projection engine sits behind the [`Projector`](preprocessing::Projector) trait.
//! - **Lifecycle in types**: feature records are `Open` while stages write to
//!   them and `Finalized` afterwards.
//!
//! ## Quick Start
//!
//! ```rust
//! use geofeatures::dataset::{Trip, TripBatch};
//! use geofeatures::pipeline::{FeaturePipeline, PipelineConfig};
//!
//! let batch = TripBatch::from_trips(vec![
//!     Trip::from_degrees(1, 40.7580, -73.9855, 40.6900, -73.9700).unwrap(),
//!     Trip::from_degrees(2, 40.7585, -73.9850, 40.6905, -73.9695).unwrap(),
//!     Trip::from_degrees(3, 40.7600, -73.9840, 40.6920, -73.9680).unwrap(),
//! ])
//! .unwrap();
//!
//! let pipeline = FeaturePipeline::new(PipelineConfig::default()).unwrap();
//! let run = pipeline.run(&batch).unwrap();
//!
//! let first = run.table.get(1).unwrap();
//! assert!(first.get("distance_km").unwrap() > 7.0);
//! assert_eq!(run.table.header().len(), 10);
//! ```
//!
//! ## Module Structure
//!
//! - `dataset`: coordinates, trips, batches and CSV input
//! - `preprocessing`: distance, projection, spherical encoding, range scaling
//! - `features`: feature records, output schema and the feature table
//! - `pipeline`: configuration, stages, runner and run report
//! - `serialization`: byte encoding of fitted state

/// Trip data model and input readers.
pub mod dataset;

/// Feature records and the output table.
pub mod features;

/// Orchestration of all transforms over a trip batch.
pub mod pipeline;

/// Coordinate transforms.
pub mod preprocessing;

/// Persistence of fitted transformer state.
pub mod serialization;

pub use dataset::{CoordinatePair, Trip, TripBatch, TripId};
pub use features::{FeatureRecord, FeatureTable};
pub use pipeline::{ErrorPolicy, FeaturePipeline, FeatureRun, PipelineConfig, PipelineReport};
pub use preprocessing::{PreprocessingError, PreprocessingResult};
