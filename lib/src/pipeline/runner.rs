//! Runs the stages over a batch, fits or reuses the scaler, and assembles the table.

use super::config::PipelineConfig;
use super::report::{Advisory, PipelineReport};
use super::stage::{DistanceStage, FeatureStage, ProjectionStage, SphericalStage};
use crate::dataset::{read_trips, Trip, TripBatch};
use crate::features::{EndpointColumns, FeatureRecord, FeatureSchema, FeatureTable, Open};
use crate::preprocessing::distance::HaversineEstimator;
use crate::preprocessing::error::{ErrorPolicy, PreprocessingError, PreprocessingResult, RowFailure};
use crate::preprocessing::projection::{BuiltinProjector, PlanarProjector, Projector};
use crate::preprocessing::scaling::{RangeScaler, ScalerState};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::Array2;
use std::io::Read;
use std::sync::Arc;

/// Output of one run.
#[derive(Debug, Clone)]
pub struct FeatureRun {
    pub table: FeatureTable,
    /// Scaler state applied to this batch. `None` when no trip survived.
    pub scaler_state: Option<ScalerState>,
    pub report: PipelineReport,
}

type RowOutput = PreprocessingResult<(FeatureRecord<Open>, Vec<Advisory>)>;

/// Distance, projection, encoding and scaling over a [`TripBatch`].
///
/// # Example
/// ```rust
/// use geofeatures::dataset::{Trip, TripBatch};
/// use geofeatures::pipeline::{FeaturePipeline, PipelineConfig};
///
/// let batch = TripBatch::from_trips(vec![
///     Trip::from_degrees(1, 40.7580, -73.9855, 40.6900, -73.9700).unwrap(),
///     Trip::from_degrees(2, 40.7484, -73.9857, 40.7061, -74.0087).unwrap(),
/// ])
/// .unwrap();
///
/// let pipeline = FeaturePipeline::new(PipelineConfig::default()).unwrap();
/// let run = pipeline.run(&batch).unwrap();
/// assert_eq!(run.table.len(), 2);
/// assert_eq!(run.table.get(1).unwrap().get("pickup_y_scaled"), Some(1.0));
/// ```
pub struct FeaturePipeline {
    config: PipelineConfig,
    schema: FeatureSchema,
    stages: Vec<Box<dyn FeatureStage>>,
    scaler: RangeScaler,
}

impl std::fmt::Debug for FeaturePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeaturePipeline")
            .field("config", &self.config)
            .field("stages", &self.stage_names())
            .finish()
    }
}

impl FeaturePipeline {
    /// Pipeline using the built-in projection engine.
    pub fn new(config: PipelineConfig) -> PreprocessingResult<Self> {
        Self::with_projector(config, Arc::new(BuiltinProjector::new()))
    }

    /// Pipeline using a caller-supplied projection engine.
    ///
    /// # Errors
    /// Returns the first problem reported by [`PipelineConfig::validate`].
    pub fn with_projector(config: PipelineConfig, engine: Arc<dyn Projector>) -> PreprocessingResult<Self> {
        config.validate()?;

        let schema = FeatureSchema::new(config.include_dropoff);
        let endpoints = schema.endpoints();
        let projector = PlanarProjector::new(config.source_crs, config.target_crs)?
            .with_engine(engine)
            .with_zone_slack(config.zone_slack_deg);

        let stages: Vec<Box<dyn FeatureStage>> = vec![
            Box::new(DistanceStage::new(HaversineEstimator::with_radius_km(
                config.earth_radius_km,
            )?)),
            Box::new(ProjectionStage::new(projector, endpoints)),
            Box::new(SphericalStage::new(endpoints)),
        ];
        let scaler = config.scaler()?;

        log::debug!(
            "Built pipeline {} -> {} with {} stages",
            config.source_crs,
            config.target_crs,
            stages.len()
        );

        Ok(Self {
            config,
            schema,
            stages,
            scaler,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.stage_name()).collect()
    }

    /// Full output header, `trip_id` first.
    pub fn columns(&self) -> Vec<&'static str> {
        self.schema.header()
    }

    /// Process a batch, fitting a fresh scaler state on it.
    ///
    /// # Errors
    /// - Under [`ErrorPolicy::FailFast`], the first row error in input order.
    /// - Scaler fit failures, such as a degenerate column under
    ///   [`DegeneratePolicy::Reject`](crate::preprocessing::DegeneratePolicy::Reject),
    ///   regardless of policy.
    pub fn run(&self, batch: &TripBatch) -> PreprocessingResult<FeatureRun> {
        self.execute(batch, None)
    }

    /// Process a batch with a previously fitted scaler state.
    ///
    /// The state is not refitted; values outside its range scale outside
    /// the target range.
    ///
    /// # Errors
    /// Returns [`PreprocessingError::InvalidParameter`] if `state` has
    /// inconsistent bounds, e.g. after hand-editing a saved state.
    pub fn run_with_state(&self, batch: &TripBatch, state: &ScalerState) -> PreprocessingResult<FeatureRun> {
        let state = ScalerState::from_params(state.clone())?;
        self.execute(batch, Some(&state))
    }

    /// Read CSV trips and process them. Input rows rejected while reading are
    /// merged into the report ahead of the run's own failures.
    pub fn run_reader<R: Read>(&self, reader: R) -> PreprocessingResult<FeatureRun> {
        let (batch, input_failures) = read_trips(reader, self.config.error_policy)?;
        let mut run = self.run(&batch)?;
        run.report = run.report.with_input_failures(input_failures);
        Ok(run)
    }

    fn process_trip(&self, trip: &Trip) -> RowOutput {
        let mut record = FeatureRecord::new(trip.id());
        let mut advisories = Vec::new();
        for stage in &self.stages {
            stage.apply(trip, &mut record, &mut advisories)?;
        }
        Ok((record, advisories))
    }

    fn map_rows(&self, trips: &[Trip]) -> Vec<RowOutput> {
        if self.config.parallel {
            return self.map_rows_parallel(trips);
        }
        trips.iter().map(|t| self.process_trip(t)).collect()
    }

    #[cfg(feature = "parallel")]
    fn map_rows_parallel(&self, trips: &[Trip]) -> Vec<RowOutput> {
        use rayon::prelude::*;
        // Indexed collect keeps input order.
        trips.par_iter().map(|t| self.process_trip(t)).collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn map_rows_parallel(&self, trips: &[Trip]) -> Vec<RowOutput> {
        log::debug!("Parallel processing requested but the `parallel` feature is disabled");
        trips.iter().map(|t| self.process_trip(t)).collect()
    }

    fn execute(&self, batch: &TripBatch, state: Option<&ScalerState>) -> PreprocessingResult<FeatureRun> {
        let trips = batch.as_slice();
        log::debug!("Running {} row stages over {} trips", self.stages.len(), trips.len());

        let mut report = PipelineReport {
            rows_in: trips.len(),
            ..Default::default()
        };
        let mut records = Vec::with_capacity(trips.len());

        for (row, (trip, output)) in trips.iter().zip(self.map_rows(trips)).enumerate() {
            match output {
                Ok((record, advisories)) => {
                    records.push(record);
                    report.advisories.extend(advisories);
                }
                Err(error) if self.config.error_policy == ErrorPolicy::FailFast => {
                    log::warn!("Aborting at trip {}: {}", trip.id(), error);
                    return Err(error);
                }
                Err(error) => {
                    log::warn!(
                        "Skipping trip {} ({}): {}",
                        trip.id(),
                        if error.is_validation() { "invalid input" } else { "transform failed" },
                        error
                    );
                    report.failures.push(RowFailure {
                        row,
                        trip_id: Some(trip.id()),
                        error,
                    });
                }
            }
        }

        let scaler_state = self.scale(&mut records, state, &mut report)?;

        let mut table = FeatureTable::new(self.schema.clone());
        for record in records {
            table.push(record.finalize(&self.schema)?)?;
        }
        report.rows_out = table.len();

        log::info!("Feature pipeline finished: {}", report);
        Ok(FeatureRun {
            table,
            scaler_state,
            report,
        })
    }

    /// Fit (or reuse) the scaler on projected metres and add the scaled columns.
    fn scale(
        &self,
        records: &mut [FeatureRecord<Open>],
        state: Option<&ScalerState>,
        report: &mut PipelineReport,
    ) -> PreprocessingResult<Option<ScalerState>> {
        let columns: Vec<&EndpointColumns> = self
            .schema
            .endpoints()
            .iter()
            .map(|&e| EndpointColumns::of(e))
            .collect();

        if records.is_empty() {
            log::debug!("No trips left to scale");
            return Ok(state.cloned());
        }

        let matrix = planar_matrix(records, &columns)?;
        let state = match state {
            Some(state) => state.clone(),
            None => self.scaler.fit(&matrix)?,
        };
        let scaled = state.transform(&matrix)?;

        for &col in state.degenerate_columns() {
            let (Some(endpoint), Some(&value)) = (columns.get(col / 2), state.data_min().get(col))
            else {
                continue;
            };
            let column = if col % 2 == 0 { endpoint.x_scaled } else { endpoint.y_scaled };
            let advisory = Advisory::DegenerateScale { column, value };
            log::warn!("{}", advisory);
            report.advisories.push(advisory);
        }

        for (record, row) in records.iter_mut().zip(scaled.rows()) {
            for (i, cols) in columns.iter().enumerate() {
                record.insert(cols.x_scaled, row[2 * i])?;
                record.insert(cols.y_scaled, row[2 * i + 1])?;
            }
        }
        Ok(Some(state))
    }
}

/// `[x, y]` metres per endpoint, one row per record.
fn planar_matrix(records: &[FeatureRecord<Open>], columns: &[&EndpointColumns]) -> PreprocessingResult<Array2<f64>> {
    let mut matrix = Array2::zeros((records.len(), columns.len() * 2));
    for (mut row, record) in matrix.rows_mut().into_iter().zip(records) {
        for (i, cols) in columns.iter().enumerate() {
            row[2 * i] = required(record, cols.x_meters)?;
            row[2 * i + 1] = required(record, cols.y_meters)?;
        }
    }
    Ok(matrix)
}

fn required(record: &FeatureRecord<Open>, name: &'static str) -> PreprocessingResult<f64> {
    record
        .get(name)
        .ok_or(PreprocessingError::MissingFeature {
            trip_id: record.trip_id(),
            feature: name,
        })
}
