//! Feature records and the finalized feature table.
//!
//! Every pipeline stage writes into a [`FeatureRecord<Open>`]. When all stages
//! have run, records are finalized against a [`FeatureSchema`] and collected
//! into a [`FeatureTable`] whose column order is fixed:
//!
//! ```text
//! trip_id, distance_km,
//! pickup_x_meters, pickup_y_meters,
//! pickup_lon_sin, pickup_lon_cos, pickup_lat_sin, pickup_lat_cos,
//! pickup_x_scaled, pickup_y_scaled,
//! [dropoff_* in the same order]
//! ```

pub mod columns;
mod record;
mod state;
mod table;

pub use columns::{EndpointColumns, FeatureSchema, DISTANCE_KM, TRIP_ID};
pub use record::FeatureRecord;
pub use state::{Finalized, Open, RecordState};
pub use table::FeatureTable;
