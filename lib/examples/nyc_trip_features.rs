//! NYC Taxi Trip Features Example
//!
//! Three near-identical Midtown Manhattan -> Downtown Brooklyn trips run
//! through the full pipeline:
//! - Haversine distance
//! - UTM zone 18N projection
//! - sin/cos encoding of latitude and longitude
//! - Min-max scaling of the projected coordinates
//! - Reusing the fitted scaler state on a second batch
//! - CSV export
//!
//! Run with: RUST_LOG=debug cargo run --example nyc_trip_features

use geofeatures::dataset::{Trip, TripBatch};
use geofeatures::pipeline::{FeaturePipeline, PipelineConfig};
use geofeatures::preprocessing::{FittedTransformer, ScalerState};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("=== NYC Trip Features ===\n");

    // 1. Input trips: (id, pickup_lat, pickup_lon, dropoff_lat, dropoff_lon)
    let batch = TripBatch::from_trips(vec![
        Trip::from_degrees(1, 40.7580, -73.9855, 40.6900, -73.9700)?,
        Trip::from_degrees(2, 40.7585, -73.9850, 40.6905, -73.9695)?,
        Trip::from_degrees(3, 40.7600, -73.9840, 40.6920, -73.9680)?,
    ])?;
    println!("1. Loaded {} trips", batch.len());

    // 2. Run with defaults (6371 km, EPSG:4326 -> EPSG:32618, [0, 1] scaling)
    let config = PipelineConfig::default().with_dropoff(true);
    let pipeline = FeaturePipeline::new(config)?;
    println!("2. Stages: {:?}", pipeline.stage_names());

    let run = pipeline.run(&batch)?;
    println!("   {}", run.report);

    // 3. Inspect features
    println!("\n3. Features:");
    for record in &run.table {
        println!(
            "   trip {}: distance = {:.3} km, pickup = ({:.1} m, {:.1} m), scaled = ({:.3}, {:.3})",
            record.trip_id(),
            record.get("distance_km").unwrap_or(f64::NAN),
            record.get("pickup_x_meters").unwrap_or(f64::NAN),
            record.get("pickup_y_meters").unwrap_or(f64::NAN),
            record.get("pickup_x_scaled").unwrap_or(f64::NAN),
            record.get("pickup_y_scaled").unwrap_or(f64::NAN),
        );
    }

    // 4. Persist the scaler state and apply it to a new batch
    let state = run.scaler_state.ok_or("no scaler state fitted")?;
    let path = std::env::temp_dir().join("nyc_scaler_state.bin");
    state.save_to_file(&path)?;
    let loaded = ScalerState::load_from_file(&path)?;
    std::fs::remove_file(&path).ok();

    let next_batch = TripBatch::from_trips(vec![Trip::from_degrees(
        4, 40.7590, -73.9848, 40.6910, -73.9690,
    )?])?;
    let reused = pipeline.run_with_state(&next_batch, &loaded)?;
    let trip4 = reused.table.get(4).ok_or("trip 4 missing")?;
    println!(
        "\n4. Trip 4 with the saved state: scaled pickup = ({:.3}, {:.3})",
        trip4.get("pickup_x_scaled").unwrap_or(f64::NAN),
        trip4.get("pickup_y_scaled").unwrap_or(f64::NAN),
    );

    // 5. Export
    println!("\n5. CSV:\n{}", run.table.to_csv_string()?);

    println!("=== Done ===");
    Ok(())
}
