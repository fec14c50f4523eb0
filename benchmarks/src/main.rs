// Quick throughput report for each transform stage.
// For statistically sound numbers use `cargo bench --package benchmarks`.

use benchmarks::{benchmark_with_warmup, BenchmarkStats, SyntheticTrips};
use geofeatures::preprocessing::{
    Crs, FittedTransformer, HaversineEstimator, PlanarProjector, RangeScaler, SphericalEncoder,
    Transformer,
};
use geofeatures::{FeaturePipeline, PipelineConfig, PreprocessingResult};

const ROWS: usize = 10_000;
const WARMUP: usize = 3;
const ITERATIONS: usize = 20;

fn report(name: &str, stats: &BenchmarkStats) {
    println!(
        "{:<22} median {:>9.3} ms  p95 {:>9.3} ms  {:>12.0} rows/s",
        name,
        stats.median_ms,
        stats.p95_ms,
        stats.rows_per_sec(ROWS)
    );
}

fn main() -> PreprocessingResult<()> {
    println!("geofeatures throughput ({} rows, {} iterations)", ROWS, ITERATIONS);
    println!();

    let batch = SyntheticTrips::new(42).batch(ROWS)?;
    let coords: Vec<_> = batch.iter().map(|t| *t.pickup()).collect();

    let estimator = HaversineEstimator::new();
    let (_, stats) = benchmark_with_warmup(WARMUP, ITERATIONS, || {
        batch
            .iter()
            .map(|t| estimator.distance_between(t.pickup(), t.dropoff()))
            .sum::<f64>()
    });
    report("haversine", &stats);

    let projector = PlanarProjector::new(Crs::Geographic, Crs::Utm { zone: 18, north: true })?;
    let (_, stats) = benchmark_with_warmup(WARMUP, ITERATIONS, || projector.project_all(&coords));
    report("utm_projection", &stats);

    let encoder = SphericalEncoder::new();
    let (_, stats) = benchmark_with_warmup(WARMUP, ITERATIONS, || {
        coords
            .iter()
            .map(|c| encoder.encode_pair(c))
            .collect::<Result<Vec<_>, _>>()
    });
    report("spherical_encoding", &stats);

    let matrix = SyntheticTrips::new(42).planar_matrix(ROWS);
    let scaler = RangeScaler::new();
    let (_, stats) = benchmark_with_warmup(WARMUP, ITERATIONS, || {
        scaler.fit(&matrix).and_then(|state| state.transform(&matrix))
    });
    report("range_scaler", &stats);

    let config = PipelineConfig::default().with_dropoff(true);
    let pipeline = FeaturePipeline::new(config)?;
    let (_, stats) = benchmark_with_warmup(WARMUP, ITERATIONS, || pipeline.run(&batch));
    report("full_pipeline", &stats);
    Ok(())
}
