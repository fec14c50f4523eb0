use geofeatures::{CoordinatePair, PreprocessingResult, Trip, TripBatch};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Midtown Manhattan, `(lat, lon)` in degrees.
pub const NYC_CENTER: (f64, f64) = (40.7580, -73.9855);

/// Maximum offset from [`NYC_CENTER`] in either axis, degrees.
pub const SPREAD_DEG: f64 = 0.15;

/// Seeded generator of trips scattered around [`NYC_CENTER`].
///
/// The same seed always yields the same trips.
///
/// # Example
///
/// ```
/// use benchmarks::data::SyntheticTrips;
///
/// let batch = SyntheticTrips::new(42).batch(100).unwrap();
/// assert_eq!(batch.len(), 100);
/// ```
#[derive(Debug, Clone)]
pub struct SyntheticTrips {
    rng: StdRng,
}

impl SyntheticTrips {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn next_offset(&mut self) -> f64 {
        self.rng.gen_range(-SPREAD_DEG..=SPREAD_DEG)
    }

    /// Next coordinate.
    pub fn coordinate(&mut self) -> PreprocessingResult<CoordinatePair> {
        let lat = NYC_CENTER.0 + self.next_offset();
        let lon = NYC_CENTER.1 + self.next_offset();
        CoordinatePair::new(lat, lon)
    }

    /// `n` coordinates.
    pub fn coordinates(&mut self, n: usize) -> PreprocessingResult<Vec<CoordinatePair>> {
        (0..n).map(|_| self.coordinate()).collect()
    }

    /// A batch of `n` trips with ids `0..n`.
    pub fn batch(&mut self, n: usize) -> PreprocessingResult<TripBatch> {
        let trips = (0..n as u64)
            .map(|id| Ok(Trip::new(id, self.coordinate()?, self.coordinate()?)))
            .collect::<PreprocessingResult<Vec<_>>>()?;
        TripBatch::from_trips(trips)
    }

    /// The same trips as [`batch`](Self::batch), rendered as a delimited table.
    pub fn csv(&mut self, n: usize) -> PreprocessingResult<String> {
        let mut out = String::from("trip_id,pickup_lat,pickup_lon,dropoff_lat,dropoff_lon\n");
        for trip in self.batch(n)?.iter() {
            out.push_str(&format!(
                "{},{},{},{},{}\n",
                trip.id(),
                trip.pickup().lat(),
                trip.pickup().lon(),
                trip.dropoff().lat(),
                trip.dropoff().lon()
            ));
        }
        Ok(out)
    }

    /// An `n x 2` matrix of easting/northing-like values for scaler benchmarks.
    pub fn planar_matrix(&mut self, n: usize) -> Array2<f64> {
        Array2::from_shape_fn((n, 2), |(_, col)| {
            let base = if col == 0 { 585_000.0 } else { 4_510_000.0 };
            base + self.next_offset() * 100_000.0
        })
    }
}
