use std::time::{Duration, Instant};

/// Run a function once and measure its execution time.
pub fn time_fn<F, R>(f: F) -> (R, Duration)
where
    F: FnOnce() -> R,
{
    let start = Instant::now();
    let result = f();
    (result, start.elapsed())
}

/// Run a function `iterations` times and collect timing statistics.
///
/// Returns the last result alongside the statistics.
pub fn benchmark_fn<F, R>(iterations: usize, f: F) -> (Option<R>, BenchmarkStats)
where
    F: FnMut() -> R,
{
    benchmark_with_warmup(0, iterations, f)
}

/// Like [`benchmark_fn`], discarding the first `warmup` runs.
pub fn benchmark_with_warmup<F, R>(
    warmup: usize,
    iterations: usize,
    mut f: F,
) -> (Option<R>, BenchmarkStats)
where
    F: FnMut() -> R,
{
    for _ in 0..warmup {
        let _ = f();
    }

    let mut last = None;
    let mut times = Vec::with_capacity(iterations);
    for _ in 0..iterations {
        let (result, elapsed) = time_fn(&mut f);
        times.push(elapsed.as_secs_f64() * 1000.0);
        last = Some(result);
    }

    (last, BenchmarkStats::from_times(times))
}

/// Timing statistics in milliseconds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BenchmarkStats {
    pub iterations: usize,
    pub mean_ms: f64,
    pub std_dev_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub median_ms: f64,
    pub p95_ms: f64,
}

impl BenchmarkStats {
    /// Calculate statistics from a list of times in milliseconds.
    ///
    /// An empty list yields all-zero statistics.
    pub fn from_times(mut times: Vec<f64>) -> Self {
        let n = times.len();
        if n == 0 {
            return Self::default();
        }
        times.sort_by(f64::total_cmp);

        let mean = times.iter().sum::<f64>() / n as f64;
        let variance = times.iter().map(|&t| (t - mean).powi(2)).sum::<f64>() / n as f64;
        let median = if n % 2 == 0 {
            (times[n / 2 - 1] + times[n / 2]) / 2.0
        } else {
            times[n / 2]
        };
        let p95_idx = ((n as f64 * 0.95) as usize).min(n - 1);

        Self {
            iterations: n,
            mean_ms: mean,
            std_dev_ms: variance.sqrt(),
            min_ms: times[0],
            max_ms: times[n - 1],
            median_ms: median,
            p95_ms: times[p95_idx],
        }
    }

    /// Rows processed per second at the median time.
    pub fn rows_per_sec(&self, rows: usize) -> f64 {
        if self.median_ms <= 0.0 {
            return f64::INFINITY;
        }
        rows as f64 / (self.median_ms / 1000.0)
    }
}
