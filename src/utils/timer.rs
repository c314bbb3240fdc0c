//! Wall-clock timing for benchmark iterations.
//!
//! Every iteration is timed on its own so the report can show the spread
//! (min, max, standard deviation) next to the average the speedup is
//! computed from.

use std::hint::black_box;
use std::time::Duration;

/// Time a single expression, returning `(elapsed, value)`.
#[macro_export]
macro_rules! measure {
    ($e:expr) => {{
        let start = ::std::time::Instant::now();
        let value = $e;
        (start.elapsed(), value)
    }};
}

/// Timing statistics over a number of iterations
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Timing {
    /// Average time per iteration
    pub avg_time: Duration,
    /// Median time
    pub median_time: Duration,
    /// Fastest iteration
    pub min_time: Duration,
    /// Slowest iteration
    pub max_time: Duration,
    /// Sample standard deviation
    pub std_dev: Duration,
    /// Number of timed iterations
    pub iterations: usize,
}

impl Timing {
    /// Average time in seconds.
    pub fn avg_secs(&self) -> f64 {
        self.avg_time.as_secs_f64()
    }

    /// Coefficient of variation (std-dev / average).
    pub fn cv(&self) -> f64 {
        let avg = self.avg_time.as_nanos() as f64;
        if avg > 0.0 {
            self.std_dev.as_nanos() as f64 / avg
        } else {
            0.0
        }
    }
}

/// Speedup of `timing` relative to `baseline` (ratio of average times).
pub fn speedup(baseline: &Timing, timing: &Timing) -> f64 {
    let base = baseline.avg_secs();
    let t = timing.avg_secs();
    if t > 0.0 {
        base / t
    } else if base > 0.0 {
        f64::INFINITY
    } else {
        1.0
    }
}

/// Result of benchmarking one variant
#[derive(Clone, Debug)]
pub struct VariantResult {
    /// Short identifier (e.g. "recursive")
    pub name: &'static str,
    /// Label used in the report lines (e.g. "Recursive fork-join")
    pub label: &'static str,
    pub description: &'static str,
    pub timing: Timing,
    /// Value computed by the last timed call
    pub result: f64,
    /// Baseline average time over this variant's average time
    pub speedup: f64,
    /// Closeness verdict against the baseline result
    pub correct: bool,
}

/// Run `f` once untimed, then `iterations` times timed.
///
/// Returns the timing statistics and the value of the last call.
pub fn time_iterations<R, F>(iterations: usize, mut f: F) -> (Timing, R)
where
    F: FnMut() -> R,
{
    let mut last = black_box(f());
    let mut times = Vec::with_capacity(iterations);
    for _ in 0..iterations {
        let (elapsed, value) = measure!(black_box(f()));
        times.push(elapsed);
        last = value;
    }
    (compute_timing(&times), last)
}

/// Compute statistics from raw per-iteration measurements
pub fn compute_timing(times: &[Duration]) -> Timing {
    if times.is_empty() {
        return Timing::default();
    }

    let nanos: Vec<u128> = times.iter().map(Duration::as_nanos).collect();

    let mut sorted = nanos.clone();
    sorted.sort_unstable();

    let min_ns = sorted[0];
    let max_ns = sorted[sorted.len() - 1];
    let median_ns = sorted[sorted.len() / 2];

    let sum: u128 = nanos.iter().sum();
    let avg_ns = sum as f64 / nanos.len() as f64;

    let variance: f64 = nanos
        .iter()
        .map(|&n| {
            let diff = n as f64 - avg_ns;
            diff * diff
        })
        .sum::<f64>()
        / (nanos.len() - 1).max(1) as f64;

    Timing {
        avg_time: Duration::from_nanos(avg_ns as u64),
        median_time: Duration::from_nanos(median_ns as u64),
        min_time: Duration::from_nanos(min_ns as u64),
        max_time: Duration::from_nanos(max_ns as u64),
        std_dev: Duration::from_nanos(variance.sqrt() as u64),
        iterations: times.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_timing_empty() {
        assert_eq!(compute_timing(&[]), Timing::default());
    }

    #[test]
    fn test_compute_timing_stats() {
        let times: Vec<Duration> = [10, 20, 30, 40]
            .iter()
            .map(|&ms| Duration::from_millis(ms))
            .collect();
        let timing = compute_timing(&times);
        assert_eq!(timing.iterations, 4);
        assert_eq!(timing.avg_time, Duration::from_millis(25));
        assert_eq!(timing.min_time, Duration::from_millis(10));
        assert_eq!(timing.max_time, Duration::from_millis(40));
        assert_eq!(timing.median_time, Duration::from_millis(30));
        assert!(timing.std_dev > Duration::from_millis(12));
        assert!(timing.std_dev < Duration::from_millis(13));
    }

    #[test]
    fn test_time_iterations_runs_warmup_plus_iterations() {
        let mut calls = 0;
        let (timing, last) = time_iterations(5, || {
            calls += 1;
            calls
        });
        assert_eq!(calls, 6);
        assert_eq!(last, 6);
        assert_eq!(timing.iterations, 5);
    }

    #[test]
    fn test_speedup() {
        let timing = |ms| Timing {
            avg_time: Duration::from_millis(ms),
            ..Timing::default()
        };
        assert_eq!(speedup(&timing(100), &timing(25)), 4.0);
        assert_eq!(speedup(&timing(0), &timing(0)), 1.0);
        assert!(speedup(&timing(10), &timing(0)).is_infinite());
    }

    #[test]
    fn test_measure_macro() {
        let (elapsed, value) = crate::measure!(21 * 2);
        assert_eq!(value, 42);
        assert!(elapsed < Duration::from_secs(1));
    }
}
