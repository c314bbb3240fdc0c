//! Benchmark utilities for dot product.

use super::check::closeness_check;
use super::code::{available_variants, dot_product_sequential};
use crate::config::BenchConfig;
use crate::runtime::ThreadPool;
use crate::utils::timer::{speedup, time_iterations, VariantResult};
use tracing::debug;

/// Everything measured in one benchmark run
#[derive(Clone, Debug)]
pub struct BenchReport {
    pub len: usize,
    pub coarseness: usize,
    pub iterations: usize,
    /// Worker threads in the pool the variants ran on
    pub workers: usize,
    /// Seed the inputs were shuffled with, if known
    pub seed: Option<u64>,
    /// The sequential baseline
    pub baseline: VariantResult,
    /// The parallel variants, in reporting order
    pub variants: Vec<VariantResult>,
}

impl BenchReport {
    /// Whether every parallel variant agreed with the baseline.
    pub fn all_correct(&self) -> bool {
        self.variants.iter().all(|v| v.correct)
    }
}

/// Time the sequential baseline and every parallel variant.
///
/// The baseline runs on the calling thread. Each variant runs once as a
/// warm-up and then `config.iterations` times on `pool`, with the timing
/// loop itself executing on a worker so that submission to the pool is not
/// part of the measured time.
pub fn run_all_benchmarks(
    a: &[f64],
    b: &[f64],
    config: &BenchConfig,
    pool: &ThreadPool,
) -> BenchReport {
    let n = a.len();
    let coarseness = config.coarseness;
    let iterations = config.iterations;

    let (base_timing, expected) = time_iterations(iterations, || dot_product_sequential(a, b));
    let baseline = VariantResult {
        name: "sequential",
        label: "Sequential",
        description: "Left-to-right f64 accumulation",
        speedup: 1.0,
        correct: true,
        timing: base_timing,
        result: expected,
    };
    debug!(n, avg = ?baseline.timing.avg_time, "baseline timed");

    let variants = available_variants()
        .into_iter()
        .map(|variant| {
            let func = variant.function;
            let before = pool.stats();
            let (timing, result) =
                pool.install(|| time_iterations(iterations, || func(a, b, coarseness)));
            let stats = pool.stats().since(&before);

            let correct = closeness_check(expected, result, n);
            debug!(
                variant = variant.name,
                avg = ?timing.avg_time,
                spawned = stats.spawned,
                stolen = stats.stolen,
                executed = stats.executed,
                correct,
                "variant timed"
            );

            VariantResult {
                name: variant.name,
                label: variant.label,
                description: variant.description,
                speedup: speedup(&baseline.timing, &timing),
                correct,
                timing,
                result,
            }
        })
        .collect();

    BenchReport {
        len: n,
        coarseness,
        iterations,
        workers: pool.current_num_threads(),
        seed: config.seed,
        baseline,
        variants,
    }
}
