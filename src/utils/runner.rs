//! End-to-end benchmark run: configuration in, report out.

use crate::config::BenchConfig;
use crate::error::Result;
use crate::math::dot_product::bench::{run_all_benchmarks, BenchReport};
use crate::runtime::ThreadPool;
use crate::utils::bench::{shuffled_inputs, time_seed};
use tracing::{debug, info};

/// Validate `config`, build the inputs and the worker pool, and time every
/// strategy.
///
/// Fails before any timing starts if the configuration is rejected, the
/// input vectors cannot be allocated or the pool cannot be started.
pub fn run_benchmarks(config: &BenchConfig) -> Result<BenchReport> {
    config.validate()?;

    let seed = config.seed.unwrap_or_else(time_seed);
    let config = config.clone().with_seed(seed);

    let (a, b) = shuffled_inputs(config.len, seed)?;
    debug!(len = config.len, seed, "inputs ready");

    let pool = ThreadPool::new(config.pool.clone())?;
    info!(
        len = config.len,
        coarseness = config.coarseness,
        iterations = config.iterations,
        workers = pool.current_num_threads(),
        "running benchmarks"
    );

    Ok(run_all_benchmarks(&a, &b, &config, &pool))
}
