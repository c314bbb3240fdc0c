//! # Fork-Join Dot Product
//!
//! Three ways of computing a dot product on a work-stealing fork-join
//! runtime, benchmarked against a sequential baseline:
//!
//! - recursive partition (spawn one half, recurse on the other, join)
//! - coarsened parallel-for over fixed-size tiles
//! - a sum reducer with one view per worker
//!
//! The runtime lives in [`runtime`]; the strategies, closeness check and
//! bench harness in [`math::dot_product`].

pub mod config;
pub mod error;
pub mod logging;
pub mod math;
pub mod runtime;
pub mod utils;

/// Report printing, reachable as `fork_join_dot::tui` for the CLI
pub use utils::tui;

/// Re-export run_benchmarks from utils::runner
pub use utils::runner::run_benchmarks;

/// Re-export commonly used items
pub mod prelude {
    pub use crate::config::BenchConfig;
    pub use crate::error::{Error, Result};
    pub use crate::math::dot_product;
    pub use crate::runtime::{join, scope, PoolConfig, SumReducer, ThreadPool};
}

#[cfg(test)]
mod tests {
    use crate::math::dot_product;
    use crate::runtime::{PoolConfig, ThreadPool};

    #[test]
    fn test_all_variants_verify() {
        for workers in [1, 4] {
            let pool = ThreadPool::new(PoolConfig::default().with_workers(workers)).unwrap();
            if let Err(e) = dot_product::verify(&pool, 100) {
                panic!("❌ verification failed with {} workers: {}", workers, e);
            }
        }
    }
}
