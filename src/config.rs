//! Benchmark configuration.
//!
//! The tuning knobs of a run (coarseness, iteration count, seed) travel as
//! an explicit value instead of compile-time constants, so tests can shrink
//! them and the CLI can override them.

use crate::error::{Error, Result};
use crate::runtime::PoolConfig;

/// Default vector length when none is given on the command line.
pub const DEFAULT_LEN: usize = 1_000_000;

/// Default sequential cutoff / tile size.
pub const DEFAULT_COARSENESS: usize = 100;

/// Default number of timed iterations per strategy.
pub const DEFAULT_ITERATIONS: usize = 10;

/// Largest accepted vector length (2^32, or `usize::MAX` on 32-bit targets).
///
/// Element values are the integers `0..n` stored as `f64`, which stay exact
/// well past this bound; the limit keeps the two input vectors within a
/// 64 GiB allocation.
pub const MAX_LEN: usize = (u32::MAX as usize).saturating_add(1);

/// Configuration for one benchmark run
#[derive(Clone, Debug)]
pub struct BenchConfig {
    /// Length of both input vectors
    pub len: usize,
    /// Base-case size for the recursive strategy and tile size for the tiled ones
    pub coarseness: usize,
    /// Number of timed iterations averaged per strategy
    pub iterations: usize,
    /// Seed for shuffling the inputs (`None` = time-based)
    pub seed: Option<u64>,
    /// Worker pool settings
    pub pool: PoolConfig,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            len: DEFAULT_LEN,
            coarseness: DEFAULT_COARSENESS,
            iterations: DEFAULT_ITERATIONS,
            seed: None,
            pool: PoolConfig::default(),
        }
    }
}

impl BenchConfig {
    pub fn with_len(mut self, len: usize) -> Self {
        self.len = len;
        self
    }

    pub fn with_coarseness(mut self, coarseness: usize) -> Self {
        self.coarseness = coarseness;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_pool(mut self, pool: PoolConfig) -> Self {
        self.pool = pool;
        self
    }

    /// Reject configurations that must not reach the core.
    pub fn validate(&self) -> Result<()> {
        if self.len > MAX_LEN {
            return Err(Error::InvalidLength {
                len: self.len,
                max: MAX_LEN,
            });
        }
        if self.coarseness == 0 {
            return Err(Error::InvalidCoarseness);
        }
        if self.iterations == 0 {
            return Err(Error::InvalidIterations);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = BenchConfig::default();
        assert_eq!(config.len, 1_000_000);
        assert_eq!(config.coarseness, 100);
        assert_eq!(config.iterations, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_len_is_accepted() {
        assert!(BenchConfig::default().with_len(0).validate().is_ok());
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_rejects_oversized_len() {
        let too_long = BenchConfig::default().with_len(MAX_LEN + 1);
        assert!(matches!(
            too_long.validate(),
            Err(Error::InvalidLength { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            BenchConfig::default().with_coarseness(0).validate(),
            Err(Error::InvalidCoarseness)
        ));
        assert!(matches!(
            BenchConfig::default().with_iterations(0).validate(),
            Err(Error::InvalidIterations)
        ));
    }
}
