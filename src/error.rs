//! Error types for benchmark setup.
//!
//! Only the edges of a run can fail: validating the configuration,
//! allocating the input vectors and starting the worker pool. Once a
//! strategy is running it operates on validated, immutable input and
//! cannot fail.

use std::collections::TryReserveError;
use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The requested vector length is above the supported bound.
    #[error("vector length {len} exceeds the supported maximum of {max}")]
    InvalidLength { len: usize, max: usize },

    /// A coarseness of zero would never reach a base case.
    #[error("coarseness must be at least 1")]
    InvalidCoarseness,

    /// At least one timed iteration is needed to compute an average.
    #[error("iteration count must be at least 1")]
    InvalidIterations,

    /// The input vectors could not be allocated.
    #[error("failed to allocate two vectors of {len} elements")]
    Allocation {
        len: usize,
        #[source]
        source: TryReserveError,
    },

    /// A worker thread could not be started.
    #[error("failed to start worker thread")]
    PoolCreation {
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Whether this error comes from the host running out of resources
    /// rather than from a rejected configuration.
    pub fn is_resource_exhaustion(&self) -> bool {
        matches!(self, Error::Allocation { .. } | Error::PoolCreation { .. })
    }
}
