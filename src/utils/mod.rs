//! Utility modules for benchmarking and execution.

pub mod bench;
pub mod cpu_affinity;
pub mod runner;
pub mod timer;
pub mod tui;

// Re-export commonly used items
pub use bench::{shuffle, shuffle_with_rng, shuffled_inputs, time_seed};
pub use timer::{compute_timing, time_iterations, Timing, VariantResult};

/// Information about an algorithm implementation variant.
/// Generic over F which is the function signature.
pub struct VariantInfo<F> {
    /// Unique identifier for this variant (e.g., "recursive", "tiled")
    pub name: &'static str,
    /// Name used in report lines such as "<label> time: ..."
    pub label: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// The specific implementation function
    pub function: F,
}
