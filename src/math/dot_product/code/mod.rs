//! Dot product implementations.
//!
//! The sequential baseline plus the three fork-join strategies.

mod hyperobject;
mod recursive;
mod sequential;
mod tiled;

pub use hyperobject::dot_product_hyperobject;
pub use recursive::{dot_product_recursive, recursive_spawn_count};
pub use sequential::dot_product_sequential;
pub use tiled::dot_product_tiled;

use crate::utils::VariantInfo;

/// Type alias for a parallel dot product: `(a, b, coarseness) -> a · b`
pub type DotProductFn = fn(&[f64], &[f64], usize) -> f64;

/// Get all parallel strategies, in reporting order
pub fn available_variants() -> Vec<VariantInfo<DotProductFn>> {
    vec![
        VariantInfo {
            name: "recursive",
            label: "Recursive fork-join",
            description: "Halve until below coarseness, spawn one half, join",
            function: dot_product_recursive,
        },
        VariantInfo {
            name: "tiled",
            label: "Coarsened parallel-for",
            description: "One task per tile, partial sums folded sequentially",
            function: dot_product_tiled,
        },
        VariantInfo {
            name: "hyperobject",
            label: "Hyperobject reducer",
            description: "One task per tile, accumulated into per-worker views",
            function: dot_product_hyperobject,
        },
    ]
}
