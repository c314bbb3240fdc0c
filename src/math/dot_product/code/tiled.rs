//! Coarsened parallel-for dot product.
//!
//! The index range is cut into tiles of `coarseness` elements, each tile is
//! an independent task writing its own partial-sum slot, and the partial
//! sums are folded sequentially once all tiles are done.

use super::sequential::dot_product_sequential;
use crate::runtime::map_tiles;

/// Compute the dot product with one task per tile.
///
/// A `coarseness` of zero is treated as one.
///
/// # Panics
/// Panics if the vectors have different lengths.
pub fn dot_product_tiled(a: &[f64], b: &[f64], coarseness: usize) -> f64 {
    assert_eq!(a.len(), b.len(), "Vectors must have the same length");

    let partials = map_tiles(a.len(), coarseness.max(1), |tile| {
        dot_product_sequential(&a[tile.range()], &b[tile.range()])
    });

    partials.iter().fold(0.0, |acc, partial| acc + partial)
}
