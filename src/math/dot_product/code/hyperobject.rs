//! Reducer-based dot product.
//!
//! Same tiling as the parallel-for variant, but instead of a partial-sum
//! buffer every tile adds its products into the executing worker's view of
//! a [`SumReducer`]. The views are combined once, after the join.

use crate::runtime::{for_each_tile, SumReducer};

/// Compute the dot product by accumulating tiles into a sum reducer.
///
/// A `coarseness` of zero is treated as one.
///
/// # Panics
/// Panics if the vectors have different lengths.
pub fn dot_product_hyperobject(a: &[f64], b: &[f64], coarseness: usize) -> f64 {
    assert_eq!(a.len(), b.len(), "Vectors must have the same length");

    let sum = SumReducer::new();
    for_each_tile(a.len(), coarseness.max(1), |tile| {
        sum.update(|view| {
            for i in tile.range() {
                *view += a[i] * b[i];
            }
        });
    });
    sum.into_value()
}
