//! Recursive divide-and-conquer dot product.
//!
//! Halve the range until it drops below the coarseness, spawn the first
//! half and compute the second half on the current task, then join. The
//! recursion tree is balanced with depth `O(log(n / coarseness))`.

use super::sequential::dot_product_sequential;
use crate::runtime::join;

/// Compute the dot product by recursive fork-join.
///
/// Sub-problems shorter than `coarseness` (and never shorter than two
/// elements, so a split always makes progress) run sequentially.
///
/// # Panics
/// Panics if the vectors have different lengths.
pub fn dot_product_recursive(a: &[f64], b: &[f64], coarseness: usize) -> f64 {
    assert_eq!(a.len(), b.len(), "Vectors must have the same length");

    recurse(a, b, coarseness.max(2))
}

fn recurse(a: &[f64], b: &[f64], cutoff: usize) -> f64 {
    let n = a.len();
    if n < cutoff {
        return dot_product_sequential(a, b);
    }

    let mid = n / 2;
    let (a_lo, a_hi) = a.split_at(mid);
    let (b_lo, b_hi) = b.split_at(mid);

    let (lo, hi) = join(
        || recurse(a_lo, b_lo, cutoff),
        || recurse(a_hi, b_hi, cutoff),
    );
    lo + hi
}

/// Number of spawns `dot_product_recursive` performs for length `n`.
///
/// One per internal node of the recursion tree.
pub fn recursive_spawn_count(n: usize, coarseness: usize) -> usize {
    let cutoff = coarseness.max(2);
    if n < cutoff {
        return 0;
    }
    let mid = n / 2;
    1 + recursive_spawn_count(mid, cutoff) + recursive_spawn_count(n - mid, cutoff)
}
