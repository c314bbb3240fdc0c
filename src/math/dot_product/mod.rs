//! # Dot Product Algorithm
//!
//! The dot product computes the sum of products of corresponding elements
//! in two vectors:
//!
//! `dot(a, b) = Σ(a[i] * b[i])`
//!
//! ## Fork-Join Strategies
//!
//! - **Recursive partition**: halve the range, spawn one half, recurse on
//!   the other, join
//! - **Coarsened parallel-for**: one task per fixed-size tile, each writing
//!   its own partial-sum slot, folded sequentially after the join
//! - **Hyperobject reducer**: one task per tile, accumulating into the
//!   executing worker's view of a sum reducer
//!
//! Every strategy is checked against the sequential baseline with
//! [`check::closeness_check`].

pub mod bench;
pub mod check;
pub mod code;
pub mod test;

pub use code::*;

use crate::runtime::ThreadPool;
use check::closeness_check;

/// Check every parallel variant against the sequential baseline on fixed,
/// unshuffled inputs (`a[i] = b[i] = i`).
///
/// The lengths cover the empty vector, a single element, the four-element
/// case, a length that is not a multiple of `coarseness` and a length past
/// the recursive cutoff.
///
/// # Returns
/// An error naming the first variant and length that fail the check.
pub fn verify(pool: &ThreadPool, coarseness: usize) -> Result<(), String> {
    let coarseness = coarseness.max(1);
    let lengths = [0, 1, 4, 1023, coarseness * 8 + 3];

    for len in lengths {
        let a: Vec<f64> = (0..len).map(|i| i as f64).collect();
        let b = a.clone();
        let expected = dot_product_sequential(&a, &b);

        for variant in available_variants() {
            let result = pool.install(|| (variant.function)(&a, &b, coarseness));
            if !closeness_check(expected, result, len) {
                return Err(format!(
                    "Variant '{}' failed verification at n = {}. Expected {}, got {}",
                    variant.name, len, expected, result
                ));
            }
        }
    }

    Ok(())
}
