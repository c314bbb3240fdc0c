//! Sequential (reference) implementation of dot product.
//!
//! A plain left-to-right `f64` accumulation. It is the baseline every
//! parallel strategy is timed against and checked against, and the base
//! case the parallel strategies run on their sub-ranges.

/// Compute the dot product of two vectors.
///
/// # Arguments
/// * `a` - First vector
/// * `b` - Second vector
///
/// # Panics
/// Panics if the vectors have different lengths.
///
/// # Example
/// ```
/// use fork_join_dot::math::dot_product::dot_product_sequential;
///
/// let a = [0.0, 1.0, 2.0, 3.0];
/// let b = [0.0, 1.0, 2.0, 3.0];
/// assert_eq!(dot_product_sequential(&a, &b), 14.0);
/// ```
#[inline]
pub fn dot_product_sequential(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len(), "Vectors must have the same length");

    a.iter().zip(b).fold(0.0, |acc, (x, y)| acc + x * y)
}
