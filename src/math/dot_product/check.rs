//! Closeness check between a sequential and a parallel result.
//!
//! Parallel strategies add the same products in a different grouping, so
//! exact equality is not expected. The accepted relative difference grows
//! with the square root of the number of summed terms, the usual estimate
//! for accumulated rounding error.

/// Relative tolerance for a sum of `n` terms: `sqrt(n) * 2^-42`.
pub fn tolerance(n: usize) -> f64 {
    (n as f64).sqrt() * (-42f64).exp2()
}

/// Relative difference of `y` from the reference `x`, measured against `x`.
pub fn relative_diff(x: f64, y: f64) -> f64 {
    if x > y {
        (x - y) / x
    } else {
        (y - x) / x
    }
}

/// Whether the parallel result `y` agrees with the sequential result `x`
/// for a problem of size `n`.
///
/// Identical values always agree; this covers `n = 0`, where both sides
/// are zero and the relative difference is undefined.
///
/// # Example
/// ```
/// use fork_join_dot::math::dot_product::check::closeness_check;
///
/// assert!(closeness_check(14.0, 14.0, 4));
/// assert!(closeness_check(0.0, 0.0, 0));
/// assert!(!closeness_check(14.0, 14.1, 4));
/// ```
pub fn closeness_check(x: f64, y: f64, n: usize) -> bool {
    if x == y {
        return true;
    }
    relative_diff(x, y) < tolerance(n)
}
