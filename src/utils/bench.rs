//! Shared benchmark utilities.
//!
//! Input generation: the vectors are the integers `0..n` stored as `f64`,
//! each shuffled independently with a seeded RNG. The dot product is at
//! most the sum of `i²`, about `n³ / 3`, so every partial sum stays an
//! exact integer while that is below 2^53, i.e. up to roughly 300,000
//! elements. Beyond that (including the default 1,000,000) partial sums
//! round and strategies agree only within the closeness tolerance.

use crate::error::{Error, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Get a seed from current time for randomization
pub fn time_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x12345678)
}

/// Allocate `[0.0, 1.0, ..., (len - 1) as f64]`.
///
/// Allocation failure is reported instead of aborting the process.
pub fn iota(len: usize) -> Result<Vec<f64>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|source| Error::Allocation { len, source })?;
    v.extend((0..len).map(|i| i as f64));
    Ok(v)
}

/// Shuffle `slice` in place, continuing the state of `rng`.
pub fn shuffle_with_rng<T>(slice: &mut [T], rng: &mut StdRng) {
    slice.shuffle(rng);
}

/// Shuffle `slice` in place with a fresh RNG seeded from `seed`.
pub fn shuffle<T>(slice: &mut [T], seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    shuffle_with_rng(slice, &mut rng);
}

/// Build the two benchmark inputs for length `len`.
///
/// Both vectors hold a permutation of `0..len`; `b` is shuffled after `a`
/// from the same RNG stream, so the two permutations differ.
pub fn shuffled_inputs(len: usize, seed: u64) -> Result<(Vec<f64>, Vec<f64>)> {
    let mut a = iota(len)?;
    let mut b = iota(len)?;

    let mut rng = StdRng::seed_from_u64(seed);
    shuffle_with_rng(&mut a, &mut rng);
    shuffle_with_rng(&mut b, &mut rng);

    Ok((a, b))
}
