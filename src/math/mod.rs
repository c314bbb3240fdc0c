//! Math algorithms.

pub mod dot_product;
