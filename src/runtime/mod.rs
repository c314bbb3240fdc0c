//! # Fork-join runtime
//!
//! A small work-stealing runtime with structured concurrency:
//!
//! - [`ThreadPool`]: fixed pool of workers with per-worker deques
//! - [`scope`] / [`Scope::spawn`] / [`join`]: spawn children, join on scope exit
//! - [`for_each_tile`] / [`map_tiles`]: coarsened parallel-for
//! - [`SumReducer`]: one accumulator view per worker, combined on query

mod job;
mod latch;
mod pool;
mod reducer;
mod scope;
mod tiles;

pub use pool::{
    current_worker_index, global_pool, PoolConfig, PoolStats, ThreadPool,
    DEFAULT_THREAD_NAME_PREFIX,
};
pub use reducer::SumReducer;
pub use scope::{join, scope, Scope};
pub use tiles::{for_each_tile, map_tiles, tile_count, Tile, Tiles};
