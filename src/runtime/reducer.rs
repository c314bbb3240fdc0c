//! Sum reducer (hyperobject): a contention-free `f64` accumulator.
//!
//! Views are keyed by worker identity. The first pool worker to update a
//! reducer binds it to that worker's pool, which allocates one cache-padded
//! view per worker, each starting at the identity `0.0`. A worker only ever
//! writes its own view, so concurrent updates from different workers never
//! touch the same memory location or cache line. Workers never exit while
//! their pool is alive, so a view is never handed to another thread.
//!
//! Threads that are not workers of the bound pool (plain threads, workers
//! of another pool) share one extra view behind a lock.
//!
//! Combining requires `&mut self`. A reducer shared with tasks is borrowed
//! by their scope, so the borrow checker guarantees every task that could
//! update it has finished before the total is read.
//!
//! Addition is associative and commutative, so the total does not depend
//! on which worker handled which update, up to floating-point rounding:
//! the grouping of the partial sums differs from run to run, and results
//! may differ in the last bits.

use super::pool::{Registry, WorkerThread};
use crossbeam_utils::CachePadded;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

/// One worker's accumulator. Written only by its owning worker.
struct View {
    bits: AtomicU64,
    used: AtomicBool,
}

impl View {
    fn new() -> Self {
        Self {
            bits: AtomicU64::new(SumReducer::IDENTITY.to_bits()),
            used: AtomicBool::new(false),
        }
    }

    /// Add `value`. Load and store are separate because no other thread
    /// writes this view.
    fn add(&self, value: f64) {
        let current = f64::from_bits(self.bits.load(Ordering::Relaxed));
        self.bits.store((current + value).to_bits(), Ordering::Relaxed);
        self.used.store(true, Ordering::Relaxed);
    }
}

struct WorkerViews {
    registry: Arc<Registry>,
    views: Box<[CachePadded<View>]>,
}

impl WorkerViews {
    fn new(registry: &Arc<Registry>) -> Self {
        Self {
            registry: Arc::clone(registry),
            views: (0..registry.num_threads())
                .map(|_| CachePadded::new(View::new()))
                .collect(),
        }
    }
}

/// Per-worker `f64` accumulator combined by addition.
///
/// # Example
/// ```
/// use fork_join_dot::runtime::{for_each_tile, SumReducer};
///
/// let sum = SumReducer::new();
/// for_each_tile(1000, 64, |tile| {
///     sum.update(|view| *view += tile.len() as f64);
/// });
/// assert_eq!(sum.into_value(), 1000.0);
/// ```
pub struct SumReducer {
    workers: OnceLock<WorkerViews>,
    external: CachePadded<Mutex<Option<f64>>>,
}

impl SumReducer {
    /// Identity of the combining operation.
    pub const IDENTITY: f64 = 0.0;

    pub fn new() -> Self {
        Self {
            workers: OnceLock::new(),
            external: CachePadded::new(Mutex::new(None)),
        }
    }

    /// The calling worker's view, binding the reducer to its pool on first
    /// use. `None` on threads that are not workers of the bound pool.
    fn worker_view(&self) -> Option<&View> {
        WorkerThread::with_current(|worker| {
            let worker = worker?;
            let bound = self
                .workers
                .get_or_init(|| WorkerViews::new(worker.registry()));
            if !worker.belongs_to(&bound.registry) {
                return None;
            }
            bound.views.get(worker.index()).map(|view| &**view)
        })
    }

    fn accumulate(&self, value: f64) {
        match self.worker_view() {
            Some(view) => view.add(value),
            None => {
                let mut shared = self.external.lock();
                *shared = Some(shared.unwrap_or(Self::IDENTITY) + value);
            }
        }
    }

    /// Add `value` to the calling worker's view.
    #[inline]
    pub fn add(&self, value: f64) {
        self.accumulate(value);
    }

    /// Accumulate into a local `f64` with `f`, then add the result to the
    /// calling worker's view.
    ///
    /// `f` starts from the identity, so a tile can sum many terms locally
    /// and touch the view once. It may itself update this reducer.
    #[inline]
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut f64),
    {
        let mut acc = Self::IDENTITY;
        f(&mut acc);
        self.accumulate(acc);
    }

    /// Combine all views. The views are left in place.
    pub fn value(&mut self) -> f64 {
        let mut total = Self::IDENTITY;
        if let Some(bound) = self.workers.get_mut() {
            for view in bound.views.iter_mut() {
                total += f64::from_bits(*view.bits.get_mut());
            }
        }
        total + self.external.get_mut().unwrap_or(Self::IDENTITY)
    }

    /// Combine all views, consuming the reducer.
    pub fn into_value(mut self) -> f64 {
        self.value()
    }

    /// Number of views that received an update: one per worker that
    /// updated, plus one if any thread outside the bound pool did.
    pub fn view_count(&mut self) -> usize {
        let workers = self.workers.get().map_or(0, |bound| {
            bound
                .views
                .iter()
                .filter(|view| view.used.load(Ordering::Relaxed))
                .count()
        });
        workers + usize::from(self.external.get_mut().is_some())
    }

    /// Drop all views and unbind from the pool, returning the reducer to
    /// the identity.
    pub fn reset(&mut self) {
        self.workers.take();
        *self.external.get_mut() = None;
    }
}

impl Default for SumReducer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{for_each_tile, scope, PoolConfig, ThreadPool};
    use std::sync::Barrier;
    use std::thread;

    fn pool(workers: usize) -> ThreadPool {
        ThreadPool::new(PoolConfig::default().with_workers(workers)).unwrap()
    }

    #[test]
    fn test_empty_reducer_is_identity() {
        let mut sum = SumReducer::new();
        assert_eq!(sum.value(), 0.0);
        assert_eq!(sum.view_count(), 0);
        assert_eq!(sum.into_value(), 0.0);
    }

    #[test]
    fn test_threads_outside_pool_share_one_view() {
        let mut sum = SumReducer::new();
        thread::scope(|s| {
            for t in 0..4 {
                let sum = &sum;
                s.spawn(move || {
                    for _ in 0..1000 {
                        sum.add(t as f64);
                    }
                });
            }
        });
        assert_eq!(sum.view_count(), 1);
        assert_eq!(sum.value(), 1000.0 * (0.0 + 1.0 + 2.0 + 3.0));
    }

    #[test]
    fn test_new_thread_starts_from_identity_after_other_exits() {
        let mut sum = SumReducer::new();
        thread::scope(|s| {
            s.spawn(|| sum.add(5.0));
        });
        let mut seen = f64::NAN;
        thread::scope(|s| {
            s.spawn(|| sum.update(|view| seen = *view));
        });
        assert_eq!(seen, SumReducer::IDENTITY);
        assert_eq!(sum.value(), 5.0);
    }

    #[test]
    fn test_one_view_per_busy_worker() {
        let pool = pool(4);
        let mut sum = SumReducer::new();
        let barrier = Barrier::new(4);
        pool.install(|| {
            scope(|s| {
                for _ in 0..4 {
                    let (sum, barrier) = (&sum, &barrier);
                    // Each task holds its worker until all four are running.
                    s.spawn(move |_| {
                        barrier.wait();
                        sum.update(|view| {
                            assert_eq!(*view, SumReducer::IDENTITY);
                            *view += 1.0;
                        });
                    });
                }
            })
        });
        assert_eq!(sum.view_count(), 4);
        assert_eq!(sum.value(), 4.0);
    }

    #[test]
    fn test_update_and_reset() {
        let mut sum = SumReducer::new();
        sum.update(|view| {
            *view += 1.5;
            *view += 2.5;
        });
        sum.add(1.0);
        assert_eq!(sum.value(), 5.0);
        sum.reset();
        assert_eq!(sum.value(), 0.0);
        assert_eq!(sum.view_count(), 0);
    }

    #[test]
    fn test_views_bounded_by_worker_count() {
        let pool = pool(3);
        let mut sum = SumReducer::new();
        pool.install(|| {
            for_each_tile(10_000, 10, |tile| {
                sum.update(|view| *view += tile.len() as f64);
            })
        });
        assert!(sum.view_count() <= 3);
        assert_eq!(sum.value(), 10_000.0);
    }

    #[test]
    fn test_workers_of_other_pool_use_shared_view() {
        let (first, second) = (pool(2), pool(2));
        let mut sum = SumReducer::new();
        first.install(|| sum.add(1.0));
        second.install(|| sum.add(2.0));
        assert_eq!(sum.view_count(), 2);
        assert_eq!(sum.value(), 3.0);
    }

    #[test]
    fn test_children_spawned_in_scope_share_reducer() {
        let pool = pool(2);
        let sum = SumReducer::new();
        pool.install(|| {
            scope(|s| {
                for i in 0..64 {
                    let sum = &sum;
                    s.spawn(move |_| sum.add(i as f64));
                }
            })
        });
        assert_eq!(sum.into_value(), (0..64).sum::<i32>() as f64);
    }
}
