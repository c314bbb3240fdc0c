//! Work-stealing thread pool.
//!
//! ```text
//!   outside threads ──► Injector ──┐
//!                                  ▼
//!        ┌────────────┬────────────┬────────────┐
//!        │  worker 0  │  worker 1  │  worker N  │
//!        │  deque     │◄─ steal ──►│  deque     │
//!        │  (LIFO)    │   (FIFO)   │  (LIFO)    │
//!        └────────────┴────────────┴────────────┘
//! ```
//!
//! Every worker owns a Chase-Lev deque. It pushes and pops its own work at
//! the newest end and thieves take from the oldest end, so a thief gets the
//! largest pending sub-problem while the owner keeps its hot data in cache.
//! Jobs submitted from threads outside the pool go through a shared
//! injector. Idle workers sleep on a condition variable and are woken when
//! new work is published.

use super::job::Job;
use super::latch::LockLatch;
use crate::error::{Error, Result};
use crate::utils::cpu_affinity;
use crossbeam_deque::{Injector, Steal, Stealer, Worker};
use crossbeam_utils::{Backoff, CachePadded};
use parking_lot::{Condvar, Mutex};
use std::cell::{Cell, OnceCell};
use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{self, AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread::{self, JoinHandle};
use tracing::{debug, error, warn};

/// Default prefix for worker thread names.
pub const DEFAULT_THREAD_NAME_PREFIX: &str = "forkjoin-worker";

/// Worker pool settings
#[derive(Clone, Debug)]
pub struct PoolConfig {
    /// Number of worker threads (`None` = available hardware parallelism)
    pub workers: Option<usize>,
    /// Pin worker `i` to core `i mod cores`
    pub pin_workers: bool,
    /// Prefix for worker thread names
    pub thread_name_prefix: String,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: None,
            pin_workers: false,
            thread_name_prefix: DEFAULT_THREAD_NAME_PREFIX.to_string(),
        }
    }
}

impl PoolConfig {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn with_pinning(mut self, pin_workers: bool) -> Self {
        self.pin_workers = pin_workers;
        self
    }

    /// The number of workers the pool will actually start (at least one).
    pub fn resolved_workers(&self) -> usize {
        self.workers
            .unwrap_or_else(|| {
                thread::available_parallelism()
                    .map(NonZeroUsize::get)
                    .unwrap_or(1)
            })
            .max(1)
    }
}

/// Per-worker counters. Each worker only writes its own slot.
#[derive(Default)]
struct WorkerCounters {
    spawned: AtomicU64,
    executed: AtomicU64,
    stolen: AtomicU64,
}

/// Snapshot of the pool's scheduling counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Jobs pushed by workers onto their own deques
    pub spawned: u64,
    /// Jobs submitted from outside the pool
    pub injected: u64,
    /// Jobs run to completion by workers
    pub executed: u64,
    /// Jobs taken from another worker's deque
    pub stolen: u64,
}

impl PoolStats {
    /// Counter growth between an earlier snapshot and this one.
    pub fn since(&self, earlier: &PoolStats) -> PoolStats {
        PoolStats {
            spawned: self.spawned.saturating_sub(earlier.spawned),
            injected: self.injected.saturating_sub(earlier.injected),
            executed: self.executed.saturating_sub(earlier.executed),
            stolen: self.stolen.saturating_sub(earlier.stolen),
        }
    }
}

struct Sleep {
    lock: Mutex<()>,
    wake: Condvar,
    sleepers: AtomicUsize,
}

/// State shared by all workers of one pool.
pub(crate) struct Registry {
    injector: Injector<Job>,
    stealers: Vec<Stealer<Job>>,
    counters: Vec<CachePadded<WorkerCounters>>,
    injected: CachePadded<AtomicU64>,
    sleep: Sleep,
    terminate: AtomicBool,
}

impl Registry {
    pub(crate) fn num_threads(&self) -> usize {
        self.stealers.len()
    }

    /// Submit a job from a thread that is not one of this pool's workers.
    pub(crate) fn inject(&self, job: Job) {
        self.injected.fetch_add(1, Ordering::Relaxed);
        self.injector.push(job);
        self.notify_one();
    }

    /// Wake one sleeping worker, if any, after new work was published.
    fn notify_one(&self) {
        // Pairs with the SeqCst increment of `sleepers` in `WorkerThread::sleep`:
        // either the sleeper sees the new job or we see the sleeper.
        atomic::fence(Ordering::SeqCst);
        if self.sleep.sleepers.load(Ordering::SeqCst) > 0 {
            let _guard = self.sleep.lock.lock();
            self.sleep.wake.notify_one();
        }
    }

    fn has_work(&self) -> bool {
        !self.injector.is_empty() || self.stealers.iter().any(|s| !s.is_empty())
    }

    fn terminate(&self) {
        self.terminate.store(true, Ordering::SeqCst);
        let _guard = self.sleep.lock.lock();
        self.sleep.wake.notify_all();
    }

    fn stats(&self) -> PoolStats {
        let mut stats = PoolStats {
            injected: self.injected.load(Ordering::Relaxed),
            ..PoolStats::default()
        };
        for c in &self.counters {
            stats.spawned += c.spawned.load(Ordering::Relaxed);
            stats.executed += c.executed.load(Ordering::Relaxed);
            stats.stolen += c.stolen.load(Ordering::Relaxed);
        }
        stats
    }
}

/// The per-thread half of a worker: its deque and a handle to the pool.
pub(crate) struct WorkerThread {
    index: usize,
    local: Worker<Job>,
    registry: Arc<Registry>,
    next_victim: Cell<usize>,
}

thread_local! {
    static WORKER: OnceCell<WorkerThread> = const { OnceCell::new() };
}

impl WorkerThread {
    /// Call `f` with the worker running on this thread, if any.
    pub(crate) fn with_current<R>(f: impl FnOnce(Option<&WorkerThread>) -> R) -> R {
        WORKER.with(|cell| f(cell.get()))
    }

    pub(crate) fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub(crate) fn belongs_to(&self, registry: &Arc<Registry>) -> bool {
        Arc::ptr_eq(&self.registry, registry)
    }

    fn counters(&self) -> &WorkerCounters {
        &self.registry.counters[self.index]
    }

    /// Push a job onto this worker's own deque.
    pub(crate) fn push(&self, job: Job) {
        self.counters().spawned.fetch_add(1, Ordering::Relaxed);
        self.local.push(job);
        self.registry.notify_one();
    }

    fn find_work(&self) -> Option<Job> {
        self.local.pop().or_else(|| self.steal())
    }

    /// Take work from the injector or, failing that, from another worker.
    fn steal(&self) -> Option<Job> {
        let registry = &*self.registry;
        let n = registry.num_threads();
        loop {
            let mut retry = false;

            match registry.injector.steal_batch_and_pop(&self.local) {
                Steal::Success(job) => return Some(job),
                Steal::Retry => retry = true,
                Steal::Empty => {}
            }

            let start = self.next_victim.get();
            for offset in 0..n {
                let victim = (start + offset) % n;
                if victim == self.index {
                    continue;
                }
                match registry.stealers[victim].steal() {
                    Steal::Success(job) => {
                        // Stay on a productive victim.
                        self.next_victim.set(victim);
                        self.counters().stolen.fetch_add(1, Ordering::Relaxed);
                        return Some(job);
                    }
                    Steal::Retry => retry = true,
                    Steal::Empty => {}
                }
            }
            self.next_victim.set((start + 1) % n);

            if !retry {
                return None;
            }
        }
    }

    fn execute(&self, job: Job) {
        job.run();
        self.counters().executed.fetch_add(1, Ordering::Relaxed);
    }

    /// Run other pending work until `done` returns true.
    ///
    /// This is the only place a worker blocks on a join, so a worker waiting
    /// for its children keeps the pool busy instead of idling.
    pub(crate) fn wait_until(&self, done: impl Fn() -> bool) {
        let backoff = Backoff::new();
        while !done() {
            match self.find_work() {
                Some(job) => {
                    self.execute(job);
                    backoff.reset();
                }
                None if backoff.is_completed() => thread::yield_now(),
                None => backoff.snooze(),
            }
        }
    }

    fn main_loop(&self) {
        loop {
            if let Some(job) = self.find_work() {
                self.execute(job);
                continue;
            }
            if self.registry.terminate.load(Ordering::Acquire) {
                break;
            }
            self.sleep();
        }
    }

    fn sleep(&self) {
        let sleep = &self.registry.sleep;
        let mut guard = sleep.lock.lock();
        sleep.sleepers.fetch_add(1, Ordering::SeqCst);
        if !self.registry.has_work() && !self.registry.terminate.load(Ordering::SeqCst) {
            sleep.wake.wait(&mut guard);
        }
        sleep.sleepers.fetch_sub(1, Ordering::SeqCst);
    }
}

fn run_worker(index: usize, local: Worker<Job>, registry: Arc<Registry>, pin: bool) {
    if pin {
        match cpu_affinity::pin_worker(index) {
            Some(core) => debug!(worker = index, core, "worker pinned"),
            None => warn!(worker = index, "could not pin worker"),
        }
    }
    let n = registry.num_threads();
    WORKER.with(|cell| {
        let worker = cell.get_or_init(|| WorkerThread {
            index,
            local,
            registry,
            next_victim: Cell::new((index + 1) % n),
        });
        worker.main_loop();
    });
}

/// A fixed-size pool of work-stealing worker threads.
///
/// # Example
/// ```
/// use fork_join_dot::runtime::{join, PoolConfig, ThreadPool};
///
/// let pool = ThreadPool::new(PoolConfig::default().with_workers(2)).unwrap();
/// let (a, b) = pool.install(|| join(|| 1 + 1, || 2 + 2));
/// assert_eq!((a, b), (2, 4));
/// ```
pub struct ThreadPool {
    registry: Arc<Registry>,
    threads: Vec<JoinHandle<()>>,
}

impl ThreadPool {
    /// Start the worker threads.
    ///
    /// Fails with [`Error::PoolCreation`] if the OS refuses to start a
    /// thread; workers that did start are shut down again.
    pub fn new(config: PoolConfig) -> Result<Self> {
        let workers = config.resolved_workers();

        let locals: Vec<Worker<Job>> = (0..workers).map(|_| Worker::new_lifo()).collect();
        let stealers = locals.iter().map(Worker::stealer).collect();
        let counters = (0..workers)
            .map(|_| CachePadded::new(WorkerCounters::default()))
            .collect();

        let registry = Arc::new(Registry {
            injector: Injector::new(),
            stealers,
            counters,
            injected: CachePadded::new(AtomicU64::new(0)),
            sleep: Sleep {
                lock: Mutex::new(()),
                wake: Condvar::new(),
                sleepers: AtomicUsize::new(0),
            },
            terminate: AtomicBool::new(false),
        });

        let mut pool = ThreadPool {
            registry,
            threads: Vec::with_capacity(workers),
        };

        for (index, local) in locals.into_iter().enumerate() {
            let registry = Arc::clone(&pool.registry);
            let pin = config.pin_workers;
            let handle = thread::Builder::new()
                .name(format!("{}-{}", config.thread_name_prefix, index))
                .spawn(move || run_worker(index, local, registry, pin))
                .map_err(|source| Error::PoolCreation { source })?;
            pool.threads.push(handle);
        }

        debug!(workers, pinned = config.pin_workers, "thread pool started");
        Ok(pool)
    }

    /// Number of worker threads in this pool.
    pub fn current_num_threads(&self) -> usize {
        self.registry.num_threads()
    }

    /// Current scheduling counters.
    pub fn stats(&self) -> PoolStats {
        self.registry.stats()
    }

    /// Run `op` on one of this pool's workers and wait for its result.
    ///
    /// Fork-join calls made inside `op` use this pool. A panic in `op` is
    /// re-raised on the calling thread. Called from one of this pool's
    /// workers, `op` simply runs inline.
    pub fn install<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        let on_this_pool =
            WorkerThread::with_current(|w| w.is_some_and(|w| w.belongs_to(&self.registry)));
        if on_this_pool {
            return op();
        }

        let latch = LockLatch::new();
        let body = {
            let latch = &latch;
            Box::new(move || latch.set(panic::catch_unwind(AssertUnwindSafe(op))))
        };
        // SAFETY: we block on `latch` below until the job has stored its
        // result, so `op` and `latch` outlive the job.
        let job = unsafe { Job::new_unchecked(body) };
        self.registry.inject(job);

        match latch.wait() {
            Ok(value) => value,
            Err(payload) => panic::resume_unwind(payload),
        }
    }

    /// Open a join scope on this pool. See [`scope`](super::scope()).
    pub fn scope<'scope, OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce(&super::Scope<'scope>) -> R + Send,
        R: Send,
    {
        self.install(|| super::scope(op))
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.registry.terminate();
        for handle in self.threads.drain(..) {
            if handle.join().is_err() {
                warn!("worker thread exited with a panic");
            }
        }
        debug!("thread pool stopped");
    }
}

static GLOBAL_POOL: OnceLock<ThreadPool> = OnceLock::new();

/// The pool used by fork-join calls made outside any pool.
///
/// Created on first use with [`PoolConfig::default`]. The process aborts if
/// it cannot be started.
pub fn global_pool() -> &'static ThreadPool {
    GLOBAL_POOL.get_or_init(|| match ThreadPool::new(PoolConfig::default()) {
        Ok(pool) => pool,
        Err(err) => {
            error!(%err, "cannot start the global worker pool");
            std::process::abort()
        }
    })
}

/// Index of the worker running the calling thread, if it is a pool worker.
pub fn current_worker_index() -> Option<usize> {
    WorkerThread::with_current(|w| w.map(WorkerThread::index))
}
