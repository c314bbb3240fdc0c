//! Structured fork-join: join scopes and `join`.
//!
//! A [`Scope`] is the only way to spawn work. Leaving [`scope`] joins every
//! child spawned into it, on the normal path and when the body unwinds, so
//! a result derived from a child can never be read before the child has
//! finished.

use super::job::Job;
use super::pool::{global_pool, Registry, WorkerThread};
use parking_lot::Mutex;
use std::any::Any;
use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct ScopeState {
    pending: AtomicUsize,
    panic: Mutex<Option<Box<dyn Any + Send + 'static>>>,
}

impl ScopeState {
    fn record_panic(&self, payload: Box<dyn Any + Send + 'static>) {
        let mut slot = self.panic.lock();
        if slot.is_none() {
            *slot = Some(payload);
        }
    }

    fn is_done(&self) -> bool {
        self.pending.load(Ordering::Acquire) == 0
    }
}

/// Handle for spawning children that may borrow anything outliving `'scope`.
pub struct Scope<'scope> {
    registry: Arc<Registry>,
    state: Arc<ScopeState>,
    // Invariant in 'scope.
    marker: PhantomData<&'scope mut &'scope ()>,
}

impl<'scope> Scope<'scope> {
    fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            state: Arc::new(ScopeState {
                pending: AtomicUsize::new(0),
                panic: Mutex::new(None),
            }),
            marker: PhantomData,
        }
    }

    fn handle(&self) -> Scope<'scope> {
        Scope {
            registry: Arc::clone(&self.registry),
            state: Arc::clone(&self.state),
            marker: PhantomData,
        }
    }

    /// Schedule `body` to run asynchronously within this scope.
    ///
    /// Returns immediately. From a worker the child goes onto that worker's
    /// own deque, where idle workers may steal it; from any other thread it
    /// goes through the pool's injector. The child receives the scope and
    /// may spawn further children into it.
    pub fn spawn<F>(&self, body: F)
    where
        F: FnOnce(&Scope<'scope>) + Send + 'scope,
    {
        let scope = self.handle();
        self.state.pending.fetch_add(1, Ordering::Relaxed);

        let job = Box::new(move || {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| body(&scope))) {
                scope.state.record_panic(payload);
            }
            scope.state.pending.fetch_sub(1, Ordering::Release);
        });
        // SAFETY: `scope()` does not return before `pending` is back to zero,
        // so nothing borrowed for `'scope` is released while the job can run.
        let job = unsafe { Job::new_unchecked(job) };

        WorkerThread::with_current(|worker| match worker {
            Some(worker) if worker.belongs_to(&self.registry) => worker.push(job),
            _ => self.registry.inject(job),
        });
    }
}

/// Open a join scope, run `op` in it, and wait for every spawned child.
///
/// While waiting, the calling worker executes other pending jobs instead of
/// blocking. A panic in `op` or in any child is re-raised after all
/// children have completed; the body's panic takes precedence.
///
/// Called outside a pool, the scope runs on the [global pool](super::global_pool).
///
/// # Example
/// ```
/// use fork_join_dot::runtime::scope;
///
/// let data = [1, 2, 3, 4];
/// let (mut left, mut right) = (0, 0);
/// let (l, r) = (&mut left, &mut right);
/// scope(move |s| {
///     s.spawn(move |_| *l = data[..2].iter().sum());
///     s.spawn(move |_| *r = data[2..].iter().sum());
/// });
/// assert_eq!(left + right, 10);
/// ```
pub fn scope<'scope, OP, R>(op: OP) -> R
where
    OP: FnOnce(&Scope<'scope>) -> R + Send,
    R: Send,
{
    WorkerThread::with_current(|worker| match worker {
        Some(worker) => in_worker(worker, op),
        None => global_pool().install(|| scope(op)),
    })
}

fn in_worker<'scope, OP, R>(worker: &WorkerThread, op: OP) -> R
where
    OP: FnOnce(&Scope<'scope>) -> R,
{
    let scope = Scope::new(Arc::clone(worker.registry()));
    let result = panic::catch_unwind(AssertUnwindSafe(|| op(&scope)));

    worker.wait_until(|| scope.state.is_done());

    match result {
        Ok(value) => {
            if let Some(payload) = scope.state.panic.lock().take() {
                panic::resume_unwind(payload);
            }
            value
        }
        Err(payload) => panic::resume_unwind(payload),
    }
}

/// Run `oper_a` and `oper_b` potentially in parallel and return both results.
///
/// `oper_a` is spawned as the single child of a fresh scope and `oper_b`
/// runs on the current thread; the call returns once both are done.
pub fn join<A, B, RA, RB>(oper_a: A, oper_b: B) -> (RA, RB)
where
    A: FnOnce() -> RA + Send,
    B: FnOnce() -> RB + Send,
    RA: Send,
    RB: Send,
{
    let mut result_a = None;
    let slot = &mut result_a;
    let result_b = scope(move |s| {
        s.spawn(move |_| *slot = Some(oper_a()));
        oper_b()
    });
    let Some(result_a) = result_a else {
        unreachable!("scope returned before its child completed")
    };
    (result_a, result_b)
}
