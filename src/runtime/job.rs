//! Type-erased units of work.

use std::mem;

/// A unit of deferred work owned by exactly one queue or one thread.
///
/// Jobs are created by [`Scope::spawn`](super::Scope::spawn) and
/// [`ThreadPool::install`](super::ThreadPool::install), both of which block
/// until the job has run. That is what allows a job to borrow from the
/// spawner's stack even though its stored type claims `'static`.
pub(crate) struct Job {
    body: Box<dyn FnOnce() + Send + 'static>,
}

impl Job {
    /// Erase the lifetime of `body`.
    ///
    /// # Safety
    ///
    /// The caller must not return from the frame that owns the data
    /// borrowed by `body` until the job has finished running.
    pub(crate) unsafe fn new_unchecked<'a>(body: Box<dyn FnOnce() + Send + 'a>) -> Job {
        // SAFETY: only the lifetime bound changes; the caller upholds that
        // the borrowed data outlives the execution of the job.
        let body = unsafe {
            mem::transmute::<Box<dyn FnOnce() + Send + 'a>, Box<dyn FnOnce() + Send + 'static>>(
                body,
            )
        };
        Job { body }
    }

    /// Run the job. Job bodies catch their own panics.
    #[inline]
    pub(crate) fn run(self) {
        (self.body)()
    }
}
