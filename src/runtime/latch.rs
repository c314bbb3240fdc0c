//! Blocking one-shot slot for threads outside the pool.

use parking_lot::{Condvar, Mutex};

/// Holds the result of a job run on behalf of a thread that is not a
/// worker, and blocks that thread until the result arrives.
pub(crate) struct LockLatch<T> {
    slot: Mutex<Option<T>>,
    ready: Condvar,
}

impl<T> LockLatch<T> {
    pub(crate) fn new() -> Self {
        Self {
            slot: Mutex::new(None),
            ready: Condvar::new(),
        }
    }

    /// Store the value and wake the waiter.
    pub(crate) fn set(&self, value: T) {
        let mut slot = self.slot.lock();
        *slot = Some(value);
        self.ready.notify_all();
    }

    /// Block until a value has been stored, then take it.
    pub(crate) fn wait(&self) -> T {
        let mut slot = self.slot.lock();
        loop {
            if let Some(value) = slot.take() {
                return value;
            }
            self.ready.wait(&mut slot);
        }
    }
}
