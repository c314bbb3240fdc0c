//! CPU affinity for worker threads.
//!
//! Pinning keeps each worker on one core so its deque and the tiles it
//! works on stay in that core's caches. Implemented with `libc` on Linux;
//! other platforms report that pinning is unavailable.

#[cfg(target_os = "linux")]
mod platform {
    /// Number of online CPU cores
    pub fn core_count() -> Option<usize> {
        let count = unsafe { libc::sysconf(libc::_SC_NPROCESSORS_ONLN) };
        if count <= 0 {
            None
        } else {
            Some(count as usize)
        }
    }

    /// Get the current CPU core the thread is running on
    pub fn current_cpu() -> Option<usize> {
        let cpu = unsafe { libc::sched_getcpu() };
        if cpu >= 0 {
            Some(cpu as usize)
        } else {
            None
        }
    }

    /// Pin the calling thread to a specific core
    pub fn set_affinity(core_id: usize) -> bool {
        unsafe {
            let mut set: libc::cpu_set_t = std::mem::zeroed();
            libc::CPU_ZERO(&mut set);
            libc::CPU_SET(core_id, &mut set);
            libc::sched_setaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &set) == 0
        }
    }
}

#[cfg(not(target_os = "linux"))]
mod platform {
    pub fn core_count() -> Option<usize> {
        std::thread::available_parallelism().ok().map(|n| n.get())
    }
    pub fn current_cpu() -> Option<usize> {
        None
    }
    pub fn set_affinity(_core_id: usize) -> bool {
        false
    }
}

/// Number of cores available for pinning.
pub fn core_count() -> Option<usize> {
    platform::core_count()
}

/// The core the calling thread is running on, where the platform tells.
pub fn current_cpu() -> Option<usize> {
    platform::current_cpu()
}

/// Pin the calling thread to `core_id`. Returns `true` on success.
pub fn pin_to_core(core_id: usize) -> bool {
    platform::set_affinity(core_id)
}

/// Pin worker `index` to core `index mod cores`.
///
/// # Returns
/// The core the worker was pinned to, or `None` if pinning failed.
pub fn pin_worker(index: usize) -> Option<usize> {
    let cores = core_count()?;
    let core = index % cores;
    pin_to_core(core).then_some(core)
}
