//! One-shot blocking handoff used by the probe's waits.

use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

/// A one-shot, timeout-bounded signal.
///
/// The producer side calls [`notify`] once; a single consumer blocks in
/// [`wait`] until the signal fires or the timeout elapses. The fired flag is
/// latched, so notifying before the wait begins still wakes it.
///
/// [`notify`]: Signal::notify
/// [`wait`]: Signal::wait
pub(crate) struct Signal {
    fired: Mutex<bool>,
    wakeup: Condvar,
}

impl Signal {
    pub(crate) fn new() -> Self {
        Self {
            fired: Mutex::new(false),
            wakeup: Condvar::new(),
        }
    }

    /// Latches the signal and wakes the waiter.
    pub(crate) fn notify(&self) {
        let mut fired = self.fired.lock();
        *fired = true;
        self.wakeup.notify_one();
    }

    /// Blocks the calling thread until the signal fires or `timeout`
    /// elapses; `None` waits indefinitely. Returns whether it fired.
    ///
    /// A timeout too large to convert into a deadline degrades to an
    /// unbounded wait.
    pub(crate) fn wait(&self, timeout: Option<Duration>) -> bool {
        let deadline = timeout.and_then(|limit| Instant::now().checked_add(limit));
        let mut fired = self.fired.lock();
        while !*fired {
            match deadline {
                Some(deadline) => {
                    if self.wakeup.wait_until(&mut fired, deadline).timed_out() {
                        break;
                    }
                }
                None => self.wakeup.wait(&mut fired),
            }
        }
        *fired
    }
}
