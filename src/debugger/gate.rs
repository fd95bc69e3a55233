use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Monitor guarding a piece of shared state: one lock, one condition.
///
/// Waiters always re-check their predicate under the lock, so spurious and
/// early wake-ups are harmless. Every mutation wakes every waiter.
pub struct Gate<S> {
    state: Mutex<S>,
    changed: Condvar,
}

impl<S> Gate<S> {
    pub fn new(state: S) -> Self {
        Self {
            state: Mutex::new(state),
            changed: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, S> {
        self.state.lock().unwrap_or_else(recover)
    }

    /// Read the state without waking anyone.
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&*self.lock())
    }

    /// Mutate the state, then notify all waiters.
    pub fn update<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        let result = f(&mut *self.lock());
        self.changed.notify_all();
        result
    }

    /// Block until `step` returns `Some`.
    ///
    /// `step` runs under the lock on every attempt and may mutate the state.
    /// Other waiters are notified after each attempt, so observers of what
    /// `step` records (e.g. "worker is blocked") see it before this thread
    /// goes to sleep.
    pub fn wait_until<R>(&self, mut step: impl FnMut(&mut S) -> Option<R>) -> R {
        let mut guard = self.lock();
        loop {
            if let Some(result) = step(&mut *guard) {
                drop(guard);
                self.changed.notify_all();
                return result;
            }
            self.changed.notify_all();
            guard = self
                .changed
                .wait(guard)
                .unwrap_or_else(recover);
        }
    }

    /// Like [`Gate::wait_until`] with a read-only predicate and a deadline.
    /// Returns whether the predicate held before the timeout elapsed.
    pub fn wait_for(&self, timeout: Duration, mut pred: impl FnMut(&S) -> bool) -> bool {
        let deadline = Instant::now() + timeout;
        let mut guard = self.lock();
        loop {
            if pred(&*guard) {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            guard = match self.changed.wait_timeout(guard, deadline - now) {
                Ok((guard, _)) => guard,
                Err(poisoned) => recover(poisoned).0,
            };
        }
    }
}

// S is plain data that every critical section leaves consistent, so a panic
// on another thread does not invalidate it.
fn recover<G>(poisoned: PoisonError<G>) -> G {
    tracing::warn!("debugger gate lock was poisoned, recovering");
    poisoned.into_inner()
}
