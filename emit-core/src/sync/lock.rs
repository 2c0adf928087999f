//! Exclusive lock with scoped acquisition.

use std::fmt;

/// Exclusive lock. One holder at a time, no shared mode.
///
/// Used where a critical section is short and always mutating, for instance
/// the outbox of values an observable variable has yet to emit.
pub struct Lock<T> {
    inner: parking_lot::Mutex<T>,
}

impl<T> Lock<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: parking_lot::Mutex::new(value),
        }
    }

    /// Run `f` while holding the lock.
    ///
    /// The lock is released when `f` returns or unwinds.
    pub fn locked<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }

    /// Try to run `f` without waiting. Returns `None` if the lock is held.
    pub fn try_locked<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        self.inner.try_lock().map(|mut guard| f(&mut guard))
    }
}

impl<T: Default> Default for Lock<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> fmt::Debug for Lock<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lock")
            .field("locked", &self.inner.is_locked())
            .finish()
    }
}
