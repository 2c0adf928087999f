//! Read/write lock with scoped acquisition.

use std::fmt;

/// Shared read access to the protected value.
pub type RwLockReadGuard<'a, T> = parking_lot::RwLockReadGuard<'a, T>;

/// Exclusive write access to the protected value.
pub type RwLockWriteGuard<'a, T> = parking_lot::RwLockWriteGuard<'a, T>;

/// Read/write lock; multiple readers are allowed simultaneously but only one
/// writer.
///
/// A writer waits until every current reader has released, and blocks new
/// readers and writers until it is done. Construction cannot fail: the
/// underlying lock is a plain atomic word with no OS-level initialisation.
///
/// # Example
///
/// ```rust
/// use emit_core::sync::RwLock;
///
/// let lock = RwLock::new(vec![1, 2]);
/// lock.perform_write(|items| items.push(3));
/// assert_eq!(lock.perform_read(|items| items.len()), 3);
/// ```
pub struct RwLock<T> {
    inner: parking_lot::RwLock<T>,
}

impl<T> RwLock<T> {
    /// Create a new unlocked lock protecting `value`.
    pub fn new(value: T) -> Self {
        Self {
            inner: parking_lot::RwLock::new(value),
        }
    }

    /// Lock for reading.
    ///
    /// The lock is released when the returned guard is dropped.
    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.inner.read()
    }

    /// Lock for writing.
    ///
    /// The lock is released when the returned guard is dropped.
    pub fn write(&self) -> RwLockWriteGuard<'_, T> {
        self.inner.write()
    }

    /// Executes a closure with a read lock.
    pub fn perform_read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let guard = self.inner.read();
        f(&guard)
    }

    /// Executes a closure with a write lock.
    pub fn perform_write<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.inner.write();
        f(&mut guard)
    }

    /// Consume the lock and return the protected value.
    pub fn into_inner(self) -> T {
        self.inner.into_inner()
    }
}

impl<T: Default> Default for RwLock<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for RwLock<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_read() {
            Some(guard) => f.debug_struct("RwLock").field("data", &&*guard).finish(),
            None => f.debug_struct("RwLock").field("data", &"<locked>").finish(),
        }
    }
}
