//! Observable Variables
//!
//! An [`ObservableVariable`] wraps a single value and re-broadcasts every
//! write on its own [`Signal`]. It is the usual way to expose mutable state
//! (form fields, toggles, flags) to observers.
//!
//! # Write protocol
//!
//! A write stores the value and appends it to an outbox under the value's
//! write lock, then releases the lock. The outbox is drained by one writer at
//! a time, which emits each value in store order with no lock held. A writer
//! that finds a drain already running leaves its value to that drain, so a
//! subscriber writing back to the variable it observes never waits on itself.

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::signal::{AsOwner, Owner, Signal};
use crate::sync::{Lock, RwLock};

/// A value cell that emits its new value on every write.
///
/// Writes are never deduplicated: assigning the value it already holds still
/// emits. The initial value is not emitted.
///
/// # Example
///
/// ```rust
/// use emit_core::{ObservableVariable, Owner, SerialQueue};
///
/// let queue = SerialQueue::new("form").unwrap();
/// let owner = Owner::new();
/// let email = ObservableVariable::new(String::new());
///
/// email.signal().subscribe(&owner, &queue, |value| println!("email: {value}"));
/// email.set("ada@example.com".to_string());
/// queue.flush();
/// ```
pub struct ObservableVariable<T> {
    value: RwLock<T>,

    /// Stored values not yet emitted, in store order.
    outbox: Lock<VecDeque<T>>,

    /// Set while some writer is emitting the outbox.
    draining: AtomicBool,

    signal: Signal<T>,

    /// Liveness token for subscriptions this variable owns. Separate from the
    /// signal's own token, which lives as long as any clone of the signal.
    owner: Owner,
}

impl<T> ObservableVariable<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates a variable encapsulating the given value.
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
            outbox: Lock::new(VecDeque::new()),
            draining: AtomicBool::new(false),
            signal: Signal::new(),
            owner: Owner::new(),
        }
    }

    /// Get a clone of the current value.
    pub fn get(&self) -> T {
        self.value.perform_read(T::clone)
    }

    /// Read the current value in place.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.value.perform_read(f)
    }

    /// Store `value` and emit it.
    pub fn set(&self, value: T) {
        self.value.perform_write(|current| {
            *current = value.clone();
            self.outbox.locked(|outbox| outbox.push_back(value));
        });
        self.drain();
    }

    /// Replace the value with `f(current)` and emit the result.
    ///
    /// `f` runs under the value's write lock and must not access this
    /// variable.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        self.value.perform_write(|current| {
            let next = f(current);
            *current = next.clone();
            self.outbox.locked(|outbox| outbox.push_back(next));
        });
        self.drain();
    }

    /// Signal emitted on every write.
    pub fn signal(&self) -> &Signal<T> {
        &self.signal
    }

    fn drain(&self) {
        loop {
            if self.draining.swap(true, Ordering::SeqCst) {
                // The running drain will emit what we stored.
                return;
            }

            {
                let _draining = DrainGuard(&self.draining);
                while let Some(next) = self.outbox.locked(|outbox| outbox.pop_front()) {
                    self.signal.emit(next);
                }
            }

            // A writer may have stored after the last pop but before the flag
            // was cleared, and returned seeing the flag still set.
            if self.outbox.locked(|outbox| outbox.is_empty()) {
                return;
            }
        }
    }
}

/// Clears the draining flag on every exit path.
struct DrainGuard<'a>(&'a AtomicBool);

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl<T> AsOwner for ObservableVariable<T> {
    fn owner(&self) -> &Owner {
        &self.owner
    }
}

impl<T> Default for ObservableVariable<T>
where
    T: Clone + Default + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> fmt::Debug for ObservableVariable<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableVariable")
            .field("value", &self.value)
            .field("signal", &self.signal)
            .finish()
    }
}
