//! Locking Primitives
//!
//! Thin wrappers over `parking_lot` that expose the scoped-acquisition style
//! used throughout the crate: acquire, run a closure, release on every exit
//! path. Release is tied to guard drop, so a panicking closure still unlocks.
//!
//! - [`RwLock`]: many concurrent readers or one exclusive writer. Guards the
//!   subscriber registry of every signal and the value of every variable.
//! - [`Lock`]: a plain exclusive lock for short critical sections that never
//!   need shared access.
//!
//! Neither lock is reentrant. Code holding a guard must not call back into
//! anything that may take the same lock again.

mod lock;
mod rwlock;

pub use lock::Lock;
pub use rwlock::{RwLock, RwLockReadGuard, RwLockWriteGuard};
