//! Subscription owners.
//!
//! An [`Owner`] is a liveness token. Every subscription remembers the token of
//! the owner that created it, but only weakly: once the owner is dropped, its
//! subscriptions become stale and are skipped by every later emit, without
//! anyone calling `unsubscribe`.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

/// Unique identifier for an owner.
///
/// Ids are never reused, so `unsubscribe` matches by identity even after the
/// original owner is long gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OwnerId(u64);

impl OwnerId {
    fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "owner#{}", self.0)
    }
}

/// A liveness token that owns subscriptions.
///
/// Embed an `Owner` in any struct that subscribes to signals. Dropping the
/// struct drops the token, and every subscription it owns goes stale.
///
/// `Owner` is deliberately not `Clone`: one token, one lifetime.
///
/// # Example
///
/// ```rust,ignore
/// struct Presenter {
///     owner: Owner,
/// }
///
/// impl AsOwner for Presenter {
///     fn owner(&self) -> &Owner {
///         &self.owner
///     }
/// }
/// ```
pub struct Owner {
    id: OwnerId,
    token: Arc<()>,
}

impl Owner {
    /// Create a new live owner.
    pub fn new() -> Self {
        Self {
            id: OwnerId::next(),
            token: Arc::new(()),
        }
    }

    /// Get the owner's unique ID.
    pub fn id(&self) -> OwnerId {
        self.id
    }

    /// A non-owning reference to this token.
    pub(crate) fn watch(&self) -> OwnerRef {
        OwnerRef {
            id: self.id,
            token: Arc::downgrade(&self.token),
        }
    }
}

impl Default for Owner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Owner").field("id", &self.id).finish()
    }
}

/// Weak handle to an [`Owner`], stored inside subscriptions.
#[derive(Clone)]
pub(crate) struct OwnerRef {
    id: OwnerId,
    token: Weak<()>,
}

impl OwnerRef {
    pub(crate) fn id(&self) -> OwnerId {
        self.id
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.token.strong_count() > 0
    }
}

/// Anything that can own subscriptions.
///
/// Implemented by [`Owner`] itself, by [`Signal`](super::Signal) and by
/// [`ObservableVariable`](crate::ObservableVariable), so that any of them can
/// be passed as the owner of a subscription.
pub trait AsOwner {
    /// The liveness token backing this owner.
    fn owner(&self) -> &Owner;
}

impl AsOwner for Owner {
    fn owner(&self) -> &Owner {
        self
    }
}

impl<T: AsOwner + ?Sized> AsOwner for Arc<T> {
    fn owner(&self) -> &Owner {
        (**self).owner()
    }
}
