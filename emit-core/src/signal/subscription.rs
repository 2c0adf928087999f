//! Subscription records.
//!
//! A subscription ties together an owner (held weakly), the executor its
//! action runs on, and the action itself. Staleness is derived: a
//! subscription is stale once its owner is gone.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::executor::Executor;
use super::owner::{OwnerId, OwnerRef};

/// Unique identifier for a subscription.
///
/// Used as the registry key, so removal is by identity: two subscriptions with
/// the same owner and an identical action are still distinct entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct SubscriptionId(u64);

impl SubscriptionId {
    /// Generate a new unique subscription ID.
    ///
    /// Uses an atomic counter to ensure uniqueness across threads.
    pub(crate) fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Callback invoked with each delivered event.
pub(crate) type Action<E> = Arc<dyn Fn(E) + Send + Sync>;

/// A subscription that is tied to an owner.
pub(crate) struct Subscription<E> {
    id: SubscriptionId,
    owner: OwnerRef,
    executor: Arc<dyn Executor>,
    action: Action<E>,
}

impl<E: Send + 'static> Subscription<E> {
    pub(crate) fn new(owner: OwnerRef, executor: Arc<dyn Executor>, action: Action<E>) -> Self {
        Self {
            id: SubscriptionId::new(),
            owner,
            executor,
            action,
        }
    }

    pub(crate) fn id(&self) -> SubscriptionId {
        self.id
    }

    pub(crate) fn owner_id(&self) -> OwnerId {
        self.owner.id()
    }

    /// Whether the owner has been dropped.
    pub(crate) fn is_stale(&self) -> bool {
        !self.owner.is_alive()
    }

    /// Submit the action to this subscription's executor.
    ///
    /// Liveness is checked again when the job runs: an owner that dies while
    /// the job is queued never sees the event.
    pub(crate) fn dispatch(&self, event: E) {
        let owner = self.owner.clone();
        let action = Arc::clone(&self.action);
        self.executor.execute(Box::new(move || {
            if owner.is_alive() {
                action(event);
            }
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::executor::{Executor, Job};
    use crate::signal::owner::Owner;
    use std::sync::atomic::{AtomicI32, Ordering};

    /// Runs jobs on the calling thread so dispatch can be observed directly.
    struct Inline;

    impl Executor for Inline {
        fn execute(&self, job: Job) {
            job()
        }
    }

    fn counting(count: &Arc<AtomicI32>) -> Action<i32> {
        let count = count.clone();
        Arc::new(move |n| {
            count.fetch_add(n, Ordering::SeqCst);
        })
    }

    #[test]
    fn subscription_ids_are_unique() {
        let id1 = SubscriptionId::new();
        let id2 = SubscriptionId::new();
        let id3 = SubscriptionId::new();

        assert_ne!(id1, id2);
        assert_ne!(id2, id3);
        assert_ne!(id1, id3);
    }

    #[test]
    fn dispatch_invokes_action_while_owner_lives() {
        let owner = Owner::new();
        let count = Arc::new(AtomicI32::new(0));
        let subscription = Subscription::new(owner.watch(), Arc::new(Inline), counting(&count));

        assert!(!subscription.is_stale());
        assert_eq!(subscription.owner_id(), owner.id());

        subscription.dispatch(5);
        assert_eq!(count.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn subscription_goes_stale_with_owner() {
        let owner = Owner::new();
        let count = Arc::new(AtomicI32::new(0));
        let subscription = Subscription::new(owner.watch(), Arc::new(Inline), counting(&count));

        drop(owner);

        assert!(subscription.is_stale());
        subscription.dispatch(5);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
