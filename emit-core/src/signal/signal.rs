//! Signal Implementation
//!
//! A `Signal<E>` is a typed broadcast channel. Producers call
//! [`emit`](Signal::emit); every live subscriber receives its own clone of
//! the event on the executor it chose when subscribing.
//!
//! # Registry
//!
//! Subscriptions live in an insertion-ordered map keyed by subscription id,
//! guarded by a read/write lock:
//!
//! - `emit` classifies entries under the read lock, so concurrent emits
//!   proceed in parallel.
//! - `subscribe`, `unsubscribe` and stale removal take the write lock.
//! - No lock is held while an action is submitted or run.
//!
//! # Lazy cleanup
//!
//! A subscription whose owner has been dropped is stale. Stale entries are
//! never delivered to, but they are only physically removed by the next
//! `emit` that observes them. A signal that is never emitted on again keeps
//! its dead entries until it is itself dropped.
//!
//! # Derived signals
//!
//! [`filter`](Signal::filter), [`map`](Signal::map) and
//! [`flat_map`](Signal::flat_map) return a new signal that subscribes to this
//! one with *itself* as owner. The link lives exactly as long as some handle
//! to the derived signal does; once the last handle is dropped the link goes
//! stale and the parent reaps it on its next emit.
//!
//! The predicate or transform runs on the executor passed to the operator,
//! like any other subscriber. Events keep their emit order through a chain
//! when every link runs on a [`SerialQueue`](super::SerialQueue).
//!
//! A derived signal holds its parent strongly, so a chain such as
//! `source.filter(..).map(..)` stays connected for as long as the caller keeps
//! the last signal in it. The parent only ever holds its children weakly.

use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use indexmap::IndexMap;
use smallvec::SmallVec;

use super::executor::Executor;
use super::owner::{AsOwner, Owner, OwnerRef};
use super::subscription::{Action, Subscription, SubscriptionId};
use crate::sync::RwLock;

/// Counter for generating unique signal IDs.
static SIGNAL_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a new unique signal ID.
fn next_signal_id() -> u64 {
    SIGNAL_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

type Registry<E> = IndexMap<SubscriptionId, Arc<Subscription<E>>>;

/// A typed broadcast channel with an owner-scoped subscriber registry.
///
/// `Signal` is a cheap handle; clones share the same registry and the same
/// owner token. The signal (and every signal derived from it through a live
/// handle) stays alive while any clone does.
///
/// # Type Parameters
///
/// - `E`: The event type. Each subscriber receives its own clone.
///
/// # Example
///
/// ```rust
/// use emit_core::{Owner, SerialQueue, Signal};
///
/// let queue = SerialQueue::new("ui").unwrap();
/// let owner = Owner::new();
///
/// let clicks = Signal::<u32>::new();
/// let doubled = clicks.map(&queue, |n| n * 2);
/// doubled.subscribe(&owner, &queue, |n| assert_eq!(n % 2, 0));
///
/// clicks.emit(21);
/// queue.flush();
/// ```
pub struct Signal<E> {
    inner: Arc<SignalInner<E>>,
}

struct SignalInner<E> {
    /// Unique identifier for this signal.
    id: u64,

    /// Liveness token. Owns this signal's link on its parent, if derived, and
    /// any subscription the caller registers with this signal as owner.
    owner: Owner,

    subscriptions: RwLock<Registry<E>>,

    /// Keep-alive handle on the parent of a derived signal. Type-erased
    /// because the parent's event type differs; only its presence is
    /// inspected.
    upstream: Option<Arc<dyn Any + Send + Sync>>,
}

impl<E> Signal<E>
where
    E: Clone + Send + 'static,
{
    /// Create a signal with no subscribers.
    pub fn new() -> Self {
        Self::with_upstream(None)
    }

    fn with_upstream(upstream: Option<Arc<dyn Any + Send + Sync>>) -> Self {
        Self {
            inner: Arc::new(SignalInner {
                id: next_signal_id(),
                owner: Owner::new(),
                subscriptions: RwLock::new(IndexMap::new()),
                upstream,
            }),
        }
    }

    /// Get the signal's unique ID.
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Number of registered subscriptions.
    ///
    /// Stale subscriptions are counted until an emit reaps them.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscriptions.perform_read(|registry| registry.len())
    }

    /// Subscribe `owner` to this signal.
    ///
    /// `action` runs on `executor` for every event emitted while `owner` is
    /// alive. The subscription is cancelled implicitly when `owner` is
    /// dropped, or explicitly with [`unsubscribe`](Self::unsubscribe).
    pub fn subscribe<X, F>(&self, owner: &(impl AsOwner + ?Sized), executor: &X, action: F)
    where
        X: Executor + Clone,
        F: Fn(E) + Send + Sync + 'static,
    {
        self.attach(
            owner.owner().watch(),
            Arc::new(executor.clone()),
            Arc::new(action),
        );
    }

    fn attach(&self, owner: OwnerRef, executor: Arc<dyn Executor>, action: Action<E>) {
        let owner_id = owner.id();
        let subscription = Arc::new(Subscription::new(owner, executor, action));
        self.inner.subscriptions.perform_write(|registry| {
            registry.insert(subscription.id(), subscription);
        });
        tracing::trace!(signal = self.inner.id, owner = %owner_id, "subscribed");
    }

    /// Remove every subscription held by `owner`.
    ///
    /// Matching is by owner identity. Unknown owners are a no-op.
    pub fn unsubscribe(&self, owner: &(impl AsOwner + ?Sized)) {
        let owner_id = owner.owner().id();
        self.inner.subscriptions.perform_write(|registry| {
            registry.retain(|_, subscription| subscription.owner_id() != owner_id);
        });
    }

    /// Remove all subscriptions.
    pub fn unsubscribe_all(&self) {
        self.inner
            .subscriptions
            .perform_write(|registry| registry.clear());
    }

    /// Emit `event` to every live subscriber.
    ///
    /// Returns once every action has been submitted to its executor; it does
    /// not wait for any of them to run. Stale subscriptions observed during
    /// the pass are removed before returning.
    pub fn emit(&self, event: E) {
        let mut stale: SmallVec<[SubscriptionId; 4]> = SmallVec::new();

        let live: Vec<Arc<Subscription<E>>> =
            self.inner.subscriptions.perform_read(|registry| {
                registry
                    .values()
                    .filter_map(|subscription| {
                        if subscription.is_stale() {
                            stale.push(subscription.id());
                            None
                        } else {
                            Some(Arc::clone(subscription))
                        }
                    })
                    .collect()
            });

        // The read lock is released at this point. Removal is by id, so an
        // entry added since the read pass is left alone.
        if !stale.is_empty() {
            self.inner.subscriptions.perform_write(|registry| {
                for id in &stale {
                    registry.shift_remove(id);
                }
            });
            tracing::trace!(
                signal = self.inner.id,
                reaped = stale.len(),
                "removed stale subscriptions"
            );
        }

        tracing::trace!(signal = self.inner.id, subscribers = live.len(), "emit");

        for subscription in &live {
            subscription.dispatch(event.clone());
        }
    }

    // ------------------------------------------------------------------------
    // Derived signals
    // ------------------------------------------------------------------------

    /// A signal that re-emits only the events for which `predicate` holds.
    ///
    /// `predicate` runs on `executor`, like a subscriber action.
    pub fn filter<X, P>(&self, executor: &X, predicate: P) -> Signal<E>
    where
        X: Executor + Clone,
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.derive(executor, move |event, derived| {
            if predicate(&event) {
                derived.emit(event);
            }
        })
    }

    /// A signal that re-emits `transform(event)` for every event.
    ///
    /// `transform` runs on `executor`, like a subscriber action.
    pub fn map<T, X, F>(&self, executor: &X, transform: F) -> Signal<T>
    where
        T: Clone + Send + 'static,
        X: Executor + Clone,
        F: Fn(E) -> T + Send + Sync + 'static,
    {
        self.derive(executor, move |event, derived| derived.emit(transform(event)))
    }

    /// A signal that re-emits the `Some` results of `transform` and skips the
    /// `None` ones.
    ///
    /// `transform` runs on `executor`, like a subscriber action.
    pub fn flat_map<T, X, F>(&self, executor: &X, transform: F) -> Signal<T>
    where
        T: Clone + Send + 'static,
        X: Executor + Clone,
        F: Fn(E) -> Option<T> + Send + Sync + 'static,
    {
        self.derive(executor, move |event, derived| {
            if let Some(mapped) = transform(event) {
                derived.emit(mapped);
            }
        })
    }

    /// Create a signal fed by this one through `forward`, which runs on
    /// `executor`.
    ///
    /// The link is owned by the derived signal and only holds it weakly, so
    /// the parent never keeps a derived signal alive.
    fn derive<T, X, F>(&self, executor: &X, forward: F) -> Signal<T>
    where
        T: Clone + Send + 'static,
        X: Executor + Clone,
        F: Fn(E, &Signal<T>) + Send + Sync + 'static,
    {
        let parent: Arc<dyn Any + Send + Sync> = self.inner.clone();
        let derived = Signal::<T>::with_upstream(Some(parent));
        let target: Weak<SignalInner<T>> = Arc::downgrade(&derived.inner);

        self.attach(
            derived.inner.owner.watch(),
            Arc::new(executor.clone()),
            Arc::new(move |event: E| {
                if let Some(inner) = target.upgrade() {
                    forward(event, &Signal { inner });
                }
            }),
        );

        derived
    }
}

impl<E> Clone for Signal<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E> Default for Signal<E>
where
    E: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E> AsOwner for Signal<E> {
    fn owner(&self) -> &Owner {
        &self.inner.owner
    }
}

impl<E> fmt::Debug for Signal<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("id", &self.inner.id)
            .field("derived", &self.inner.upstream.is_some())
            .field(
                "subscriber_count",
                &self.inner.subscriptions.perform_read(|registry| registry.len()),
            )
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
