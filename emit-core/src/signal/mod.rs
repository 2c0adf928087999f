//! Broadcast Signals
//!
//! This module implements the event-notification core: typed signals that
//! broadcast to owner-scoped subscriptions on caller-chosen executors.
//!
//! # Concepts
//!
//! ## Owners
//!
//! Every subscription belongs to an [`Owner`], a liveness token. The signal
//! holds the subscription strongly but the owner only weakly, so subscribing
//! never extends an owner's lifetime. Dropping the owner silences all of its
//! subscriptions; no explicit teardown is required.
//!
//! ## Executors
//!
//! `emit` never runs subscriber code itself. Each `subscribe` call names an
//! [`Executor`] and `emit` only submits work to it, returning before any
//! subscriber runs. The same holds for the predicate or transform of a
//! derived signal, which takes an executor of its own.
//!
//! ## Derived signals
//!
//! `filter`, `map` and `flat_map` build new signals fed by an existing one.
//! A derived signal is its own owner on the parent, which lets a whole chain
//! be torn down by dropping its last handle. Its predicate or transform runs
//! on the executor passed to the operator.
//!
//! # Thread Safety
//!
//! All operations may be called from any thread. The registry is guarded by
//! a read/write lock: emits share it, structural changes take it exclusively,
//! and no lock is held while subscriber code runs.

mod executor;
mod owner;
#[allow(clippy::module_inception)]
mod signal;
mod subscription;

pub use executor::{Executor, Job, SerialQueue, TokioExecutor};
pub use owner::{AsOwner, Owner, OwnerId};
pub use signal::Signal;
