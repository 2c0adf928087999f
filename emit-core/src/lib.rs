//! Emit Core
//!
//! This crate provides a small, embeddable event-notification toolkit:
//!
//! - [`Signal`]: a typed broadcast channel. Subscriptions are scoped to an
//!   [`Owner`] and go quiet as soon as the owner is dropped; delivery happens
//!   on an [`Executor`] chosen per subscription.
//! - Derived signals via [`Signal::filter`], [`Signal::map`] and
//!   [`Signal::flat_map`], torn down by dropping their last handle.
//! - [`ObservableVariable`]: a value cell that re-broadcasts every write.
//! - [`ArrayChanges`]: sequential positional edit scripts replayable against
//!   a `Vec`.
//!
//! # Architecture
//!
//! - `sync`: read/write and exclusive locks with scoped acquisition
//! - `signal`: owners, executors, subscriptions and the signal itself
//! - `variable`: the observable value wrapper
//! - `changes`: list edit scripts
//!
//! # Example
//!
//! ```rust
//! use emit_core::{ObservableVariable, Owner, SerialQueue};
//!
//! let queue = SerialQueue::new("main").unwrap();
//! let owner = Owner::new();
//!
//! let password = ObservableVariable::new(String::new());
//! let long_enough = password.signal().map(&queue, |p| p.len() >= 8);
//! long_enough.subscribe(&owner, &queue, |ok| println!("submit enabled: {ok}"));
//!
//! password.set("hunter22".into());
//! queue.flush();
//! ```
//!
//! Logging goes through `tracing`; the crate never installs a subscriber.

pub mod changes;
pub mod error;
pub mod signal;
pub mod sync;
mod variable;

pub use changes::{ApplyChanges, ArrayChange, ArrayChangeType, ArrayChanges};
pub use error::{Error, Result};
pub use signal::{AsOwner, Executor, Job, Owner, OwnerId, SerialQueue, Signal, TokioExecutor};
pub use variable::ObservableVariable;
