//! Error types for `emit-core`.
//!
//! Most of the crate is infallible by construction: locks cannot fail to
//! initialise and a subscription cannot be created for an owner that is
//! already gone. The remaining fallible operations return [`Error`].

use crate::changes::ArrayChangeType;

/// Errors that can occur in this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The worker thread behind a serial queue could not be started.
    #[error("failed to spawn worker thread for queue `{label}`")]
    Spawn {
        /// Label of the queue being created.
        label: String,
        /// The OS error.
        #[source]
        source: std::io::Error,
    },

    /// An edit addressed an index outside the sequence it was applied to.
    #[error("{kind:?} at index {index} is out of bounds for length {len}")]
    IndexOutOfBounds {
        /// Kind of the offending change.
        kind: ArrayChangeType,
        /// Index the change addressed.
        index: usize,
        /// Length of the sequence when the change was applied.
        len: usize,
    },
}

/// Result alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
