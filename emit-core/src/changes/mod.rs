//! List Edit Scripts
//!
//! An [`ArrayChanges`] is a sequential edit script over a list. Each
//! [`ArrayChange`] addresses the list as it stands *after* every earlier
//! change in the script has been applied; changes are not independent edits
//! against the original list.
//!
//! For instance inserting and then deleting an element of an initially empty
//! list is the script `[Insertion(0, "A"), Deletion(0)]`.
//!
//! [`ApplyChanges`] adds in-place and functional application to `Vec<T>`.

mod change;
mod script;

pub use change::{ArrayChange, ArrayChangeType};
pub use script::ArrayChanges;

use crate::error::Result;

/// Apply edits to a `Vec`, in place or by returning a new vector.
pub trait ApplyChanges<T> {
    /// Applies a change to `self`. Panics on an out-of-range index.
    fn apply_change(&mut self, change: &ArrayChange<T>);

    /// Applies a list of changes to `self`. Panics on an out-of-range index.
    fn apply_changes(&mut self, changes: &ArrayChanges<T>);

    /// Like [`apply_changes`](Self::apply_changes), but reports an
    /// out-of-range index instead of panicking and leaves `self` unchanged.
    fn try_apply_changes(&mut self, changes: &ArrayChanges<T>) -> Result<()>;

    /// Returns a new vector with a change applied.
    fn applying_change(&self, change: &ArrayChange<T>) -> Self;

    /// Returns a new vector with a list of changes applied.
    fn applying_changes(&self, changes: &ArrayChanges<T>) -> Self;
}

impl<T: Clone> ApplyChanges<T> for Vec<T> {
    fn apply_change(&mut self, change: &ArrayChange<T>) {
        change.apply(self);
    }

    fn apply_changes(&mut self, changes: &ArrayChanges<T>) {
        changes.apply(self);
    }

    fn try_apply_changes(&mut self, changes: &ArrayChanges<T>) -> Result<()> {
        changes.try_apply(self)
    }

    fn applying_change(&self, change: &ArrayChange<T>) -> Self {
        let mut next = self.clone();
        change.apply(&mut next);
        next
    }

    fn applying_changes(&self, changes: &ArrayChanges<T>) -> Self {
        let mut next = self.clone();
        changes.apply(&mut next);
        next
    }
}
