//! Ordered edit scripts.

use std::ops::Index;
use std::slice;

use serde::{Deserialize, Serialize};

use super::change::ArrayChange;
use crate::error::Result;

/// Represents a set of changes to a list of elements.
///
/// Changes are applied in the order in which they appear. The index in each
/// change refers to the state of the list after every change before it has
/// been applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArrayChanges<T> {
    changes: Vec<ArrayChange<T>>,
}

impl<T> ArrayChanges<T> {
    /// Create a script from a list of changes.
    pub fn new(changes: Vec<ArrayChange<T>>) -> Self {
        Self { changes }
    }

    /// Append a change to the end of the script.
    pub fn push(&mut self, change: ArrayChange<T>) {
        self.changes.push(change);
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&ArrayChange<T>> {
        self.changes.get(position)
    }

    pub fn iter(&self) -> slice::Iter<'_, ArrayChange<T>> {
        self.changes.iter()
    }

    /// The changes as a slice.
    pub fn as_slice(&self) -> &[ArrayChange<T>] {
        &self.changes
    }
}

impl<T: Clone> ArrayChanges<T> {
    /// Applies this list of changes to a list, in order.
    ///
    /// # Panics
    ///
    /// Panics on the first change whose index is out of range for the list as
    /// it stands at that point.
    pub fn apply(&self, list: &mut Vec<T>) {
        for change in &self.changes {
            change.apply(list);
        }
    }

    /// Applies this list of changes, all or nothing.
    ///
    /// Stops at the first out-of-range change and restores the list to its
    /// state before the call.
    pub fn try_apply(&self, list: &mut Vec<T>) -> Result<()> {
        let mut staged = list.clone();
        for change in &self.changes {
            change.try_apply(&mut staged)?;
        }
        *list = staged;
        Ok(())
    }
}

impl<T> Default for ArrayChanges<T> {
    fn default() -> Self {
        Self {
            changes: Vec::new(),
        }
    }
}

impl<T> From<Vec<ArrayChange<T>>> for ArrayChanges<T> {
    fn from(changes: Vec<ArrayChange<T>>) -> Self {
        Self::new(changes)
    }
}

impl<T> FromIterator<ArrayChange<T>> for ArrayChanges<T> {
    fn from_iter<I: IntoIterator<Item = ArrayChange<T>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<T> Extend<ArrayChange<T>> for ArrayChanges<T> {
    fn extend<I: IntoIterator<Item = ArrayChange<T>>>(&mut self, iter: I) {
        self.changes.extend(iter);
    }
}

impl<T> Index<usize> for ArrayChanges<T> {
    type Output = ArrayChange<T>;

    fn index(&self, position: usize) -> &Self::Output {
        &self.changes[position]
    }
}

impl<T> IntoIterator for ArrayChanges<T> {
    type Item = ArrayChange<T>;
    type IntoIter = std::vec::IntoIter<ArrayChange<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a ArrayChanges<T> {
    type Item = &'a ArrayChange<T>;
    type IntoIter = slice::Iter<'a, ArrayChange<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}
