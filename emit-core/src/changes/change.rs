//! A single positional edit.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Possible array change types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArrayChangeType {
    Insertion,
    Deletion,
    Update,
}

/// Represents a single change to a list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArrayChange<T> {
    /// Insertion at a given index with the given value. Later elements shift
    /// up by one.
    Insertion(usize, T),

    /// Deletion at the given index. Later elements shift down by one.
    Deletion(usize),

    /// Replacement of the element at a given index with the given value.
    Update(usize, T),
}

impl<T> ArrayChange<T> {
    /// Type of change.
    pub fn change_type(&self) -> ArrayChangeType {
        match self {
            ArrayChange::Insertion(..) => ArrayChangeType::Insertion,
            ArrayChange::Deletion(_) => ArrayChangeType::Deletion,
            ArrayChange::Update(..) => ArrayChangeType::Update,
        }
    }

    /// List index affected by this change.
    pub fn index(&self) -> usize {
        match self {
            ArrayChange::Insertion(index, _)
            | ArrayChange::Deletion(index)
            | ArrayChange::Update(index, _) => *index,
        }
    }

    /// New value for this change, `None` for a deletion.
    pub fn new_value(&self) -> Option<&T> {
        match self {
            ArrayChange::Insertion(_, value) | ArrayChange::Update(_, value) => Some(value),
            ArrayChange::Deletion(_) => None,
        }
    }

    /// Whether this change can be applied to a list of length `len`.
    ///
    /// An insertion may target `len` (append); the other kinds must address an
    /// existing element.
    pub fn is_valid_for(&self, len: usize) -> bool {
        match self {
            ArrayChange::Insertion(index, _) => *index <= len,
            ArrayChange::Deletion(index) | ArrayChange::Update(index, _) => *index < len,
        }
    }

    /// Check this change against a list of length `len`.
    pub fn check(&self, len: usize) -> Result<()> {
        if self.is_valid_for(len) {
            Ok(())
        } else {
            Err(Error::IndexOutOfBounds {
                kind: self.change_type(),
                index: self.index(),
                len,
            })
        }
    }
}

impl<T: Clone> ArrayChange<T> {
    /// Applies this change to a list.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of range for the list's current length.
    pub fn apply(&self, list: &mut Vec<T>) {
        if let Err(err) = self.check(list.len()) {
            panic!("invalid array change: {err}");
        }
        self.apply_unchecked(list);
    }

    /// Applies this change, or returns an error and leaves the list untouched.
    pub fn try_apply(&self, list: &mut Vec<T>) -> Result<()> {
        self.check(list.len())?;
        self.apply_unchecked(list);
        Ok(())
    }

    fn apply_unchecked(&self, list: &mut Vec<T>) {
        match self {
            ArrayChange::Insertion(index, value) => list.insert(*index, value.clone()),
            ArrayChange::Deletion(index) => {
                list.remove(*index);
            }
            ArrayChange::Update(index, value) => list[*index] = value.clone(),
        }
    }
}
