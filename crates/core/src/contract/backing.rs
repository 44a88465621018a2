//! Backing sequence trait
//!
//! Defines the interface a synced sequence mirrors its contents into. The
//! backing is owned by the execution engine; the sequence only holds a
//! handle to it while synced and is the sole party allowed to mutate it in
//! that window.
//!
//! Index space matches the local sequence exactly: positions handed to
//! these methods are already resolved and in bounds for a backing that has
//! stayed in parity.

use thiserror::Error;

/// Errors reported by a backing sequence
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackingError {
    /// Position outside the backing's current bounds
    #[error("position {index} is out of bounds for backing of length {len}")]
    OutOfBounds {
        /// Requested position
        index: usize,
        /// Backing length at the time of the request
        len: usize,
    },

    /// The engine refused the operation
    #[error("{0}")]
    Rejected(String),
}

/// Ordered collection owned by the execution engine
///
/// Implementations must apply each operation fully or not at all.
pub trait BackingSequence {
    /// Item type the engine stores
    type Item;

    /// Number of items
    fn len(&self) -> usize;

    /// Check if empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Push an item at the end
    fn append(&mut self, item: Self::Item) -> Result<(), BackingError>;

    /// Insert an item before `index` (`index == len` appends)
    fn insert(&mut self, index: usize, item: Self::Item) -> Result<(), BackingError>;

    /// Overwrite the item at `index`
    fn assign(&mut self, index: usize, item: Self::Item) -> Result<(), BackingError>;

    /// Remove the item at `index`
    fn delete(&mut self, index: usize) -> Result<(), BackingError>;

    /// Iterate items front to back
    fn iter(&self) -> Box<dyn Iterator<Item = &Self::Item> + '_>;
}

/// In-memory backing over a `Vec`
///
/// Reference implementation used when no engine is present, and in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VecBacking<T> {
    items: Vec<T>,
}

impl<T> VecBacking<T> {
    /// Create an empty backing
    pub fn new() -> Self {
        VecBacking { items: Vec::new() }
    }

    /// Items as a slice
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Consume into the underlying items
    pub fn into_inner(self) -> Vec<T> {
        self.items
    }
}

impl<T> Default for VecBacking<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for VecBacking<T> {
    fn from(items: Vec<T>) -> Self {
        VecBacking { items }
    }
}

impl<T> BackingSequence for VecBacking<T> {
    type Item = T;

    fn len(&self) -> usize {
        self.items.len()
    }

    fn append(&mut self, item: T) -> Result<(), BackingError> {
        self.items.push(item);
        Ok(())
    }

    fn insert(&mut self, index: usize, item: T) -> Result<(), BackingError> {
        if index > self.items.len() {
            return Err(BackingError::OutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        self.items.insert(index, item);
        Ok(())
    }

    fn assign(&mut self, index: usize, item: T) -> Result<(), BackingError> {
        let len = self.items.len();
        let slot = self
            .items
            .get_mut(index)
            .ok_or(BackingError::OutOfBounds { index, len })?;
        *slot = item;
        Ok(())
    }

    fn delete(&mut self, index: usize) -> Result<(), BackingError> {
        if index >= self.items.len() {
            return Err(BackingError::OutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        self.items.remove(index);
        Ok(())
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &T> + '_> {
        Box::new(self.items.iter())
    }
}
