//! Mutable-sequence conveniences
//!
//! Everything here is expressed through the primitives in `sequence.rs`, so
//! parity and ownership hold without further bookkeeping. `reverse` is the
//! exception: it reorders members without changing who owns them, so it
//! rewrites the backing slots directly instead of going through `set_at`.

use crate::lifecycle::SyncState;
use crate::sequence::SyncedSequence;
use syncseq_core::{Ownable, Result, SequenceError};
use tracing::{trace, warn};

impl<E: Ownable, B> SyncedSequence<E, B> {
    /// Append every value in order
    ///
    /// Stops at the first failure; values appended before it stay.
    pub fn extend<I>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = E>,
    {
        for value in values {
            self.append(value)?;
        }
        Ok(())
    }

    /// Remove and return the last member
    pub fn pop(&mut self) -> Result<E> {
        self.delete_at(-1)
    }

    /// Remove every member, last first
    pub fn clear(&mut self) -> Result<()> {
        while !self.is_empty() {
            self.pop()?;
        }
        Ok(())
    }

    /// Reverse member order in place
    ///
    /// Ownership and attachment are untouched. While synced every backing
    /// slot is rewritten; if the backing refuses one, the slots already
    /// written are restored and the local order is left as it was.
    pub fn reverse(&mut self) -> Result<()> {
        let len = self.len();
        if let SyncState::Synced { backing, .. } = &mut self.state {
            for i in 0..len {
                let item = self.converter.convert(&self.elements[len - 1 - i]);
                if let Err(error) = backing.assign(i, item) {
                    for j in 0..i {
                        let original = self.converter.convert(&self.elements[j]);
                        if let Err(undo) = backing.assign(j, original) {
                            warn!(position = j, error = %undo, "backing refused reverse rollback");
                        }
                    }
                    return Err(error.into());
                }
            }
        }
        self.elements.reverse();
        trace!(label = self.label(), len, "reversed members");
        Ok(())
    }
}

impl<E: Ownable + PartialEq, B> SyncedSequence<E, B> {
    /// Position of the first member equal to `value`
    pub fn position(&self, value: &E) -> Option<usize> {
        self.elements.iter().position(|e| e == value)
    }

    /// Whether any member equals `value`
    pub fn contains(&self, value: &E) -> bool {
        self.elements.contains(value)
    }

    /// Number of members equal to `value`
    pub fn count(&self, value: &E) -> usize {
        self.elements.iter().filter(|e| *e == value).count()
    }

    /// Remove and return the first member equal to `value`
    ///
    /// # Errors
    /// `NotFound` if no member is equal to `value`.
    pub fn remove(&mut self, value: &E) -> Result<E> {
        let index = self.position(value).ok_or(SequenceError::NotFound)?;
        self.remove_resolved(index)
    }
}
