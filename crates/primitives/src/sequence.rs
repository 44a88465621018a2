//! SyncedSequence: validated members mirrored into an engine-owned list
//!
//! ## Design
//!
//! A `SyncedSequence` holds its members in a local `Vec` and, while synced,
//! a handle to the engine's backing list. Every public mutation updates
//! both so that, after it returns:
//!
//! - the backing has exactly as many items as the local sequence
//! - `backing[i] == converter(elements[i])` for every position
//! - every member is attached iff the sequence is synced
//!
//! Members are claimed through the [`Ownable`] capability; a member owned
//! by another synced sequence is rejected.
//!
//! ## Failure Behavior
//!
//! A failed mutation leaves the local sequence, the backing, and every
//! member's ownership exactly as they were. `delete_slice` is the only
//! multi-step operation: it deletes one position at a time, and a failure
//! stops it after the last completed deletion. The members it already
//! removed are handed back in the error.
//!
//! ## Thread Safety
//!
//! None internally. Wrap the whole sequence if it must be shared.

use crate::attach::{attach_candidate, detach_candidate, Scope};
use crate::builder::{SequenceBuilder, SequenceOptions};
use crate::lifecycle::SyncState;
use smallvec::SmallVec;
use std::fmt;
use syncseq_core::{
    resolve_index, resolve_insert_index, BackingError, Converter, Ownable, Result, SequenceError,
    Slice, Validator,
};
use thiserror::Error;
use tracing::trace;

/// Ordered, validated collection kept in parity with a backing sequence
///
/// `E` is the member type, `B` the item type stored in the backing
/// (the same as `E` unless a converter is supplied).
///
/// # Example
///
/// ```
/// use syncseq_core::{Inert, SimulationContext, Validator, VecBacking};
/// use syncseq_primitives::SyncedSequence;
///
/// let mut walls = SyncedSequence::<Inert<f64>>::builder()
///     .attach_members(false)
///     .validator(Validator::predicate("positive", |r: &Inert<f64>| r.0 > 0.0))
///     .elements([Inert(1.0), Inert(2.0)])
///     .build()?;
///
/// walls.sync(SimulationContext::new("sim"), Box::new(VecBacking::new()))?;
/// walls.append(Inert(3.0))?;
/// assert_eq!(walls.synced_iter().count(), 3);
/// # Ok::<(), syncseq_core::SequenceError>(())
/// ```
pub struct SyncedSequence<E: Ownable, B = E> {
    pub(crate) elements: Vec<E>,
    pub(crate) validator: Validator<E>,
    pub(crate) converter: Converter<E, B>,
    pub(crate) options: SequenceOptions,
    pub(crate) state: SyncState<B>,
}

impl<E: Ownable + Clone + 'static> SyncedSequence<E, E> {
    /// Create an empty sequence storing members in the backing as-is
    pub fn new(validator: Validator<E>) -> Self {
        Self::from_parts(validator, Converter::identity(), SequenceOptions::default())
    }

    /// Start building a sequence with the identity converter
    pub fn builder() -> SequenceBuilder<E, E> {
        SequenceBuilder::new()
    }
}

impl<E: Ownable, B> SyncedSequence<E, B> {
    /// Create an empty sequence with a custom backing conversion
    pub fn with_converter<F>(validator: Validator<E>, convert: F) -> Self
    where
        F: Fn(&E) -> B + Send + Sync + 'static,
    {
        Self::from_parts(validator, Converter::new(convert), SequenceOptions::default())
    }

    pub(crate) fn from_parts(
        validator: Validator<E>,
        converter: Converter<E, B>,
        options: SequenceOptions,
    ) -> Self {
        SyncedSequence {
            elements: Vec::new(),
            validator,
            converter,
            options,
            state: SyncState::Unsynced,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Number of members
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Members as a slice
    pub fn as_slice(&self) -> &[E] {
        &self.elements
    }

    /// Iterate members front to back
    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.elements.iter()
    }

    /// Construction options
    pub fn options(&self) -> &SequenceOptions {
        &self.options
    }

    /// Whether the attach/detach protocol runs for this sequence
    pub fn attach_members(&self) -> bool {
        self.options.attach_members
    }

    /// Label used in log events
    pub fn label(&self) -> &str {
        self.options.label()
    }

    /// Admission rule
    pub fn validator(&self) -> &Validator<E> {
        &self.validator
    }

    /// Backing conversion
    pub fn converter(&self) -> &Converter<E, B> {
        &self.converter
    }

    pub(crate) fn scope(&self) -> Scope<'_> {
        Scope {
            enabled: self.options.attach_members,
            context: self.state.context(),
        }
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Member at `index`; negative indices count from the end
    pub fn get(&self, index: isize) -> Result<&E> {
        let index = resolve_index(index, self.len())?;
        Ok(&self.elements[index])
    }

    /// Members selected by `slice`, in slice order
    pub fn get_slice(&self, slice: impl Into<Slice>) -> Result<Vec<&E>> {
        let slice: Slice = slice.into();
        let indices = slice.resolve(self.len())?;
        Ok(indices.map(|i| &self.elements[i]).collect())
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Replace the member at `index`, returning the old one
    ///
    /// The new value is attached before the backing slot is overwritten;
    /// the old value is detached afterwards.
    ///
    /// # Errors
    /// - `OutOfRange` if `index` does not resolve
    /// - `Validation` if the validator rejects `value`
    /// - `OwnershipConflict` if `value` is owned by a synced sequence
    /// - `AttachFailed` / `Backing` if a collaborator refuses
    pub fn set_at(&mut self, index: isize, value: E) -> Result<E> {
        let index = resolve_index(index, self.len())?;
        self.validate(&value)?;
        attach_candidate(self.scope(), &value)?;

        let mirrored = match &mut self.state {
            SyncState::Synced { backing, .. } => {
                backing.assign(index, self.converter.convert(&value))
            }
            SyncState::Unsynced => Ok(()),
        };
        if let Err(e) = mirrored {
            return Err(self.release_candidate(&value, e));
        }

        detach_candidate(self.scope(), &self.elements[index]);
        let old = std::mem::replace(&mut self.elements[index], value);
        trace!(label = self.label(), index, "replaced member");
        Ok(old)
    }

    /// Insert `value` before `index`
    ///
    /// `index == len()` appends. Negative indices count from the end.
    ///
    /// # Errors
    /// - `OutOfRange` if `index` is beyond `len()` or below `-len()`
    /// - `Validation`, `OwnershipConflict` as for [`set_at`](Self::set_at)
    /// - `AttachFailed` / `Backing` if a collaborator refuses
    pub fn insert_at(&mut self, index: isize, value: E) -> Result<()> {
        let position = resolve_insert_index(index, self.len())?;
        self.validate(&value)?;
        attach_candidate(self.scope(), &value)?;

        let mirrored = match &mut self.state {
            SyncState::Synced { backing, .. } => {
                backing.insert(position, self.converter.convert(&value))
            }
            SyncState::Unsynced => Ok(()),
        };
        if let Err(e) = mirrored {
            return Err(self.release_candidate(&value, e));
        }

        self.elements.insert(position, value);
        trace!(label = self.label(), position, len = self.len(), "inserted member");
        Ok(())
    }

    /// Append `value` at the end
    pub fn append(&mut self, value: E) -> Result<()> {
        self.insert_at(self.len() as isize, value)
    }

    /// Remove and return the member at `index`
    ///
    /// # Errors
    /// - `OutOfRange` if `index` does not resolve
    /// - `Backing` if the backing refuses; nothing is removed
    pub fn delete_at(&mut self, index: isize) -> Result<E> {
        let index = resolve_index(index, self.len())?;
        self.remove_resolved(index)
    }

    /// Remove every member selected by `slice`
    ///
    /// Positions are deleted from highest to lowest so earlier deletions do
    /// not shift later ones. Removed members are returned in ascending
    /// position order.
    ///
    /// # Errors
    /// - `InvalidSlice` if the step is zero; nothing is removed
    /// - `Backing` if the backing refuses a deletion. The sequence keeps
    ///   every member from that position down, and the members removed
    ///   before the refusal come back in [`PartialDeletion::into_removed`].
    pub fn delete_slice(
        &mut self,
        slice: impl Into<Slice>,
    ) -> std::result::Result<Vec<E>, PartialDeletion<E>> {
        let slice: Slice = slice.into();
        let mut indices: SmallVec<[usize; 8]> = slice
            .resolve(self.len())
            .map_err(|error| PartialDeletion::new(error, Vec::new()))?
            .collect();
        indices.sort_unstable_by(|a, b| b.cmp(a));
        indices.dedup();

        let mut removed = Vec::with_capacity(indices.len());
        for index in indices {
            match self.remove_resolved(index) {
                Ok(member) => removed.push(member),
                Err(error) => {
                    removed.reverse();
                    return Err(PartialDeletion::new(error, removed));
                }
            }
        }
        removed.reverse();
        Ok(removed)
    }

    pub(crate) fn remove_resolved(&mut self, index: usize) -> Result<E> {
        if let SyncState::Synced { backing, .. } = &mut self.state {
            backing.delete(index)?;
        }
        let removed = self.elements.remove(index);
        detach_candidate(self.scope(), &removed);
        trace!(label = self.label(), index, len = self.len(), "removed member");
        Ok(removed)
    }

    fn validate(&self, value: &E) -> Result<()> {
        self.validator
            .accepts(value)
            .map_err(SequenceError::validation)
    }

    /// Undo `attach_candidate` after the backing refused `value`
    fn release_candidate(&self, value: &E, error: BackingError) -> SequenceError {
        detach_candidate(self.scope(), value);
        trace!(label = self.label(), %error, "backing refused member");
        error.into()
    }
}

/// A `delete_slice` that stopped early
///
/// Carries the reason and the members removed before it stopped, in
/// ascending position order. They are already detached and released.
#[derive(Error)]
#[error("{error}")]
pub struct PartialDeletion<E> {
    #[source]
    error: SequenceError,
    removed: Vec<E>,
}

impl<E> PartialDeletion<E> {
    fn new(error: SequenceError, removed: Vec<E>) -> Self {
        PartialDeletion { error, removed }
    }

    /// Why the deletion stopped
    pub fn error(&self) -> &SequenceError {
        &self.error
    }

    /// Members removed before the deletion stopped
    pub fn removed(&self) -> &[E] {
        &self.removed
    }

    /// Take back the removed members
    pub fn into_removed(self) -> Vec<E> {
        self.removed
    }

    /// Split into the error and the removed members
    pub fn into_parts(self) -> (SequenceError, Vec<E>) {
        (self.error, self.removed)
    }
}

impl<E> fmt::Debug for PartialDeletion<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartialDeletion")
            .field("error", &self.error)
            .field("removed", &self.removed.len())
            .finish()
    }
}

impl<E> From<PartialDeletion<E>> for SequenceError {
    fn from(partial: PartialDeletion<E>) -> Self {
        partial.error
    }
}

impl<'a, E: Ownable, B> IntoIterator for &'a SyncedSequence<E, B> {
    type Item = &'a E;
    type IntoIter = std::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl<E: Ownable + PartialEq, B, B2> PartialEq<SyncedSequence<E, B2>> for SyncedSequence<E, B> {
    fn eq(&self, other: &SyncedSequence<E, B2>) -> bool {
        self.elements == other.elements
    }
}

impl<E: Ownable + Eq, B> Eq for SyncedSequence<E, B> {}

impl<E: Ownable + PartialEq, B> PartialEq<[E]> for SyncedSequence<E, B> {
    fn eq(&self, other: &[E]) -> bool {
        self.elements.as_slice() == other
    }
}

impl<E: Ownable + PartialEq, B> PartialEq<Vec<E>> for SyncedSequence<E, B> {
    fn eq(&self, other: &Vec<E>) -> bool {
        &self.elements == other
    }
}

impl<E: Ownable + fmt::Debug, B> fmt::Debug for SyncedSequence<E, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncedSequence")
            .field("label", &self.label())
            .field("elements", &self.elements)
            .field("validator", &self.validator)
            .field("attach_members", &self.options.attach_members)
            .field("synced", &self.is_synced())
            .finish()
    }
}
