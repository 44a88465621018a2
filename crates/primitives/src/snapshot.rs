//! Snapshot and persistence
//!
//! ## Snapshot
//!
//! [`SequenceSnapshot`] is an explicit projection of the state worth
//! keeping: members, validator, converter and options. The simulation
//! context and the backing handle are never part of it; a restored
//! sequence starts unsynced and is re-synced by its owner.
//!
//! ## Persisted Form
//!
//! With `E: Serialize` a snapshot serializes as:
//!
//! ```json
//! {
//!   "elements": [ ... ],
//!   "options": {"attach_members": true, "label": "updaters"},
//!   "validator": {"type": "kinds", "kinds": ["BoxResize"]}
//! }
//! ```
//!
//! The converter and any predicate check are code and cannot be written
//! out. Deserializing yields a [`PersistedSequence`], which is turned back
//! into a live sequence by supplying them again.

use crate::builder::SequenceOptions;
use crate::sequence::SyncedSequence;
use serde::{Deserialize, Serialize, Serializer};
use syncseq_core::{Converter, Ownable, Result, SequenceError, Validator, ValidatorSpec};

/// Persistable state of a [`SyncedSequence`]
pub struct SequenceSnapshot<E, B = E> {
    /// Members, in order
    pub elements: Vec<E>,
    /// Admission rule
    pub validator: Validator<E>,
    /// Backing conversion
    pub converter: Converter<E, B>,
    /// Construction options
    pub options: SequenceOptions,
}

impl<E: Clone, B> Clone for SequenceSnapshot<E, B> {
    fn clone(&self) -> Self {
        SequenceSnapshot {
            elements: self.elements.clone(),
            validator: self.validator.clone(),
            converter: self.converter.clone(),
            options: self.options.clone(),
        }
    }
}

impl<E: std::fmt::Debug, B> std::fmt::Debug for SequenceSnapshot<E, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequenceSnapshot")
            .field("elements", &self.elements)
            .field("validator", &self.validator)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct PersistedRef<'a, E> {
    elements: &'a [E],
    options: &'a SequenceOptions,
    validator: ValidatorSpec,
}

impl<E: Serialize, B> Serialize for SequenceSnapshot<E, B> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        PersistedRef {
            elements: &self.elements,
            options: &self.options,
            validator: self.validator.spec(),
        }
        .serialize(serializer)
    }
}

impl<E: Ownable + Clone, B> SyncedSequence<E, B> {
    /// Project the persistable state
    ///
    /// Members are cloned. For handle-like members (`Arc<...>`) the snapshot
    /// shares them with this sequence, and a sequence rebuilt from it cannot
    /// sync while this one still holds them synced.
    pub fn snapshot(&self) -> SequenceSnapshot<E, B> {
        SequenceSnapshot {
            elements: self.elements.clone(),
            validator: self.validator.clone(),
            converter: self.converter.clone(),
            options: self.options.clone(),
        }
    }
}

impl<E: Ownable, B> SyncedSequence<E, B> {
    /// Rebuild an unsynced sequence from a snapshot
    ///
    /// Members were validated when the snapshot was taken and are placed
    /// back without re-validation.
    pub fn from_snapshot(snapshot: SequenceSnapshot<E, B>) -> Self {
        let mut sequence =
            SyncedSequence::from_parts(snapshot.validator, snapshot.converter, snapshot.options);
        sequence.elements = snapshot.elements;
        sequence
    }
}

/// Deserialized form of a [`SequenceSnapshot`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedSequence<E> {
    /// Members, in order
    pub elements: Vec<E>,
    /// Construction options
    #[serde(default)]
    pub options: SequenceOptions,
    /// Validator description
    pub validator: ValidatorSpec,
}

impl<E: Ownable> PersistedSequence<E> {
    /// Rebuild a live, unsynced sequence
    ///
    /// `predicate` must be supplied when the persisted validator is a named
    /// predicate, and must carry the same name. Members go through `append`,
    /// so they are validated again.
    ///
    /// # Errors
    /// - `Snapshot` if a required predicate is missing or misnamed
    /// - any error `append` reports for a member
    pub fn restore<B>(
        self,
        converter: Converter<E, B>,
        predicate: Option<Validator<E>>,
    ) -> Result<SyncedSequence<E, B>> {
        let validator = match self.validator {
            ValidatorSpec::Any => Validator::Any,
            ValidatorSpec::Kinds { kinds } => Validator::Kinds(kinds),
            ValidatorSpec::Predicate { name } => match predicate {
                Some(v) if v.spec() == (ValidatorSpec::Predicate { name: name.clone() }) => v,
                _ => {
                    return Err(SequenceError::Snapshot {
                        reason: format!("predicate validator `{}` must be supplied", name),
                    })
                }
            },
        };

        let mut sequence = SyncedSequence::from_parts(validator, converter, self.options);
        sequence.extend(self.elements)?;
        Ok(sequence)
    }
}
