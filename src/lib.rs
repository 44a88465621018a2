//! # syncseq
//!
//! Validated collections kept in parity with engine-owned backing lists.
//!
//! A [`SyncedSequence`] is an ordered list of members that, while synced
//! against a [`SimulationContext`], mirrors every change into a backing
//! list owned by an external engine. Members are claimed by at most one
//! synced sequence and are attached to the engine only while their
//! sequence is synced.
//!
//! ## Quick Start
//!
//! ```
//! use syncseq::prelude::*;
//!
//! let mut forces = SyncedSequence::<Inert<f64>>::builder()
//!     .label("forces")
//!     .attach_members(false)
//!     .elements([Inert(1.5), Inert(2.5)])
//!     .build()?;
//!
//! // Mirror into an engine-owned list
//! forces.sync(SimulationContext::new("sim"), Box::new(VecBacking::new()))?;
//! forces.insert_at(0, Inert(0.5))?;
//! forces.delete_slice(Slice::with_step(None, None, 2))?;
//! assert_eq!(forces.synced_iter().count(), 1);
//!
//! // Hand the backing back to the engine
//! let backing = forces.unsync().expect("was synced");
//! assert_eq!(backing.len(), 1);
//! # Ok::<(), syncseq::SequenceError>(())
//! ```
//!
//! ## Crates
//!
//! - `syncseq-core`: errors, index resolution, collaborator contracts
//! - `syncseq-primitives`: the sequence itself, its builder and snapshots

#![warn(missing_docs)]

pub mod prelude;

// Re-export the sequence and its configuration
pub use syncseq_primitives::{
    BackingHandle, PartialDeletion, PersistedSequence, SequenceBuilder, SequenceOptions,
    SequenceSnapshot, SyncRejected, SyncedSequence,
};

// Re-export core types
pub use syncseq_core::{
    resolve_index, resolve_insert_index, AttachError, BackingError, BackingSequence, ContextId,
    Converter, Inert, Ownable, OwnershipCell, Result, SequenceError, SimulationContext, Slice,
    SliceIndices, Validator, ValidatorSpec, VecBacking,
};
