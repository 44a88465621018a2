//! Synced sequence primitive for syncseq
//!
//! This crate provides [`SyncedSequence`], an ordered collection of
//! validated members that mirrors itself into an engine-owned backing
//! list while synced.
//!
//! - `sequence`: storage, reads, and the four mutation primitives
//! - `ops`: conveniences built on those primitives (`extend`, `pop`, ...)
//! - `lifecycle`: `sync` / `unsync` and drop behavior
//! - `builder`: [`SequenceOptions`] and [`SequenceBuilder`]
//! - `snapshot`: [`SequenceSnapshot`] and [`PersistedSequence`]

#![warn(missing_docs)]

mod attach;
pub mod builder;
pub mod lifecycle;
mod ops;
pub mod sequence;
pub mod snapshot;

pub use builder::{SequenceBuilder, SequenceOptions};
pub use lifecycle::{BackingHandle, SyncRejected};
pub use sequence::{PartialDeletion, SyncedSequence};
pub use snapshot::{PersistedSequence, SequenceSnapshot};
