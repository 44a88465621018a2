//! Core types for syncseq
//!
//! This crate defines everything the synced sequence depends on but does
//! not own:
//! - [`SequenceError`]: the error enum shared by every operation
//! - [`index`]: index and slice resolution
//! - [`SimulationContext`]: opaque engine handle given to members
//! - [`contract`]: `Ownable`, `BackingSequence`, `Validator`, `Converter`

#![warn(missing_docs)]

pub mod context;
pub mod contract;
pub mod error;
pub mod index;

pub use context::{ContextId, SimulationContext};
pub use contract::{
    AttachError, BackingError, BackingSequence, Converter, Inert, Ownable, OwnershipCell,
    Validator, ValidatorSpec, VecBacking,
};
pub use error::{Result, SequenceError};
pub use index::{resolve_index, resolve_insert_index, Slice, SliceIndices};
