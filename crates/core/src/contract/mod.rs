//! Collaborator contracts
//!
//! The synced sequence depends on three collaborators it does not
//! implement itself:
//!
//! - **Ownable**: members, which know how to be claimed and attached
//! - **BackingSequence**: the engine-side list mirrored while synced
//! - **Validator / Converter**: admission rule and backing representation
//!
//! Each contract ships with a small reference implementation
//! ([`OwnershipCell`], [`Inert`], [`VecBacking`]).

pub mod backing;
pub mod ownable;
pub mod validator;

pub use backing::{BackingError, BackingSequence, VecBacking};
pub use ownable::{AttachError, Inert, Ownable, OwnershipCell};
pub use validator::{CheckFn, ConvertFn, Converter, Validator, ValidatorSpec};
