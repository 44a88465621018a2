//! Error types for synced sequence operations
//!
//! Every failure a synced sequence can report is a variant of
//! [`SequenceError`]. All of them are local and caller-correctable: nothing
//! here is fatal to the process and nothing is retried internally.
//!
//! | Variant | Raised by |
//! |---------|-----------|
//! | Validation | `set_at`, `insert_at`, `append` (validator rejected the value) |
//! | OwnershipConflict | `set_at`, `insert_at`, `append` (value owned elsewhere) |
//! | OutOfRange | any index-taking operation |
//! | InvalidSlice | slice operations with a zero step |
//! | AttachFailed | element refused to attach while synced |
//! | Backing | the backing sequence rejected an operation |
//! | AlreadySynced / BackingNotEmpty | `sync` preconditions |
//! | NotFound | `remove` |
//! | Snapshot | restoring a persisted sequence |

use crate::contract::{AttachError, BackingError};
use thiserror::Error;

/// Errors produced by synced sequence operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    /// The validator rejected a candidate value
    #[error("validation failed: {reason}")]
    Validation {
        /// Reason reported by the validator
        reason: String,
    },

    /// The candidate already belongs to another collection
    #[error("{kind} already belongs to another collection")]
    OwnershipConflict {
        /// Kind of the rejected element
        kind: String,
    },

    /// Index outside the valid range for the current length
    #[error("index {index} is out of range for length {len}")]
    OutOfRange {
        /// Index as requested by the caller
        index: isize,
        /// Length of the sequence at the time of the request
        len: usize,
    },

    /// Slice step of zero
    #[error("slice step cannot be zero")]
    InvalidSlice,

    /// An element refused to attach
    #[error("attach failed: {0}")]
    AttachFailed(#[from] AttachError),

    /// The backing sequence rejected an operation
    #[error("backing sequence error: {0}")]
    Backing(#[from] BackingError),

    /// `sync` called on a sequence that is already synced
    #[error("sequence is already synced")]
    AlreadySynced,

    /// `sync` was handed a backing sequence that already holds items
    #[error("backing sequence must be empty at sync, found {len} items")]
    BackingNotEmpty {
        /// Number of items found in the backing sequence
        len: usize,
    },

    /// No element equal to the requested value
    #[error("value not found in sequence")]
    NotFound,

    /// A persisted sequence could not be restored
    #[error("snapshot error: {reason}")]
    Snapshot {
        /// Why the restore failed
        reason: String,
    },
}

/// Result type for synced sequence operations
pub type Result<T> = std::result::Result<T, SequenceError>;

impl SequenceError {
    /// Build a validation error from any displayable reason
    pub fn validation(reason: impl Into<String>) -> Self {
        SequenceError::Validation {
            reason: reason.into(),
        }
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, SequenceError::Validation { .. })
    }

    /// Check if this is an ownership conflict
    pub fn is_ownership_conflict(&self) -> bool {
        matches!(self, SequenceError::OwnershipConflict { .. })
    }

    /// Check if this is an out-of-range index
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, SequenceError::OutOfRange { .. })
    }

    /// Check if this error came from a collaborator (element or backing)
    /// rather than from the caller's arguments
    pub fn is_collaborator_failure(&self) -> bool {
        matches!(
            self,
            SequenceError::AttachFailed(_) | SequenceError::Backing(_)
        )
    }
}
