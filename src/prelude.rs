//! Convenient imports for syncseq.
//!
//! ```
//! use syncseq::prelude::*;
//!
//! let seq = SyncedSequence::<Inert<u8>>::new(Validator::any());
//! assert!(seq.is_empty());
//! ```

// Sequence and configuration
pub use crate::{PartialDeletion, SequenceBuilder, SequenceOptions, SyncRejected, SyncedSequence};

// Error handling
pub use crate::{Result, SequenceError};

// Collaborator contracts
pub use crate::{BackingSequence, Converter, Ownable, Validator};

// Reference implementations
pub use crate::{Inert, OwnershipCell, VecBacking};

// Core types
pub use crate::{SimulationContext, Slice};

// Persistence
pub use crate::{PersistedSequence, SequenceSnapshot};

// Re-export serde_json for convenience
pub use serde_json::json;
