//! Simulation context handle
//!
//! A [`SimulationContext`] is the opaque engine handle a sequence carries
//! while synced. Elements receive it when they are marked owned. The
//! sequence never looks inside it; it only clones and passes it along.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Unique identifier for a simulation context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContextId(Uuid);

impl ContextId {
    /// Create a new random ContextId using UUID v4
    pub fn new() -> Self {
        ContextId(Uuid::new_v4())
    }

    /// Create ContextId from raw bytes
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        ContextId(Uuid::from_bytes(bytes))
    }

    /// Get raw bytes representation
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Default for ContextId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ContextId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque handle to the engine a sequence is synced against
///
/// Cheap to clone: the name is shared. Two contexts are equal when their
/// ids are equal.
///
/// # Examples
///
/// ```
/// use syncseq_core::SimulationContext;
///
/// let ctx = SimulationContext::new("md-run");
/// let same = ctx.clone();
/// assert_eq!(ctx, same);
/// assert_ne!(ctx, SimulationContext::new("md-run"));
/// ```
#[derive(Debug, Clone)]
pub struct SimulationContext {
    id: ContextId,
    name: Arc<str>,
}

impl SimulationContext {
    /// Create a context with a fresh id
    pub fn new(name: impl AsRef<str>) -> Self {
        Self::with_id(ContextId::new(), name)
    }

    /// Create a context with a known id
    pub fn with_id(id: ContextId, name: impl AsRef<str>) -> Self {
        SimulationContext {
            id,
            name: Arc::from(name.as_ref()),
        }
    }

    /// Context id
    pub fn id(&self) -> ContextId {
        self.id
    }

    /// Human-readable name
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for SimulationContext {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for SimulationContext {}

impl std::fmt::Display for SimulationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
