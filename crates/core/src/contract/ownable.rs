//! Ownership and attachment capability for sequence members
//!
//! A synced sequence talks to its members only through [`Ownable`]. The
//! sequence decides *when* to call each method; the element decides what
//! attaching means for it.
//!
//! ## Ownership is tied to a context
//!
//! An element is owned when it has been marked with a
//! [`SimulationContext`]. Marking an element owned while the sequence is
//! unsynced passes `None`, which leaves it unowned. Consequently only members
//! of synced sequences block each other, and an unsynced sequence can always
//! be synced and unsynced without changing its members' ownership.

use crate::context::SimulationContext;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};
use thiserror::Error;

/// Error returned by an element that cannot attach
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AttachError {
    message: String,
}

impl AttachError {
    /// Create an attach error with a message
    pub fn new(message: impl Into<String>) -> Self {
        AttachError {
            message: message.into(),
        }
    }

    /// Error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Capability every sequence member implements
///
/// Methods take `&self`: members are usually shared handles (`Arc<...>`)
/// whose state lives behind interior mutability, see [`OwnershipCell`].
pub trait Ownable {
    /// Whether some synced collection currently owns this element
    fn is_owned(&self) -> bool;

    /// Claim the element for a collection synced against `context`
    ///
    /// `None` means the owning collection is unsynced; the element stays
    /// unowned in that case.
    fn mark_owned(&self, context: Option<&SimulationContext>);

    /// Release the claim
    fn mark_unowned(&self);

    /// Activate against the engine
    fn attach(&self) -> Result<(), AttachError>;

    /// Deactivate from the engine
    fn detach(&self);

    /// Kind name used by kind-checking validators and error messages
    fn kind(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

#[derive(Debug, Default)]
struct CellState {
    context: Option<SimulationContext>,
    attached: bool,
}

/// Ownership and attachment bookkeeping for element handles
///
/// Embeds in an element type so it can implement [`Ownable`] through
/// `&self`. It records state only; the element supplies whatever side
/// effects attaching has.
///
/// # Example
///
/// ```
/// use syncseq_core::{AttachError, Ownable, OwnershipCell, SimulationContext};
///
/// #[derive(Default)]
/// struct Thermostat {
///     cell: OwnershipCell,
/// }
///
/// impl Ownable for Thermostat {
///     fn is_owned(&self) -> bool { self.cell.is_owned() }
///     fn mark_owned(&self, ctx: Option<&SimulationContext>) { self.cell.claim(ctx) }
///     fn mark_unowned(&self) { self.cell.release() }
///     fn attach(&self) -> Result<(), AttachError> { self.cell.set_attached(true); Ok(()) }
///     fn detach(&self) { self.cell.set_attached(false) }
/// }
///
/// let t = Thermostat::default();
/// t.mark_owned(Some(&SimulationContext::new("sim")));
/// assert!(t.is_owned());
/// ```
#[derive(Debug, Default)]
pub struct OwnershipCell {
    state: Mutex<CellState>,
}

impl OwnershipCell {
    /// Create an unowned, detached cell
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a context has claimed the cell
    pub fn is_owned(&self) -> bool {
        self.state.lock().context.is_some()
    }

    /// Whether the cell is currently attached
    pub fn is_attached(&self) -> bool {
        self.state.lock().attached
    }

    /// Context the cell is owned under, if any
    pub fn context(&self) -> Option<SimulationContext> {
        self.state.lock().context.clone()
    }

    /// Record a claim; `None` clears it
    pub fn claim(&self, context: Option<&SimulationContext>) {
        self.state.lock().context = context.cloned();
    }

    /// Clear the claim
    pub fn release(&self) {
        self.state.lock().context = None;
    }

    /// Record the attached flag
    pub fn set_attached(&self, attached: bool) {
        self.state.lock().attached = attached;
    }
}

/// Plain-data member that opts out of ownership
///
/// For sequences built with attachment disabled, whose members are values
/// rather than engine objects. Never reports owned; attach always succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inert<T>(pub T);

impl<T> Inert<T> {
    /// Unwrap the value
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Inert<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> DerefMut for Inert<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

impl<T> From<T> for Inert<T> {
    fn from(value: T) -> Self {
        Inert(value)
    }
}

impl<T> Ownable for Inert<T> {
    fn is_owned(&self) -> bool {
        false
    }

    fn mark_owned(&self, _context: Option<&SimulationContext>) {}

    fn mark_unowned(&self) {}

    fn attach(&self) -> Result<(), AttachError> {
        Ok(())
    }

    fn detach(&self) {}
}

impl<T: Ownable + ?Sized> Ownable for std::sync::Arc<T> {
    fn is_owned(&self) -> bool {
        (**self).is_owned()
    }

    fn mark_owned(&self, context: Option<&SimulationContext>) {
        (**self).mark_owned(context)
    }

    fn mark_unowned(&self) {
        (**self).mark_unowned()
    }

    fn attach(&self) -> Result<(), AttachError> {
        (**self).attach()
    }

    fn detach(&self) {
        (**self).detach()
    }

    fn kind(&self) -> &str {
        (**self).kind()
    }
}
