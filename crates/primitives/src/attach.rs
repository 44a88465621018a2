//! Attachment protocol
//!
//! The two primitives every mutation is written in terms of. They are the
//! only code that changes a member's ownership or attachment state.
//!
//! ## Ordering Contract
//!
//! ```text
//! set_at     attach(new) -> backing.assign -> detach(old) -> local replace
//! insert_at  attach(new) -> backing.insert -> local insert
//! delete_at  backing.delete -> local remove -> detach(removed)
//! sync       no member owned -> for each member: attach -> backing.append
//! unsync     for each member: detach
//! ```
//!
//! A candidate is attached before the backing sees it and detached only
//! after the backing has let go of it. When a step after `attach_candidate`
//! fails, the caller releases the candidate with `detach_candidate` before
//! returning the error.

use syncseq_core::{Ownable, Result, SequenceError, SimulationContext};

/// What the protocol needs to know about the owning sequence
#[derive(Debug, Clone, Copy)]
pub(crate) struct Scope<'a> {
    /// Attachment enabled for this sequence
    pub(crate) enabled: bool,
    /// Present exactly when the sequence is synced
    pub(crate) context: Option<&'a SimulationContext>,
}

impl<'a> Scope<'a> {
    pub(crate) fn is_synced(&self) -> bool {
        self.context.is_some()
    }
}

/// Claim `value` for the sequence and attach it if synced
///
/// A value already owned is rejected before anything changes, so a claim
/// only ever starts from an unowned value. If `attach()` fails the value is
/// returned to that unowned state.
pub(crate) fn attach_candidate<E: Ownable>(scope: Scope<'_>, value: &E) -> Result<()> {
    if !scope.enabled {
        return Ok(());
    }
    if value.is_owned() {
        return Err(ownership_conflict(value));
    }
    value.mark_owned(scope.context);
    if scope.is_synced() {
        if let Err(e) = value.attach() {
            value.mark_unowned();
            return Err(e.into());
        }
    }
    Ok(())
}

pub(crate) fn ownership_conflict<E: Ownable>(value: &E) -> SequenceError {
    SequenceError::OwnershipConflict {
        kind: value.kind().to_string(),
    }
}

/// Detach `value` if synced, then release the claim
pub(crate) fn detach_candidate<E: Ownable>(scope: Scope<'_>, value: &E) {
    if !scope.enabled {
        return;
    }
    if scope.is_synced() {
        value.detach();
    }
    if value.is_owned() {
        value.mark_unowned();
    }
}
