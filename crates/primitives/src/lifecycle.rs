//! Sync / unsync state machine
//!
//! ```text
//!            sync(context, backing)
//!   Unsynced ----------------------> Synced { context, backing }
//!      ^                                  |
//!      +---------------------------------+
//!                  unsync()
//! ```
//!
//! `sync` first checks that no member is owned already; a member still
//! claimed by another synced sequence fails the sync before anything is
//! touched. After that it is all-or-nothing: if any member fails to attach
//! (including a member listed twice), or the backing
//! refuses an append, every member processed so far is removed from the
//! backing and detached again, the sequence stays `Unsynced`, and the
//! backing handle is returned to the caller inside [`SyncRejected`].
//!
//! `unsync` detaches every member and hands the backing handle back.

use crate::attach::{attach_candidate, detach_candidate, ownership_conflict, Scope};
use crate::sequence::SyncedSequence;
use std::fmt;
use syncseq_core::{
    BackingSequence, Converter, Ownable, Result, SequenceError, SimulationContext,
};
use thiserror::Error;
use tracing::{debug, warn};

/// Backing handle type held while synced
pub type BackingHandle<B> = Box<dyn BackingSequence<Item = B>>;

/// Whether a sequence is mirroring into a backing
pub(crate) enum SyncState<B> {
    Unsynced,
    Synced {
        context: SimulationContext,
        backing: BackingHandle<B>,
    },
}

impl<B> SyncState<B> {
    pub(crate) fn context(&self) -> Option<&SimulationContext> {
        match self {
            SyncState::Synced { context, .. } => Some(context),
            SyncState::Unsynced => None,
        }
    }
}

/// A `sync` that did not happen
///
/// Carries the reason and the backing handle, which is returned in the same
/// state it was handed over.
#[derive(Error)]
#[error("{error}")]
pub struct SyncRejected<B> {
    #[source]
    error: SequenceError,
    backing: BackingHandle<B>,
}

impl<B> SyncRejected<B> {
    fn new(error: SequenceError, backing: BackingHandle<B>) -> Self {
        SyncRejected { error, backing }
    }

    /// Why the sync was rejected
    pub fn error(&self) -> &SequenceError {
        &self.error
    }

    /// Take back the backing handle
    pub fn into_backing(self) -> BackingHandle<B> {
        self.backing
    }

    /// Split into the error and the backing handle
    pub fn into_parts(self) -> (SequenceError, BackingHandle<B>) {
        (self.error, self.backing)
    }
}

impl<B> fmt::Debug for SyncRejected<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncRejected")
            .field("error", &self.error)
            .field("backing_len", &self.backing.len())
            .finish()
    }
}

impl<B> From<SyncRejected<B>> for SequenceError {
    fn from(rejected: SyncRejected<B>) -> Self {
        rejected.error
    }
}

impl<E: Ownable, B> SyncedSequence<E, B> {
    /// Whether the sequence is currently mirroring into a backing
    pub fn is_synced(&self) -> bool {
        matches!(self.state, SyncState::Synced { .. })
    }

    /// Context the sequence is synced against
    pub fn context(&self) -> Option<&SimulationContext> {
        self.state.context()
    }

    /// Backing sequence, while synced
    pub fn backing(&self) -> Option<&dyn BackingSequence<Item = B>> {
        match &self.state {
            SyncState::Synced { backing, .. } => Some(backing.as_ref()),
            SyncState::Unsynced => None,
        }
    }

    /// Iterate the backing's items; empty when unsynced
    pub fn synced_iter(&self) -> impl Iterator<Item = &B> + '_ {
        self.backing().into_iter().flat_map(|backing| backing.iter())
    }

    /// Start mirroring into `backing`, attaching every member
    ///
    /// Members are attached and appended in order.
    ///
    /// # Errors
    /// - `AlreadySynced` if the sequence is synced
    /// - `BackingNotEmpty` if `backing` already holds items
    /// - `OwnershipConflict` if a member is owned by another synced
    ///   sequence (checked before anything changes) or appears twice
    /// - `AttachFailed` / `Backing` if a member or the backing refuses;
    ///   everything done so far is rolled back first
    pub fn sync(
        &mut self,
        context: SimulationContext,
        mut backing: BackingHandle<B>,
    ) -> std::result::Result<(), SyncRejected<B>> {
        if self.is_synced() {
            return Err(SyncRejected::new(SequenceError::AlreadySynced, backing));
        }
        if !backing.is_empty() {
            let len = backing.len();
            return Err(SyncRejected::new(
                SequenceError::BackingNotEmpty { len },
                backing,
            ));
        }

        let scope = Scope {
            enabled: self.options.attach_members,
            context: Some(&context),
        };
        if scope.enabled {
            if let Some(owned) = self.elements.iter().find(|e| e.is_owned()) {
                let error = ownership_conflict(owned);
                warn!(label = self.label(), %error, "sync rejected, member owned elsewhere");
                return Err(SyncRejected::new(error, backing));
            }
        }
        for (position, element) in self.elements.iter().enumerate() {
            if let Err(error) = sync_member(scope, &self.converter, &mut backing, element) {
                warn!(
                    label = self.label(),
                    position,
                    %error,
                    "sync failed, rolling back"
                );
                rollback_sync(scope, &self.elements[..position], &mut backing);
                return Err(SyncRejected::new(error, backing));
            }
        }

        debug!(
            label = self.label(),
            len = self.len(),
            context = %context.id(),
            "sequence synced"
        );
        self.state = SyncState::Synced { context, backing };
        Ok(())
    }

    /// Stop mirroring, detaching every member
    ///
    /// Returns the backing handle, or `None` if the sequence was not synced.
    pub fn unsync(&mut self) -> Option<BackingHandle<B>> {
        let SyncState::Synced { context, backing } =
            std::mem::replace(&mut self.state, SyncState::Unsynced)
        else {
            return None;
        };

        if self.options.attach_members {
            let scope = Scope {
                enabled: true,
                context: Some(&context),
            };
            for element in &self.elements {
                detach_candidate(scope, element);
            }
        }

        debug!(
            label = self.label(),
            len = self.len(),
            context = %context.id(),
            "sequence unsynced"
        );
        Some(backing)
    }
}

impl<E: Ownable, B> Drop for SyncedSequence<E, B> {
    fn drop(&mut self) {
        if self.is_synced() {
            debug!(label = self.label(), "dropping synced sequence");
            drop(self.unsync());
        }
    }
}

fn sync_member<E: Ownable, B>(
    scope: Scope<'_>,
    converter: &Converter<E, B>,
    backing: &mut BackingHandle<B>,
    element: &E,
) -> Result<()> {
    attach_candidate(scope, element)?;
    if let Err(e) = backing.append(converter.convert(element)) {
        detach_candidate(scope, element);
        return Err(e.into());
    }
    Ok(())
}

/// Undo `sync_member` for `processed`, last member first
fn rollback_sync<E: Ownable, B>(
    scope: Scope<'_>,
    processed: &[E],
    backing: &mut BackingHandle<B>,
) {
    for (position, element) in processed.iter().enumerate().rev() {
        if let Err(error) = backing.delete(position) {
            warn!(position, %error, "backing refused rollback delete");
        }
        detach_candidate(scope, element);
    }
}
