//! Shared test helpers
//!
//! - [`Tracked`]: an element handle that counts attach/detach calls and can
//!   be told to refuse attaching
//! - [`FlakyBacking`]: a `VecBacking` that fails once on demand, driven by a
//!   [`FailSwitch`] the test keeps after handing the backing over

#![allow(dead_code)]

use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

pub use syncseq::prelude::*;
pub use syncseq::{AttachError, BackingError, BackingHandle};

// ============================================================================
// Tracing
// ============================================================================

/// Install a test-writer subscriber once; honors `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ============================================================================
// Elements
// ============================================================================

/// Element handle with observable ownership and attachment
pub struct Tracked {
    name: String,
    kind: &'static str,
    cell: OwnershipCell,
    attaches: AtomicUsize,
    detaches: AtomicUsize,
    refuse_attach: AtomicBool,
}

/// Shared handle, the form elements take inside a sequence
pub type Member = Arc<Tracked>;

/// New member of kind `"Tracked"`
pub fn member(name: &str) -> Member {
    member_of_kind(name, "Tracked")
}

/// New member reporting `kind`
pub fn member_of_kind(name: &str, kind: &'static str) -> Member {
    Arc::new(Tracked {
        name: name.to_string(),
        kind,
        cell: OwnershipCell::new(),
        attaches: AtomicUsize::new(0),
        detaches: AtomicUsize::new(0),
        refuse_attach: AtomicBool::new(false),
    })
}

/// `count` members named `m0`, `m1`, ...
pub fn members(count: usize) -> Vec<Member> {
    (0..count).map(|i| member(&format!("m{}", i))).collect()
}

impl Tracked {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_attached(&self) -> bool {
        self.cell.is_attached()
    }

    pub fn context(&self) -> Option<SimulationContext> {
        self.cell.context()
    }

    pub fn attaches(&self) -> usize {
        self.attaches.load(Ordering::SeqCst)
    }

    pub fn detaches(&self) -> usize {
        self.detaches.load(Ordering::SeqCst)
    }

    pub fn refuse_attach(&self, refuse: bool) {
        self.refuse_attach.store(refuse, Ordering::SeqCst);
    }
}

impl Ownable for Tracked {
    fn is_owned(&self) -> bool {
        self.cell.is_owned()
    }

    fn mark_owned(&self, context: Option<&SimulationContext>) {
        self.cell.claim(context);
    }

    fn mark_unowned(&self) {
        self.cell.release();
    }

    fn attach(&self) -> std::result::Result<(), AttachError> {
        if self.refuse_attach.load(Ordering::SeqCst) {
            return Err(AttachError::new(format!("{} refused to attach", self.name)));
        }
        self.cell.set_attached(true);
        self.attaches.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn detach(&self) {
        self.cell.set_attached(false);
        self.detaches.fetch_add(1, Ordering::SeqCst);
    }

    fn kind(&self) -> &str {
        self.kind
    }
}

// Identity, not name: two handles with the same name are different members
impl PartialEq for Tracked {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Eq for Tracked {}

impl fmt::Debug for Tracked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracked")
            .field("name", &self.name)
            .field("owned", &self.cell.is_owned())
            .field("attached", &self.cell.is_attached())
            .finish()
    }
}

// ============================================================================
// Backing
// ============================================================================

/// Remote control for a [`FlakyBacking`]
#[derive(Clone, Default)]
pub struct FailSwitch {
    remaining: Arc<Mutex<Option<usize>>>,
}

impl FailSwitch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Let `ops` more mutations through, fail the next one, then recover
    pub fn fail_after(&self, ops: usize) {
        *self.remaining.lock() = Some(ops);
    }

    /// Fail the next mutation only
    pub fn fail_now(&self) {
        self.fail_after(0);
    }

    /// Stop failing
    pub fn heal(&self) {
        *self.remaining.lock() = None;
    }

    fn tick(&self) -> std::result::Result<(), BackingError> {
        let mut remaining = self.remaining.lock();
        match *remaining {
            Some(0) => {
                *remaining = None;
                Err(BackingError::Rejected("injected failure".to_string()))
            }
            Some(n) => {
                *remaining = Some(n - 1);
                Ok(())
            }
            None => Ok(()),
        }
    }
}

/// In-memory backing that fails when its switch says so
pub struct FlakyBacking<T> {
    inner: VecBacking<T>,
    switch: FailSwitch,
}

impl<T> FlakyBacking<T> {
    pub fn new(switch: FailSwitch) -> Self {
        FlakyBacking {
            inner: VecBacking::new(),
            switch,
        }
    }
}

impl<T> BackingSequence for FlakyBacking<T> {
    type Item = T;

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn append(&mut self, item: T) -> std::result::Result<(), BackingError> {
        self.switch.tick()?;
        self.inner.append(item)
    }

    fn insert(&mut self, index: usize, item: T) -> std::result::Result<(), BackingError> {
        self.switch.tick()?;
        self.inner.insert(index, item)
    }

    fn assign(&mut self, index: usize, item: T) -> std::result::Result<(), BackingError> {
        self.switch.tick()?;
        self.inner.assign(index, item)
    }

    fn delete(&mut self, index: usize) -> std::result::Result<(), BackingError> {
        self.switch.tick()?;
        self.inner.delete(index)
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &T> + '_> {
        self.inner.iter()
    }
}

/// Flaky backing plus the switch that drives it
pub fn flaky<T: 'static>() -> (BackingHandle<T>, FailSwitch) {
    let switch = FailSwitch::new();
    (Box::new(FlakyBacking::new(switch.clone())), switch)
}

// ============================================================================
// Sequences and assertions
// ============================================================================

pub fn context() -> SimulationContext {
    SimulationContext::new("test-sim")
}

/// Unsynced sequence of `members`, attachment enabled
pub fn sequence_of(members: &[Member]) -> SyncedSequence<Member> {
    SyncedSequence::builder()
        .label("test")
        .elements(members.iter().cloned())
        .build()
        .unwrap()
}

/// Synced sequence of `members` over a `VecBacking`
pub fn synced_sequence_of(members: &[Member]) -> SyncedSequence<Member> {
    let mut seq = sequence_of(members);
    seq.sync(context(), Box::new(VecBacking::new())).unwrap();
    seq
}

/// Names of the members, in order
pub fn names(seq: &SyncedSequence<Member>) -> Vec<String> {
    seq.iter().map(|m| m.name().to_string()).collect()
}

/// Length and order parity between members and backing
pub fn assert_parity<E, B>(seq: &SyncedSequence<E, B>)
where
    E: Ownable,
    B: PartialEq + fmt::Debug,
{
    if !seq.is_synced() {
        return;
    }
    let mirrored: Vec<&B> = seq.synced_iter().collect();
    let expected: Vec<B> = seq.iter().map(|e| seq.converter().convert(e)).collect();
    assert_eq!(mirrored.len(), seq.len(), "length parity");
    assert!(
        mirrored.iter().zip(&expected).all(|(a, b)| *a == b),
        "order parity: backing {:?}, expected {:?}",
        mirrored,
        expected
    );
}

/// Every member is owned and attached exactly when the sequence is synced
pub fn assert_attachment(seq: &SyncedSequence<Member>) {
    for m in seq {
        assert_eq!(m.is_attached(), seq.is_synced(), "{} attachment", m.name());
        assert_eq!(m.is_owned(), seq.is_synced(), "{} ownership", m.name());
    }
}
