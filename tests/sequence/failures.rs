//! Failed mutations leave the sequence, the backing and every member as they were

use crate::common::*;

fn flaky_sequence_of(ms: &[Member]) -> (SyncedSequence<Member>, FailSwitch) {
    let mut seq = sequence_of(ms);
    let (backing, switch) = flaky();
    seq.sync(context(), backing).unwrap();
    (seq, switch)
}

// ============================================================================
// Member refuses to attach
// ============================================================================

#[test]
fn append_of_refusing_member_changes_nothing() {
    let ms = members(2);
    let mut seq = synced_sequence_of(&ms);
    let stubborn = member("stubborn");
    stubborn.refuse_attach(true);

    let err = seq.append(stubborn.clone()).unwrap_err();

    assert!(matches!(err, SequenceError::AttachFailed(_)));
    assert_eq!(err.to_string(), "attach failed: stubborn refused to attach");
    assert!(!stubborn.is_owned());
    assert_eq!(names(&seq), vec!["m0", "m1"]);
    assert_parity(&seq);
    assert_attachment(&seq);
}

#[test]
fn set_at_with_refusing_member_keeps_old() {
    let ms = members(2);
    let mut seq = synced_sequence_of(&ms);
    let stubborn = member("stubborn");
    stubborn.refuse_attach(true);

    assert!(seq.set_at(0, stubborn.clone()).is_err());

    assert_eq!(ms[0].detaches(), 0);
    assert!(ms[0].is_attached());
    assert!(!stubborn.is_owned());
    assert_eq!(names(&seq), vec!["m0", "m1"]);
    assert_parity(&seq);
}

// ============================================================================
// Backing refuses
// ============================================================================

#[test]
fn insert_refused_by_backing_releases_candidate() {
    init_tracing();
    let ms = members(2);
    let (mut seq, switch) = flaky_sequence_of(&ms);
    let extra = member("extra");
    switch.fail_now();

    let err = seq.insert_at(1, extra.clone()).unwrap_err();

    assert!(matches!(err, SequenceError::Backing(BackingError::Rejected(_))));
    assert!(!extra.is_owned());
    assert!(!extra.is_attached());
    assert_eq!((extra.attaches(), extra.detaches()), (1, 1));
    assert_eq!(names(&seq), vec!["m0", "m1"]);
    assert_parity(&seq);
}

#[test]
fn set_at_refused_by_backing_keeps_old_attached() {
    let ms = members(2);
    let (mut seq, switch) = flaky_sequence_of(&ms);
    let fresh = member("fresh");
    switch.fail_now();

    assert!(seq.set_at(1, fresh.clone()).unwrap_err().is_collaborator_failure());

    assert!(ms[1].is_attached());
    assert!(ms[1].is_owned());
    assert_eq!(ms[1].detaches(), 0);
    assert!(!fresh.is_owned());
    assert_eq!(names(&seq), vec!["m0", "m1"]);
    assert_parity(&seq);
}

#[test]
fn delete_refused_by_backing_keeps_member() {
    let ms = members(2);
    let (mut seq, switch) = flaky_sequence_of(&ms);
    switch.fail_now();

    assert!(seq.delete_at(0).is_err());

    assert_eq!(names(&seq), vec!["m0", "m1"]);
    assert!(ms[0].is_attached());
    assert_eq!(ms[0].detaches(), 0);
    assert_parity(&seq);

    // The switch fails once; the retry goes through
    seq.delete_at(0).unwrap();
    assert_eq!(names(&seq), vec!["m1"]);
    assert_parity(&seq);
}

#[test]
fn delete_slice_stops_after_last_completed_deletion() {
    let ms = members(5);
    let (mut seq, switch) = flaky_sequence_of(&ms);
    switch.fail_after(1);

    // Positions 4, 2, 0 in that order; the second deletion fails
    let stopped = seq.delete_slice(Slice::with_step(None, None, 2)).unwrap_err();

    assert!(stopped.error().is_collaborator_failure());
    assert_eq!(names(&seq), vec!["m0", "m1", "m2", "m3"]);
    assert_eq!(ms[4].detaches(), 1);
    assert!(ms[..4].iter().all(|m| m.is_attached()));
    assert_parity(&seq);

    // The member removed before the refusal comes back released
    let removed = stopped.into_removed();
    assert_eq!(removed, vec![ms[4].clone()]);
    assert!(!removed[0].is_owned() && !removed[0].is_attached());
}

#[test]
fn delete_slice_refused_at_once_returns_nothing() {
    let ms = members(3);
    let (mut seq, switch) = flaky_sequence_of(&ms);
    switch.fail_now();

    let (error, removed) = seq.delete_slice(..).unwrap_err().into_parts();

    assert!(matches!(error, SequenceError::Backing(_)));
    assert!(removed.is_empty());
    assert_eq!(seq.len(), 3);
    assert_parity(&seq);
}

#[test]
fn delete_slice_stop_converts_with_question_mark() {
    fn drop_all(seq: &mut SyncedSequence<Member>) -> Result<usize> {
        Ok(seq.delete_slice(..)?.len())
    }

    let (mut seq, switch) = flaky_sequence_of(&members(2));
    switch.fail_now();

    assert!(drop_all(&mut seq).unwrap_err().is_collaborator_failure());
    assert_eq!(drop_all(&mut seq), Ok(2));
}

#[test]
fn reverse_refused_by_backing_restores_order() {
    let ms = members(4);
    let (mut seq, switch) = flaky_sequence_of(&ms);
    switch.fail_after(2);

    assert!(seq.reverse().is_err());

    assert_eq!(names(&seq), vec!["m0", "m1", "m2", "m3"]);
    assert_parity(&seq);
    assert_attachment(&seq);
}

#[test]
fn unsynced_mutations_never_touch_backing() {
    let ms = members(2);
    let (mut seq, switch) = flaky_sequence_of(&ms);
    let backing = seq.unsync().unwrap();
    switch.fail_now();

    seq.append(member("m2")).unwrap();
    seq.set_at(0, member("m0'")).unwrap();
    seq.delete_at(1).unwrap();

    assert_eq!(backing.len(), 2);
    assert_eq!(names(&seq), vec!["m0'", "m2"]);
}
