//! Snapshots and serde persistence

use crate::common::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Wall {
    radius: f64,
    inside: bool,
}

fn wall(radius: f64) -> Inert<Wall> {
    Inert(Wall {
        radius,
        inside: true,
    })
}

fn positive() -> Validator<Inert<Wall>> {
    Validator::predicate("positive-radius", |w: &Inert<Wall>| w.radius > 0.0)
}

fn radius(w: &Inert<Wall>) -> f64 {
    w.radius
}

fn walls() -> SyncedSequence<Inert<Wall>, f64> {
    SequenceBuilder::converting(radius)
        .validator(positive())
        .label("walls")
        .attach_members(false)
        .elements([wall(1.0), wall(2.5), wall(4.0)])
        .build()
        .unwrap()
}

#[test]
fn snapshot_of_synced_sequence_restores_unsynced() {
    let ms = members(3);
    let seq = synced_sequence_of(&ms);

    let restored = SyncedSequence::from_snapshot(seq.snapshot());

    assert!(!restored.is_synced());
    assert_eq!(restored, seq);
    assert_eq!(restored.label(), "test");
    // Handles are shared; the live sequence still owns them
    assert!(ms.iter().all(|m| m.is_attached()));
}

#[test]
fn snapshot_keeps_converter() {
    let seq = walls();

    let mut restored = SyncedSequence::from_snapshot(seq.snapshot());
    restored.sync(context(), Box::new(VecBacking::new())).unwrap();

    let mirrored: Vec<f64> = restored.synced_iter().copied().collect();
    assert_eq!(mirrored, vec![1.0, 2.5, 4.0]);
}

#[test]
fn json_round_trip_rebuilds_equal_sequence() {
    let seq = walls();

    let json = serde_json::to_string(&seq.snapshot()).unwrap();
    let persisted: PersistedSequence<Inert<Wall>> = serde_json::from_str(&json).unwrap();
    let restored = persisted
        .restore(Converter::new(radius), Some(positive()))
        .unwrap();

    assert_eq!(restored, seq);
    assert_eq!(restored.options(), seq.options());
    assert_eq!(restored.validator().spec(), seq.validator().spec());
}

#[test]
fn persisted_form_never_mentions_sync_state() {
    let mut seq = walls();
    seq.sync(context(), Box::new(VecBacking::new())).unwrap();

    let value = serde_json::to_value(seq.snapshot()).unwrap();
    let object = value.as_object().unwrap();

    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["elements", "options", "validator"]);
    assert_eq!(
        value["validator"],
        json!({"type": "predicate", "name": "positive-radius"})
    );
    assert_eq!(value["elements"][1], json!({"radius": 2.5, "inside": true}));
}

#[test]
fn restore_without_predicate_fails() {
    let json = serde_json::to_string(&walls().snapshot()).unwrap();
    let persisted: PersistedSequence<Inert<Wall>> = serde_json::from_str(&json).unwrap();

    let err = persisted.restore(Converter::new(radius), None).unwrap_err();

    assert_eq!(
        err.to_string(),
        "snapshot error: predicate validator `positive-radius` must be supplied"
    );
}

#[test]
fn restore_revalidates_hand_edited_input() {
    let persisted: PersistedSequence<Inert<Wall>> = serde_json::from_value(json!({
        "elements": [{"radius": 1.0, "inside": true}, {"radius": -3.0, "inside": false}],
        "options": {"attach_members": false},
        "validator": {"type": "predicate", "name": "positive-radius"}
    }))
    .unwrap();

    let err = persisted
        .restore(Converter::new(radius), Some(positive()))
        .unwrap_err();

    assert!(err.is_validation());
}
