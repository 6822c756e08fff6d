mod common;

use std::sync::{Arc, Mutex};

use rondo_core::dispatch::{decode_and_dispatch, DispatchOutcome};
use rondo_core::{Command, NoValidation, Tree};
use rondo_proto::{InteractionToken, NodePath};

use common::Recorder;

fn token(tree: &Tree, path: Vec<u32>, argument: &str) -> String {
    InteractionToken::new(tree.id(), NodePath::new(path), argument).to_string()
}

#[test]
fn envelopes_visit_ancestors_leaf_to_root_exactly_once() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let leaf = Recorder::new("leaf", log.clone());
    let mid = Recorder::new("mid", log.clone()).with_child(leaf);
    let root = Recorder::new("root", log.clone()).with_child(mid);
    let mut tree = Tree::new(Box::new(root));

    let raw = token(&tree, vec![0, 0], "ping");
    let outcome = decode_and_dispatch(Some(&raw), &mut tree, &NoValidation);

    assert_eq!(log.lock().unwrap().as_slice(), ["handle:leaf", "bubble:mid", "bubble:root"]);
    match outcome {
        DispatchOutcome::Consumed { envelope: Some(envelope) } => {
            assert_eq!(envelope.command, Command::ItemClicked);
            assert_eq!(envelope.origin, NodePath::new(vec![0, 0]));
        }
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[test]
fn a_handling_ancestor_stops_propagation() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let leaf = Recorder::new("leaf", log.clone());
    let mid = Recorder::stopping("mid", log.clone()).with_child(leaf);
    let root = Recorder::new("root", log.clone()).with_child(mid);
    let mut tree = Tree::new(Box::new(root));

    let raw = token(&tree, vec![0, 0], "ping");
    let outcome = decode_and_dispatch(Some(&raw), &mut tree, &NoValidation);

    // The root is never visited; the interaction still counts as consumed.
    assert_eq!(log.lock().unwrap().as_slice(), ["handle:leaf", "bubble:mid"]);
    assert_eq!(outcome, DispatchOutcome::Consumed { envelope: None });
}

#[test]
fn a_root_target_has_no_ancestors_to_visit() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let root = Recorder::new("root", log.clone()).with_child(Recorder::new("leaf", log.clone()));
    let mut tree = Tree::new(Box::new(root));

    let raw = token(&tree, vec![], "ping");
    let outcome = decode_and_dispatch(Some(&raw), &mut tree, &NoValidation);

    assert_eq!(log.lock().unwrap().as_slice(), ["handle:root"]);
    match outcome {
        DispatchOutcome::Consumed { envelope: Some(envelope) } => {
            assert!(envelope.origin.is_root());
        }
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[test]
fn an_absorbed_interaction_does_not_bubble() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let leaf = Recorder::new("leaf", log.clone());
    let root = Recorder::new("root", log.clone()).with_child(leaf);
    let mut tree = Tree::new(Box::new(root));

    // The recorder absorbs an empty argument without raising an envelope.
    let raw = token(&tree, vec![0], "");
    let outcome = decode_and_dispatch(Some(&raw), &mut tree, &NoValidation);

    assert_eq!(log.lock().unwrap().as_slice(), ["handle:leaf"]);
    assert_eq!(outcome, DispatchOutcome::Consumed { envelope: None });
}
