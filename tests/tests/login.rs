mod common;

use std::sync::Arc;

use rondo_core::components::LoginForm;
use rondo_core::dispatch::{decode_and_dispatch, DispatchOutcome};
use rondo_core::{Command, NoValidation, ScalarValue, Tree};
use rondo_proto::{InteractionToken, NodePath};

use common::MemoryCredentials;

const PASSWORD: &str = "hunter2-correct-horse";

fn login_tree() -> Tree {
    let validator = Arc::new(MemoryCredentials { user: "ada", password: PASSWORD });
    let mut tree = Tree::new(Box::new(LoginForm::new(validator)));
    tree.track();
    tree
}

fn form_of_mut(tree: &mut Tree) -> &mut LoginForm {
    tree.root_mut().as_any_mut().downcast_mut::<LoginForm>().unwrap()
}

fn form_of(tree: &Tree) -> &LoginForm { tree.root().as_any().downcast_ref::<LoginForm>().unwrap() }

fn submit(tree: &mut Tree) -> DispatchOutcome {
    let raw = InteractionToken::new(tree.id(), NodePath::root(), LoginForm::login_argument()).to_string();
    decode_and_dispatch(Some(&raw), tree, &NoValidation)
}

fn contains_subslice(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}

#[test]
fn good_credentials_authenticate() {
    let mut tree = login_tree();
    {
        let form = form_of_mut(&mut tree);
        form.set_user_name("ada");
        form.set_password(PASSWORD);
    }
    let outcome = submit(&mut tree);
    match outcome {
        DispatchOutcome::Consumed { envelope: Some(envelope) } => {
            assert_eq!(envelope.command, Command::Authenticated);
            assert_eq!(envelope.argument, ScalarValue::Bool(true));
        }
        other => panic!("unexpected outcome {:?}", other),
    }
    assert!(form_of(&tree).is_authenticated());
}

#[test]
fn bad_credentials_do_not_authenticate() {
    let mut tree = login_tree();
    {
        let form = form_of_mut(&mut tree);
        form.set_user_name("ada");
        form.set_password("wrong");
    }
    match submit(&mut tree) {
        DispatchOutcome::Consumed { envelope: Some(envelope) } => {
            assert_eq!(envelope.argument, ScalarValue::Bool(false));
        }
        other => panic!("unexpected outcome {:?}", other),
    }
    assert!(!form_of(&tree).is_authenticated());
}

#[test]
fn other_commands_do_not_decode_on_the_form() {
    let mut tree = login_tree();
    // Bare "Login" has no separator, so even the right name is malformed.
    for bad in ["Select$", "Login", "", "Delete$x"] {
        let raw = InteractionToken::new(tree.id(), NodePath::root(), bad).to_string();
        let outcome = decode_and_dispatch(Some(&raw), &mut tree, &NoValidation);
        assert!(matches!(outcome, DispatchOutcome::Rejected(_)), "{:?} must not decode", bad);
    }
}

#[test]
fn the_password_is_never_captured() {
    let mut tree = login_tree();
    {
        let form = form_of_mut(&mut tree);
        form.set_user_name("ada");
        form.set_password(PASSWORD);
    }
    submit(&mut tree);

    let blob = tree.serialize().unwrap();
    assert!(
        !contains_subslice(blob.as_bytes(), PASSWORD.as_bytes()),
        "the password must not appear in the persisted blob"
    );
    assert!(contains_subslice(blob.as_bytes(), b"ada"), "the user name round-trips");

    let mut fresh = login_tree();
    fresh.restore_blob(&blob).unwrap();
    let form = form_of(&fresh);
    assert_eq!(form.user_name(), "ada");
    assert!(form.is_authenticated());
}
