mod common;

use rondo_core::render::RenderContext;
use rondo_core::{NoValidation, ValidationRegistry};
use rondo_proto::{InteractionToken, NodePath, TreeId};

#[test]
fn token_text_round_trips() {
    let token = InteractionToken::new(TreeId::new(), NodePath::new(vec![0, 2, 1]), "Edit$");
    let parsed = InteractionToken::parse(&token.to_string()).unwrap();
    assert_eq!(parsed, token);
}

#[test]
fn argument_keeps_every_colon() {
    let token = InteractionToken::new(TreeId::new(), NodePath::root(), "a:b::c");
    let parsed = InteractionToken::parse(&token.to_string()).unwrap();
    assert_eq!(parsed.argument, "a:b::c");
    assert!(parsed.path.is_root());
}

#[test]
fn encoding_is_deterministic_within_a_generation() {
    let tree = TreeId::new();
    let authority = NoValidation;
    let path = NodePath::new(vec![3, 1]);

    let first = RenderContext::new(tree, &authority).postback_token(&path, "42").to_string();
    let second = RenderContext::new(tree, &authority).postback_token(&path, "42").to_string();
    assert_eq!(first, second);
}

#[test]
fn distinct_nodes_get_distinct_tokens() {
    let tree = TreeId::new();
    let authority = NoValidation;
    let ctx = RenderContext::new(tree, &authority);

    let a = ctx.postback_token(&NodePath::new(vec![0]), "x").to_string();
    let b = ctx.postback_token(&NodePath::new(vec![1]), "x").to_string();
    let c = ctx.postback_token(&NodePath::new(vec![0]), "y").to_string();
    assert_ne!(a, b);
    assert_ne!(a, c);
    assert_ne!(b, c);
}

#[test]
fn distinct_generations_get_distinct_tokens() {
    let authority = NoValidation;
    let path = NodePath::new(vec![0]);
    let a = RenderContext::new(TreeId::new(), &authority).postback_token(&path, "x").to_string();
    let b = RenderContext::new(TreeId::new(), &authority).postback_token(&path, "x").to_string();
    assert_ne!(a, b);
}

#[test]
fn rendering_registers_with_the_authority() {
    let registry = ValidationRegistry::default();
    let tree = TreeId::new();
    let issued = RenderContext::new(tree, &registry).postback_token(&NodePath::new(vec![2]), "Sort$name");

    use rondo_core::authority::TokenAuthority;
    assert!(registry.validate(&issued));

    let forged = InteractionToken::new(tree, NodePath::new(vec![2]), "Sort$age");
    assert!(!registry.validate(&forged));
}

#[test]
fn tree_id_base64_round_trips() {
    let id = TreeId::new();
    assert_eq!(TreeId::from_base64(id.to_base64()).unwrap(), id);
    assert_eq!(TreeId::from_bytes(id.to_bytes()), id);
}
