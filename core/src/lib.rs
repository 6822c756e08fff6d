pub mod authority;
pub mod command;
pub mod components;
pub mod data;
pub mod dispatch;
pub mod error;
pub mod ledger;
pub mod render;
pub mod style;
pub mod template;
pub mod tree;

pub use authority::{NoValidation, TokenAuthority, ValidationRegistry};
pub use command::{Command, Envelope};
pub use dispatch::{decode_and_dispatch, DispatchOutcome, RejectReason};
pub use tree::{Bubble, Component, Tree};

pub use rondo_proto as proto;
pub use rondo_proto::{InteractionToken, NodePath, ScalarValue, StateBlob, TreeId};
