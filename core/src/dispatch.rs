use tracing::{debug, warn};

use crate::authority::TokenAuthority;
use crate::command::Envelope;
use crate::tree::{Bubble, Component, Tree};
use rondo_proto::InteractionToken;

/// Why an incoming token was rejected. Every category recovers locally:
/// the tree proceeds in its post-restore state as if no interaction
/// occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The raw string is not a token at all.
    Malformed,
    /// The token failed same-session validation. Checked before any
    /// payload grammar runs, so forged payloads never reach live state.
    IntegrityFailure,
    /// The address no longer resolves in the rebuilt tree.
    StalePath,
    /// The addressed node's grammar did not accept the payload.
    MalformedArgument,
}

/// Result of one round trip's interaction processing.
#[derive(Debug, PartialEq)]
pub enum DispatchOutcome {
    /// The target handled the token. `envelope` is whatever notification
    /// survived bubbling to the root, for the host to observe.
    Consumed { envelope: Option<Envelope> },
    /// No token this round trip.
    Ignored,
    Rejected(RejectReason),
}

enum Step {
    NotFound,
    Malformed,
    Done(Option<Envelope>),
}

/// Decode an incoming token and route it: validate, resolve the target by
/// address, invoke its local handler, then bubble the resulting envelope
/// ancestor-by-ancestor to the root. Nothing escapes this boundary as an
/// error or panic; all failure categories map to `Rejected`.
pub fn decode_and_dispatch(raw: Option<&str>, tree: &mut Tree, authority: &dyn TokenAuthority) -> DispatchOutcome {
    let Some(raw) = raw else {
        return DispatchOutcome::Ignored;
    };
    let token = match InteractionToken::parse(raw) {
        Ok(token) => token,
        Err(e) => {
            warn!("dispatch: malformed token: {}", e);
            return DispatchOutcome::Rejected(RejectReason::Malformed);
        }
    };
    // Integrity comes before any grammar parsing of the payload.
    if token.tree != tree.id() || !authority.validate(&token) {
        warn!("dispatch: token failed validation for tree {}", tree.id());
        return DispatchOutcome::Rejected(RejectReason::IntegrityFailure);
    }
    match descend(tree.root_mut(), &token, 0) {
        Step::NotFound => {
            debug!("dispatch: stale path {}", token.path);
            DispatchOutcome::Rejected(RejectReason::StalePath)
        }
        Step::Malformed => {
            debug!("dispatch: node at {} rejected argument {:?}", token.path, token.argument);
            DispatchOutcome::Rejected(RejectReason::MalformedArgument)
        }
        Step::Done(envelope) => {
            debug!("dispatch: consumed {} -> {:?}", token.path, envelope.as_ref().map(|e| e.command));
            DispatchOutcome::Consumed { envelope }
        }
    }
}

/// Recursive resolution; bubbling happens on the unwind, which visits
/// ancestors in leaf-to-root order exactly once each.
fn descend(node: &mut dyn Component, token: &InteractionToken, depth: usize) -> Step {
    let segments = token.path.segments();
    if depth == segments.len() {
        return match node.handle_argument(&token.argument) {
            Ok(Some(mut envelope)) => {
                envelope.origin = token.path.clone();
                Step::Done(Some(envelope))
            }
            Ok(None) => Step::Done(None),
            Err(_) => Step::Malformed,
        };
    }
    let step = {
        let index = segments[depth] as usize;
        match node.children_mut().get_mut(index) {
            Some(child) => descend(child.as_mut(), token, depth + 1),
            None => return Step::NotFound,
        }
    };
    match step {
        Step::Done(Some(envelope)) => match node.on_bubble(envelope) {
            Bubble::Handled => Step::Done(None),
            Bubble::Forward(envelope) => Step::Done(Some(envelope)),
        },
        other => other,
    }
}
