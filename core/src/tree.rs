use std::any::Any;

use tracing::debug;

use crate::command::Envelope;
use crate::error::LedgerError;
use rondo_proto::{DecodeError, NodeEntry, NodePath, StateBlob, TreeId};

/// What an ancestor does with a bubbling envelope: consume it, or forward
/// one (the same, or a translated re-wrap) to the next ancestor. There is
/// no way to signal the router to stop; a node that wants propagation to
/// end simply handles the envelope.
pub enum Bubble {
    Handled,
    Forward(Envelope),
}

/// One addressable node in the retained tree.
///
/// A node exclusively owns its children; addressing is positional, so the
/// order children are added is part of the node's round-trip contract.
/// Nodes are rebuilt each round trip and only their captured entries
/// outlive it.
pub trait Component: Any {
    fn kind(&self) -> &'static str;

    fn children(&self) -> &[Box<dyn Component>] { &[] }

    fn children_mut(&mut self) -> &mut [Box<dyn Component>] { &mut [] }

    /// Begin capturing mutations on this node's own sub-state. The tree
    /// walks the hierarchy, so implementations only handle their own
    /// slots.
    fn track(&mut self) {}

    /// This node's captured entry, bincode-encoded, or `None` if nothing
    /// changed from defaults.
    fn capture_own(&self) -> Result<Option<Vec<u8>>, LedgerError> { Ok(None) }

    fn restore_own(&mut self, _bytes: &[u8]) -> Result<(), LedgerError> {
        Err(LedgerError::ShapeMismatch(format!("{} node carries no own state", self.kind())))
    }

    /// Interpret a token payload addressed to this node. The grammar is
    /// private to the node's type; a payload that does not match it is a
    /// decode error, which the router reports as a rejection. `Ok(None)`
    /// means the interaction was absorbed without a notification.
    fn handle_argument(&mut self, _argument: &str) -> Result<Option<Envelope>, DecodeError> { Ok(None) }

    /// Observe an envelope bubbling up from a descendant.
    fn on_bubble(&mut self, envelope: Envelope) -> Bubble { Bubble::Forward(envelope) }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// The per-round-trip component hierarchy plus the generation id under
/// which its tokens are issued.
pub struct Tree {
    id: TreeId,
    root: Box<dyn Component>,
}

impl Tree {
    /// A fresh generation; tokens issued against it are distinct from any
    /// earlier render.
    pub fn new(root: Box<dyn Component>) -> Self { Self { id: TreeId::new(), root } }

    pub fn with_id(id: TreeId, root: Box<dyn Component>) -> Self { Self { id, root } }

    pub fn id(&self) -> TreeId { self.id }

    pub fn root(&self) -> &dyn Component { self.root.as_ref() }

    pub fn root_mut(&mut self) -> &mut dyn Component { self.root.as_mut() }

    /// Resolve a path to a node. Any out-of-range index at any level
    /// yields `None`, never a fault.
    pub fn get(&self, path: &NodePath) -> Option<&dyn Component> { node_at(self.root.as_ref(), path.segments()) }

    pub fn get_mut(&mut self, path: &NodePath) -> Option<&mut dyn Component> {
        node_at_mut(self.root.as_mut(), path.segments())
    }

    /// Begin tracking on every node. Call after the host has configured
    /// the tree's defaults and before restoring the previous entry.
    pub fn track(&mut self) { track_node(self.root.as_mut()); }

    /// Capture the changed-from-default state of the whole tree. `None`
    /// means no node changed anything.
    pub fn capture(&self) -> Result<Option<NodeEntry>, LedgerError> {
        let entry = capture_node(self.root.as_ref())?;
        if let Some(entry) = &entry {
            debug!("Tree.capture {}", entry);
        }
        Ok(entry)
    }

    pub fn restore(&mut self, entry: &NodeEntry) -> Result<(), LedgerError> {
        restore_node(self.root.as_mut(), entry)
    }

    /// Capture and wrap into the opaque persisted form.
    pub fn serialize(&self) -> Result<StateBlob, LedgerError> {
        Ok(StateBlob::serialize(self.capture()?.as_ref())?)
    }

    pub fn restore_blob(&mut self, blob: &StateBlob) -> Result<(), LedgerError> {
        if let Some(entry) = blob.deserialize()? {
            self.restore(&entry)?;
        }
        Ok(())
    }
}

fn node_at<'a>(node: &'a dyn Component, segments: &[u32]) -> Option<&'a dyn Component> {
    match segments.split_first() {
        None => Some(node),
        Some((index, rest)) => {
            node.children().get(*index as usize).and_then(|child| node_at(child.as_ref(), rest))
        }
    }
}

fn node_at_mut<'a>(node: &'a mut dyn Component, segments: &[u32]) -> Option<&'a mut dyn Component> {
    match segments.split_first() {
        None => Some(node),
        Some((index, rest)) => {
            node.children_mut().get_mut(*index as usize).and_then(|child| node_at_mut(child.as_mut(), rest))
        }
    }
}

fn track_node(node: &mut dyn Component) {
    node.track();
    for child in node.children_mut() {
        track_node(child.as_mut());
    }
}

fn capture_node(node: &dyn Component) -> Result<Option<NodeEntry>, LedgerError> {
    let own = node.capture_own()?;
    let children = node
        .children()
        .iter()
        .map(|child| capture_node(child.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    let entry = NodeEntry { own, children };
    Ok(if entry.is_empty() { None } else { Some(entry) })
}

fn restore_node(node: &mut dyn Component, entry: &NodeEntry) -> Result<(), LedgerError> {
    if let Some(bytes) = &entry.own {
        node.restore_own(bytes)?;
    }
    let kind = node.kind();
    let children = node.children_mut();
    if entry.children.len() != children.len() {
        // Stateless children (grid rows) may legitimately change count
        // between round trips; a mismatch is only fatal when the entry
        // actually carries child state that would have nowhere to go.
        if entry.children.iter().any(|child| child.is_some()) {
            return Err(LedgerError::ShapeMismatch(format!(
                "{} node has {} children but entry has {}",
                kind,
                children.len(),
                entry.children.len()
            )));
        }
        return Ok(());
    }
    for (child, child_entry) in children.iter_mut().zip(&entry.children) {
        if let Some(child_entry) = child_entry {
            restore_node(child.as_mut(), child_entry)?;
        }
    }
    Ok(())
}
