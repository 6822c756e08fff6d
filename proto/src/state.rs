use serde::{Deserialize, Serialize};

/// Captured state for one node and, recursively, its children.
///
/// `own` is the node type's entry struct, already bincode-encoded by the
/// owning component (each type declares its own entry shape; this crate
/// does not interpret it). `children` preserves child count and order
/// exactly: a `None` child means that child captured nothing, not that it
/// is absent from the tree.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct NodeEntry {
    pub own: Option<Vec<u8>>,
    pub children: Vec<Option<NodeEntry>>,
}

impl NodeEntry {
    /// True when neither this node nor any descendant captured anything.
    /// The capture path prunes such entries to keep the blob sparse.
    pub fn is_empty(&self) -> bool { self.own.is_none() && self.children.iter().all(|c| c.is_none()) }
}

impl std::fmt::Display for NodeEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "NodeEntry(own {}b, children [{}])",
            self.own.as_ref().map(|b| b.len()).unwrap_or(0),
            self.children.iter().map(|c| if c.is_some() { "x" } else { "-" }).collect::<Vec<_>>().join("")
        )
    }
}
