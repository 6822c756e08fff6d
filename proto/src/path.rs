use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DecodeError;

/// Address of a node in the component tree: zero-based sibling indices
/// from the root, one per level. The empty path addresses the root.
///
/// Text form joins the indices with underscores (`"0_2_1"` = root's child 0
/// -> its child 2 -> its child 1).
#[derive(PartialEq, Eq, Hash, Clone, Ord, PartialOrd, Serialize, Deserialize, Default)]
pub struct NodePath(Vec<u32>);

impl NodePath {
    pub fn root() -> Self { NodePath(Vec::new()) }

    pub fn new(segments: impl Into<Vec<u32>>) -> Self { NodePath(segments.into()) }

    pub fn is_root(&self) -> bool { self.0.is_empty() }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn segments(&self) -> &[u32] { &self.0 }

    pub fn last(&self) -> Option<u32> { self.0.last().copied() }

    /// The path of this node's parent, or `None` for the root.
    pub fn parent(&self) -> Option<NodePath> {
        if self.0.is_empty() {
            None
        } else {
            Some(NodePath(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    /// Extend this path with one more child index.
    pub fn child(&self, index: u32) -> NodePath {
        let mut segments = self.0.clone();
        segments.push(index);
        NodePath(segments)
    }

    pub fn parse(text: &str) -> Result<Self, DecodeError> {
        if text.is_empty() {
            return Ok(NodePath::root());
        }
        let segments = text
            .split('_')
            .map(|s| s.parse::<u32>().map_err(|_| DecodeError::InvalidSegment(s.to_owned())))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(NodePath(segments))
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in &self.0 {
            if !first {
                write!(f, "_")?;
            }
            write!(f, "{}", segment)?;
            first = false;
        }
        Ok(())
    }
}

impl fmt::Debug for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "NodePath({})", self) }
}

impl TryFrom<&str> for NodePath {
    type Error = DecodeError;
    fn try_from(text: &str) -> Result<Self, Self::Error> { Self::parse(text) }
}

impl From<Vec<u32>> for NodePath {
    fn from(segments: Vec<u32>) -> Self { NodePath(segments) }
}

impl From<&[u32]> for NodePath {
    fn from(segments: &[u32]) -> Self { NodePath(segments.to_vec()) }
}
