use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

use crate::{error::DecodeError, path::NodePath};

/// Identifies one rendered tree generation. Tokens are only meaningful
/// against the generation that issued them; the authority uses this id to
/// scope its validation registry.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Ord, PartialOrd, Serialize, Deserialize)]
pub struct TreeId(Ulid);

impl TreeId {
    pub fn new() -> Self { TreeId(Ulid::new()) }

    pub fn from_bytes(bytes: [u8; 16]) -> Self { TreeId(Ulid::from_bytes(bytes)) }

    pub fn to_bytes(&self) -> [u8; 16] { self.0.to_bytes() }

    pub fn from_base64<T: AsRef<[u8]>>(input: T) -> Result<Self, DecodeError> {
        let decoded = general_purpose::URL_SAFE_NO_PAD.decode(input)?;
        let bytes: [u8; 16] = decoded[..].try_into().map_err(|_| DecodeError::InvalidLength)?;
        Ok(TreeId(Ulid::from_bytes(bytes)))
    }

    pub fn to_base64(&self) -> String { general_purpose::URL_SAFE_NO_PAD.encode(self.0.to_bytes()) }
}

impl Default for TreeId {
    fn default() -> Self { Self::new() }
}

impl fmt::Display for TreeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.to_base64()) }
}

impl fmt::Debug for TreeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "TreeId({})", self.to_base64()) }
}

impl TryFrom<&str> for TreeId {
    type Error = DecodeError;
    fn try_from(text: &str) -> Result<Self, Self::Error> { Self::from_base64(text) }
}

/// One client-originated interaction, round-tripped as an opaque string.
///
/// The canonical text form is `<tree>:<path>:<argument>`. The tree id and
/// path never contain `:`, so the argument is the remainder after the
/// second separator and may contain anything, including further colons.
/// The argument's grammar is private to the addressed node's type; this
/// crate treats it as opaque text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionToken {
    pub tree: TreeId,
    pub path: NodePath,
    pub argument: String,
}

impl InteractionToken {
    pub fn new(tree: TreeId, path: NodePath, argument: impl Into<String>) -> Self {
        Self { tree, path, argument: argument.into() }
    }

    pub fn parse(raw: &str) -> Result<Self, DecodeError> {
        let (tree, rest) = raw.split_once(':').ok_or(DecodeError::InvalidFormat("missing tree separator"))?;
        let (path, argument) = rest.split_once(':').ok_or(DecodeError::InvalidFormat("missing path separator"))?;
        Ok(Self { tree: TreeId::from_base64(tree)?, path: NodePath::parse(path)?, argument: argument.to_owned() })
    }
}

impl fmt::Display for InteractionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.tree, self.path, self.argument)
    }
}

impl TryFrom<&str> for InteractionToken {
    type Error = DecodeError;
    fn try_from(raw: &str) -> Result<Self, Self::Error> { Self::parse(raw) }
}
