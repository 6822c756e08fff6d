use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{error::DecodeError, state::NodeEntry};

/// Version byte prefixed to every serialized blob. Bump whenever the
/// `NodeEntry` wire shape changes; old blobs then decode to `BadVersion`
/// instead of being misread.
pub const STATE_BLOB_VERSION: u8 = 1;

/// The opaque persisted form of a captured tree. The surrounding
/// transport stores and returns it unmodified; any reordering or
/// truncation surfaces as a decode failure, never as silently wrong
/// state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateBlob(Vec<u8>);

impl StateBlob {
    /// Serialize a captured entry. `None` (nothing changed anywhere in the
    /// tree) still produces a blob so the two cases round-trip distinctly.
    pub fn serialize(entry: Option<&NodeEntry>) -> Result<Self, DecodeError> {
        let mut bytes = vec![STATE_BLOB_VERSION];
        bytes.extend(bincode::serialize(&entry)?);
        Ok(StateBlob(bytes))
    }

    pub fn deserialize(&self) -> Result<Option<NodeEntry>, DecodeError> {
        let (version, rest) = self.0.split_first().ok_or(DecodeError::InvalidLength)?;
        if *version != STATE_BLOB_VERSION {
            return Err(DecodeError::BadVersion(*version));
        }
        Ok(bincode::deserialize(rest)?)
    }

    pub fn as_bytes(&self) -> &[u8] { &self.0 }

    pub fn from_bytes(bytes: Vec<u8>) -> Self { StateBlob(bytes) }

    pub fn to_base64(&self) -> String { general_purpose::URL_SAFE_NO_PAD.encode(&self.0) }

    pub fn from_base64<T: AsRef<[u8]>>(input: T) -> Result<Self, DecodeError> {
        Ok(StateBlob(general_purpose::URL_SAFE_NO_PAD.decode(input)?))
    }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl fmt::Display for StateBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "StateBlob({}b)", self.0.len()) }
}
