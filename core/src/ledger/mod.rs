pub mod bag;
pub mod tracked;

pub use bag::{Bag, BagState};
pub use tracked::Tracked;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::LedgerError;

/// State capture/restore contract for anything that round-trips.
///
/// `track` transitions the value from "default-only" to "capturing":
/// mutations made before the call are treated as the type's hard-coded
/// defaults and never captured; everything after it is. `capture` returns
/// `None` when nothing changed from defaults, so untouched values cost
/// zero bytes on the wire. `restore` must be observably equivalent to
/// replaying the captured mutations onto a freshly-defaulted value.
///
/// `Entry` is a named struct-of-optionals per implementing type; its field
/// count and order are part of the type's wire contract.
pub trait StateManaged {
    type Entry: Serialize + DeserializeOwned;

    fn track(&mut self);

    fn is_tracking(&self) -> bool;

    fn capture(&self) -> Option<Self::Entry>;

    fn restore(&mut self, entry: Self::Entry) -> Result<(), LedgerError>;
}

/// Erased capture for storage inside a `NodeEntry`'s `own` slot.
pub fn capture_bytes<T: StateManaged>(value: &T) -> Result<Option<Vec<u8>>, LedgerError> {
    match value.capture() {
        Some(entry) => Ok(Some(bincode::serialize(&entry)?)),
        None => Ok(None),
    }
}

/// Erased restore from a `NodeEntry`'s `own` slot. A decode failure here
/// means the persisted entry was produced by a different entry shape,
/// which is a configuration error, not bad user input.
pub fn restore_bytes<T: StateManaged>(value: &mut T, bytes: &[u8]) -> Result<(), LedgerError> {
    let entry = bincode::deserialize(bytes).map_err(|e| LedgerError::ShapeMismatch(e.to_string()))?;
    value.restore(entry)
}
