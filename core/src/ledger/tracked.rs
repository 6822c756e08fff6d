use crate::error::LedgerError;
use crate::ledger::StateManaged;

/// A lazily-created sub-state slot (a style, a nested bag).
///
/// The slot stays `None` until first access; `get_or_create` enrolls a
/// freshly-created value in tracking iff the owner is already tracking.
/// Absent slots capture to `None` and decode back to "never created",
/// which is observably identical to the default path.
#[derive(Debug, Clone, Default)]
pub struct Tracked<T> {
    inner: Option<T>,
}

impl<T: StateManaged + Default> Tracked<T> {
    pub fn new() -> Self { Tracked { inner: None } }

    pub fn get(&self) -> Option<&T> { self.inner.as_ref() }

    pub fn is_created(&self) -> bool { self.inner.is_some() }

    pub fn get_or_create(&mut self, owner_tracking: bool) -> &mut T {
        let created = self.inner.is_none();
        let value = self.inner.get_or_insert_with(T::default);
        if created && owner_tracking {
            value.track();
        }
        value
    }

    /// Called when the owner begins tracking: already-created slots enroll
    /// now, slots created later enroll in `get_or_create`.
    pub fn track(&mut self) {
        if let Some(value) = &mut self.inner {
            value.track();
        }
    }

    pub fn capture(&self) -> Option<T::Entry> { self.inner.as_ref().and_then(|value| value.capture()) }

    pub fn restore(&mut self, entry: Option<T::Entry>, owner_tracking: bool) -> Result<(), LedgerError> {
        if let Some(entry) = entry {
            self.get_or_create(owner_tracking).restore(entry)?;
        }
        Ok(())
    }
}
