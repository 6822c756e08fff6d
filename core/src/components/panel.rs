use std::any::Any;

use crate::error::LedgerError;
use crate::ledger::{self, Bag, BagState, StateManaged};
use crate::tree::Component;

/// A plain container. Holds a bag for host-attached state and passes
/// every bubbling envelope through unchanged; typically the tree root.
#[derive(Default)]
pub struct Panel {
    bag: Bag,
    children: Vec<Box<dyn Component>>,
}

impl Panel {
    pub fn new() -> Self { Self::default() }

    pub fn add_child(&mut self, child: Box<dyn Component>) -> &mut Self {
        self.children.push(child);
        self
    }

    pub fn bag(&self) -> &Bag { &self.bag }

    pub fn bag_mut(&mut self) -> &mut Bag { &mut self.bag }
}

impl StateManaged for Panel {
    type Entry = BagState;

    fn track(&mut self) { self.bag.track(); }

    fn is_tracking(&self) -> bool { self.bag.is_tracking() }

    fn capture(&self) -> Option<BagState> { self.bag.capture() }

    fn restore(&mut self, entry: BagState) -> Result<(), LedgerError> { self.bag.restore(entry) }
}

impl Component for Panel {
    fn kind(&self) -> &'static str { "panel" }

    fn children(&self) -> &[Box<dyn Component>] { &self.children }

    fn children_mut(&mut self) -> &mut [Box<dyn Component>] { &mut self.children }

    fn track(&mut self) { StateManaged::track(self); }

    fn capture_own(&self) -> Result<Option<Vec<u8>>, LedgerError> { ledger::capture_bytes(self) }

    fn restore_own(&mut self, bytes: &[u8]) -> Result<(), LedgerError> { ledger::restore_bytes(self, bytes) }

    fn as_any(&self) -> &dyn Any { self }

    fn as_any_mut(&mut self) -> &mut dyn Any { self }
}
