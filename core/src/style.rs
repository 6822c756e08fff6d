use crate::error::LedgerError;
use crate::ledger::{Bag, BagState, StateManaged};

const FORE_COLOR: &str = "ForeColor";
const BACK_COLOR: &str = "BackColor";
const CSS_CLASS: &str = "CssClass";
const FONT_BOLD: &str = "FontBold";

/// Visual state attached to a node slot. Deliberately small: enough
/// surface to exercise lazy slot creation and sparse capture, not a full
/// property bag.
#[derive(Debug, Clone, Default)]
pub struct Style {
    bag: Bag,
}

impl Style {
    pub fn new() -> Self { Self::default() }

    pub fn fore_color(&self) -> Option<&str> { self.bag.get(FORE_COLOR).and_then(|v| v.as_str()) }

    pub fn set_fore_color(&mut self, color: impl Into<String>) { self.bag.set(FORE_COLOR, color.into()); }

    pub fn back_color(&self) -> Option<&str> { self.bag.get(BACK_COLOR).and_then(|v| v.as_str()) }

    pub fn set_back_color(&mut self, color: impl Into<String>) { self.bag.set(BACK_COLOR, color.into()); }

    pub fn css_class(&self) -> Option<&str> { self.bag.get(CSS_CLASS).and_then(|v| v.as_str()) }

    pub fn set_css_class(&mut self, class: impl Into<String>) { self.bag.set(CSS_CLASS, class.into()); }

    pub fn font_bold(&self) -> bool { self.bag.get_bool(FONT_BOLD, false) }

    pub fn set_font_bold(&mut self, bold: bool) { self.bag.set(FONT_BOLD, bold); }
}

impl StateManaged for Style {
    type Entry = BagState;

    fn track(&mut self) { self.bag.track(); }

    fn is_tracking(&self) -> bool { self.bag.is_tracking() }

    fn capture(&self) -> Option<BagState> { self.bag.capture() }

    fn restore(&mut self, entry: BagState) -> Result<(), LedgerError> { self.bag.restore(entry) }
}
