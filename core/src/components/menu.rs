use std::any::Any;

use serde::{Deserialize, Serialize};

use crate::command::{Command, Envelope};
use crate::error::LedgerError;
use crate::ledger::{self, Bag, BagState, StateManaged, Tracked};
use crate::render::RenderContext;
use crate::style::Style;
use crate::template::{CompiledTemplate, TemplateWriter};
use crate::tree::Component;
use rondo_proto::{DecodeError, NodePath};

const TEXT: &str = "Text";
const VALUE: &str = "Value";
const SELECTED: &str = "Selected";
const SELECTED_PATH: &str = "SelectedPath";

/// One entry in a [`Menu`]. Items nest arbitrarily; an item's captured
/// state rides inside its parent's ledger entry as a child slot, count
/// and order preserved.
#[derive(Default)]
pub struct MenuItem {
    bag: Bag,
    children: Vec<Box<dyn Component>>,
}

impl MenuItem {
    pub fn new(text: impl Into<String>, value: impl Into<String>) -> Self {
        let mut item = Self::default();
        item.bag.set(TEXT, text.into());
        item.bag.set(VALUE, value.into());
        item
    }

    pub fn text(&self) -> &str { self.bag.get_str(TEXT, "") }

    pub fn value(&self) -> &str { self.bag.get_str(VALUE, "") }

    pub fn is_selected(&self) -> bool { self.bag.get_bool(SELECTED, false) }

    pub fn set_selected(&mut self, selected: bool) { self.bag.set(SELECTED, selected); }

    pub fn add_child(&mut self, item: MenuItem) { self.children.push(Box::new(item)); }

    pub fn child_count(&self) -> usize { self.children.len() }
}

impl StateManaged for MenuItem {
    type Entry = BagState;

    fn track(&mut self) { self.bag.track(); }

    fn is_tracking(&self) -> bool { self.bag.is_tracking() }

    fn capture(&self) -> Option<BagState> { self.bag.capture() }

    fn restore(&mut self, entry: BagState) -> Result<(), LedgerError> { self.bag.restore(entry) }
}

impl Component for MenuItem {
    fn kind(&self) -> &'static str { "menu-item" }

    fn children(&self) -> &[Box<dyn Component>] { &self.children }

    fn children_mut(&mut self) -> &mut [Box<dyn Component>] { &mut self.children }

    fn track(&mut self) { StateManaged::track(self); }

    fn capture_own(&self) -> Result<Option<Vec<u8>>, LedgerError> { ledger::capture_bytes(self) }

    fn restore_own(&mut self, bytes: &[u8]) -> Result<(), LedgerError> { ledger::restore_bytes(self, bytes) }

    fn as_any(&self) -> &dyn Any { self }

    fn as_any_mut(&mut self) -> &mut dyn Any { self }
}

/// Hierarchical menu. The token payload is the clicked item's position
/// relative to the menu, in the same underscore-joined form as tree
/// paths (`"0_2_1"`); an index out of range at any level is a decode
/// failure, not a fault.
#[derive(Default)]
pub struct Menu {
    bag: Bag,
    static_item_style: Tracked<Style>,
    dynamic_item_style: Tracked<Style>,
    static_hover_style: Tracked<Style>,
    dynamic_hover_style: Tracked<Style>,
    children: Vec<Box<dyn Component>>,
}

/// Wire entry for [`Menu`]; item state nests through the tree layer, not
/// here.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct MenuEntry {
    bag: Option<BagState>,
    static_item_style: Option<BagState>,
    dynamic_item_style: Option<BagState>,
    static_hover_style: Option<BagState>,
    dynamic_hover_style: Option<BagState>,
}

impl Menu {
    pub fn new() -> Self { Self::default() }

    pub fn add_item(&mut self, item: MenuItem) { self.children.push(Box::new(item)); }

    pub fn item_count(&self) -> usize { self.children.len() }

    pub fn selected_path(&self) -> Option<&str> { self.bag.get(SELECTED_PATH).and_then(|v| v.as_str()) }

    fn tracking(&self) -> bool { self.bag.is_tracking() }

    pub fn static_item_style(&mut self) -> &mut Style {
        let tracking = self.tracking();
        self.static_item_style.get_or_create(tracking)
    }

    pub fn dynamic_item_style(&mut self) -> &mut Style {
        let tracking = self.tracking();
        self.dynamic_item_style.get_or_create(tracking)
    }

    pub fn static_hover_style(&mut self) -> &mut Style {
        let tracking = self.tracking();
        self.static_hover_style.get_or_create(tracking)
    }

    pub fn dynamic_hover_style(&mut self) -> &mut Style {
        let tracking = self.tracking();
        self.dynamic_hover_style.get_or_create(tracking)
    }

    /// Find an item by its position path relative to this menu.
    pub fn item_at(&self, path: &NodePath) -> Option<&MenuItem> {
        let mut children = &self.children;
        let mut found: Option<&MenuItem> = None;
        for &index in path.segments() {
            let item = children.get(index as usize)?.as_any().downcast_ref::<MenuItem>()?;
            children = &item.children;
            found = Some(item);
        }
        found
    }

    fn item_at_mut(&mut self, path: &NodePath) -> Option<&mut MenuItem> {
        fn descend<'a>(children: &'a mut [Box<dyn Component>], segments: &[u32]) -> Option<&'a mut MenuItem> {
            let (&index, rest) = segments.split_first()?;
            let item = children.get_mut(index as usize)?.as_any_mut().downcast_mut::<MenuItem>()?;
            if rest.is_empty() {
                Some(item)
            } else {
                descend(&mut item.children, rest)
            }
        }
        descend(&mut self.children, path.segments())
    }

    fn clear_selection(children: &mut [Box<dyn Component>]) {
        for child in children {
            if let Some(item) = child.as_any_mut().downcast_mut::<MenuItem>() {
                if item.is_selected() {
                    item.set_selected(false);
                }
                Self::clear_selection(&mut item.children);
            }
        }
    }

    /// Render the flyout (non-top-level) items by compiling the item
    /// shape once and replaying it per item: token and text are the only
    /// parts that vary.
    pub fn flyout_html(&self, ctx: &RenderContext, own_path: &NodePath) -> String {
        let mut writer = TemplateWriter::new();
        writer.write_str("<li class=\"flyout\"><a href=\"postback:");
        writer.write_marker(0);
        writer.write_str("\">");
        writer.write_marker(1);
        writer.write_str("</a></li>");
        let template = CompiledTemplate::compile(writer);

        let mut out = String::new();
        for (relative, item) in self.flyout_items() {
            let token = ctx.postback_token(own_path, relative.to_string()).to_string();
            template.replay(&[&token, item.text()], &mut out);
        }
        out
    }

    /// Flyout items: everything below the top level, in document order,
    /// with their positions relative to the menu.
    pub fn flyout_items(&self) -> Vec<(NodePath, &MenuItem)> {
        fn walk<'a>(
            children: &'a [Box<dyn Component>],
            prefix: &NodePath,
            depth: usize,
            out: &mut Vec<(NodePath, &'a MenuItem)>,
        ) {
            for (index, child) in children.iter().enumerate() {
                if let Some(item) = child.as_any().downcast_ref::<MenuItem>() {
                    let path = prefix.child(index as u32);
                    if depth >= 1 {
                        out.push((path.clone(), item));
                    }
                    walk(&item.children, &path, depth + 1, out);
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.children, &NodePath::root(), 0, &mut out);
        out
    }
}

impl StateManaged for Menu {
    type Entry = MenuEntry;

    fn track(&mut self) {
        self.bag.track();
        self.static_item_style.track();
        self.dynamic_item_style.track();
        self.static_hover_style.track();
        self.dynamic_hover_style.track();
    }

    fn is_tracking(&self) -> bool { self.bag.is_tracking() }

    fn capture(&self) -> Option<MenuEntry> {
        let entry = MenuEntry {
            bag: self.bag.capture(),
            static_item_style: self.static_item_style.capture(),
            dynamic_item_style: self.dynamic_item_style.capture(),
            static_hover_style: self.static_hover_style.capture(),
            dynamic_hover_style: self.dynamic_hover_style.capture(),
        };
        let empty = entry.bag.is_none()
            && entry.static_item_style.is_none()
            && entry.dynamic_item_style.is_none()
            && entry.static_hover_style.is_none()
            && entry.dynamic_hover_style.is_none();
        if empty {
            None
        } else {
            Some(entry)
        }
    }

    fn restore(&mut self, entry: MenuEntry) -> Result<(), LedgerError> {
        let tracking = self.tracking();
        if let Some(bag) = entry.bag {
            self.bag.restore(bag)?;
        }
        self.static_item_style.restore(entry.static_item_style, tracking)?;
        self.dynamic_item_style.restore(entry.dynamic_item_style, tracking)?;
        self.static_hover_style.restore(entry.static_hover_style, tracking)?;
        self.dynamic_hover_style.restore(entry.dynamic_hover_style, tracking)?;
        Ok(())
    }
}

impl Component for Menu {
    fn kind(&self) -> &'static str { "menu" }

    fn children(&self) -> &[Box<dyn Component>] { &self.children }

    fn children_mut(&mut self) -> &mut [Box<dyn Component>] { &mut self.children }

    fn track(&mut self) { StateManaged::track(self); }

    fn capture_own(&self) -> Result<Option<Vec<u8>>, LedgerError> { ledger::capture_bytes(self) }

    fn restore_own(&mut self, bytes: &[u8]) -> Result<(), LedgerError> { ledger::restore_bytes(self, bytes) }

    fn handle_argument(&mut self, argument: &str) -> Result<Option<Envelope>, DecodeError> {
        let path = NodePath::parse(argument)?;
        if path.is_root() {
            return Err(DecodeError::InvalidFormat("empty item path"));
        }
        // Resolve before touching anything; a rejected payload must leave
        // the existing selection intact.
        let value = match self.item_at(&path) {
            Some(item) => item.value().to_owned(),
            None => return Err(DecodeError::InvalidSegment(argument.to_owned())),
        };
        Self::clear_selection(&mut self.children);
        if let Some(item) = self.item_at_mut(&path) {
            item.set_selected(true);
        }
        self.bag.set(SELECTED_PATH, path.to_string());
        Ok(Some(Envelope::new(Command::ItemClicked, value)))
    }

    fn as_any(&self) -> &dyn Any { self }

    fn as_any_mut(&mut self) -> &mut dyn Any { self }
}
