use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::command::{Command, Envelope};
use crate::data::{DataSource, Row, SelectParams};
use crate::error::{DataError, LedgerError};
use crate::ledger::{self, Bag, BagState, StateManaged, Tracked};
use crate::style::Style;
use crate::tree::{Bubble, Component};
use rondo_proto::{DecodeError, ScalarValue};

const CURRENT_PAGE: &str = "CurrentPage";
const PAGE_SIZE: &str = "PageSize";
const EDIT_ROW: &str = "EditRow";
const SELECTED_ROW: &str = "SelectedRow";
const SORT_EXPRESSION: &str = "SortExpression";

const DEFAULT_PAGE_SIZE: i32 = 10;

/// Pager navigation actions, encoded as the `Page` command's argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAction {
    Next,
    Prev,
    /// 1-based page number, as rendered in pager links.
    Number(usize),
}

impl fmt::Display for PageAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageAction::Next => write!(f, "Next"),
            PageAction::Prev => write!(f, "Prev"),
            PageAction::Number(n) => write!(f, "{}", n),
        }
    }
}

/// One bound row. Rows are rebuilt from the data source every round trip
/// and carry no persisted state of their own; their job is to receive
/// row-level commands and stamp them with the row's position during
/// bubbling.
pub struct GridRow {
    index: usize,
    key: ScalarValue,
    values: Row,
}

impl GridRow {
    pub fn index(&self) -> usize { self.index }

    pub fn key(&self) -> &ScalarValue { &self.key }

    pub fn values(&self) -> &Row { &self.values }
}

impl Component for GridRow {
    fn kind(&self) -> &'static str { "grid-row" }

    fn handle_argument(&mut self, argument: &str) -> Result<Option<Envelope>, DecodeError> {
        let (name, rest) = argument.split_once('$').ok_or(DecodeError::InvalidFormat("missing command separator"))?;
        let command = Command::parse_named(name).ok_or(DecodeError::InvalidFormat("unknown command"))?;
        match command {
            Command::Select | Command::Edit | Command::Cancel | Command::Update | Command::Delete => {
                Ok(Some(Envelope::new(command, rest)))
            }
            _ => Err(DecodeError::InvalidFormat("command not valid on a row")),
        }
    }

    fn as_any(&self) -> &dyn Any { self }

    fn as_any_mut(&mut self) -> &mut dyn Any { self }
}

/// Data-bound grid with row commands, sorting and paging.
///
/// Row tokens address the row node and carry `"<command>$<argument>"`;
/// sort and pager tokens address the grid itself with the same grammar.
/// The grid consumes raw row commands during bubbling and re-raises them
/// as public notifications.
pub struct Grid {
    bag: Bag,
    header_style: Tracked<Style>,
    item_style: Tracked<Style>,
    pager_style: Tracked<Style>,
    columns: Vec<String>,
    key_column: String,
    source: Arc<dyn DataSource>,
    rows: Vec<Box<dyn Component>>,
}

/// Wire entry for [`Grid`]. Rows never persist; only the grid's own
/// paging/sorting/selection state rides the ledger.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GridEntry {
    bag: Option<BagState>,
    header_style: Option<BagState>,
    item_style: Option<BagState>,
    pager_style: Option<BagState>,
}

impl Grid {
    pub fn new(source: Arc<dyn DataSource>, key_column: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            bag: Bag::new(),
            header_style: Tracked::new(),
            item_style: Tracked::new(),
            pager_style: Tracked::new(),
            columns,
            key_column: key_column.into(),
            source,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] { &self.columns }

    pub fn current_page(&self) -> usize { self.bag.get_i32(CURRENT_PAGE, 0).max(0) as usize }

    pub fn set_current_page(&mut self, page: usize) { self.bag.set(CURRENT_PAGE, page as i32); }

    pub fn page_size(&self) -> usize { self.bag.get_i32(PAGE_SIZE, DEFAULT_PAGE_SIZE).max(1) as usize }

    pub fn set_page_size(&mut self, size: usize) { self.bag.set(PAGE_SIZE, size as i32); }

    pub fn edit_row(&self) -> Option<usize> {
        let row = self.bag.get_i32(EDIT_ROW, -1);
        (row >= 0).then_some(row as usize)
    }

    pub fn selected_row(&self) -> Option<usize> {
        let row = self.bag.get_i32(SELECTED_ROW, -1);
        (row >= 0).then_some(row as usize)
    }

    pub fn sort_expression(&self) -> Option<&str> { self.bag.get(SORT_EXPRESSION).and_then(|v| v.as_str()) }

    pub fn page_count(&self) -> Result<usize, DataError> {
        let total = self.source.total_rows()?;
        Ok(total.div_ceil(self.page_size()).max(1))
    }

    fn tracking(&self) -> bool { self.bag.is_tracking() }

    pub fn header_style(&mut self) -> &mut Style {
        let tracking = self.tracking();
        self.header_style.get_or_create(tracking)
    }

    pub fn item_style(&mut self) -> &mut Style {
        let tracking = self.tracking();
        self.item_style.get_or_create(tracking)
    }

    pub fn pager_style(&mut self) -> &mut Style {
        let tracking = self.tracking();
        self.pager_style.get_or_create(tracking)
    }

    /// Rebuild rows from the data source using the current sort and page
    /// state. Call after restore (and again after any dispatch that
    /// changes paging or sorting).
    pub fn bind(&mut self) -> Result<(), DataError> {
        let params = SelectParams {
            sort: self.sort_expression().map(|s| s.to_owned()),
            page: self.current_page(),
            page_size: self.page_size(),
        };
        let rows = self.source.select(&params)?;
        debug!("Grid.bind page {} -> {} rows", params.page, rows.len());
        self.rows = rows
            .into_iter()
            .enumerate()
            .map(|(index, values)| {
                let key = values
                    .get(&self.key_column)
                    .cloned()
                    .ok_or_else(|| DataError::UnknownColumn(self.key_column.clone()))?;
                Ok(Box::new(GridRow { index, key, values }) as Box<dyn Component>)
            })
            .collect::<Result<Vec<_>, DataError>>()?;
        Ok(())
    }

    pub fn row(&self, index: usize) -> Option<&GridRow> {
        self.rows.get(index).and_then(|row| row.as_any().downcast_ref::<GridRow>())
    }

    pub fn row_count(&self) -> usize { self.rows.len() }

    // ---- token payload encoders ----

    pub fn row_command_argument(command: Command, argument: &str) -> String {
        format!("{}${}", command.as_str(), argument)
    }

    pub fn sort_argument(expression: &str) -> String { format!("Sort${}", expression) }

    pub fn page_argument(action: PageAction) -> String { format!("Page${}", action) }

    fn apply_page(&mut self, argument: &str) -> Result<usize, DecodeError> {
        let current = self.current_page();
        let page = if argument.eq_ignore_ascii_case("Next") {
            current + 1
        } else if argument.eq_ignore_ascii_case("Prev") {
            current.saturating_sub(1)
        } else {
            let number: usize =
                argument.parse().map_err(|_| DecodeError::InvalidFormat("page argument must be Next, Prev or a number"))?;
            if number == 0 {
                return Err(DecodeError::InvalidFormat("page numbers are 1-based"));
            }
            number - 1
        };
        self.set_current_page(page);
        Ok(page)
    }

    fn row_envelope(&self, envelope: &Envelope) -> Option<(usize, ScalarValue, Row)> {
        let index = envelope.origin.last()? as usize;
        let row = self.row(index)?;
        Some((index, row.key.clone(), row.values.clone()))
    }
}

impl StateManaged for Grid {
    type Entry = GridEntry;

    fn track(&mut self) {
        self.bag.track();
        self.header_style.track();
        self.item_style.track();
        self.pager_style.track();
    }

    fn is_tracking(&self) -> bool { self.bag.is_tracking() }

    fn capture(&self) -> Option<GridEntry> {
        let entry = GridEntry {
            bag: self.bag.capture(),
            header_style: self.header_style.capture(),
            item_style: self.item_style.capture(),
            pager_style: self.pager_style.capture(),
        };
        let empty = entry.bag.is_none()
            && entry.header_style.is_none()
            && entry.item_style.is_none()
            && entry.pager_style.is_none();
        if empty {
            None
        } else {
            Some(entry)
        }
    }

    fn restore(&mut self, entry: GridEntry) -> Result<(), LedgerError> {
        let tracking = self.tracking();
        if let Some(bag) = entry.bag {
            self.bag.restore(bag)?;
        }
        self.header_style.restore(entry.header_style, tracking)?;
        self.item_style.restore(entry.item_style, tracking)?;
        self.pager_style.restore(entry.pager_style, tracking)?;
        Ok(())
    }
}

impl Component for Grid {
    fn kind(&self) -> &'static str { "grid" }

    fn children(&self) -> &[Box<dyn Component>] { &self.rows }

    fn children_mut(&mut self) -> &mut [Box<dyn Component>] { &mut self.rows }

    fn track(&mut self) { StateManaged::track(self); }

    fn capture_own(&self) -> Result<Option<Vec<u8>>, LedgerError> { ledger::capture_bytes(self) }

    fn restore_own(&mut self, bytes: &[u8]) -> Result<(), LedgerError> { ledger::restore_bytes(self, bytes) }

    fn handle_argument(&mut self, argument: &str) -> Result<Option<Envelope>, DecodeError> {
        let (name, rest) = argument.split_once('$').ok_or(DecodeError::InvalidFormat("missing command separator"))?;
        let command = Command::parse_named(name).ok_or(DecodeError::InvalidFormat("unknown command"))?;
        match command {
            Command::Sort => {
                self.bag.set(SORT_EXPRESSION, rest);
                self.set_current_page(0);
                Ok(Some(Envelope::new(Command::SortChanged, rest)))
            }
            Command::Page => {
                let page = self.apply_page(rest)?;
                Ok(Some(Envelope::new(Command::PageChanged, page as i32)))
            }
            _ => Err(DecodeError::InvalidFormat("command not valid on the grid")),
        }
    }

    /// Translate raw row commands into public notifications; everything
    /// else passes through untouched.
    fn on_bubble(&mut self, envelope: Envelope) -> Bubble {
        let Some((index, key, values)) = self.row_envelope(&envelope) else {
            return Bubble::Forward(envelope);
        };
        match envelope.command {
            Command::Select => {
                self.bag.set(SELECTED_ROW, index as i32);
                Bubble::Forward(envelope.translate(Command::RowSelected, index as i32))
            }
            Command::Edit => {
                self.bag.set(EDIT_ROW, index as i32);
                Bubble::Forward(envelope.translate(Command::RowEdit, index as i32))
            }
            Command::Cancel => {
                self.bag.set(EDIT_ROW, -1);
                Bubble::Forward(envelope.translate(Command::RowEditCancelled, index as i32))
            }
            Command::Update => {
                self.bag.set(EDIT_ROW, -1);
                match self.source.update(&key, &values) {
                    Ok(affected) => {
                        debug!("Grid.update row {} affected {}", index, affected);
                        Bubble::Forward(envelope.translate(Command::RowUpdated, index as i32))
                    }
                    Err(e) => {
                        warn!("Grid.update row {} failed: {}", index, e);
                        Bubble::Handled
                    }
                }
            }
            Command::Delete => match self.source.delete(&key) {
                Ok(affected) => {
                    debug!("Grid.delete row {} affected {}", index, affected);
                    Bubble::Forward(envelope.translate(Command::RowDeleted, index as i32))
                }
                Err(e) => {
                    warn!("Grid.delete row {} failed: {}", index, e);
                    Bubble::Handled
                }
            },
            _ => Bubble::Forward(envelope),
        }
    }

    fn as_any(&self) -> &dyn Any { self }

    fn as_any_mut(&mut self) -> &mut dyn Any { self }
}
