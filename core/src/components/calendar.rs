use std::any::Any;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::command::{Command, Envelope};
use crate::error::LedgerError;
use crate::ledger::{self, Bag, BagState, StateManaged, Tracked};
use crate::style::Style;
use crate::tree::Component;
use rondo_proto::DecodeError;

/// Fixed epoch all day offsets are relative to. Tokens carry day counts
/// from this date, not dates themselves.
pub const EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(2000, 1, 1) {
    Some(date) => date,
    None => panic!("valid epoch"),
};

/// Width of the trailing span field in a range-selection payload. The
/// field is always exactly this many digits and decoding splits at
/// `len - RANGE_SPAN_DIGITS`, so the longest selectable range is 99 days.
/// Widening this changes wire compatibility with already-issued tokens.
pub const RANGE_SPAN_DIGITS: usize = 2;

const VISIBLE_DATE: &str = "VisibleDate";
const SELECT_WEEK_TEXT: &str = "SelectWeekText";

/// Month-view calendar with day, week and range selection.
///
/// Payload grammar: bare digits select the day at that offset from
/// [`EPOCH`]; `V<offset>` navigates the visible month; `R<offset><span>`
/// selects `span` consecutive days starting at `offset`, where the span
/// field is the trailing [`RANGE_SPAN_DIGITS`] digits.
#[derive(Default)]
pub struct Calendar {
    bag: Bag,
    day_header_style: Tracked<Style>,
    day_style: Tracked<Style>,
    next_prev_style: Tracked<Style>,
    other_month_day_style: Tracked<Style>,
    selected_day_style: Tracked<Style>,
    title_style: Tracked<Style>,
    today_day_style: Tracked<Style>,
    selector_style: Tracked<Style>,
    weekend_day_style: Tracked<Style>,
    selected_dates: Vec<NaiveDate>,
    selection_dirty: bool,
}

/// Wire entry for [`Calendar`]. Field count and order are the type's
/// round-trip contract; never reorder.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CalendarEntry {
    bag: Option<BagState>,
    day_header_style: Option<BagState>,
    day_style: Option<BagState>,
    next_prev_style: Option<BagState>,
    other_month_day_style: Option<BagState>,
    selected_day_style: Option<BagState>,
    title_style: Option<BagState>,
    today_day_style: Option<BagState>,
    selector_style: Option<BagState>,
    weekend_day_style: Option<BagState>,
    selected_dates: Option<Vec<NaiveDate>>,
}

pub fn days_from_epoch(date: NaiveDate) -> i64 { (date - EPOCH).num_days() }

fn parse_offset(text: &str) -> Result<i64, DecodeError> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DecodeError::InvalidFormat("day offset must be unsigned digits"));
    }
    text.parse::<i64>().map_err(|_| DecodeError::InvalidFormat("day offset out of range"))
}

/// Resolve a decoded day offset to a date. An offset that leaves the
/// representable date range is a decode failure like any other malformed
/// payload, never a fault.
fn date_at(days: i64) -> Result<NaiveDate, DecodeError> {
    Duration::try_days(days)
        .and_then(|delta| EPOCH.checked_add_signed(delta))
        .ok_or(DecodeError::InvalidFormat("day offset out of range"))
}

impl Calendar {
    pub fn new() -> Self { Self::default() }

    pub fn visible_date(&self) -> NaiveDate { self.bag.get_date(VISIBLE_DATE, EPOCH) }

    pub fn set_visible_date(&mut self, date: NaiveDate) { self.bag.set(VISIBLE_DATE, date); }

    pub fn select_week_text(&self) -> &str { self.bag.get_str(SELECT_WEEK_TEXT, "&gt;") }

    pub fn set_select_week_text(&mut self, text: impl Into<String>) { self.bag.set(SELECT_WEEK_TEXT, text.into()); }

    pub fn selected_dates(&self) -> &[NaiveDate] { &self.selected_dates }

    pub fn select_date(&mut self, date: NaiveDate) { self.select_span(date, 1); }

    fn select_span(&mut self, from: NaiveDate, span: i64) {
        // A span reaching past the last representable date stops there.
        self.selected_dates =
            (0..span).map_while(|d| from.checked_add_signed(Duration::days(d))).collect();
        if self.bag.is_tracking() {
            self.selection_dirty = true;
        }
    }

    fn tracking(&self) -> bool { self.bag.is_tracking() }

    pub fn day_header_style(&mut self) -> &mut Style {
        let tracking = self.tracking();
        self.day_header_style.get_or_create(tracking)
    }

    pub fn day_style(&mut self) -> &mut Style {
        let tracking = self.tracking();
        self.day_style.get_or_create(tracking)
    }

    pub fn next_prev_style(&mut self) -> &mut Style {
        let tracking = self.tracking();
        self.next_prev_style.get_or_create(tracking)
    }

    pub fn other_month_day_style(&mut self) -> &mut Style {
        let tracking = self.tracking();
        self.other_month_day_style.get_or_create(tracking)
    }

    pub fn selected_day_style(&mut self) -> &mut Style {
        let tracking = self.tracking();
        self.selected_day_style.get_or_create(tracking)
    }

    pub fn title_style(&mut self) -> &mut Style {
        let tracking = self.tracking();
        self.title_style.get_or_create(tracking)
    }

    pub fn today_day_style(&mut self) -> &mut Style {
        let tracking = self.tracking();
        self.today_day_style.get_or_create(tracking)
    }

    pub fn selector_style(&mut self) -> &mut Style {
        let tracking = self.tracking();
        self.selector_style.get_or_create(tracking)
    }

    pub fn weekend_day_style(&mut self) -> &mut Style {
        let tracking = self.tracking();
        self.weekend_day_style.get_or_create(tracking)
    }

    /// Peek at a style slot without creating it.
    pub fn day_style_created(&self) -> bool { self.day_style.is_created() }

    // ---- token payload encoders (dates before EPOCH are not encodable
    // in this grammar; callers render such days as non-interactive) ----

    pub fn select_day_argument(date: NaiveDate) -> String { days_from_epoch(date).to_string() }

    pub fn navigate_argument(date: NaiveDate) -> String { format!("V{}", days_from_epoch(date)) }

    pub fn select_range_argument(from: NaiveDate, span: u32) -> String {
        let span = span.clamp(1, 99);
        format!("R{}{:02}", days_from_epoch(from), span)
    }

    pub fn select_week_argument(from: NaiveDate) -> String { Self::select_range_argument(from, 7) }
}

impl StateManaged for Calendar {
    type Entry = CalendarEntry;

    fn track(&mut self) {
        self.bag.track();
        self.day_header_style.track();
        self.day_style.track();
        self.next_prev_style.track();
        self.other_month_day_style.track();
        self.selected_day_style.track();
        self.title_style.track();
        self.today_day_style.track();
        self.selector_style.track();
        self.weekend_day_style.track();
    }

    fn is_tracking(&self) -> bool { self.bag.is_tracking() }

    fn capture(&self) -> Option<CalendarEntry> {
        let entry = CalendarEntry {
            bag: self.bag.capture(),
            day_header_style: self.day_header_style.capture(),
            day_style: self.day_style.capture(),
            next_prev_style: self.next_prev_style.capture(),
            other_month_day_style: self.other_month_day_style.capture(),
            selected_day_style: self.selected_day_style.capture(),
            title_style: self.title_style.capture(),
            today_day_style: self.today_day_style.capture(),
            selector_style: self.selector_style.capture(),
            weekend_day_style: self.weekend_day_style.capture(),
            selected_dates: if self.selection_dirty { Some(self.selected_dates.clone()) } else { None },
        };
        let empty = entry.bag.is_none()
            && entry.day_header_style.is_none()
            && entry.day_style.is_none()
            && entry.next_prev_style.is_none()
            && entry.other_month_day_style.is_none()
            && entry.selected_day_style.is_none()
            && entry.title_style.is_none()
            && entry.today_day_style.is_none()
            && entry.selector_style.is_none()
            && entry.weekend_day_style.is_none()
            && entry.selected_dates.is_none();
        if empty {
            None
        } else {
            Some(entry)
        }
    }

    fn restore(&mut self, entry: CalendarEntry) -> Result<(), LedgerError> {
        let tracking = self.tracking();
        if let Some(bag) = entry.bag {
            self.bag.restore(bag)?;
        }
        self.day_header_style.restore(entry.day_header_style, tracking)?;
        self.day_style.restore(entry.day_style, tracking)?;
        self.next_prev_style.restore(entry.next_prev_style, tracking)?;
        self.other_month_day_style.restore(entry.other_month_day_style, tracking)?;
        self.selected_day_style.restore(entry.selected_day_style, tracking)?;
        self.title_style.restore(entry.title_style, tracking)?;
        self.today_day_style.restore(entry.today_day_style, tracking)?;
        self.selector_style.restore(entry.selector_style, tracking)?;
        self.weekend_day_style.restore(entry.weekend_day_style, tracking)?;
        if let Some(dates) = entry.selected_dates {
            self.selected_dates = dates;
            if tracking {
                self.selection_dirty = true;
            }
        }
        Ok(())
    }
}

impl Component for Calendar {
    fn kind(&self) -> &'static str { "calendar" }

    fn track(&mut self) { StateManaged::track(self); }

    fn capture_own(&self) -> Result<Option<Vec<u8>>, LedgerError> { ledger::capture_bytes(self) }

    fn restore_own(&mut self, bytes: &[u8]) -> Result<(), LedgerError> { ledger::restore_bytes(self, bytes) }

    fn handle_argument(&mut self, argument: &str) -> Result<Option<Envelope>, DecodeError> {
        if argument.is_empty() {
            return Ok(None);
        }
        if let Some(rest) = argument.strip_prefix('V') {
            let date = date_at(parse_offset(rest)?)?;
            self.set_visible_date(date);
            return Ok(Some(Envelope::new(Command::VisibleDateChanged, date)));
        }
        if let Some(rest) = argument.strip_prefix('R') {
            if rest.len() <= RANGE_SPAN_DIGITS {
                return Err(DecodeError::InvalidFormat("range payload too short"));
            }
            // No delimiter: the span field is always the trailing
            // RANGE_SPAN_DIGITS characters.
            let (offset_text, span_text) = rest.split_at(rest.len() - RANGE_SPAN_DIGITS);
            let from = date_at(parse_offset(offset_text)?)?;
            let span = parse_offset(span_text)?;
            self.select_span(from, span.max(1));
            return Ok(Some(Envelope::new(Command::SelectionChanged, from)));
        }
        let date = date_at(parse_offset(argument)?)?;
        self.select_span(date, 1);
        Ok(Some(Envelope::new(Command::SelectionChanged, date)))
    }

    fn as_any(&self) -> &dyn Any { self }

    fn as_any_mut(&mut self) -> &mut dyn Any { self }
}
