use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::ledger::StateManaged;
use rondo_proto::ScalarValue;

/// A string-keyed scalar bag with per-key dirty tracking.
///
/// Sets made before `track()` establish the owner's defaults and are
/// exempt from capture. Sets made after it mark the key dirty; `capture`
/// emits only dirty keys. Restoring re-applies the captured keys through
/// `set`, so a restored value is dirty again and survives the next trip.
#[derive(Debug, Clone, Default)]
pub struct Bag {
    values: BTreeMap<String, ScalarValue>,
    dirty: BTreeSet<String>,
    tracking: bool,
}

/// Captured form of a [`Bag`]: the dirty subset of its keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BagState(BTreeMap<String, ScalarValue>);

impl Bag {
    pub fn new() -> Self { Self::default() }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ScalarValue>) {
        let key = key.into();
        if self.tracking {
            self.dirty.insert(key.clone());
        }
        self.values.insert(key, value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ScalarValue> { self.values.get(key) }

    pub fn get_str<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.values.get(key).and_then(|v| v.as_str()).unwrap_or(default)
    }

    pub fn get_i32(&self, key: &str, default: i32) -> i32 {
        self.values.get(key).and_then(|v| v.as_i32()).unwrap_or(default)
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.values.get(key).and_then(|v| v.as_bool()).unwrap_or(default)
    }

    pub fn get_date(&self, key: &str, default: NaiveDate) -> NaiveDate {
        self.values.get(key).and_then(|v| v.as_date()).unwrap_or(default)
    }

    pub fn len(&self) -> usize { self.values.len() }

    pub fn is_empty(&self) -> bool { self.values.is_empty() }
}

impl StateManaged for Bag {
    type Entry = BagState;

    fn track(&mut self) { self.tracking = true; }

    fn is_tracking(&self) -> bool { self.tracking }

    fn capture(&self) -> Option<BagState> {
        if !self.tracking || self.dirty.is_empty() {
            return None;
        }
        let captured = self
            .dirty
            .iter()
            .filter_map(|key| self.values.get(key).map(|value| (key.clone(), value.clone())))
            .collect();
        Some(BagState(captured))
    }

    fn restore(&mut self, entry: BagState) -> Result<(), LedgerError> {
        for (key, value) in entry.0 {
            self.set(key, value);
        }
        Ok(())
    }
}
