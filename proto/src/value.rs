use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A scalar carried in a node's tracked state bag or an event envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalarValue {
    Bool(bool),
    I32(i32),
    I64(i64),
    String(String),
    Date(NaiveDate),
}

impl ScalarValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ScalarValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            ScalarValue::I32(i) => Some(*i),
            ScalarValue::I64(i) => i32::try_from(*i).ok(),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ScalarValue::I32(i) => Some(*i as i64),
            ScalarValue::I64(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScalarValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            ScalarValue::Date(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Bool(b) => write!(f, "{}", b),
            ScalarValue::I32(i) => write!(f, "{}", i),
            ScalarValue::I64(i) => write!(f, "{}", i),
            ScalarValue::String(s) => write!(f, "{}", s),
            ScalarValue::Date(d) => write!(f, "{}", d),
        }
    }
}

impl From<bool> for ScalarValue {
    fn from(v: bool) -> Self { ScalarValue::Bool(v) }
}
impl From<i32> for ScalarValue {
    fn from(v: i32) -> Self { ScalarValue::I32(v) }
}
impl From<i64> for ScalarValue {
    fn from(v: i64) -> Self { ScalarValue::I64(v) }
}
impl From<&str> for ScalarValue {
    fn from(v: &str) -> Self { ScalarValue::String(v.to_owned()) }
}
impl From<String> for ScalarValue {
    fn from(v: String) -> Self { ScalarValue::String(v) }
}
impl From<NaiveDate> for ScalarValue {
    fn from(v: NaiveDate) -> Self { ScalarValue::Date(v) }
}
