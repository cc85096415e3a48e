//! Record definitions
//!
//! Structured reply entities produced by the record parser.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A parsed field value
///
/// The wire carries only text; a value is promoted to `Int` exactly when
/// its textual form is a canonical base-10 integer literal (no leading
/// zeros, no leading `+`, in `i64` range). Everything else stays `Str`,
/// including an empty string for flag tokens without `=`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Str(String),
    Int(i64),
}

impl Value {
    /// Coerce an unescaped token value to its typed form
    pub(crate) fn coerce(s: String) -> Self {
        match s.parse::<i64>() {
            Ok(n) if n.to_string() == s => Value::Int(n),
            _ => Value::Str(s),
        }
    }

    /// The string form, if this is a `Str`
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            Value::Int(_) => None,
        }
    }

    /// The integer form, if this is an `Int`
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Str(_) => None,
        }
    }

    /// True for `Int(0)` and for the textual `"0"`
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Int(n) => *n == 0,
            Value::Str(s) => s == "0",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Int(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<u16> for Value {
    fn from(n: u16) -> Self {
        Value::Int(n as i64)
    }
}

/// One structured reply entity: field name → typed value
///
/// Field order is irrelevant; duplicate keys within one record resolve
/// last-write-wins during parsing. Records are immutable once returned by
/// the parser.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record(HashMap<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a field by name
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Look up a string field by name
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Look up an integer field by name
    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.0.get(key).and_then(Value::as_int)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub(crate) fn insert(&mut self, key: String, value: Value) {
        self.0.insert(key, value);
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Record(iter.into_iter().collect())
    }
}

/// A parsed reply line
///
/// The wire distinguishes "one entity" replies from "list" replies only by
/// the presence of the `|` separator; that shape is preserved here instead
/// of collapsing both cases into a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reply {
    /// Single-record reply
    One(Record),
    /// Multi-record reply, in wire order
    Many(Vec<Record>),
}

impl Reply {
    /// The records of this reply, one or many
    pub fn records(&self) -> &[Record] {
        match self {
            Reply::One(record) => std::slice::from_ref(record),
            Reply::Many(records) => records,
        }
    }

    /// The first record (a `One` reply's only record)
    pub fn first(&self) -> Option<&Record> {
        self.records().first()
    }
}
