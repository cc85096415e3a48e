//! Command definitions
//!
//! Represents outgoing commands and their canonical wire form.

use serde::{Deserialize, Serialize};

use super::codec::escape;
use super::record::Value;

/// A parameter value: one scalar, or one value per record
///
/// `Many` expresses "one parameter applied across several records", such
/// as kicking several clients in one call, and is joined with the `|`
/// record separator on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Single(Value),
    Many(Vec<Value>),
}

impl From<Value> for ParamValue {
    fn from(value: Value) -> Self {
        ParamValue::Single(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Single(value.into())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Single(value.into())
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Single(value.into())
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Single(value.into())
    }
}

impl From<u16> for ParamValue {
    fn from(value: u16) -> Self {
        ParamValue::Single(value.into())
    }
}

impl From<Vec<i64>> for ParamValue {
    fn from(values: Vec<i64>) -> Self {
        ParamValue::Many(values.into_iter().map(Value::from).collect())
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(values: Vec<&str>) -> Self {
        ParamValue::Many(values.into_iter().map(Value::from).collect())
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        ParamValue::Many(values.into_iter().map(Value::from).collect())
    }
}

impl From<Vec<Value>> for ParamValue {
    fn from(values: Vec<Value>) -> Self {
        ParamValue::Many(values)
    }
}

/// Insertion-ordered command parameters
///
/// Iteration order is the order keys were first set, which keeps the wire
/// form of a command deterministic. Setting an existing key replaces its
/// value in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    entries: Vec<(String, ParamValue)>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, replacing any existing value for the key
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Set a parameter when present; `None` is omitted entirely
    pub fn set_opt(&mut self, key: impl Into<String>, value: Option<impl Into<ParamValue>>) {
        if let Some(value) = value {
            self.set(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// An outgoing command: name, option flags, parameters
///
/// Built fluently and serialized to its canonical wire line with
/// [`Command::to_wire`]:
///
/// ```
/// use queryline::protocol::Command;
///
/// let cmd = Command::new("clientkick")
///     .flag("reasonid")
///     .param("clid", vec![1i64, 2]);
/// assert_eq!(cmd.to_wire(), "clientkick -reasonid clid=1|clid=2");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    name: String,
    options: Vec<String>,
    params: Parameters,
}

impl Command {
    /// Create a command with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Vec::new(),
            params: Parameters::new(),
        }
    }

    /// Append an option flag (serialized as `-flag`, in the order given)
    pub fn flag(mut self, option: impl Into<String>) -> Self {
        self.options.push(option.into());
        self
    }

    /// Set a parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.set(key, value);
        self
    }

    /// Set a parameter when present; `None` is omitted from the wire
    pub fn param_opt(mut self, key: impl Into<String>, value: Option<impl Into<ParamValue>>) -> Self {
        self.params.set_opt(key, value);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// Serialize to the canonical wire line (without the trailing newline)
    ///
    /// Name first, then `-flag` options in given order, then `key=value`
    /// parameters in insertion order, everything escaped. A `Many` value
    /// becomes one token of `key=value` groups joined with `|`; an empty
    /// `Many` list appends nothing.
    pub fn to_wire(&self) -> String {
        let mut line = escape(&self.name);

        for option in &self.options {
            line.push_str(" -");
            line.push_str(&escape(option));
        }

        for (key, value) in self.params.iter() {
            match value {
                ParamValue::Single(v) => {
                    line.push(' ');
                    line.push_str(&escape(key));
                    line.push('=');
                    line.push_str(&escape(&v.to_string()));
                }
                ParamValue::Many(vs) => {
                    if vs.is_empty() {
                        continue;
                    }
                    let groups: Vec<String> = vs
                        .iter()
                        .map(|v| format!("{}={}", escape(key), escape(&v.to_string())))
                        .collect();
                    line.push(' ');
                    line.push_str(&groups.join("|"));
                }
            }
        }

        line
    }
}
