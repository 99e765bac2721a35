//! Nested configuration values.

use std::collections::BTreeMap;
use std::fmt::{self, Write};

/// Text a null leaf renders to.
///
/// Null leaves are kept so that a key present with no value still takes part
/// in duplicate detection and sync.
pub const NIL_SENTINEL: &str = "<nil>";

/// A nested configuration value.
///
/// `Map` is the only variant the flattener recurses into; every other
/// variant is a leaf, lists included.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Signed integer.
    Integer(i64),
    /// Floating point number, rendered in plain decimal notation.
    Float(f64),
    /// Text string.
    Text(String),
    /// Sequence of values.
    List(Vec<Value>),
    /// Mapping from string keys to values.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Creates an empty mapping.
    pub fn empty_map() -> Self {
        Value::Map(BTreeMap::new())
    }

    /// Creates a mapping from key/value pairs.
    pub fn map<K, I>(pairs: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Map(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Returns the mapping if this is a `Map`.
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns true if this is a `Map`.
    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    /// Renders the value to its canonical leaf text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_canonical(&mut out);
        out
    }

    fn write_canonical(&self, out: &mut String) -> fmt::Result {
        match self {
            Value::Null => out.write_str(NIL_SENTINEL),
            Value::Bool(b) => write!(out, "{}", b),
            Value::Integer(i) => write!(out, "{}", i),
            Value::Float(f) => write!(out, "{}", f),
            Value::Text(s) => out.write_str(s),
            Value::List(items) => {
                out.write_char('[')?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.write_char(' ')?;
                    }
                    item.write_canonical(out)?;
                }
                out.write_char(']')
            }
            Value::Map(map) => {
                out.write_str("map[")?;
                for (i, (key, item)) in map.iter().enumerate() {
                    if i > 0 {
                        out.write_char(' ')?;
                    }
                    write!(out, "{}:", key)?;
                    item.write_canonical(out)?;
                }
                out.write_char(']')
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
