//! # Scenario Values
//!
//! A closed tagged value type for scenario documents. Every field of a
//! loaded `scenario.toml` is one of these variants, and every variant has
//! exactly one literal rendering, so the runner scenario generator never has
//! to inspect types at runtime.
//!
//! Mappings keep document order: the loader parses TOML with
//! `preserve_order`, and [`Mapping`] is an [`IndexMap`].

use indexmap::IndexMap;

/// Ordered string-keyed mapping of values.
pub type Mapping = IndexMap<String, Value>;

/// A single value from a scenario document.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Boolean(bool),
    Integer(i64),
    Float(f64),
    /// Offset/local date-time, kept in its TOML textual form.
    Datetime(String),
    Sequence(Vec<Value>),
    Mapping(Mapping),
}

impl Value {
    /// Human-readable type label used in validation messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "a string",
            Value::Boolean(_) => "a boolean",
            Value::Integer(_) => "an integer",
            Value::Float(_) => "a float",
            Value::Datetime(_) => "a datetime",
            Value::Sequence(_) => "an array",
            Value::Mapping(_) => "a table",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// True for everything except sequences and mappings.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Value::Sequence(_) | Value::Mapping(_))
    }

    /// Render as a TOML literal suitable for the right-hand side of `key = ...`.
    ///
    /// Strings become escaped basic strings, booleans are lowercase, numbers
    /// are bare, sequences become arrays, and nested mappings become inline
    /// tables.
    pub fn to_toml_literal(&self) -> String {
        let mut out = String::new();
        self.write_toml_literal(&mut out);
        out
    }

    fn write_toml_literal(&self, out: &mut String) {
        match self {
            Value::String(s) => push_basic_string(out, s),
            Value::Boolean(b) => out.push_str(if *b { "true" } else { "false" }),
            Value::Integer(i) => out.push_str(&i.to_string()),
            Value::Float(f) => out.push_str(&format_float(*f)),
            Value::Datetime(dt) => out.push_str(dt),
            Value::Sequence(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    item.write_toml_literal(out);
                }
                out.push(']');
            }
            Value::Mapping(map) => {
                if map.is_empty() {
                    out.push_str("{}");
                    return;
                }
                out.push_str("{ ");
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(&render_key(key));
                    out.push_str(" = ");
                    value.write_toml_literal(out);
                }
                out.push_str(" }");
            }
        }
    }

    /// Unquoted text form, used where a value is embedded in another string
    /// (e.g. `NAME=value` in compose and `.env` files).
    pub fn to_plain_text(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            other => other.to_toml_literal(),
        }
    }
}

impl From<toml::Value> for Value {
    fn from(value: toml::Value) -> Self {
        match value {
            toml::Value::String(s) => Value::String(s),
            toml::Value::Integer(i) => Value::Integer(i),
            toml::Value::Float(f) => Value::Float(f),
            toml::Value::Boolean(b) => Value::Boolean(b),
            toml::Value::Datetime(dt) => Value::Datetime(dt.to_string()),
            toml::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            toml::Value::Table(table) => Value::Mapping(mapping_from_table(table)),
        }
    }
}

/// Convert a parsed TOML table, keeping key order.
pub(crate) fn mapping_from_table(table: toml::Table) -> Mapping {
    table
        .into_iter()
        .map(|(key, value)| (key, Value::from(value)))
        .collect()
}

/// Render a key, quoting it unless it is a valid bare TOML key.
pub fn render_key(key: &str) -> String {
    let bare = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if bare {
        key.to_string()
    } else {
        let mut out = String::with_capacity(key.len() + 2);
        push_basic_string(&mut out, key);
        out
    }
}

fn push_basic_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

// `{:?}` always keeps a fractional part or exponent, so the literal stays a
// float when read back.
fn format_float(f: f64) -> String {
    if f.is_nan() {
        "nan".to_string()
    } else if f.is_infinite() {
        let literal = if f > 0.0 { "inf" } else { "-inf" };
        literal.to_string()
    } else {
        format!("{f:?}")
    }
}
