//! Parameter values carried by symbol calls.

use std::fmt;

use serde::Serialize;

/// A parameter value: a quoted string, a bare identifier, or an ordered
/// array of values.
///
/// Strings and identifiers both serialize as plain strings; the variant is
/// kept so the notation can be rendered back faithfully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Identifier(String),
    Array(Vec<Value>),
}

impl Value {
    pub fn string(text: impl Into<String>) -> Self {
        Value::String(text.into())
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        Value::Identifier(name.into())
    }

    /// Text of a string or identifier value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Identifier(s) => Some(s),
            Value::Array(_) => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the type name of this value (for diagnostics and listings).
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Identifier(_) => "identifier",
            Value::Array(_) => "array",
        }
    }

    /// Renders the value as it would be written in an expression.
    ///
    /// A string containing a single quote is written with double quotes;
    /// literals have no escapes, so this is the only way to round-trip it.
    pub fn to_notation(&self) -> String {
        match self {
            Value::String(s) if s.contains('\'') => format!("\"{}\"", s),
            Value::String(s) => format!("'{}'", s),
            Value::Identifier(name) => name.clone(),
            Value::Array(items) => {
                let inner = items
                    .iter()
                    .map(Value::to_notation)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("[{}]", inner)
            }
        }
    }
}

/// Trace form: quotes stripped, arrays bracketed.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) | Value::Identifier(s) => f.write_str(s),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}
