//! Typed values.
//!
//! A [`Value`] is an immutable typed payload; a [`ValueType`] is its type
//! descriptor. Each type defines equality (derived), a display string and a
//! default value.

use serde::{Deserialize, Serialize};

/// Type descriptor for [`Value`] payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    Boolean,
    Integer,
    Double,
    Text,
    List,
}

impl ValueType {
    /// Lower-case name, stable across versions.
    pub const fn name(&self) -> &'static str {
        match self {
            ValueType::Boolean => "boolean",
            ValueType::Integer => "integer",
            ValueType::Double => "double",
            ValueType::Text => "text",
            ValueType::List => "list",
        }
    }

    /// The default value of this type.
    pub fn default_value(&self) -> Value {
        match self {
            ValueType::Boolean => Value::Boolean(false),
            ValueType::Integer => Value::Integer(0),
            ValueType::Double => Value::Double(0.0),
            ValueType::Text => Value::Text(String::new()),
            ValueType::List => Value::List(Vec::new()),
        }
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// An immutable typed payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Boolean(bool),
    Integer(i64),
    Double(f64),
    Text(String),
    List(Vec<Value>),
}

impl Value {
    /// The type of this value.
    pub const fn value_type(&self) -> ValueType {
        match self {
            Value::Boolean(_) => ValueType::Boolean,
            Value::Integer(_) => ValueType::Integer,
            Value::Double(_) => ValueType::Double,
            Value::Text(_) => ValueType::Text,
            Value::List(_) => ValueType::List,
        }
    }

    /// The boolean payload, if this is a boolean.
    pub const fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer payload, if this is an integer.
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// The double payload, if this is a double.
    pub const fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }

    /// The text payload, if this is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The list payload, if this is a list.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Double(d) => write!(f, "{d}"),
            Value::Text(s) => f.write_str(s),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values_match_their_type() {
        for ty in [
            ValueType::Boolean,
            ValueType::Integer,
            ValueType::Double,
            ValueType::Text,
            ValueType::List,
        ] {
            assert_eq!(ty.default_value().value_type(), ty);
        }
    }

    #[test]
    fn accessors_reject_foreign_types() {
        let n = Value::Integer(7);
        assert_eq!(n.as_integer(), Some(7));
        assert_eq!(n.as_boolean(), None);
        assert_eq!(n.as_text(), None);

        let b = Value::Boolean(true);
        assert_eq!(b.as_boolean(), Some(true));
        assert_eq!(b.as_integer(), None);
    }

    #[test]
    fn display_strings() {
        assert_eq!(Value::Boolean(false).to_string(), "false");
        assert_eq!(Value::Integer(-3).to_string(), "-3");
        assert_eq!(Value::Text("high".into()).to_string(), "high");
        assert_eq!(
            Value::List(vec![Value::Integer(1), Value::Integer(2)]).to_string(),
            "[1, 2]"
        );
    }
}
