//! Parameter values and their canonical text form.
//!
//! Method parameters travel inside generated script source as quoted string
//! literals, so every value needs a single textual rendering. [`Value`] is the
//! closed set of shapes a parameter can take; [`format_value`] renders one.
//!
//! # Rendering rules
//!
//! | Shape | Depth 0 | Depth > 0 |
//! |-------|---------|-----------|
//! | `Null` | `""` | `""` |
//! | `Bool` | `"1"` / `"0"` | `"1"` / `"0"` |
//! | `Int`, `Float` | decimal text | decimal text |
//! | `String` | the string | the string |
//! | `List` | elements joined with `,` | JSON array |
//! | `Map` | JSON object | JSON object |
//!
//! ```
//! use packer_types::{format_value, Value};
//!
//! let ids = Value::from(vec![1, 2, 3]);
//! assert_eq!(format_value(&ids, 0), "1,2,3");
//! assert_eq!(format_value(&Value::from(true), 0), "1");
//! ```

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// A typed method parameter value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Ordered sequence.
    List(Vec<Value>),
    /// Keyed structure; entry order is kept when rendered.
    Map(Vec<(String, Value)>),
}

impl Value {
    /// Build a keyed structure from `(key, value)` pairs.
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// Render `value` as canonical text for use inside a script string literal.
///
/// `depth` is the nesting level of `value`; callers pass `0` for a top-level
/// parameter. Only top-level lists use the comma-joined form, nested lists
/// fall back to JSON so the element boundaries survive.
pub fn format_value(value: &Value, depth: usize) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => "0".to_string(),
        Value::Int(n) => n.to_string(),
        Value::Float(f) => f.to_string(),
        Value::String(s) => s.clone(),
        Value::List(items) if depth == 0 => items
            .iter()
            .map(|item| format_value(item, depth + 1))
            .collect::<Vec<_>>()
            .join(","),
        Value::List(_) | Value::Map(_) => to_json_text(value),
    }
}

fn to_json_text(value: &Value) -> String {
    // Serializing a Value into a String has no failure path: keys are strings
    // and non-finite floats become null.
    serde_json::to_string(value).unwrap_or_default()
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, item) in entries {
                    map.serialize_entry(key, item)?;
                }
                map.end()
            }
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Int(i64::from(n))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float(f64::from(f))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}
