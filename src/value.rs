//! Core classification for the ZObject wire grammar.
//!
//! Every ZObject is a plain `serde_json::Value`. This module provides the
//! grammar view used by the recursive transforms: bare strings split into
//! references and literal strings, arrays are canonical lists, objects
//! are records, and everything else sits outside the grammar.

use serde_json::{Map, Value};

use crate::lexical;

/// A borrowed view of a JSON value through the ZObject grammar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZObjectValue<'a> {
    /// A bare string matching the reference pattern `[A-Z][1-9][0-9]*`.
    Reference(&'a str),
    /// Any other bare string.
    String(&'a str),
    /// A canonical list.
    List(&'a [Value]),
    /// A record, in either canonical or normal form.
    Record(&'a Map<String, Value>),
    /// Number, boolean, or null: outside the grammar.
    Other(&'a Value),
}

impl<'a> ZObjectValue<'a> {
    /// Classifies a JSON value under the wire grammar.
    pub fn classify(value: &'a Value) -> Self {
        match value {
            Value::String(s) if lexical::is_reference(s) => ZObjectValue::Reference(s),
            Value::String(s) => ZObjectValue::String(s),
            Value::Array(items) => ZObjectValue::List(items),
            Value::Object(fields) => ZObjectValue::Record(fields),
            other => ZObjectValue::Other(other),
        }
    }
}

/// Returns the JSON type name of a value for diagnostics and pattern
/// matching.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// The type tag of a record, when present.
pub fn type_tag(record: &Map<String, Value>) -> Option<&Value> {
    record.get("Z1K1")
}

/// Unwraps a type tag to its reference ZID.
///
/// Accepts both encodings a tag can carry: a bare reference string
/// (`"Z6"`) or an expanded reference record (`{"Z1K1": "Z9", "Z9K1":
/// "Z10"}`). A tag that is itself a type literal or a function call does
/// not unwrap here.
pub fn tag_zid(tag: &Value) -> Option<&str> {
    match tag {
        Value::String(s) if lexical::is_reference(s) => Some(s),
        Value::Object(fields) => match fields.get("Z9K1") {
            Some(Value::String(s)) if lexical::is_reference(s) => Some(s),
            _ => None,
        },
        _ => None,
    }
}

/// The ZID a record's type tag resolves to, when it does.
pub fn record_type_zid(record: &Map<String, Value>) -> Option<&str> {
    type_tag(record).and_then(tag_zid)
}
