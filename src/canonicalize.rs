//! Collapse of normal-form ZObjects back to canonical form.
//!
//! Canonical form is the compact encoding: reference records become bare
//! ZID strings, literal string records become bare strings, and `Z10`
//! list chains become plain JSON arrays. The collapse is conservative:
//! a record that does not exactly match a collapsible shape is kept as a
//! record with its fields canonicalized, so no information is lost.
//!
//! One collapse is deliberately withheld: a literal string whose text
//! matches the reference pattern (say `Z6K1: "Z42"`) stays expanded,
//! because the bare string `"Z42"` would read back as a reference.

use serde_json::{Map, Value};

use crate::lexical::is_reference;
use crate::normalize::chain_items;
use crate::value::record_type_zid;

/// Converts a ZObject from normal (or mixed) form to canonical form.
///
/// Already-canonical input comes back unchanged, so the transform is
/// idempotent. Values outside the grammar pass through untouched.
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        Value::Object(fields) => canonicalize_record(fields),
        other => other.clone(),
    }
}

// --- Internal implementation ---

fn canonicalize_record(fields: &Map<String, Value>) -> Value {
    if let Some(reference) = collapse_reference(fields) {
        return reference;
    }
    if let Some(string) = collapse_string(fields) {
        return string;
    }
    if record_type_zid(fields) == Some("Z10") {
        let items = chain_items(fields);
        return Value::Array(items.iter().map(canonicalize).collect());
    }

    let mut out = Map::new();
    for (key, value) in fields {
        out.insert(key.clone(), canonicalize(value));
    }
    Value::Object(out)
}

/// `{"Z1K1": "Z9", "Z9K1": "<zid>"}` with nothing else collapses to the
/// bare ZID, provided the id actually matches the reference pattern.
fn collapse_reference(fields: &Map<String, Value>) -> Option<Value> {
    if fields.len() != 2 || record_type_zid(fields) != Some("Z9") {
        return None;
    }
    match fields.get("Z9K1") {
        Some(Value::String(id)) if is_reference(id) => Some(Value::String(id.clone())),
        _ => None,
    }
}

/// `{"Z1K1": "Z6", "Z6K1": "<text>"}` with nothing else collapses to the
/// bare text, unless the text would read back as a reference.
fn collapse_string(fields: &Map<String, Value>) -> Option<Value> {
    if fields.len() != 2 || record_type_zid(fields) != Some("Z6") {
        return None;
    }
    match fields.get("Z6K1") {
        Some(Value::String(text)) if !is_reference(text) => Some(Value::String(text.clone())),
        _ => None,
    }
}
