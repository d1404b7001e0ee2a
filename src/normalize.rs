//! Expansion of canonical ZObjects into normal form.
//!
//! Normal form makes every value self-describing: bare strings become
//! `Z6` (string) or `Z9` (reference) records, arrays become right-nested
//! `Z10` list records, and every nested field is expanded recursively.
//! The transform is pure and total over JSON: values outside the grammar
//! (numbers, booleans, null) pass through untouched, and nothing here
//! performs I/O or registry lookups.

use serde_json::{json, Map, Value};

use crate::value::{record_type_zid, ZObjectValue};

/// Converts a ZObject from canonical (or mixed) form to normal form.
///
/// Already-normal input comes back unchanged, so the transform is
/// idempotent. Records tagged with the syntax-error (`Z501`) or
/// not-wellformed (`Z502`) error types are returned as-is; they are
/// pre-built error values, not data to expand.
pub fn normalize(value: &Value) -> Value {
    normalize_value(value)
}

/// Builds a normal-form list record from already-normalized items.
///
/// The chain is right-nested: each node carries the item under `Z10K1`
/// and the remainder under `Z10K2`. The empty list is a record holding
/// only the type tag.
pub fn vec_to_zlist(items: Vec<Value>) -> Value {
    let mut list = empty_zlist();
    for item in items.into_iter().rev() {
        list = json!({
            "Z1K1": {"Z1K1": "Z9", "Z9K1": "Z10"},
            "Z10K1": item,
            "Z10K2": list,
        });
    }
    list
}

/// Reads a list in either encoding into a plain vector.
///
/// Accepts a canonical JSON array or a normal-form `Z10` chain; a chain
/// node without a tail is treated as the end of the list. Returns `None`
/// for values that are not lists at all.
pub fn list_items(value: &Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) => Some(items.clone()),
        Value::Object(fields) if record_type_zid(fields) == Some("Z10") => {
            Some(chain_items(fields))
        }
        _ => None,
    }
}

/// Walks a `Z10` chain into its items. Shared with the canonical
/// collapse, which has already matched the list tag.
pub(crate) fn chain_items(fields: &Map<String, Value>) -> Vec<Value> {
    let mut items = Vec::new();
    let mut node = fields;
    loop {
        match node.get("Z10K1") {
            Some(head) => items.push(head.clone()),
            None => break,
        }
        match node.get("Z10K2") {
            Some(Value::Object(tail)) => node = tail,
            _ => break,
        }
    }
    items
}

// --- Internal implementation ---

fn normalize_value(value: &Value) -> Value {
    match ZObjectValue::classify(value) {
        ZObjectValue::Reference(zid) => json!({"Z1K1": "Z9", "Z9K1": zid}),
        ZObjectValue::String(s) => json!({"Z1K1": "Z6", "Z6K1": s}),
        ZObjectValue::List(items) => {
            vec_to_zlist(items.iter().map(normalize_value).collect())
        }
        ZObjectValue::Record(fields) => normalize_record(fields),
        ZObjectValue::Other(other) => other.clone(),
    }
}

fn normalize_record(fields: &Map<String, Value>) -> Value {
    if matches!(record_type_zid(fields), Some("Z501") | Some("Z502")) {
        return Value::Object(fields.clone());
    }

    let mut out = Map::new();
    for (key, value) in fields {
        out.insert(key.clone(), normalize_field(key, value));
    }
    // A truncated list node gets its empty tail back.
    if out.contains_key("Z10K1") && !out.contains_key("Z10K2") {
        out.insert("Z10K2".to_string(), empty_zlist());
    }
    Value::Object(out)
}

fn normalize_field(key: &str, value: &Value) -> Value {
    match (key, value) {
        // Literal string and reference records keep their bare tags.
        ("Z1K1", Value::String(tag)) if tag == "Z6" || tag == "Z9" => value.clone(),
        // The owning type of these keys is string-shaped; raw copy.
        ("Z6K1", Value::String(_)) | ("Z9K1", Value::String(_)) => value.clone(),
        _ => normalize_value(value),
    }
}

fn empty_zlist() -> Value {
    json!({"Z1K1": {"Z1K1": "Z9", "Z9K1": "Z10"}})
}
