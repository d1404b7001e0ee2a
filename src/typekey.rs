//! Canonical type identity strings for ZObjects.
//!
//! `TypeKey::create` answers "what type does this value describe" with a
//! deterministic string suitable for caching compiled validators: `Z6`
//! for a plain type reference, `Z881(Z6)` for a generic instance,
//! `<Z6,Z40>` for a user-defined type, and a serialized fallback for
//! values that carry a type tag but no resolvable type shape.
//!
//! Identity resolution follows reference and type-tag wrappers a bounded
//! number of levels and never consults a registry. Structurally equal
//! descriptors yield identical keys regardless of JSON field order.

use std::fmt;

use serde_json::{Map, Value};

use crate::error::KeyError;
use crate::lexical::{global_key_type, is_reference, key_index, zid_number};
use crate::normalize::list_items;
use crate::value::{json_type_name, record_type_zid, tag_zid, type_tag};

/// Levels of identity indirection followed before giving up.
pub const MAX_IDENTITY_DEPTH: usize = 64;

/// Canonical identity of a ZObject's type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKey {
    /// A plain type reference: `Z6`.
    Simple { zid: String },
    /// A generic type instance: function ZID plus recursively keyed
    /// arguments, `Z881(Z6)`.
    Generic {
        function: String,
        arguments: Vec<String>,
    },
    /// A user-defined type keyed by its ordered member types: `<Z6,Z40>`.
    /// Member names and labels do not participate.
    UserDefined { members: Vec<String> },
    /// Fallback for tagged values without a type shape: the tag's ZID
    /// plus the key-sorted serialization of the whole value.
    Object { key: String },
}

impl TypeKey {
    /// Derives the type identity of a ZObject.
    ///
    /// Fails on values that are not ZObjects at all (bare non-reference
    /// strings, arrays, scalars, records without a usable type tag) and
    /// when the identity chain exceeds [`MAX_IDENTITY_DEPTH`].
    pub fn create(value: &Value) -> Result<TypeKey, KeyError> {
        match find_identity(value, 0)? {
            Some(identity) => key_from_identity(&identity, 0),
            None => match value {
                Value::Object(fields) => match type_tag(fields) {
                    Some(_) => Ok(TypeKey::Object {
                        key: literal_key(value)?,
                    }),
                    None => Err(KeyError::MissingTypeTag),
                },
                other => Err(KeyError::NotAZObject {
                    actual: json_type_name(other),
                }),
            },
        }
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKey::Simple { zid } => f.write_str(zid),
            TypeKey::Generic {
                function,
                arguments,
            } => write!(f, "{}({})", function, arguments.join(",")),
            TypeKey::UserDefined { members } => write!(f, "<{}>", members.join(",")),
            TypeKey::Object { key } => f.write_str(key),
        }
    }
}

/// What the identity walk lands on.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Identity<'a> {
    /// A named type.
    Reference(&'a str),
    /// A generic type: the function-call record.
    Generic(&'a Map<String, Value>),
    /// A user-defined type: the type record itself.
    UserDefined(&'a Map<String, Value>),
}

/// Resolves a value to its type identity, or `None` when the value has
/// no type shape of its own (for example an instance of a plain named
/// type, which is data rather than a descriptor).
pub(crate) fn find_identity<'a>(
    value: &'a Value,
    depth: usize,
) -> Result<Option<Identity<'a>>, KeyError> {
    if depth >= MAX_IDENTITY_DEPTH {
        return Err(KeyError::IdentityDepthExceeded {
            limit: MAX_IDENTITY_DEPTH,
        });
    }
    match value {
        Value::String(s) if is_reference(s) => Ok(Some(Identity::Reference(s))),
        Value::Object(fields) => match record_type_zid(fields) {
            // A reference record unwraps to its id.
            Some("Z9") => match fields.get("Z9K1") {
                Some(Value::String(id)) if is_reference(id) => {
                    Ok(Some(Identity::Reference(id)))
                }
                _ => Ok(None),
            },
            Some("Z7") => Ok(Some(Identity::Generic(fields))),
            Some("Z4") => match fields.get("Z4K1") {
                // The identity field may name the type; an anonymous
                // type is its own identity.
                Some(identity) => match find_identity(identity, depth + 1)? {
                    Some(found) => Ok(Some(found)),
                    None => Ok(Some(Identity::UserDefined(fields))),
                },
                None => Ok(Some(Identity::UserDefined(fields))),
            },
            _ => match type_tag(fields) {
                // A structural tag (type literal, function call) carries
                // the identity of the value it tags.
                Some(tag @ Value::Object(_)) if tag_zid(tag).is_none() => {
                    find_identity(tag, depth + 1)
                }
                // A tag naming a plain type makes the value an instance,
                // not a descriptor.
                _ => Ok(None),
            },
        },
        _ => Ok(None),
    }
}

// --- Internal implementation ---

fn key_from_identity(identity: &Identity<'_>, depth: usize) -> Result<TypeKey, KeyError> {
    match identity {
        Identity::Reference(zid) => Ok(TypeKey::Simple {
            zid: (*zid).to_string(),
        }),
        Identity::Generic(call) => {
            let function = function_zid(call, depth)?;
            let mut arguments = Vec::new();
            for key in argument_keys(call) {
                arguments.push(key_of(&call[key], depth + 1)?);
            }
            Ok(TypeKey::Generic {
                function,
                arguments,
            })
        }
        Identity::UserDefined(fields) => {
            let members = member_declared_types(fields)?
                .iter()
                .map(|declared| key_of(declared, depth + 1))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(TypeKey::UserDefined { members })
        }
    }
}

/// Keys one value in argument or member position: a resolvable type
/// shape recurses, anything else becomes a literal key so distinct
/// parameter values cannot collide.
fn key_of(value: &Value, depth: usize) -> Result<String, KeyError> {
    match find_identity(value, depth)? {
        Some(identity) => Ok(key_from_identity(&identity, depth)?.to_string()),
        None => literal_key(value),
    }
}

fn function_zid(call: &Map<String, Value>, depth: usize) -> Result<String, KeyError> {
    let function = call.get("Z7K1").ok_or(KeyError::UnresolvableFunction)?;
    match find_identity(function, depth + 1)? {
        Some(Identity::Reference(zid)) => Ok(zid.to_string()),
        _ => Err(KeyError::UnresolvableFunction),
    }
}

/// Argument fields of a call, in numeric key order rather than JSON
/// field order, so reordered documents key identically.
fn argument_keys(call: &Map<String, Value>) -> Vec<&String> {
    let mut keys: Vec<&String> = call
        .keys()
        .filter(|k| k.as_str() != "Z1K1" && k.as_str() != "Z7K1")
        .collect();
    keys.sort_by_key(|k| argument_rank(k));
    keys
}

/// Sort rank for an argument key: local keys first by index, then
/// global keys by owning-type number and index, then anything else
/// lexicographically.
fn argument_rank(key: &str) -> (u64, u64, String) {
    if let Some(type_zid) = global_key_type(key) {
        if let (Some(number), Some(index)) = (zid_number(type_zid), key_index(key)) {
            return (number, index, String::new());
        }
    }
    if let Some(index) = key_index(key) {
        return (0, index, String::new());
    }
    (u64::MAX, u64::MAX, key.to_string())
}

/// The ordered declared types of a user-defined type's members. A
/// missing member list reads as empty; a member record without its
/// declared-type field is an error.
pub(crate) fn member_declared_types(fields: &Map<String, Value>) -> Result<Vec<Value>, KeyError> {
    let members = match fields.get("Z4K2") {
        Some(list) => list_items(list).unwrap_or_default(),
        None => Vec::new(),
    };
    let mut declared = Vec::new();
    for (index, member) in members.iter().enumerate() {
        let declared_type = member
            .as_object()
            .and_then(|m| m.get("Z3K1"))
            .ok_or(KeyError::MissingDeclaredType { index })?;
        declared.push(declared_type.clone());
    }
    Ok(declared)
}

/// Literal key for a value with no type shape: head ZID plus the
/// brace-wrapped key-sorted serialization,
/// `Z60{{"Z1K1":"Z60","Z60K1":"en"}}`.
fn literal_key(value: &Value) -> Result<String, KeyError> {
    let head = literal_head(value)?;
    Ok(format!("{}{{{}}}", head, sorted_json(value)))
}

fn literal_head(value: &Value) -> Result<&str, KeyError> {
    match value {
        Value::String(_) => Ok("Z6"),
        Value::Array(_) => Ok("Z10"),
        Value::Object(fields) => record_type_zid(fields).ok_or(KeyError::MissingTypeTag),
        other => Err(KeyError::NotAZObject {
            actual: json_type_name(other),
        }),
    }
}

/// Compact serialization with object keys sorted recursively, so field
/// order cannot leak into identity strings.
fn sorted_json(value: &Value) -> String {
    sort_keys(value).to_string()
}

fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(fields) => {
            let mut keys: Vec<&String> = fields.keys().collect();
            keys.sort();
            let mut sorted = Map::new();
            for key in keys {
                sorted.insert(key.clone(), sort_keys(&fields[key.as_str()]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}
