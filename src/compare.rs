//! Structural comparison of type descriptors.
//!
//! `compare_types(comparand, comparator)` reads as "does a value typed
//! as `comparand` satisfy a context requiring `comparator`". The check
//! is type-level only: it resolves both sides through the same identity
//! walk the key factory uses and never inspects instance data.

use serde_json::{Map, Value};

use crate::error::KeyError;
use crate::typekey::{find_identity, member_declared_types, Identity};

/// Compares two type descriptors structurally.
///
/// Generic types short-circuit to `true` before every other check; they
/// are not structurally verified at this layer. The universal type `Z1`
/// as comparator accepts any comparand that resolves. Plain references
/// compare nominally; user-defined types compare positionwise over
/// their ordered member types, names excluded.
///
/// Identity-walk failures (depth bound exceeded, malformed members)
/// propagate as errors rather than comparing unequal.
pub fn compare_types(comparand: &Value, comparator: &Value) -> Result<bool, KeyError> {
    let left = find_identity(comparand, 0)?;
    let right = find_identity(comparator, 0)?;

    // The generic escape hatch applies first, on either side.
    if matches!(left, Some(Identity::Generic(_))) || matches!(right, Some(Identity::Generic(_))) {
        return Ok(true);
    }
    match (left, right) {
        (Some(_), Some(Identity::Reference("Z1"))) => Ok(true),
        (Some(Identity::Reference(a)), Some(Identity::Reference(b))) => Ok(a == b),
        (Some(Identity::UserDefined(a)), Some(Identity::UserDefined(b))) => {
            compare_members(a, b)
        }
        _ => Ok(false),
    }
}

// --- Internal implementation ---

fn compare_members(
    comparand: &Map<String, Value>,
    comparator: &Map<String, Value>,
) -> Result<bool, KeyError> {
    let left = member_declared_types(comparand)?;
    let right = member_declared_types(comparator)?;
    if left.len() != right.len() {
        return Ok(false);
    }
    for (a, b) in left.iter().zip(right.iter()) {
        if !compare_types(a, b)? {
            return Ok(false);
        }
    }
    Ok(true)
}
