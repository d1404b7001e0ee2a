//! Lexical predicates for the ZObject key grammar.
//!
//! ZIDs (`Z42`), references (`Q42`, `Z42`), global keys (`Z42K1`), and
//! local keys (`K1`) are all plain ASCII tokens, so the predicates here
//! work on bytes without a regex engine. Leading zeros are invalid
//! everywhere: `Z01` is not a ZID and `Z0` does not exist.

/// True for `[1-9][0-9]*`: at least one digit, no leading zero.
fn is_index(s: &str) -> bool {
    let mut bytes = s.bytes();
    match bytes.next() {
        Some(b'1'..=b'9') => bytes.all(|b| b.is_ascii_digit()),
        _ => false,
    }
}

/// True when `s` is a reference token: `[A-Z][1-9][0-9]*`.
///
/// Every ZID is a reference token; foreign namespaces (for example `Q42`)
/// are references too, which is why the transform layer tests against
/// this rather than [`is_zid`].
pub fn is_reference(s: &str) -> bool {
    match s.as_bytes().first() {
        Some(b'A'..=b'Z') => is_index(&s[1..]),
        _ => false,
    }
}

/// True when `s` is a ZID: `Z[1-9][0-9]*`.
pub fn is_zid(s: &str) -> bool {
    match s.strip_prefix('Z') {
        Some(rest) => is_index(rest),
        None => false,
    }
}

/// True when `s` is a global key: `Z[1-9][0-9]*K[1-9][0-9]*`.
pub fn is_global_key(s: &str) -> bool {
    match s.strip_prefix('Z').and_then(|rest| rest.split_once('K')) {
        Some((type_part, index_part)) => is_index(type_part) && is_index(index_part),
        None => false,
    }
}

/// True when `s` is a local key: `K[1-9][0-9]*`.
pub fn is_local_key(s: &str) -> bool {
    match s.strip_prefix('K') {
        Some(rest) => is_index(rest),
        None => false,
    }
}

/// The owning type of a global key: `Z6K1` -> `Z6`. `None` for anything
/// that is not a global key.
pub fn global_key_type(s: &str) -> Option<&str> {
    if !is_global_key(s) {
        return None;
    }
    s.find('K').map(|at| &s[..at])
}

/// The key position of a global or local key: `Z6K1` -> 1, `K2` -> 2.
pub fn key_index(s: &str) -> Option<u64> {
    if !is_global_key(s) && !is_local_key(s) {
        return None;
    }
    let at = s.rfind('K')?;
    s[at + 1..].parse().ok()
}

/// The numeric part of a ZID: `Z881` -> 881.
pub fn zid_number(s: &str) -> Option<u64> {
    if !is_zid(s) {
        return None;
    }
    s[1..].parse().ok()
}
