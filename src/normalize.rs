//! Response normalization.
//!
//! Decoded platform responses arrive as generic [`Value`] trees whose keys
//! are whatever the XML element names happened to be (`payment-method`,
//! `payment_method`, ...). [`canonicalize`] rewrites every mapping key at
//! every depth into one canonical form, and [`arrayify`] undoes the
//! decoder's habit of collapsing one-element lists into a bare item.

use serde_json::{Map, Value};

/// Returns the canonical form of `key`, or `None` if the key cannot be
/// converted.
///
/// Convertible keys consist only of ASCII alphanumerics, `-` and `_`.
/// Their canonical form replaces every `-` with `_`; case is kept, so keys
/// differing only in case stay distinct.
#[must_use]
pub fn canonical_key(key: &str) -> Option<String> {
    let convertible = !key.is_empty()
        && key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
    convertible.then(|| {
        key.chars()
            .map(|ch| if ch == '-' { '_' } else { ch })
            .collect()
    })
}

/// Recursively canonicalizes every mapping key in `node`.
///
/// Keys that cannot be converted are kept as they are. Sequences are
/// walked element by element, scalars are returned unchanged.
#[must_use]
pub fn canonicalize(node: Value) -> Value {
    match node {
        Value::Object(map) => Value::Object(canonicalize_map(map)),
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        scalar @ (Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_)) => scalar,
    }
}

/// Canonicalizes the keys of a single mapping and recurses into its values.
#[must_use]
pub fn canonicalize_map(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .map(|(key, value)| {
            let key = canonical_key(&key).unwrap_or(key);
            (key, canonicalize(value))
        })
        .collect()
}

/// Wraps `value` in a one-element sequence unless it already is one.
#[must_use]
pub fn arrayify(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        other @ (Value::Null
        | Value::Bool(_)
        | Value::Number(_)
        | Value::String(_)
        | Value::Object(_)) => vec![other],
    }
}
