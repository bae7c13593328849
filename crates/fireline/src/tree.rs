//! Dotted field path expansion.
//!
//! Nature forms submit flat `(dotted_key, value)` pairs. This module expands
//! them into nested JSON objects with an explicit collision policy, so a leaf
//! landing where a branch sits (or vice versa) is never silently undefined.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Policy applied when a dotted path collides with an existing value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Reject the whole submission with a `PathConflict` error.
    #[default]
    Reject,
    /// Replace whatever is in the way; later entries win.
    LastWriteWins,
}

/// Expand flat form entries into a nested object.
///
/// Entries are applied in order. Intermediate objects are created on demand;
/// collisions follow `policy`. Values are kept as strings here; type
/// normalization is the schema layer's job.
///
/// # Errors
///
/// Returns an error if a key is empty or contains an empty segment, or on
/// collision under [`ConflictPolicy::Reject`].
pub fn build_tree(entries: &[(String, String)], policy: ConflictPolicy) -> Result<Map<String, Value>> {
    let mut tree = Map::new();
    for (key, value) in entries {
        insert_path(&mut tree, key, Value::String(value.clone()), policy)?;
    }
    Ok(tree)
}

/// Assign `value` at the dotted `path` inside `tree`.
///
/// # Errors
///
/// Returns an error if the path is malformed, or if it collides with an
/// existing leaf or branch under [`ConflictPolicy::Reject`].
pub fn insert_path(
    tree: &mut Map<String, Value>,
    path: &str,
    value: Value,
    policy: ConflictPolicy,
) -> Result<()> {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(Error::validation(format!(
            "field path '{path}' has an empty segment"
        )));
    }

    let mut current = tree;
    for segment in &segments[..segments.len() - 1] {
        let slot = current
            .entry((*segment).to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            match policy {
                ConflictPolicy::Reject => return Err(Error::path_conflict(path)),
                ConflictPolicy::LastWriteWins => *slot = Value::Object(Map::new()),
            }
        }
        let Value::Object(next) = slot else {
            return Err(Error::internal("path segment is not an object"));
        };
        current = next;
    }

    let leaf = segments[segments.len() - 1];
    if current.contains_key(leaf) && policy == ConflictPolicy::Reject {
        return Err(Error::path_conflict(path));
    }
    current.insert(leaf.to_string(), value);
    Ok(())
}

/// Look up the value at a dotted `path`, if any.
#[must_use]
pub fn get_path<'a>(tree: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut value = tree.get(segments.next()?)?;
    for segment in segments {
        value = value.as_object()?.get(segment)?;
    }
    Some(value)
}

/// Merge `payload` into `target` one level deep: top-level keys from the
/// payload overwrite, everything else in the target is untouched.
pub fn shallow_merge(target: &mut Map<String, Value>, payload: Map<String, Value>) {
    for (key, value) in payload {
        target.insert(key, value);
    }
}
