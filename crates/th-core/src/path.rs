//! Safe traversal over loosely-typed JSON trees.
//!
//! Extraction rules share one lookup primitive: walk a fixed path into a
//! `serde_json::Value`, where any missing key, empty list, or type
//! mismatch resolves to `None` rather than an error.

use serde_json::Value;

/// One step of a traversal path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStep {
    /// Descend into an object by key.
    Key(&'static str),
    /// Take the first element of an array.
    First,
}

/// Walks `path` into `value`, returning the node it lands on.
pub fn lookup<'a>(value: &'a Value, path: &[PathStep]) -> Option<&'a Value> {
    let mut current = value;
    for step in path {
        current = match step {
            PathStep::Key(key) => current.as_object()?.get(*key)?,
            PathStep::First => current.as_array()?.first()?,
        };
    }
    Some(current)
}

/// Like [`lookup`], but only succeeds when the target node is a string.
pub fn lookup_str<'a>(value: &'a Value, path: &[PathStep]) -> Option<&'a str> {
    lookup(value, path)?.as_str()
}
