//! Raw subpath map parsing.
//!
//! A package's `exports` or `imports` field is decoded once into a
//! [`SubpathMap`]. Key order is kept exactly as written because it encodes
//! priority.

use serde_json::Value;

use crate::error::Error;

/// One node of a raw subpath map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubpathMap {
    /// A target path, or `None` for an explicit `null` block.
    Leaf(Option<String>),
    /// Fallback array: alternatives tried in order.
    Fallback(Vec<SubpathMap>),
    /// Keyed object: subpaths at the top, conditions below, in document order.
    Conditional(Vec<(String, SubpathMap)>),
}

/// Returns true if `key` names a subpath (`.`-prefixed export or `#`-prefixed import).
#[must_use]
pub fn is_subpath_key(key: &str) -> bool {
    key.starts_with('.') || key.starts_with('#')
}

impl SubpathMap {
    /// Parse a raw JSON value.
    pub fn from_json(value: &Value) -> Result<Self, Error> {
        Self::from_json_at(value, "")
    }

    /// Parse a raw JSON value located at `pointer` in its document.
    ///
    /// The pointer only feeds error messages.
    pub fn from_json_at(value: &Value, pointer: &str) -> Result<Self, Error> {
        match value {
            Value::Null => Ok(Self::Leaf(None)),
            Value::String(s) => Ok(Self::Leaf(Some(s.clone()))),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| Self::from_json_at(item, &format!("{pointer}/{i}")))
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Fallback),
            Value::Object(obj) => obj
                .iter()
                .map(|(key, item)| {
                    let child = format!("{pointer}/{}", escape_pointer_token(key));
                    Self::from_json_at(item, &child).map(|map| (key.clone(), map))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Conditional),
            Value::Bool(_) => Err(invalid(pointer, "boolean")),
            Value::Number(_) => Err(invalid(pointer, "number")),
        }
    }

    /// True when this node is an object keyed by subpaths rather than conditions.
    ///
    /// Mixed objects count as subpath-keyed; their condition keys are ignored
    /// by the flattener.
    #[must_use]
    pub fn is_subpath_keyed(&self) -> bool {
        match self {
            Self::Conditional(entries) => entries.iter().any(|(key, _)| is_subpath_key(key)),
            Self::Leaf(_) | Self::Fallback(_) => false,
        }
    }
}

fn invalid(pointer: &str, found: &'static str) -> Error {
    let pointer = if pointer.is_empty() { "/" } else { pointer };
    Error::InvalidSubpathMap {
        pointer: pointer.to_string(),
        found,
    }
}

/// Escape a key for use as a JSON pointer token (RFC 6901).
fn escape_pointer_token(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}
