//! Generic document subtrees.

use figment::value::Value;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::{OverlayError, OverlayResult};

/// An already parsed piece of a document, kept for later decoding.
///
/// Use it for sections whose shape is only known at runtime, such as a map
/// of heterogeneous records keyed by type:
///
/// ```
/// use overlay_config::{DocumentNode, Overlay};
/// use serde::Deserialize;
/// use std::collections::BTreeMap;
///
/// #[derive(Deserialize, Overlay)]
/// struct Plugins {
///     plugins: BTreeMap<String, DocumentNode>,
/// }
///
/// #[derive(Debug, Default, Deserialize, Overlay)]
/// struct Cache {
///     #[overlay(default = "64")]
///     #[serde(default)]
///     size_mb: u32,
/// }
///
/// # fn main() -> overlay_config::OverlayResult<()> {
/// let doc: Plugins = overlay_config::unmarshal_str("plugins:\n  cache: {}\n")?;
/// if let Some(node) = doc.plugins.get("cache") {
///     let cache: Cache = overlay_config::unmarshal_node(node)?;
///     assert_eq!(cache.size_mb, 64);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentNode(Value);

impl DocumentNode {
    /// Decode the node into `T` without running the overlay pass.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::Decode`] when the node does not match `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> OverlayResult<T> {
        self.0.deserialize().map_err(OverlayError::decode)
    }

    /// The string held by this node, if it is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match &self.0 {
            Value::String(_, value) => Some(value),
            _ => None,
        }
    }

    /// The integer held by this node, if it is an integer that fits `i64`.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match &self.0 {
            Value::Num(_, num) => num.to_i128().and_then(|wide| i64::try_from(wide).ok()),
            _ => None,
        }
    }

    /// The boolean held by this node, if it is a boolean.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match &self.0 {
            Value::Bool(_, value) => Some(*value),
            _ => None,
        }
    }

    /// A copy of the child stored under `key`, if this node is a mapping.
    ///
    /// Keys are matched literally; dots are not treated as path separators.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Self> {
        match &self.0 {
            Value::Dict(_, entries) => entries.get(key).cloned().map(Self),
            _ => None,
        }
    }

    /// Short description of the node's type, such as `"string"` or `"map"`.
    #[must_use]
    pub fn kind(&self) -> String {
        self.0.to_actual().to_string()
    }

    /// Borrow the underlying value.
    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }

    /// Unwrap the underlying value.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for DocumentNode {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
