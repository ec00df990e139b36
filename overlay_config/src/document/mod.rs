//! Parsed configuration documents.
//!
//! [`DocumentNode`] keeps a subtree for deferred decoding; [`Document`] gives
//! schema-less access to the top-level keys of a file.

mod node;
pub(crate) mod yaml;

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use figment::value::Value;

pub use node::DocumentNode;

use crate::{OverlayError, OverlayResult};

/// A YAML mapping read without a schema.
///
/// Lookups return a value only when the stored type matches exactly; nothing
/// is coerced and no environment overlay takes place.
///
/// # Examples
///
/// ```
/// use overlay_config::Document;
///
/// # fn main() -> overlay_config::OverlayResult<()> {
/// let doc: Document = "name: api\nworkers: 4\ndebug: true\n".parse()?;
/// assert_eq!(doc.string("name"), Some("api"));
/// assert_eq!(doc.int("workers"), Some(4));
/// assert_eq!(doc.boolean("debug"), Some(true));
/// assert_eq!(doc.int("name"), None);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    entries: BTreeMap<String, DocumentNode>,
}

impl Document {
    /// Read and parse the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::File`] if the file cannot be read, and a parse
    /// error if it is not a YAML mapping.
    pub fn load(path: impl AsRef<Path>) -> OverlayResult<Self> {
        let file = path.as_ref();
        let bytes = std::fs::read(file).map_err(|err| OverlayError::file(file, err))?;
        Self::from_bytes_with_origin(&bytes, &file.display().to_string())
    }

    /// Parse a document from UTF-8 YAML bytes.
    ///
    /// # Errors
    ///
    /// Returns a parse error if the bytes are not a YAML mapping.
    pub fn from_bytes(bytes: &[u8]) -> OverlayResult<Self> {
        Self::from_bytes_with_origin(bytes, "inline document")
    }

    fn from_bytes_with_origin(bytes: &[u8], origin: &str) -> OverlayResult<Self> {
        let value: Value = yaml::from_bytes(bytes, origin)?;
        Self::from_value(value, origin)
    }

    fn from_value(value: Value, origin: &str) -> OverlayResult<Self> {
        let found = value.to_actual().to_string();
        let dict = value
            .into_dict()
            .ok_or_else(|| OverlayError::not_a_mapping(origin, found))?;
        Ok(Self {
            entries: dict
                .into_iter()
                .map(|(key, value)| (key, DocumentNode::from(value)))
                .collect(),
        })
    }

    /// The node stored under `key`.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&DocumentNode> {
        self.entries.get(key)
    }

    /// The integer stored under `key`.
    #[must_use]
    pub fn int(&self, key: &str) -> Option<i64> {
        self.value(key).and_then(DocumentNode::as_i64)
    }

    /// The string stored under `key`.
    #[must_use]
    pub fn string(&self, key: &str) -> Option<&str> {
        self.value(key).and_then(DocumentNode::as_str)
    }

    /// The boolean stored under `key`.
    #[must_use]
    pub fn boolean(&self, key: &str) -> Option<bool> {
        self.value(key).and_then(DocumentNode::as_bool)
    }

    /// Top-level keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl FromStr for Document {
    type Err = Arc<OverlayError>;

    fn from_str(contents: &str) -> Result<Self, Self::Err> {
        let origin = "inline document";
        let value: Value = yaml::from_str(contents, origin)?;
        Self::from_value(value, origin)
    }
}
