//! Compile-time description of a schema's fields.
//!
//! `#[derive(Overlay)]` emits one [`FieldDescriptor`] per field, both as the
//! [`Overlay::FIELDS`](crate::Overlay::FIELDS) table and inline in the
//! generated `walk` body.

/// How the walker treats a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// A leaf handed to the resolver.
    Scalar,
    /// A nested schema, possibly behind `Option` or `Box`.
    Nested,
    /// A map whose values are schemas.
    Map,
    /// Left exactly as the document decoder produced it.
    Passthrough,
}

/// Static metadata for one schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    /// Rust field name.
    pub name: &'static str,
    /// Key the document decoder reads the field from.
    pub key: &'static str,
    /// Walker classification.
    pub kind: FieldKind,
    /// Environment variable controlling the field, if any.
    pub env: Option<&'static str>,
    /// Default literal, if any.
    pub default: Option<&'static str>,
}

impl FieldDescriptor {
    /// Environment key, treating an empty annotation as absent.
    #[must_use]
    pub fn env_key(&self) -> Option<&'static str> {
        self.env.filter(|key| !key.is_empty())
    }

    /// Default literal, treating an empty annotation as absent.
    #[must_use]
    pub fn default_literal(&self) -> Option<&'static str> {
        self.default.filter(|literal| !literal.is_empty())
    }
}
