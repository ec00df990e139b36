//! Recursive traversal of configuration schemas.
//!
//! Schemas implement [`Overlay`], normally through `#[derive(Overlay)]`. The
//! generated `walk` method hands each field to the [`Walker`] according to
//! its [`FieldKind`](crate::FieldKind):
//!
//! - scalar leaves go to the [`Resolver`];
//! - nested schemas are walked recursively;
//! - maps of schemas are walked entry by entry;
//! - everything else is left as decoded.
//!
//! Maps with scalar values are never walked. This is a deliberate limitation:
//! map entries have no per-entry annotations, so there is nothing to resolve
//! them against. The derive rejects `nested` on such maps at compile time
//! because the value type does not implement [`Overlay`].

use std::fmt::Display;

use crate::coerce::Scalar;
use crate::descriptor::FieldDescriptor;
use crate::resolver::{Resolution, Resolver};

/// A configuration schema whose fields can be overlaid.
pub trait Overlay {
    /// Descriptors for every field, in declaration order.
    const FIELDS: &'static [FieldDescriptor];

    /// Visit each field with `walker`.
    fn walk(&mut self, walker: &mut Walker<'_>);
}

impl<T: Overlay> Overlay for Option<T> {
    const FIELDS: &'static [FieldDescriptor] = T::FIELDS;

    fn walk(&mut self, walker: &mut Walker<'_>) {
        if let Some(inner) = self {
            inner.walk(walker);
        }
    }
}

impl<T: Overlay> Overlay for Box<T> {
    const FIELDS: &'static [FieldDescriptor] = T::FIELDS;

    fn walk(&mut self, walker: &mut Walker<'_>) {
        self.as_mut().walk(walker);
    }
}

/// Drives one overlay pass, tracking the dotted path of the current field.
#[derive(Debug)]
pub struct Walker<'r> {
    resolver: &'r Resolver,
    path: String,
}

impl<'r> Walker<'r> {
    /// Start a walk at the schema root.
    #[must_use]
    pub const fn new(resolver: &'r Resolver) -> Self {
        Self {
            resolver,
            path: String::new(),
        }
    }

    /// Dotted path of the field currently being visited.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Resolve a scalar leaf.
    pub fn scalar<T: Scalar>(&mut self, field: &mut T, descriptor: FieldDescriptor) -> Resolution {
        let resolver = self.resolver;
        self.scoped(descriptor.name, |walker| {
            resolver.resolve(&walker.path, field, &descriptor)
        })
    }

    /// Recurse into a nested schema.
    pub fn nested<T: Overlay + ?Sized>(&mut self, name: &str, value: &mut T) {
        self.scoped(name, |walker| {
            tracing::trace!(path = %walker.path, "walking nested schema");
            value.walk(walker);
        });
    }

    /// Recurse into every schema value of a map.
    ///
    /// Each entry is visited under `name.key`.
    pub fn map<'m, K, V, I>(&mut self, name: &str, entries: I)
    where
        I: IntoIterator<Item = (&'m K, &'m mut V)>,
        K: Display + 'm,
        V: Overlay + 'm,
    {
        self.scoped(name, |walker| {
            for (key, value) in entries {
                walker.nested(&key.to_string(), value);
            }
        });
    }

    fn scoped<R>(&mut self, segment: &str, visit: impl FnOnce(&mut Self) -> R) -> R {
        let restore = self.path.len();
        if !self.path.is_empty() {
            self.path.push('.');
        }
        self.path.push_str(segment);
        let out = visit(self);
        self.path.truncate(restore);
        out
    }
}
