//! Precedence policy for scalar fields.
//!
//! For every leaf the resolver applies, in order:
//!
//! 1. the environment variable named by the field, when it is set and
//!    non-empty, overwriting whatever the document supplied;
//! 2. the field's default literal, only while the field still holds its
//!    zero value.
//!
//! A value that fails to convert is reported and skipped, so the field keeps
//! what it had and the next stage gets its chance.

use std::fmt;
use std::sync::Arc;

use crate::coerce::Scalar;
use crate::descriptor::FieldDescriptor;
use crate::diagnostics::{IssueReporter, IssueSource, OverlayIssue, tracing_reporter};
use crate::env::{EnvSource, ProcessEnv};
use crate::walker::{Overlay, Walker};

/// Which stage determined a field's value during one resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Resolution {
    /// The environment value replaced the field.
    Environment,
    /// The default literal filled a zero field.
    Default,
    /// The field kept its previous value.
    Unchanged,
}

/// Applies environment overrides and defaults to scalar fields.
///
/// A resolver is immutable once built and can be shared between threads to
/// resolve independent configuration instances.
///
/// # Examples
///
/// ```
/// use overlay_config::{FieldDescriptor, FieldKind, MapEnv, Resolution, Resolver};
///
/// let resolver = Resolver::new(MapEnv::from_iter([("PORT", "9090")]));
/// let descriptor = FieldDescriptor {
///     name: "port",
///     key: "port",
///     kind: FieldKind::Scalar,
///     env: Some("PORT"),
///     default: Some("8080"),
/// };
/// let mut port = 7000_u16;
/// assert_eq!(resolver.resolve("port", &mut port, &descriptor), Resolution::Environment);
/// assert_eq!(port, 9090);
/// ```
#[derive(Clone)]
pub struct Resolver {
    env: Arc<dyn EnvSource>,
    reporter: IssueReporter,
}

impl Resolver {
    /// Create a resolver reading from `env` and logging issues via `tracing`.
    #[must_use]
    pub fn new(env: impl EnvSource + 'static) -> Self {
        Self {
            env: Arc::new(env),
            reporter: tracing_reporter(),
        }
    }

    /// Replace the issue reporter.
    #[must_use]
    pub fn with_reporter(mut self, reporter: IssueReporter) -> Self {
        self.reporter = reporter;
        self
    }

    /// The environment source consulted for overrides.
    #[must_use]
    pub fn env(&self) -> &dyn EnvSource {
        self.env.as_ref()
    }

    /// Resolve one scalar field in place.
    pub fn resolve<T: Scalar>(
        &self,
        path: &str,
        field: &mut T,
        descriptor: &FieldDescriptor,
    ) -> Resolution {
        if let Some(key) = descriptor.env_key() {
            if let Some(raw) = self.env.string(key) {
                match T::from_env(&raw) {
                    Ok(value) => {
                        *field = value;
                        tracing::debug!(path, key, "environment override applied");
                        return Resolution::Environment;
                    }
                    Err(reason) => (self.reporter)(&OverlayIssue {
                        path: path.to_owned(),
                        source: IssueSource::Environment,
                        key: key.to_owned(),
                        kind: T::KIND,
                        raw,
                        reason,
                    }),
                }
            }
        }

        let Some(literal) = descriptor.default_literal() else {
            return Resolution::Unchanged;
        };
        if !field.is_zero() {
            return Resolution::Unchanged;
        }
        match T::from_default(literal) {
            Ok(value) => {
                *field = value;
                tracing::debug!(path, literal, "default applied");
                Resolution::Default
            }
            Err(reason) => {
                (self.reporter)(&OverlayIssue {
                    path: path.to_owned(),
                    source: IssueSource::Default,
                    key: String::new(),
                    kind: T::KIND,
                    raw: literal.to_owned(),
                    reason,
                });
                Resolution::Unchanged
            }
        }
    }

    /// Run the overlay pass over every field of `target`.
    pub fn overlay<T: Overlay + ?Sized>(&self, target: &mut T) {
        let mut walker = Walker::new(self);
        target.walk(&mut walker);
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(ProcessEnv::raw())
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("env", &"<env source>")
            .field("reporter", &"<reporter>")
            .finish()
    }
}
