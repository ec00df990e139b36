//! Environment variable access for the overlay pass.
//!
//! The resolver never touches the process environment directly. It asks an
//! [`EnvSource`] for a key, which keeps the prefix an explicit property of
//! the source rather than process-wide state, and lets tests substitute a
//! fixed set of variables with [`MapEnv`].

use std::collections::BTreeMap;

use crate::coerce::{parse_env_bool, parse_f64, parse_i64};

/// Supplies raw environment values by key.
///
/// Implementations return `None` both for unset keys and for keys set to the
/// empty string, since the overlay treats the two identically.
pub trait EnvSource: Send + Sync {
    /// Returns the value of `key`, or `None` if it is unset or empty.
    fn string(&self, key: &str) -> Option<String>;

    /// Returns `key` parsed as a base-10 `i64`.
    fn int(&self, key: &str) -> Option<i64> {
        self.string(key).and_then(|raw| parse_i64(&raw).ok())
    }

    /// Returns `key` parsed with the permissive boolean dialect.
    fn boolean(&self, key: &str) -> Option<bool> {
        self.string(key).and_then(|raw| parse_env_bool(&raw).ok())
    }

    /// Returns `key` parsed as an `f64`.
    fn float(&self, key: &str) -> Option<f64> {
        self.string(key).and_then(|raw| parse_f64(&raw).ok())
    }
}

/// Reads the process environment, optionally prefixing every key.
///
/// Keys are matched exactly and values are returned verbatim, including any
/// surrounding whitespace. Values that are not valid UTF-8 count as unset.
///
/// # Examples
///
/// ```rust,no_run
/// use overlay_config::{EnvSource, ProcessEnv};
///
/// let env = ProcessEnv::prefixed("APP_");
/// // Reads `APP_PORT`.
/// let _port = env.int("PORT");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessEnv {
    prefix: String,
}

impl ProcessEnv {
    /// Create an unprefixed source.
    #[must_use]
    pub fn raw() -> Self {
        Self::default()
    }

    /// Create a source that looks up `{prefix}{key}`.
    ///
    /// The prefix is used verbatim; include any separator yourself.
    #[must_use]
    pub fn prefixed(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// The prefix prepended to every key.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The full variable name looked up for `key`.
    #[must_use]
    pub fn qualify(&self, key: &str) -> String {
        format!("{}{key}", self.prefix)
    }
}

impl EnvSource for ProcessEnv {
    fn string(&self, key: &str) -> Option<String> {
        std::env::var(self.qualify(key))
            .ok()
            .filter(|value| !value.is_empty())
    }
}

/// A fixed, in-memory set of environment variables.
///
/// Keys are matched exactly. Useful for embedding and for tests that must not
/// depend on the real environment.
///
/// # Examples
///
/// ```
/// use overlay_config::{EnvSource, MapEnv};
///
/// let env = MapEnv::from_iter([("PORT", "9090"), ("DEBUG", "yes")]);
/// assert_eq!(env.int("PORT"), Some(9090));
/// assert_eq!(env.boolean("DEBUG"), Some(true));
/// assert_eq!(env.string("MISSING"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapEnv {
    vars: BTreeMap<String, String>,
}

impl MapEnv {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a variable.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl<K, V> FromIterator<(K, V)> for MapEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl EnvSource for MapEnv {
    fn string(&self, key: &str) -> Option<String> {
        self.vars.get(key).filter(|value| !value.is_empty()).cloned()
    }
}
