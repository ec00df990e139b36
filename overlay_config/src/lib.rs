//! Typed configuration from YAML documents, environment variables and
//! field-level defaults.
//!
//! A schema is a plain struct deriving [`serde::Deserialize`] and
//! [`Overlay`]. Loading decodes the document first, then walks the struct
//! and, for each annotated field:
//!
//! 1. replaces the value with the field's environment variable when that
//!    variable is set and non-empty;
//! 2. otherwise fills the field from its default literal if it is still at
//!    its zero value.
//!
//! ```
//! use overlay_config::{Loader, MapEnv, Overlay};
//! use serde::Deserialize;
//!
//! #[derive(Debug, Default, Deserialize, Overlay)]
//! #[serde(default)]
//! struct AppConfig {
//!     #[overlay(env = "APP_NAME", default = "demo")]
//!     name: String,
//!     #[overlay(nested)]
//!     database: Database,
//! }
//!
//! #[derive(Debug, Default, Deserialize, Overlay)]
//! #[serde(default)]
//! struct Database {
//!     #[overlay(env = "DB_URL")]
//!     url: String,
//!     #[overlay(default = "5")]
//!     pool: u8,
//! }
//!
//! # fn main() -> overlay_config::OverlayResult<()> {
//! let loader = Loader::with_env(MapEnv::from_iter([("DB_URL", "postgres://db")]));
//! let config: AppConfig = loader.unmarshal_str("database:\n  url: sqlite://local\n")?;
//! assert_eq!(config.name, "demo");
//! assert_eq!(config.database.url, "postgres://db");
//! assert_eq!(config.database.pool, 5);
//! # Ok(())
//! # }
//! ```
//!
//! Conversion problems in environment values or defaults never fail a load.
//! They are passed to an [`IssueReporter`] and the field keeps its previous
//! value. Only unreadable files and malformed documents produce an
//! [`OverlayError`].

// Lets `#[derive(Overlay)]` refer to `overlay_config::` inside this crate.
extern crate self as overlay_config;

pub use overlay_config_macros::Overlay;

mod coerce;
mod descriptor;
mod diagnostics;
mod document;
mod env;
mod error;
mod loader;
mod resolver;
mod walker;

pub use coerce::{
    CoerceError, Scalar, ScalarKind, parse_bool_literal, parse_env_bool, parse_f64, parse_i64,
};
pub use descriptor::{FieldDescriptor, FieldKind};
pub use diagnostics::{IssueReporter, IssueSource, OverlayIssue, silent_reporter, tracing_reporter};
pub use document::{Document, DocumentNode};
pub use env::{EnvSource, MapEnv, ProcessEnv};
pub use error::{OverlayError, OverlayResult};
pub use loader::Loader;
pub use resolver::{Resolution, Resolver};
pub use walker::{Overlay, Walker};

use std::path::Path;

use camino::Utf8Path;
use cap_std::fs_utf8::Dir;
use serde::de::DeserializeOwned;

/// Decode YAML bytes into `T` and overlay the unprefixed process environment.
///
/// # Errors
///
/// See [`Loader::unmarshal_bytes`].
pub fn unmarshal_bytes<T: DeserializeOwned + Overlay>(bytes: &[u8]) -> OverlayResult<T> {
    Loader::default().unmarshal_bytes(bytes)
}

/// Decode YAML text into `T` and overlay the unprefixed process environment.
///
/// # Errors
///
/// See [`Loader::unmarshal_str`].
pub fn unmarshal_str<T: DeserializeOwned + Overlay>(contents: &str) -> OverlayResult<T> {
    Loader::default().unmarshal_str(contents)
}

/// Read a YAML file into `T` and overlay the unprefixed process environment.
///
/// # Errors
///
/// See [`Loader::unmarshal_file`].
pub fn unmarshal_file<T: DeserializeOwned + Overlay>(path: impl AsRef<Path>) -> OverlayResult<T> {
    Loader::default().unmarshal_file(path)
}

/// Read a YAML file through a directory handle into `T` and overlay the
/// unprefixed process environment.
///
/// # Errors
///
/// See [`Loader::unmarshal_file_in`].
pub fn unmarshal_file_in<T: DeserializeOwned + Overlay>(
    dir: &Dir,
    path: impl AsRef<Utf8Path>,
) -> OverlayResult<T> {
    Loader::default().unmarshal_file_in(dir, path)
}

/// Decode a document node into `T` and overlay the unprefixed process
/// environment.
///
/// # Errors
///
/// See [`Loader::unmarshal_node`].
pub fn unmarshal_node<T: DeserializeOwned + Overlay>(node: &DocumentNode) -> OverlayResult<T> {
    Loader::default().unmarshal_node(node)
}

/// Overlay the unprefixed process environment and defaults onto `target`.
pub fn overlay<T: Overlay + ?Sized>(target: &mut T) {
    Loader::default().overlay(target);
}
