//! Error types produced while reading and decoding configuration documents.
//!
//! Only hard failures live here. Problems met during the overlay pass (a
//! malformed environment value, a default literal that does not parse) are
//! soft failures: they are reported through
//! [`IssueReporter`](crate::IssueReporter) and never abort a load.

mod constructors;

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OverlayError {
    /// The configuration file could not be read.
    #[error("Configuration file error in '{path}': {source}")]
    File {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The document is not valid YAML or does not fit the target schema.
    #[error("Failed to parse {origin}: {source}")]
    Parse {
        /// Human-readable description of the document source.
        origin: String,
        /// Error reported by the YAML decoder.
        #[source]
        source: serde_saphyr::Error,
    },

    /// The document bytes are not valid UTF-8.
    #[error("Failed to read {origin} as UTF-8: {source}")]
    Encoding {
        /// Human-readable description of the document source.
        origin: String,
        /// Position of the invalid byte sequence.
        #[source]
        source: std::str::Utf8Error,
    },

    /// A previously parsed document node could not be decoded.
    #[error("Failed to decode document node: {source}")]
    Decode {
        /// Error reported while decoding the node.
        #[source]
        source: Box<figment::Error>,
    },

    /// A document expected to hold a mapping holds something else.
    #[error("Expected a mapping at the root of {origin}, found {found}")]
    NotAMapping {
        /// Human-readable description of the document source.
        origin: String,
        /// Description of the value actually found.
        found: String,
    },
}

/// Result alias used by every fallible loading operation.
///
/// Errors are shared behind an [`Arc`] so callers can fan them out to
/// several observers without cloning the underlying sources.
pub type OverlayResult<T> = Result<T, Arc<OverlayError>>;
