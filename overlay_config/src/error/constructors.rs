//! Constructors for `OverlayError` variants.

use std::path::Path;
use std::sync::Arc;

use super::OverlayError;

impl OverlayError {
    /// Construct a file error for `path`.
    ///
    /// # Examples
    ///
    /// ```
    /// use overlay_config::OverlayError;
    /// use std::path::Path;
    ///
    /// let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    /// let err = OverlayError::file(Path::new("app.yaml"), io);
    /// assert!(matches!(&*err, OverlayError::File { .. }));
    /// ```
    #[must_use]
    pub fn file(
        path: &Path,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Arc<Self> {
        Arc::new(Self::File {
            path: path.to_path_buf(),
            source: source.into(),
        })
    }

    /// Construct a parse error for a document described by `origin`.
    #[must_use]
    pub fn parse(origin: impl Into<String>, source: serde_saphyr::Error) -> Arc<Self> {
        Arc::new(Self::Parse {
            origin: origin.into(),
            source,
        })
    }

    /// Construct an encoding error for a document that is not UTF-8.
    #[must_use]
    pub fn encoding(origin: impl Into<String>, source: std::str::Utf8Error) -> Arc<Self> {
        Arc::new(Self::Encoding {
            origin: origin.into(),
            source,
        })
    }

    /// Construct a node decoding error from a [`figment::Error`].
    ///
    /// # Examples
    ///
    /// ```
    /// use overlay_config::OverlayError;
    ///
    /// let err = OverlayError::decode(figment::Error::from("boom"));
    /// assert!(matches!(&*err, OverlayError::Decode { .. }));
    /// ```
    #[must_use]
    pub fn decode(source: figment::Error) -> Arc<Self> {
        Arc::new(Self::Decode {
            source: Box::new(source),
        })
    }

    /// Construct an error for a document whose root is not a mapping.
    #[must_use]
    pub fn not_a_mapping(origin: impl Into<String>, found: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::NotAMapping {
            origin: origin.into(),
            found: found.into(),
        })
    }

    /// Whether this error comes from reading the document source rather than
    /// from its contents.
    #[must_use]
    pub const fn is_file_error(&self) -> bool {
        matches!(self, Self::File { .. })
    }
}
