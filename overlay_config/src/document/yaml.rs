//! YAML decoding backed by `serde-saphyr`.
//!
//! Documents are read with YAML 1.2 strict booleans: only `true` and `false`
//! are booleans, so values such as `yes` or `on` stay strings.

use serde::de::DeserializeOwned;
use serde_saphyr::Options;

use crate::{OverlayError, OverlayResult};

fn options() -> Options {
    Options {
        strict_booleans: true,
        ..Options::default()
    }
}

/// Decode YAML text into `T`, attributing failures to `origin`.
pub(crate) fn from_str<T: DeserializeOwned>(contents: &str, origin: &str) -> OverlayResult<T> {
    serde_saphyr::from_str_with_options(contents, options())
        .map_err(|err| OverlayError::parse(origin, err))
}

/// Decode UTF-8 YAML bytes into `T`, attributing failures to `origin`.
pub(crate) fn from_bytes<T: DeserializeOwned>(bytes: &[u8], origin: &str) -> OverlayResult<T> {
    let contents =
        std::str::from_utf8(bytes).map_err(|err| OverlayError::encoding(origin, err))?;
    from_str(contents, origin)
}
