//! Entry points that decode a document and run the overlay pass.
//!
//! A [`Loader`] carries everything a load needs: the environment source
//! (and therefore the key prefix) and the issue reporter. Build one at
//! startup and reuse it; it holds no mutable state.

use std::path::Path;

use camino::Utf8Path;
use cap_std::fs_utf8::Dir;
use serde::de::DeserializeOwned;

use crate::diagnostics::IssueReporter;
use crate::document::{DocumentNode, yaml};
use crate::env::{EnvSource, ProcessEnv};
use crate::resolver::Resolver;
use crate::walker::Overlay;
use crate::{OverlayError, OverlayResult};

/// Decodes configuration documents and overlays environment values and
/// defaults onto them.
///
/// # Examples
///
/// ```
/// use overlay_config::{Loader, MapEnv, Overlay};
/// use serde::Deserialize;
///
/// #[derive(Debug, Default, Deserialize, Overlay)]
/// #[serde(default)]
/// struct Server {
///     host: String,
///     #[overlay(env = "PORT", default = "8080")]
///     port: u16,
/// }
///
/// # fn main() -> overlay_config::OverlayResult<()> {
/// let unrelated = Loader::with_env(MapEnv::from_iter([("APP_PORT", "9090")]));
/// let server: Server = unrelated.unmarshal_str("host: example.org\n")?;
/// assert_eq!(server.port, 8080);
///
/// let matching = Loader::with_env(MapEnv::from_iter([("PORT", "9090")]));
/// let server: Server = matching.unmarshal_str("host: example.org\n")?;
/// assert_eq!(server.port, 9090);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Loader {
    resolver: Resolver,
}

impl Loader {
    /// A loader reading the unprefixed process environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A loader reading `{prefix}{key}` from the process environment.
    #[must_use]
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self::with_env(ProcessEnv::prefixed(prefix))
    }

    /// A loader reading from a custom environment source.
    #[must_use]
    pub fn with_env(env: impl EnvSource + 'static) -> Self {
        Self {
            resolver: Resolver::new(env),
        }
    }

    /// Replace the reporter receiving soft failures.
    #[must_use]
    pub fn reporter(mut self, reporter: IssueReporter) -> Self {
        self.resolver = self.resolver.with_reporter(reporter);
        self
    }

    /// The resolver used for the overlay pass.
    #[must_use]
    pub const fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Run only the overlay pass over an existing instance.
    ///
    /// Useful for values built in code or decoded elsewhere. The instance is
    /// mutated in place.
    pub fn overlay<T: Overlay + ?Sized>(&self, target: &mut T) {
        self.resolver.overlay(target);
    }

    /// Decode YAML bytes into `T` and overlay it.
    ///
    /// # Errors
    ///
    /// Returns an encoding or parse error if the bytes are not a valid
    /// document for `T`. The overlay pass itself never fails.
    pub fn unmarshal_bytes<T>(&self, bytes: &[u8]) -> OverlayResult<T>
    where
        T: DeserializeOwned + Overlay,
    {
        self.finish(yaml::from_bytes(bytes, "inline document")?)
    }

    /// Decode YAML text into `T` and overlay it.
    ///
    /// # Errors
    ///
    /// Returns a parse error if the text is not a valid document for `T`.
    pub fn unmarshal_str<T>(&self, contents: &str) -> OverlayResult<T>
    where
        T: DeserializeOwned + Overlay,
    {
        self.finish(yaml::from_str(contents, "inline document")?)
    }

    /// Read the file at `path`, decode it into `T` and overlay it.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::File`] if the file cannot be read, or a parse
    /// error if its contents are not a valid document for `T`.
    pub fn unmarshal_file<T>(&self, path: impl AsRef<Path>) -> OverlayResult<T>
    where
        T: DeserializeOwned + Overlay,
    {
        let file = path.as_ref();
        tracing::debug!(path = %file.display(), "loading configuration file");
        let bytes = std::fs::read(file).map_err(|err| OverlayError::file(file, err))?;
        self.finish(yaml::from_bytes(&bytes, &file.display().to_string())?)
    }

    /// Read `path` relative to `dir`, decode it into `T` and overlay it.
    ///
    /// Access is confined to `dir`, which makes this suitable for embedded
    /// or sandboxed configuration trees.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::File`] if the file cannot be read through
    /// `dir`, or a parse error if its contents are not a valid document.
    pub fn unmarshal_file_in<T>(&self, dir: &Dir, path: impl AsRef<Utf8Path>) -> OverlayResult<T>
    where
        T: DeserializeOwned + Overlay,
    {
        let file = path.as_ref();
        tracing::debug!(path = %file, "loading configuration file from directory handle");
        let bytes = dir
            .read(file)
            .map_err(|err| OverlayError::file(file.as_std_path(), err))?;
        self.finish(yaml::from_bytes(&bytes, file.as_str())?)
    }

    /// Decode a previously parsed node into `T` and overlay it.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::Decode`] when the node does not match `T`.
    pub fn unmarshal_node<T>(&self, node: &DocumentNode) -> OverlayResult<T>
    where
        T: DeserializeOwned + Overlay,
    {
        self.finish(node.decode()?)
    }

    fn finish<T: Overlay>(&self, mut value: T) -> OverlayResult<T> {
        self.overlay(&mut value);
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    //! Loader tests covering each entry point.

    use super::*;
    use crate::env::MapEnv;
    use anyhow::{Result, anyhow, ensure};
    use cap_std::ambient_authority;
    use rstest::{fixture, rstest};
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize, crate::Overlay)]
    #[serde(default)]
    struct Service {
        name: String,
        #[overlay(env = "WORKERS", default = "4")]
        workers: u32,
    }

    #[fixture]
    fn loader() -> Loader {
        Loader::with_env(MapEnv::new().with("WORKERS", "16"))
    }

    #[rstest]
    fn bytes_are_decoded_then_overlaid(loader: Loader) -> Result<()> {
        let svc: Service = loader
            .unmarshal_bytes(b"name: api\nworkers: 2\n")
            .map_err(|err| anyhow!(err.to_string()))?;
        ensure!(svc.name == "api", "document value");
        ensure!(svc.workers == 16, "env wins over document, got {}", svc.workers);
        Ok(())
    }

    #[rstest]
    fn files_are_read_through_directory_handles(loader: Loader) -> Result<()> {
        let tmp = tempfile::tempdir()?;
        std::fs::create_dir(tmp.path().join("conf"))?;
        std::fs::write(tmp.path().join("conf/service.yaml"), "name: worker\n")?;
        let utf8 = camino::Utf8Path::from_path(tmp.path())
            .ok_or_else(|| anyhow!("temporary directory is not UTF-8"))?;
        let dir = Dir::open_ambient_dir(utf8, ambient_authority())?;

        let svc: Service = loader
            .unmarshal_file_in(&dir, "conf/service.yaml")
            .map_err(|err| anyhow!(err.to_string()))?;
        ensure!(svc.name == "worker", "document value");
        ensure!(svc.workers == 16, "env applied");

        let missing = loader.unmarshal_file_in::<Service>(&dir, "conf/absent.yaml");
        ensure!(
            missing.as_ref().is_err_and(|err| err.is_file_error()),
            "expected a file error, got {missing:?}"
        );
        Ok(())
    }

    #[rstest]
    fn overlay_mutates_in_place() -> Result<()> {
        let loader = Loader::with_env(MapEnv::new());
        let mut svc = Service {
            name: String::from("prefilled"),
            workers: 0,
        };
        loader.overlay(&mut svc);
        ensure!(svc.name == "prefilled", "untouched field");
        ensure!(svc.workers == 4, "default applied, got {}", svc.workers);
        Ok(())
    }
}
