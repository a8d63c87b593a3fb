//! Conversion configuration: paths to the external executables and the
//! meta-tag prefix recognized inside HTML documents.

use std::fs::File;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Name of the renderer binary looked up on `PATH`.
pub const RENDERER_NAME: &str = "wkhtmltoimage";

/// Name of the virtual-display helper looked up on `PATH`.
pub const XVFB_NAME: &str = "xvfb-run";

/// Default prefix for meta-tag options embedded in HTML documents.
pub const DEFAULT_META_TAG_PREFIX: &str = "imgkit-";

/// Resolves executable names to paths.
///
/// The default implementation consults the process environment's search path;
/// tests substitute fixed paths.
pub trait Locator {
    fn locate(&self, name: &str) -> Option<PathBuf>;
}

/// Locator backed by the `which` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct PathLocator;

impl Locator for PathLocator {
    fn locate(&self, name: &str) -> Option<PathBuf> {
        which::which(name).ok()
    }
}

/// Configuration for a conversion.
#[derive(Debug, Clone)]
pub struct Config {
    renderer: PathBuf,
    xvfb: Option<PathBuf>,
    meta_tag_prefix: String,
}

impl Config {
    /// Resolve both executables on `PATH`.
    ///
    /// Fails with [`Error::ExecutableNotFound`] when no readable renderer
    /// binary is found. The virtual-display helper is optional at this point;
    /// its absence only becomes an error when a conversion actually asks for
    /// the `xvfb` option.
    pub fn new() -> Result<Self> {
        Self::with_locator(&PathLocator)
    }

    /// Resolve executables through a caller-supplied [`Locator`].
    pub fn with_locator(locator: &dyn Locator) -> Result<Self> {
        let renderer = locator
            .locate(RENDERER_NAME)
            .ok_or_else(|| Error::ExecutableNotFound {
                name: RENDERER_NAME,
                detail: "command not found".to_string(),
            })?;
        check_readable(&renderer, RENDERER_NAME)?;
        let xvfb = locator.locate(XVFB_NAME);
        Ok(Self {
            renderer,
            xvfb,
            meta_tag_prefix: DEFAULT_META_TAG_PREFIX.to_string(),
        })
    }

    /// Use explicit executable paths instead of a lookup.
    ///
    /// The renderer path is checked for readability immediately; so is the
    /// helper path, when given.
    pub fn with_paths(
        renderer: impl Into<PathBuf>,
        xvfb: Option<PathBuf>,
    ) -> Result<Self> {
        let renderer = renderer.into();
        check_readable(&renderer, RENDERER_NAME)?;
        if let Some(path) = &xvfb {
            check_readable(path, XVFB_NAME)?;
        }
        Ok(Self {
            renderer,
            xvfb,
            meta_tag_prefix: DEFAULT_META_TAG_PREFIX.to_string(),
        })
    }

    /// Override the meta-tag prefix (default `imgkit-`).
    pub fn meta_tag_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.meta_tag_prefix = prefix.into();
        self
    }

    pub fn renderer(&self) -> &Path {
        &self.renderer
    }

    pub fn prefix(&self) -> &str {
        &self.meta_tag_prefix
    }

    /// Path to the virtual-display helper, required by the `xvfb` option.
    pub(crate) fn require_xvfb(&self) -> Result<&Path> {
        self.xvfb
            .as_deref()
            .ok_or_else(|| Error::ExecutableNotFound {
                name: XVFB_NAME,
                detail: "command not found".to_string(),
            })
    }
}

fn check_readable(path: &Path, name: &'static str) -> Result<()> {
    File::open(path).map_err(|_| Error::ExecutableNotFound {
        name,
        detail: path.display().to_string(),
    })?;
    Ok(())
}
