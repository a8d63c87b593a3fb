//! htmlsnap
//!
//! A thin binding around the `wkhtmltoimage` renderer that converts HTML
//! from a URL, file, string, or reader into an image. The crate locates the
//! renderer (and the `xvfb-run` virtual-display helper), translates an
//! ordered option mapping into command-line flags, pipes string input on
//! stdin, and turns exit codes and stderr text into structured errors.
//!
//! # Example
//!
//! ```no_run
//! use htmlsnap::{Converter, Options};
//!
//! # fn main() -> htmlsnap::Result<()> {
//! let mut options = Options::new();
//! options.set("format", "png");
//! options.set("width", 1024i64);
//!
//! Converter::from_url("https://example.com")
//!     .options(options)
//!     .to_image(Some("example.png"))?;
//! # Ok(())
//! # }
//! ```
//!
//! Options pass through verbatim: any key becomes a `--key` flag, repeatable
//! flags (cookies, custom headers) take pairs, and the special `xvfb` key
//! wraps the invocation in the virtual-display helper. String sources may
//! also carry options inside the document via
//! `<meta name="imgkit-format" content="jpg">` tags.

pub mod error;
pub use error::{Error, Result};

mod config;
pub use config::{Config, Locator, PathLocator, DEFAULT_META_TAG_PREFIX, RENDERER_NAME, XVFB_NAME};

mod options;
pub use options::{OptionValue, Options};

mod source;
pub use source::Source;

mod command;
pub use command::Converter;

mod css;
mod meta;
mod runner;

use std::path::Path;

/// Convert a URL to an image file.
pub fn from_url(url: &str, dest: impl AsRef<Path>) -> Result<()> {
    Converter::from_url(url).to_image(Some(dest)).map(|_| ())
}

/// Convert an HTML file to an image file.
pub fn from_file(path: impl Into<std::path::PathBuf>, dest: impl AsRef<Path>) -> Result<()> {
    Converter::from_file(path)?.to_image(Some(dest)).map(|_| ())
}

/// Convert literal HTML text to an image file.
pub fn from_string(html: &str, dest: impl AsRef<Path>) -> Result<()> {
    Converter::from_string(html).to_image(Some(dest)).map(|_| ())
}
