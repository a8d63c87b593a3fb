//! The conversion builder and command-vector assembly.
//!
//! Token order is a hard contract with the renderer: optional
//! virtual-display wrapper, renderer binary, global options, cover (when
//! cover-first), toc block, cover (otherwise), source token(s), destination
//! token. Tests assert exact slices of this vector.

use std::mem;
use std::path::{Path, PathBuf};

use log::debug;

use crate::{css, meta, runner, Config, Options, Result, Source};

/// Sentinel option that requests virtual-display wrapping.
const XVFB_SENTINEL: &str = "--xvfb";

/// A single HTML-to-image conversion in the making.
///
/// Built from a [`Source`], optionally decorated with renderer options, a
/// TOC block, a cover page, and stylesheets, then executed with
/// [`Converter::to_image`]. Nothing outlives the call: each conversion
/// launches exactly one renderer subprocess.
#[derive(Debug)]
pub struct Converter {
    source: Source,
    config: Option<Config>,
    options: Options,
    toc: Option<Options>,
    cover: Option<String>,
    cover_first: bool,
    css: Vec<PathBuf>,
}

impl Converter {
    fn with_source(source: Source) -> Self {
        Self {
            source,
            config: None,
            options: Options::new(),
            toc: None,
            cover: None,
            cover_first: false,
            css: Vec::new(),
        }
    }

    pub fn from_url(url: impl Into<String>) -> Self {
        Self::with_source(Source::url(url))
    }

    pub fn from_urls(urls: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::with_source(Source::urls(urls))
    }

    /// Fails with [`crate::Error::MissingSourceFile`] when the path does not
    /// exist.
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self::with_source(Source::file(path)?))
    }

    pub fn from_files(paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Result<Self> {
        Ok(Self::with_source(Source::files(paths)?))
    }

    pub fn from_string(html: impl Into<String>) -> Self {
        Self::with_source(Source::html(html))
    }

    pub fn from_reader(reader: impl std::io::Read + Send + 'static) -> Self {
        Self::with_source(Source::reader(reader))
    }

    /// Use an explicit configuration instead of resolving executables on
    /// `PATH` at conversion time.
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Global and page options, passed through as `--key value` flags.
    pub fn options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Attach a table-of-contents block. An empty mapping still emits the
    /// `toc` token.
    pub fn toc(mut self, toc: Options) -> Self {
        self.toc = Some(toc);
        self
    }

    /// Attach a cover page (path or URL).
    pub fn cover(mut self, cover: impl Into<String>) -> Self {
        self.cover = Some(cover.into());
        self
    }

    /// Emit the cover block before the TOC block instead of after it.
    pub fn cover_first(mut self, cover_first: bool) -> Self {
        self.cover_first = cover_first;
        self
    }

    /// Inject a stylesheet into the source before conversion. May be called
    /// repeatedly; contents are concatenated in call order.
    pub fn css(mut self, path: impl Into<PathBuf>) -> Self {
        self.css.push(path.into());
        self
    }

    /// The full command vector for `dest` without launching anything.
    pub fn command<P: AsRef<Path>>(mut self, dest: Option<P>) -> Result<Vec<String>> {
        let dest = dest.map(|p| p.as_ref().display().to_string());
        self.prepare(dest.as_deref())
    }

    /// Run the conversion.
    ///
    /// With `dest` given the image is written to that path and `None` is
    /// returned after the output has been verified to be non-empty; without
    /// it the renderer writes to stdout and the captured bytes are returned.
    pub fn to_image<P: AsRef<Path>>(mut self, dest: Option<P>) -> Result<Option<Vec<u8>>> {
        let dest = dest.map(|p| p.as_ref().display().to_string());
        let argv = self.prepare(dest.as_deref())?;
        runner::run(&argv, self.source, dest.as_deref())
    }

    /// Resolve the configuration, fold in meta-tag options, apply CSS
    /// injection, and assemble the token vector.
    fn prepare(&mut self, dest: Option<&str>) -> Result<Vec<String>> {
        if self.config.is_none() {
            self.config = Some(Config::new()?);
        }
        let config = self.config.as_ref().expect("config resolved above");

        // Options found in the document itself sit under the caller's:
        // the caller overrides by key, meta keys keep first-seen order.
        if let Source::Html(html) = &self.source {
            let mut merged = meta::options_from_meta(html, config.prefix());
            if !merged.is_empty() {
                merged.merge(mem::take(&mut self.options));
                self.options = merged;
            }
        }

        if !self.css.is_empty() {
            let source = mem::replace(&mut self.source, Source::Html(String::new()));
            self.source = css::inject(source, &self.css)?;
        }

        let mut tokens = self.options.to_tokens()?;
        let xvfb = match tokens.iter().position(|t| t == XVFB_SENTINEL) {
            Some(idx) => {
                tokens.remove(idx);
                true
            }
            None => false,
        };

        let mut argv = Vec::new();
        if xvfb {
            argv.push(config.require_xvfb()?.display().to_string());
            // Auto server number, so concurrent runs do not fight over a
            // display.
            argv.push("-a".to_string());
        }
        argv.push(config.renderer().display().to_string());
        argv.extend(tokens);

        if let (Some(cover), true) = (&self.cover, self.cover_first) {
            argv.push("cover".to_string());
            argv.push(cover.clone());
        }
        if let Some(toc) = &self.toc {
            argv.push("toc".to_string());
            argv.extend(toc.to_tokens()?);
        }
        if let (Some(cover), false) = (&self.cover, self.cover_first) {
            argv.push("cover".to_string());
            argv.push(cover.clone());
        }

        argv.extend(self.source.tokens());
        argv.push(dest.unwrap_or("-").to_string());

        debug!("assembled command: {argv:?}");
        Ok(argv)
    }
}
