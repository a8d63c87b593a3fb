//! Input sources for a conversion.
//!
//! A source is classified once, at construction. File sources are validated
//! eagerly so a missing path fails before any command is built.

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// The HTML input of a conversion.
///
/// String and reader sources are piped to the renderer on stdin (the command
/// line carries a `-` placeholder for them); URL and file sources are passed
/// as command-line arguments.
pub enum Source {
    /// A single URL fetched by the renderer itself
    Url(String),
    /// Several URLs, rendered in order
    Urls(Vec<String>),
    /// A single local HTML file
    File(PathBuf),
    /// Several local HTML files, rendered in order
    Files(Vec<PathBuf>),
    /// Literal HTML text
    Html(String),
    /// An open reader producing HTML text
    Reader(Box<dyn Read + Send>),
}

impl Source {
    pub fn url(url: impl Into<String>) -> Self {
        Source::Url(url.into())
    }

    pub fn urls(urls: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Source::Urls(urls.into_iter().map(Into::into).collect())
    }

    /// A single file source. Fails if the path does not exist.
    pub fn file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        check_exists(&path)?;
        Ok(Source::File(path))
    }

    /// A multi-file source. Every path must exist.
    pub fn files(paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Result<Self> {
        let paths: Vec<PathBuf> = paths.into_iter().map(Into::into).collect();
        for path in &paths {
            check_exists(path)?;
        }
        Ok(Source::Files(paths))
    }

    pub fn html(html: impl Into<String>) -> Self {
        Source::Html(html.into())
    }

    pub fn reader(reader: impl Read + Send + 'static) -> Self {
        Source::Reader(Box::new(reader))
    }

    /// Whether the content is delivered on the renderer's stdin.
    pub fn is_piped(&self) -> bool {
        matches!(self, Source::Html(_) | Source::Reader(_))
    }

    /// Command-line tokens identifying this source: `-` for piped sources,
    /// otherwise each path/URL in order.
    pub(crate) fn tokens(&self) -> Vec<String> {
        match self {
            Source::Url(url) => vec![url.clone()],
            Source::Urls(urls) => urls.clone(),
            Source::File(path) => vec![path.display().to_string()],
            Source::Files(paths) => paths.iter().map(|p| p.display().to_string()).collect(),
            Source::Html(_) | Source::Reader(_) => vec!["-".to_string()],
        }
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Url(url) => f.debug_tuple("Url").field(url).finish(),
            Source::Urls(urls) => f.debug_tuple("Urls").field(urls).finish(),
            Source::File(path) => f.debug_tuple("File").field(path).finish(),
            Source::Files(paths) => f.debug_tuple("Files").field(paths).finish(),
            Source::Html(html) => f.debug_tuple("Html").field(&html.len()).finish(),
            Source::Reader(_) => f.write_str("Reader(..)"),
        }
    }
}

fn check_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(Error::MissingSourceFile(path.to_path_buf()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_fails_at_construction() {
        match Source::file("no/such/file.html") {
            Err(Error::MissingSourceFile(path)) => {
                assert_eq!(path, PathBuf::from("no/such/file.html"));
            }
            other => panic!("expected MissingSourceFile, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_in_list_fails_at_construction() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("page.html");
        std::fs::File::create(&good)
            .unwrap()
            .write_all(b"<p>hi</p>")
            .unwrap();
        let err = Source::files([good.clone(), dir.path().join("gone.html")]);
        assert!(matches!(err, Err(Error::MissingSourceFile(_))));
    }

    #[test]
    fn piped_sources_emit_a_dash() {
        assert_eq!(Source::html("<p>hi</p>").tokens(), vec!["-"]);
        assert_eq!(
            Source::reader(std::io::Cursor::new("<p>hi</p>")).tokens(),
            vec!["-"]
        );
    }

    #[test]
    fn url_list_keeps_order() {
        let source = Source::urls(["http://ya.ru", "http://google.com"]);
        assert_eq!(source.tokens(), vec!["http://ya.ru", "http://google.com"]);
    }
}
