//! Injection of external stylesheets into the in-memory source.
//!
//! The renderer applies stylesheets unreliably when they are passed as
//! files, so the content is merged into the document itself before the
//! conversion: file sources are loaded into memory and become string
//! sources, files on disk are never modified.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use crate::{Error, Result, Source};

fn style_tag(css: &str) -> String {
    format!("<style>{css}</style>")
}

/// Rewrite `source` with the concatenated contents of `paths` injected as a
/// `<style>` block.
///
/// Only single-file, string, and reader sources are supported; URL and
/// multi-file sources fail with [`Error::Source`]. The block is inserted
/// immediately before `</head>` when the document has one, otherwise it is
/// prepended to the whole content.
pub(crate) fn inject(source: Source, paths: &[PathBuf]) -> Result<Source> {
    let content = match source {
        Source::Url(_) | Source::Urls(_) | Source::Files(_) => {
            return Err(Error::Source(
                "CSS files can be added only to a single file or string".to_string(),
            ));
        }
        Source::File(path) => fs::read_to_string(path)?,
        Source::Html(html) => html,
        Source::Reader(mut reader) => {
            let mut buf = String::new();
            reader.read_to_string(&mut buf)?;
            buf
        }
    };

    let mut css = Vec::new();
    for path in paths {
        css.push(fs::read_to_string(path)?);
    }
    let block = style_tag(&css.join("\n"));

    let injected = if content.contains("</head>") {
        content.replace("</head>", &format!("{block}</head>"))
    } else {
        format!("{block}{content}")
    };
    Ok(Source::Html(injected))
}
