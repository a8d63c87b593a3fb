//! Error types for HTML-to-image conversion

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for conversion operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or running a conversion
#[derive(Error, Debug)]
pub enum Error {
    /// The renderer or virtual-display helper could not be located or read
    #[error(
        "no {name} executable found: \"{detail}\"\n\
         If this file exists please check that this process can read it.\n\
         Otherwise please install {name} - http://wkhtmltopdf.org"
    )]
    ExecutableNotFound { name: &'static str, detail: String },

    /// A file source points at a path that does not exist
    #[error("no such file: {}", .0.display())]
    MissingSourceFile(PathBuf),

    /// Invalid source/feature combination (e.g. CSS injection into a URL)
    #[error("{0}")]
    Source(String),

    /// A repeatable option value was not a pair of two non-empty strings
    #[error("value for option '{option}' must be a pair of two non-empty strings")]
    InvalidOptionValue { option: String },

    /// The renderer could not connect to an X server
    #[error(
        "{stderr}\n\
         You will need to run wkhtmltoimage within a \"virtual\" X server.\n\
         Go to the link below for more information\n\
         http://wkhtmltopdf.org"
    )]
    DisplayConnection { stderr: String },

    /// The renderer reported an error on stderr
    #[error("wkhtmltoimage reported an error:\n{stderr}")]
    Renderer { stderr: String },

    /// The renderer exited with a non-zero status
    #[error("wkhtmltoimage exited with non-zero code {code}. error:\n{stderr}\n\n{hint}")]
    RendererExit {
        code: i32,
        stderr: String,
        hint: String,
    },

    /// The renderer reported success but the output file is empty or unreadable
    #[error(
        "command failed: {command}\n\
         Check wkhtmltoimage output without 'quiet' option"
    )]
    EmptyOutput { command: String },

    /// Underlying I/O failure (spawning the renderer, reading stylesheets, ...)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
