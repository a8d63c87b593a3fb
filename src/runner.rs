//! Subprocess launch and result classification.

use std::fs::File;
use std::io::{self, Read, Write};
use std::process::{Command, Stdio};
use std::thread;

use log::debug;

use crate::{Error, Result, Source};

/// Charset tag prepended to piped string sources so the renderer decodes
/// them as UTF-8.
const CHARSET_META: &str = "<meta charset=\"UTF-8\">";

/// Launch `argv` and classify the outcome.
///
/// String and reader sources are written to the child's stdin before output
/// is drained; stdout and stderr are both collected in full, no streaming.
///
/// Classification follows the renderer's conventions: a "cannot connect to X
/// server" message beats everything, then any stderr containing `Error`,
/// then a non-zero exit code. The bare `Error` substring match is knowingly
/// imprecise (a benign warning containing the word would be misclassified)
/// but matches the renderer's output contract.
pub(crate) fn run(argv: &[String], source: Source, dest: Option<&str>) -> Result<Option<Vec<u8>>> {
    let (program, args) = argv.split_first().expect("command vector is never empty");

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let payload = stdin_payload(source)?;
    let writer = match (payload, child.stdin.take()) {
        (Some(bytes), Some(mut stdin)) => Some(thread::spawn(move || {
            // The child may exit without reading everything; a broken pipe
            // here is not an error.
            let _ = stdin.write_all(&bytes);
        })),
        (_, stdin) => {
            drop(stdin);
            None
        }
    };

    let output = child.wait_with_output()?;
    if let Some(handle) = writer {
        let _ = handle.join();
    }

    // The renderer writes its diagnostics to one stream depending on mode.
    let stderr = if output.stderr.is_empty() {
        String::from_utf8_lossy(&output.stdout).into_owned()
    } else {
        String::from_utf8_lossy(&output.stderr).into_owned()
    };
    let code = output.status.code().unwrap_or(-1);
    debug!("renderer exited with code {code}");

    if stderr.contains("cannot connect to X server") {
        return Err(Error::DisplayConnection { stderr });
    }
    if stderr.contains("Error") {
        return Err(Error::Renderer { stderr });
    }
    if code != 0 {
        let hint = if stderr.contains("QXcbConnection") {
            "You need to install xvfb (sudo apt-get install xvfb, \
             yum install xorg-x11-server-Xvfb, etc), then enable the \"xvfb\" option."
                .to_string()
        } else {
            String::new()
        };
        return Err(Error::RendererExit { code, stderr, hint });
    }

    // Diagnostic passthrough: on success the collected renderer output is
    // forwarded to the caller's stdout unless the conversion was quiet.
    if !argv.iter().any(|t| t == "--quiet") {
        let _ = io::stdout().write_all(stderr.as_bytes());
    }

    match dest {
        None => Ok(Some(output.stdout)),
        Some(path) => {
            verify_output(path, argv)?;
            Ok(None)
        }
    }
}

/// Bytes to pipe on the child's stdin, if the source is piped at all.
fn stdin_payload(source: Source) -> Result<Option<Vec<u8>>> {
    match source {
        Source::Html(html) => Ok(Some(format!("{CHARSET_META}{html}").into_bytes())),
        Source::Reader(mut reader) => {
            let mut buf = String::new();
            reader.read_to_string(&mut buf)?;
            Ok(Some(buf.into_bytes()))
        }
        _ => Ok(None),
    }
}

/// A zero exit code does not guarantee the renderer produced anything;
/// re-open the destination and check its first bytes.
fn verify_output(path: &str, argv: &[String]) -> Result<()> {
    let empty_output = || Error::EmptyOutput {
        command: argv.join(" "),
    };
    let mut file = File::open(path).map_err(|_| empty_output())?;
    let mut head = [0u8; 4];
    let read = file.read(&mut head).map_err(|_| empty_output())?;
    if read == 0 {
        return Err(empty_output());
    }
    Ok(())
}
