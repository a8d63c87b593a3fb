//! End-to-end conversions against a fake renderer executable.
//!
//! Each test writes its own shell script standing in for wkhtmltoimage, so
//! the full pipeline runs: command assembly, stdin piping, exit-code and
//! stderr classification, and output verification.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use htmlsnap::{Config, Converter, Error, Options};
use tempfile::TempDir;

fn script(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, body).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

fn config_for(renderer: &PathBuf) -> Config {
    Config::with_paths(renderer, None).unwrap()
}

#[test]
fn string_source_is_piped_with_charset_meta() {
    let dir = tempfile::tempdir().unwrap();
    // Echo stdin back on stdout.
    let renderer = script(&dir, "wkhtmltoimage", "#!/bin/sh\ncat\n");
    let bytes = Converter::from_string("<p>hi</p>")
        .config(config_for(&renderer))
        .to_image(None::<&str>)
        .unwrap()
        .unwrap();
    assert_eq!(bytes, b"<meta charset=\"UTF-8\"><p>hi</p>");
}

#[test]
fn reader_source_is_piped_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = script(&dir, "wkhtmltoimage", "#!/bin/sh\ncat\n");
    let bytes = Converter::from_reader(std::io::Cursor::new("<p>from reader</p>"))
        .config(config_for(&renderer))
        .to_image(None::<&str>)
        .unwrap()
        .unwrap();
    assert_eq!(bytes, b"<p>from reader</p>");
}

#[test]
fn successful_file_write_is_verified() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = script(
        &dir,
        "wkhtmltoimage",
        "#!/bin/sh\ncat >/dev/null\nfor a in \"$@\"; do out=\"$a\"; done\nprintf 'PNGDATA' > \"$out\"\n",
    );
    let dest = dir.path().join("out.png");
    let result = Converter::from_string("<p>hi</p>")
        .config(config_for(&renderer))
        .to_image(Some(&dest))
        .unwrap();
    assert!(result.is_none());
    assert_eq!(fs::read(&dest).unwrap(), b"PNGDATA");
}

#[test]
fn diagnostic_stderr_is_tolerated_on_success() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = script(
        &dir,
        "wkhtmltoimage",
        "#!/bin/sh\ncat >/dev/null\necho 'Loading page (1/2)' >&2\nprintf 'PNGDATA'\n",
    );
    let mut options = Options::new();
    options.flag("quiet");
    let bytes = Converter::from_string("<p>hi</p>")
        .config(config_for(&renderer))
        .options(options)
        .to_image(None::<&str>)
        .unwrap()
        .unwrap();
    assert_eq!(bytes, b"PNGDATA");
}

#[test]
fn stderr_error_text_is_classified_as_renderer_error() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = script(
        &dir,
        "wkhtmltoimage",
        "#!/bin/sh\ncat >/dev/null\necho 'Error: Failed to load about:blank' >&2\nexit 1\n",
    );
    let err = Converter::from_string("<p>hi</p>")
        .config(config_for(&renderer))
        .to_image(None::<&str>);
    match err {
        Err(Error::Renderer { stderr }) => assert!(stderr.contains("Failed to load")),
        other => panic!("expected Renderer error, got {other:?}"),
    }
}

#[test]
fn x_server_failure_is_classified_first() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = script(
        &dir,
        "wkhtmltoimage",
        "#!/bin/sh\ncat >/dev/null\necho 'Error: cannot connect to X server' >&2\nexit 1\n",
    );
    let err = Converter::from_string("<p>hi</p>")
        .config(config_for(&renderer))
        .to_image(None::<&str>);
    assert!(matches!(err, Err(Error::DisplayConnection { .. })));
}

#[test]
fn nonzero_exit_with_qxcb_failure_carries_an_xvfb_hint() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = script(
        &dir,
        "wkhtmltoimage",
        "#!/bin/sh\ncat >/dev/null\necho 'QXcbConnection: Could not connect to display' >&2\nexit 1\n",
    );
    let err = Converter::from_string("<p>hi</p>")
        .config(config_for(&renderer))
        .to_image(None::<&str>);
    match err {
        Err(Error::RendererExit { code, hint, .. }) => {
            assert_eq!(code, 1);
            assert!(hint.contains("xvfb"));
        }
        other => panic!("expected RendererExit, got {other:?}"),
    }
}

#[test]
fn nonzero_exit_without_display_hint() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = script(
        &dir,
        "wkhtmltoimage",
        "#!/bin/sh\ncat >/dev/null\necho 'something broke' >&2\nexit 2\n",
    );
    let err = Converter::from_string("<p>hi</p>")
        .config(config_for(&renderer))
        .to_image(None::<&str>);
    match err {
        Err(Error::RendererExit { code, hint, .. }) => {
            assert_eq!(code, 2);
            assert!(hint.is_empty());
        }
        other => panic!("expected RendererExit, got {other:?}"),
    }
}

#[test]
fn empty_output_file_fails_verification() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = script(
        &dir,
        "wkhtmltoimage",
        "#!/bin/sh\ncat >/dev/null\nfor a in \"$@\"; do out=\"$a\"; done\n: > \"$out\"\n",
    );
    let dest = dir.path().join("out.png");
    let mut options = Options::new();
    options.flag("quiet");
    let err = Converter::from_string("<p>hi</p>")
        .config(config_for(&renderer))
        .options(options)
        .to_image(Some(&dest));
    match err {
        Err(Error::EmptyOutput { command }) => {
            assert!(command.contains("wkhtmltoimage"));
            assert!(command.contains("out.png"));
        }
        other => panic!("expected EmptyOutput, got {other:?}"),
    }
}

#[test]
fn xvfb_option_runs_through_the_display_helper() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = script(&dir, "wkhtmltoimage", "#!/bin/sh\ncat\n");
    // The helper drops the auto-server-number flag and execs the real
    // command, like xvfb-run would.
    let xvfb = script(
        &dir,
        "xvfb-run",
        "#!/bin/sh\nif [ \"$1\" = \"-a\" ]; then shift; fi\nexec \"$@\"\n",
    );
    let config = Config::with_paths(&renderer, Some(xvfb)).unwrap();
    let mut options = Options::new();
    options.flag("xvfb");
    let bytes = Converter::from_string("<p>hi</p>")
        .config(config)
        .options(options)
        .to_image(None::<&str>)
        .unwrap()
        .unwrap();
    assert_eq!(bytes, b"<meta charset=\"UTF-8\"><p>hi</p>");
}
