use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;

use htmlsnap::{Config, Converter, Locator, Options, PathLocator, RENDERER_NAME};

/// Convert HTML to an image with wkhtmltoimage
#[derive(Parser, Debug)]
#[command(name = "htmlsnap", version, about)]
struct Cli {
    /// URLs or HTML file paths; a single `-` reads HTML from stdin
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Output image path; `-` writes the image to stdout
    #[arg(short, long, default_value = "-")]
    output: String,

    /// Renderer option, KEY or KEY=VALUE; repeatable
    #[arg(short = 'O', long = "option", value_name = "KEY[=VALUE]")]
    options: Vec<String>,

    /// Renderer options as a JSON object; repeatable flags take a list of
    /// two-element lists, e.g. '{"cookies": [["name", "value"]]}'
    #[arg(long, value_name = "JSON")]
    options_json: Option<String>,

    /// TOC option, KEY or KEY=VALUE; repeatable. Attaches a toc block
    #[arg(long = "toc", value_name = "KEY[=VALUE]")]
    toc: Vec<String>,

    /// Attach a toc block even without toc options
    #[arg(long)]
    with_toc: bool,

    /// Cover page path or URL
    #[arg(long)]
    cover: Option<String>,

    /// Emit the cover block before the toc block
    #[arg(long)]
    cover_first: bool,

    /// Stylesheet to inject into the source; repeatable
    #[arg(long)]
    css: Vec<PathBuf>,

    /// Path to the wkhtmltoimage binary (default: found on PATH)
    #[arg(long)]
    renderer: Option<PathBuf>,

    /// Path to the xvfb-run helper (default: found on PATH)
    #[arg(long)]
    xvfb_run: Option<PathBuf>,

    /// Prefix for in-document meta-tag options
    #[arg(long, default_value = htmlsnap::DEFAULT_META_TAG_PREFIX)]
    meta_tag_prefix: String,

    /// Print the assembled command instead of running it
    #[arg(long)]
    show_command: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = build_config(&cli)?;
    let converter = build_converter(&cli)?
        .config(config)
        .cover_first(cli.cover_first);
    let converter = cli
        .css
        .iter()
        .fold(converter, |c, path| c.css(path.clone()));
    let converter = match &cli.cover {
        Some(cover) => converter.cover(cover.clone()),
        None => converter,
    };
    let converter = converter.options(parse_options(&cli)?);
    let converter = match parse_toc(&cli)? {
        Some(toc) => converter.toc(toc),
        None => converter,
    };

    let dest = (cli.output != "-").then_some(cli.output.as_str());

    if cli.show_command {
        let argv = converter.command(dest)?;
        println!("{}", argv.join(" "));
        return Ok(());
    }

    match converter.to_image(dest)? {
        Some(bytes) => io::stdout().write_all(&bytes)?,
        None => log::info!("wrote {}", cli.output),
    }
    Ok(())
}

fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let config = match (&cli.renderer, &cli.xvfb_run) {
        (None, None) => Config::new()?,
        (renderer, xvfb) => {
            let renderer = match renderer {
                Some(path) => path.clone(),
                None => PathLocator
                    .locate(RENDERER_NAME)
                    .context("no wkhtmltoimage executable found on PATH")?,
            };
            Config::with_paths(renderer, xvfb.clone())?
        }
    };
    Ok(config.meta_tag_prefix(cli.meta_tag_prefix.clone()))
}

/// Classify the positional inputs: a lone `-` reads from stdin, anything
/// with a URL scheme is fetched by the renderer, the rest are local files.
fn build_converter(cli: &Cli) -> anyhow::Result<Converter> {
    let inputs = &cli.inputs;
    if inputs.len() == 1 {
        let input = &inputs[0];
        if input == "-" {
            let mut html = String::new();
            io::stdin().read_to_string(&mut html)?;
            return Ok(Converter::from_string(html));
        }
        if looks_like_url(input) {
            return Ok(Converter::from_url(input));
        }
        return Ok(Converter::from_file(input)?);
    }

    if inputs.iter().any(|i| i == "-") {
        bail!("stdin input cannot be combined with other inputs");
    }
    let urls = inputs.iter().filter(|i| looks_like_url(i)).count();
    if urls == inputs.len() {
        Ok(Converter::from_urls(inputs.clone()))
    } else if urls == 0 {
        Ok(Converter::from_files(inputs.clone())?)
    } else {
        bail!("cannot mix URL and file inputs in one conversion");
    }
}

fn looks_like_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://") || input.starts_with("file://")
}

fn parse_options(cli: &Cli) -> anyhow::Result<Options> {
    let mut options = match &cli.options_json {
        Some(json) => {
            serde_json::from_str::<Options>(json).context("invalid --options-json value")?
        }
        None => Options::new(),
    };
    for spec in &cli.options {
        set_key_value(&mut options, spec);
    }
    Ok(options)
}

fn parse_toc(cli: &Cli) -> anyhow::Result<Option<Options>> {
    if cli.toc.is_empty() && !cli.with_toc {
        return Ok(None);
    }
    let mut toc = Options::new();
    for spec in &cli.toc {
        set_key_value(&mut toc, spec);
    }
    Ok(Some(toc))
}

fn set_key_value(options: &mut Options, spec: &str) {
    match spec.split_once('=') {
        Some((key, value)) => options.set(key, value),
        None => options.flag(spec),
    };
}
