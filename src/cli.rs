use crate::config::load_config;
use crate::layout::{Anchor, compute_layout};
use crate::layout_dump::{layout_to_json, write_layout_dump};
use crate::parser::parse_records;
use crate::render::{render_svg_highlighted, write_output_svg};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "histl",
    version,
    about = "Lay out and render a portfolio history timeline"
)]
pub struct Args {
    /// Portfolio document (.json/.json5) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for SVG and JSON if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON/JSON5 file (theme, timeline and render overrides)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Month treated as "now" for ongoing entries (YYYY-MM)
    #[arg(long = "now")]
    pub now: Option<Anchor>,

    /// Vertical pixels per month
    #[arg(long = "px-per-month")]
    pub px_per_month: Option<f32>,

    /// Panel width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Record id to highlight; other bars are dimmed
    #[arg(long = "highlight")]
    pub highlight: Option<String>,

    /// Debug logging
    #[arg(short = 'v', long = "verbose", conflicts_with = "quiet")]
    pub verbose: bool,

    /// Errors only
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.quiet, args.verbose)?;

    let mut config = load_config(args.config.as_deref())?;
    if let Some(px) = args.px_per_month.filter(|px| px.is_finite() && *px > 0.0) {
        config.layout.px_per_month = px;
    }
    if let Some(width) = args.width.filter(|w| w.is_finite() && *w > 0.0) {
        config.render.width = width;
    }

    let input = read_input(args.input.as_deref())?;
    let records = parse_records(&input).context("failed to read portfolio document")?;
    let now = args.now.unwrap_or_else(Anchor::now);
    let layout = compute_layout(&records, &config.layout, now);

    match args.output_format {
        OutputFormat::Svg => {
            let svg = render_svg_highlighted(
                &layout,
                &config.theme,
                &config.layout,
                &config.render,
                args.highlight.as_deref(),
            );
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Json => match args.output.as_deref() {
            Some(path) => write_layout_dump(path, &layout)?,
            None => println!("{}", layout_to_json(&layout)?),
        },
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            let svg = render_svg_highlighted(
                &layout,
                &config.theme,
                &config.layout,
                &config.render,
                args.highlight.as_deref(),
            );
            write_png(&svg, &output, &config.render)?;
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, render: &crate::config::RenderConfig) -> Result<()> {
    crate::render::write_output_png(svg, output, render)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _render: &crate::config::RenderConfig) -> Result<()> {
    Err(anyhow::anyhow!(
        "PNG output requires the 'png' feature"
    ))
}

fn init_tracing(quiet: bool, verbose: bool) -> Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("HISTL_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()));
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!(
        "Output path required for {} output",
        ext
    ))
}
