// Command-line front end for the WordPress to Portable Text converter.
//
// Reads HTML (or a post record) from a file or stdin and prints Portable
// Text JSON on stdout. Logs go to stderr.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wp_portable_text::migration::{
    build_document, check_fragment_size, read_fragment, read_fragment_file,
};
use wp_portable_text::{ConversionConfig, Converter, PostRecord};

#[derive(Parser)]
#[command(
    name = "wp-portable-text",
    version,
    about = "Convert WordPress post HTML into Sanity Portable Text"
)]
struct Cli {
    /// JSON config file (key scheme, category map, limits)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Log conversion decisions (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert an HTML fragment into a Portable Text block array
    Convert(ConvertArgs),

    /// Assemble a post document from a post record JSON file
    Document(DocumentArgs),
}

#[derive(clap::Args)]
struct ConvertArgs {
    /// HTML file to convert; reads stdin when omitted or `-`
    input: Option<PathBuf>,
}

#[derive(clap::Args)]
struct DocumentArgs {
    /// Post record JSON file
    input: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => ConversionConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ConversionConfig::default(),
    };

    let output = match &cli.command {
        Command::Convert(args) => run_convert(args, &config, cli.pretty)?,
        Command::Document(args) => run_document(args, &config, cli.pretty)?,
    };

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{output}").context("Failed to write output")?;
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new(default_level)
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();
}

fn run_convert(args: &ConvertArgs, config: &ConversionConfig, pretty: bool) -> Result<String> {
    let limit = config.max_input_bytes();
    let html = match args.input.as_deref() {
        Some(path) if path.as_os_str() != "-" => read_fragment_file(path, limit)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        _ => read_fragment(io::stdin().lock(), limit).context("Failed to read stdin")?,
    };

    let blocks = Converter::from_config(config).convert(&html);
    tracing::info!(blocks = blocks.len(), "converted fragment");
    to_json(&blocks, pretty)
}

fn run_document(args: &DocumentArgs, config: &ConversionConfig, pretty: bool) -> Result<String> {
    let raw = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let post = PostRecord::from_json_str(&raw)
        .with_context(|| format!("Invalid post record in {}", args.input.display()))?;

    check_fragment_size(&post.content, config.max_input_bytes())
        .with_context(|| format!("Post {:?} is too large", post.slug))?;
    let body = Converter::from_config(config).convert(&post.content);
    let document = build_document(&post, body, config, chrono::Utc::now())
        .with_context(|| format!("Failed to assemble post {:?}", post.slug))?;

    let pending = document.unresolved_images().count();
    if pending > 0 || post.featured_image_url.is_some() {
        tracing::info!(
            inline = pending,
            featured = post.featured_image_url.is_some(),
            "images left unresolved; upload them to attach assets"
        );
    }
    to_json(&document, pretty)
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.context("Failed to serialize output")
}
