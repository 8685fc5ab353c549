//! Command-line Document Renderer
//!
//! Renders a stored LaraBuilder document through the core block library so
//! block authors can check their output without a running site.
//!
//! # Usage
//!
//! ```bash
//! # Page markup to stdout
//! cargo run --bin lb-render -- document.json
//!
//! # Personalized campaign email with a degradation report
//! cargo run --bin lb-render -- document.json --context campaign \
//!     --token first_name=Ada --token company=Acme --report
//! ```
//!
//! Logging follows `RUST_LOG` and defaults to `info`. Logs and the report go
//! to stderr so stdout stays pure markup.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use larabuilder_core::blocks::register_core_blocks;
use larabuilder_core::{
    BlockRegistry, Document, HookDispatcher, RenderConfig, RenderOptions, Renderer,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lb-render", version, about = "Render a LaraBuilder document")]
struct Cli {
    /// Document JSON file (object with `blocks`, or a bare block array)
    document: PathBuf,

    /// Output context: page, email or campaign
    #[arg(short, long, default_value = "page")]
    context: String,

    /// Renderer configuration JSON; missing fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Personalization token as key=value. Repeatable.
    #[arg(short, long = "token", value_parser = parse_token)]
    tokens: Vec<(String, String)>,

    /// Print degraded blocks to stderr as JSON
    #[arg(long)]
    report: bool,
}

fn parse_token(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err("token key cannot be empty".to_string());
    }
    Ok((key.to_string(), value.to_string()))
}

fn load_config(path: Option<&PathBuf>) -> Result<RenderConfig> {
    let config = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            RenderConfig::from_json_str(&raw)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => RenderConfig::default(),
    };
    config.validate().map_err(|e| anyhow!("invalid config: {e}"))?;
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    let raw = std::fs::read_to_string(&cli.document)
        .with_context(|| format!("reading document {}", cli.document.display()))?;
    let document = Document::from_json_str(&raw)
        .with_context(|| format!("parsing document {}", cli.document.display()))?;

    let mut registry = BlockRegistry::new();
    register_core_blocks(&mut registry)?;
    tracing::debug!(types = ?registry.block_types(), "Core blocks registered");

    // The config's hook_error_policy applies to every hook the renderer calls
    let renderer = Renderer::new(Arc::new(registry), Arc::new(HookDispatcher::new())).with_config(config);

    let options = cli
        .tokens
        .into_iter()
        .fold(RenderOptions::new(), |options, (key, value)| options.with_token(key, value));

    let output = renderer.render_with_report(&document, &cli.context, &options)?;
    println!("{}", output.html);

    if cli.report {
        eprintln!("{}", serde_json::to_string_pretty(&output.diagnostics)?);
    } else if !output.diagnostics.is_empty() {
        tracing::warn!(
            degraded = output.diagnostics.len(),
            "Some blocks fell back to placeholders (use --report for details)"
        );
    }

    Ok(())
}
