//! CLI entrypoint for colloquy
//!
//! Wires the layers together with dependency injection: config and panel
//! loading, the HTTP completion factory, the discussion engine, and the
//! console renderer consuming the event stream.

mod panel;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use colloquy_application::RunDiscussionUseCase;
use colloquy_domain::{DiscussionConfig, ModelId};
use colloquy_infrastructure::{ConfigLoader, HttpCompletionFactory, JsonlEventLogger};
use render::ConsoleRenderer;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Event channel capacity; backpressure paces the engine against slow consumers
const EVENT_BUFFER: usize = 64;

#[derive(Parser, Debug)]
#[command(name = "colloquy", version, about = "Streaming multi-expert panel discussions")]
struct Cli {
    /// The discussion topic
    topic: String,

    /// Panel roster file (TOML); uses the built-in panel when omitted
    #[arg(short, long)]
    panel: Option<PathBuf>,

    /// Number of discussion rounds
    #[arg(short, long)]
    rounds: Option<u32>,

    /// Target language code for generated text
    #[arg(short, long)]
    language: Option<String>,

    /// Fallback model for experts without an override
    #[arg(short, long)]
    model: Option<String>,

    /// Emit moderator prompts after each expert turn
    #[arg(long)]
    moderator: bool,

    /// Explicit config file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip config files and use built-in defaults
    #[arg(long)]
    no_config: bool,

    /// Append every discussion event to this JSONL file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Suppress banners and moderator prompts (tokens still stream)
    #[arg(short, long)]
    quiet: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow::anyhow!(e))?
    };

    // Roster
    let experts = match &cli.panel {
        Some(path) => panel::load_panel(path)?,
        None => panel::default_panel(),
    };

    // Discussion configuration: CLI flags override file config
    let fallback_model = ModelId::new(
        cli.model
            .clone()
            .unwrap_or_else(|| file_config.discussion.model.clone()),
    );
    let config = DiscussionConfig::new(cli.topic.clone(), experts, fallback_model)?
        .with_language(cli.language.unwrap_or(file_config.discussion.language))
        .with_moderator(cli.moderator || file_config.discussion.moderator)
        .with_rounds(cli.rounds.unwrap_or(file_config.discussion.rounds))?;

    info!(
        discussion_id = %config.discussion_id,
        experts = config.experts.len(),
        rounds = config.total_rounds,
        "Configured discussion"
    );

    // === Dependency injection ===
    let factory = Arc::new(
        HttpCompletionFactory::new(file_config.provider.to_settings())
            .context("completion provider setup failed")?,
    );
    let engine = RunDiscussionUseCase::new(factory, config)?;

    let event_log = cli.log_file.as_ref().and_then(|p| JsonlEventLogger::new(p));
    let renderer = ConsoleRenderer::new(cli.quiet);

    if !cli.quiet {
        println!("{}", cli.topic);
    }

    let (tx, mut rx) = mpsc::channel(EVENT_BUFFER);
    let run = tokio::spawn(engine.run(tx));

    while let Some(event) = rx.recv().await {
        if let Some(log) = &event_log {
            log.log(&event);
        }
        renderer.render(&event);
    }

    run.await??;
    Ok(())
}
