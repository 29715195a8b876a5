//! tc - clipboard text chunker
//!
//! CLI entry point: load text from a file or the clipboard and run the
//! interactive chunk loop.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::{debug, info};

use textchunker::cli::Cli;
use textchunker::config::Config;
use textchunker::{ChunkEngine, ChunkError, Repl, ReplOptions, Session, SystemClipboard, read_text};

fn parse_level(level: Option<&str>) -> tracing::Level {
    match level.map(|s| s.to_uppercase()).as_deref() {
        Some("TRACE") => tracing::Level::TRACE,
        Some("DEBUG") => tracing::Level::DEBUG,
        Some("WARN") | Some("WARNING") => tracing::Level::WARN,
        Some("ERROR") => tracing::Level::ERROR,
        Some("INFO") | None => tracing::Level::INFO,
        Some(other) => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", other);
            tracing::Level::INFO
        }
    }
}

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("textchunker")
        .join("logs");
    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > INFO
    let level = parse_level(cli_log_level.or(config_log_level));
    let log_file = fs::File::create(log_dir.join("textchunker.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = cli.apply(Config::load(cli.config.as_ref()).context("Failed to load configuration")?);
    config.validate()?;
    debug!(?config, "main: effective configuration");

    let mut clipboard = SystemClipboard::new(config.clipboard.timeout(), config.clipboard.write_timeout());
    let text = match read_text(cli.file.as_deref(), &mut clipboard) {
        Ok(text) => text,
        Err(e @ ChunkError::EmptyInput) => {
            eprintln!("{} {}", "Error:".red(), e);
            std::process::exit(1);
        }
        Err(e) => return Err(e).context("Failed to load text"),
    };

    let mut session = Session::new(ChunkEngine::new(config.chunk_size, config.tail_mode)?);
    session.load(text)?;

    println!("{}", "Text Chunker".bright_cyan().bold());
    println!(
        "Mode: {}, chunk size: {} bytes, dedup: {}",
        if config.tail_mode { "tail" } else { "head" },
        config.chunk_size,
        if config.dedup { "on" } else { "off" }
    );
    println!("Type {} for help, {} to quit", "?".yellow(), "q".yellow());
    println!();

    let mut repl = Repl::new(session, clipboard, std::io::stdout(), ReplOptions::from(&config));
    repl.run()
}
