//! CLI argument parsing for textchunker

use clap::Parser;
use std::path::PathBuf;

use crate::config::{Config, Sink};

#[derive(Parser, Debug)]
#[command(name = "tc")]
#[command(author, version, about = "Split text into chunks and feed them through the clipboard", long_about = None)]
pub struct Cli {
    /// File to read (default: clipboard)
    pub file: Option<PathBuf>,

    /// Start at the end of the text and walk backwards
    #[arg(short, long)]
    pub tail: bool,

    /// Chunk size in bytes (default: 20000)
    #[arg(short = 's', long)]
    pub chunk_size: Option<usize>,

    /// Allow the same chunk content to be handed out more than once
    #[arg(long)]
    pub no_dedup: bool,

    /// Where to publish chunks
    #[arg(long, value_enum)]
    pub sink: Option<Sink>,

    /// Don't keep a temp-file copy of the text
    #[arg(long)]
    pub no_mirror: bool,

    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,
}

impl Cli {
    /// Overlay command-line flags on top of the loaded config
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(size) = self.chunk_size {
            config.chunk_size = size;
        }
        if self.tail {
            config.tail_mode = true;
        }
        if self.no_dedup {
            config.dedup = false;
        }
        if let Some(sink) = self.sink {
            config.sink = sink;
        }
        if self.no_mirror {
            config.mirror.enabled = false;
        }
        if self.log_level.is_some() {
            config.log_level = self.log_level.clone();
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from(["tc", "-t", "-s", "500", "--no-dedup", "--sink", "stdout", "notes.txt"]);
        let config = cli.apply(Config::default());
        assert!(config.tail_mode);
        assert_eq!(config.chunk_size, 500);
        assert!(!config.dedup);
        assert_eq!(config.sink, Sink::Stdout);
        assert!(config.mirror.enabled);
        assert_eq!(cli.file, Some(PathBuf::from("notes.txt")));
    }

    #[test]
    fn test_no_flags_keep_config() {
        let cli = Cli::parse_from(["tc"]);
        let base = Config {
            chunk_size: 42,
            tail_mode: true,
            ..Default::default()
        };
        let config = cli.apply(base);
        assert_eq!(config.chunk_size, 42);
        assert!(config.tail_mode);
        assert!(cli.file.is_none());
    }
}
