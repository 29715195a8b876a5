//! Configuration for textchunker

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Where published chunks go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Sink {
    /// Copy each chunk to the system clipboard
    #[default]
    Clipboard,
    /// Print each chunk to stdout
    Stdout,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Bytes per chunk
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Start from the end of the text and walk backwards
    #[serde(default)]
    pub tail_mode: bool,

    /// Never hand out the same chunk content twice
    #[serde(default = "default_true")]
    pub dedup: bool,

    /// Destination for published chunks
    #[serde(default)]
    pub sink: Sink,

    #[serde(default)]
    pub clipboard: ClipboardConfig,

    #[serde(default)]
    pub mirror: MirrorConfig,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(default)]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClipboardConfig {
    /// Give up on a clipboard read after this many milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Give up on a clipboard write after this many milliseconds
    #[serde(default = "default_write_timeout_ms")]
    pub write_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Keep a copy of the working text on disk
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Directory for the mirror file
    #[serde(default = "default_mirror_dir")]
    pub dir: PathBuf,
}

fn default_chunk_size() -> usize {
    crate::DEFAULT_CHUNK_SIZE
}

fn default_true() -> bool {
    true
}

fn default_timeout_ms() -> u64 {
    crate::clipboard::DEFAULT_READ_TIMEOUT.as_millis() as u64
}

fn default_write_timeout_ms() -> u64 {
    crate::clipboard::DEFAULT_WRITE_TIMEOUT.as_millis() as u64
}

fn default_mirror_dir() -> PathBuf {
    std::env::temp_dir()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            tail_mode: false,
            dedup: true,
            sink: Sink::default(),
            clipboard: ClipboardConfig::default(),
            mirror: MirrorConfig::default(),
            log_level: None,
        }
    }
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            write_timeout_ms: default_write_timeout_ms(),
        }
    }
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: default_mirror_dir(),
        }
    }
}

impl ClipboardConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }
}

impl Config {
    /// Load config from file, or use defaults
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            return Self::load_from(config_path);
        }

        for path in Self::default_paths().iter().flatten() {
            if path.exists() {
                return Self::load_from(path);
            }
        }

        Ok(Config::default())
    }

    fn default_paths() -> [Option<PathBuf>; 2] {
        [
            dirs::config_dir().map(|p| p.join("textchunker").join("config.yml")),
            Some(PathBuf::from("textchunker.yml")),
        ]
    }

    fn load_from(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).context(format!("Failed to read config file: {}", path.display()))?;
        let config: Config =
            serde_yaml::from_str(&content).context(format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine can't work with
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(eyre::eyre!("chunk_size must be > 0"));
        }
        Ok(())
    }

    /// Log level from the config file, read before logging is set up.
    /// Parse failures are ignored here; `load` reports them later.
    pub fn load_log_level(path: Option<&PathBuf>) -> Option<String> {
        Self::load(path).ok().and_then(|c| c.log_level)
    }
}
