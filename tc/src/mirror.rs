//! Temp-file copy of the working buffer
//!
//! Every time the buffer grows or is re-partitioned the full text is written
//! to `textchunker_<unix seconds>.txt` so it survives a crash or an accidental
//! quit. The file name is fixed at the first write and reused for the rest of
//! the session.

use std::fs;
use std::path::{Path, PathBuf};

use eyre::{Context, Result};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct TextMirror {
    dir: PathBuf,
    path: Option<PathBuf>,
}

impl TextMirror {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            path: None,
        }
    }

    /// Path of the mirror file, once something was written
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Write `text` to the mirror file, creating it on first use
    pub fn sync(&mut self, text: &[u8]) -> Result<&Path> {
        let dir = &self.dir;
        let path = self.path.get_or_insert_with(|| {
            let stamp = chrono::Utc::now().timestamp();
            dir.join(format!("textchunker_{}.txt", stamp))
        });
        fs::create_dir_all(dir).context(format!("Failed to create mirror directory: {}", dir.display()))?;
        fs::write(&*path, text).context(format!("Failed to write mirror file: {}", path.display()))?;
        debug!(path = %path.display(), bytes = text.len(), "TextMirror::sync");
        Ok(path.as_path())
    }
}
