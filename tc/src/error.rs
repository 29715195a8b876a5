//! Chunking error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the chunk engine and its text sources
///
/// Navigation never fails, and "all chunks used" / "complete" are session
/// states rather than errors.
#[derive(Debug, Error)]
pub enum ChunkError {
    #[error("No text loaded: input is empty or the clipboard is unavailable")]
    EmptyInput,

    #[error("Invalid chunk size {size}: {reason}")]
    InvalidChunkSize { size: usize, reason: String },

    #[error("Could not read {path}: {source}")]
    Source {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ChunkError {
    pub(crate) fn zero_size() -> Self {
        ChunkError::InvalidChunkSize {
            size: 0,
            reason: "must be > 0".to_string(),
        }
    }

    /// Check if the session can continue with its prior settings
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ChunkError::InvalidChunkSize { .. })
    }
}
