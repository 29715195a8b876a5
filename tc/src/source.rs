//! Initial text sources

use std::path::Path;

use tracing::info;

use crate::clipboard::Clipboard;
use crate::error::ChunkError;

/// Read the initial text from `file`, or from the clipboard when no file is
/// given. An empty file, empty clipboard or unavailable clipboard all yield
/// [`ChunkError::EmptyInput`].
pub fn read_text(file: Option<&Path>, clipboard: &mut dyn Clipboard) -> Result<Vec<u8>, ChunkError> {
    let text = match file {
        Some(path) => std::fs::read(path).map_err(|source| ChunkError::Source {
            path: path.to_path_buf(),
            source,
        })?,
        None => clipboard.read().map(String::into_bytes).unwrap_or_default(),
    };

    if text.is_empty() {
        return Err(ChunkError::EmptyInput);
    }
    info!(
        source = %file.map(|p| p.display().to_string()).unwrap_or_else(|| "clipboard".to_string()),
        bytes = text.len(),
        "Read input text"
    );
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use tempfile::TempDir;

    #[test]
    fn test_reads_file_bytes() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("input.txt");
        std::fs::write(&path, b"file text\xff").unwrap();

        let mut cb = MemoryClipboard::with_content("clipboard text");
        let text = read_text(Some(&path), &mut cb).unwrap();
        assert_eq!(text, b"file text\xff");
    }

    #[test]
    fn test_falls_back_to_clipboard() {
        let mut cb = MemoryClipboard::with_content("clipboard text");
        let text = read_text(None, &mut cb).unwrap();
        assert_eq!(text, b"clipboard text");
    }

    #[test]
    fn test_empty_sources() {
        let mut cb = MemoryClipboard::default();
        assert!(matches!(read_text(None, &mut cb), Err(ChunkError::EmptyInput)));

        let temp = TempDir::new().unwrap();
        let path = temp.path().join("empty.txt");
        std::fs::write(&path, "").unwrap();
        assert!(matches!(read_text(Some(&path), &mut cb), Err(ChunkError::EmptyInput)));
    }

    #[test]
    fn test_missing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing.txt");
        let mut cb = MemoryClipboard::default();
        let err = read_text(Some(&path), &mut cb).unwrap_err();
        assert!(matches!(err, ChunkError::Source { .. }));
    }
}
