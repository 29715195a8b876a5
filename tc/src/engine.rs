//! Chunk partitioning and cursor navigation
//!
//! Positions are 1-based and always increase with buffer offset. The
//! effective direction, `tail_mode XOR inverted`, decides two things: which
//! end the partition is aligned to (forward: full chunks from byte 0, short
//! chunk last; reverse: full chunks back from the end, short chunk first) and
//! which way "next" walks (reverse walks from the highest position down).

use std::borrow::Cow;
use std::ops::Range;

use tracing::debug;

use crate::error::ChunkError;

/// Owns the text buffer and derives chunks from it on demand
#[derive(Debug, Clone)]
pub struct ChunkEngine {
    buffer: Vec<u8>,
    chunk_size: usize,
    tail_mode: bool,
    inverted: bool,
    position: usize,
    total_chunks: usize,
}

impl ChunkEngine {
    /// Create an engine with an empty buffer
    pub fn new(chunk_size: usize, tail_mode: bool) -> Result<Self, ChunkError> {
        if chunk_size == 0 {
            return Err(ChunkError::zero_size());
        }
        Ok(Self {
            buffer: Vec::new(),
            chunk_size,
            tail_mode,
            inverted: false,
            position: 1,
            total_chunks: 1,
        })
    }

    /// Replace the buffer wholesale and move to the first chunk
    pub fn load(&mut self, text: impl Into<Vec<u8>>) -> Result<(), ChunkError> {
        let text = text.into();
        if text.is_empty() {
            return Err(ChunkError::EmptyInput);
        }
        self.buffer = text;
        self.recompute();
        self.first();
        debug!(
            bytes = self.buffer.len(),
            total_chunks = self.total_chunks,
            position = self.position,
            "ChunkEngine::load: buffer replaced"
        );
        Ok(())
    }

    /// Append text to the buffer, keeping the cursor where it is
    pub fn append(&mut self, extra: &[u8]) {
        if extra.is_empty() {
            return;
        }
        self.buffer.extend_from_slice(extra);
        self.recompute();
        debug!(added = extra.len(), total_chunks = self.total_chunks, "ChunkEngine::append");
    }

    /// Change the chunk size. Sizes beyond the buffer length give one chunk.
    pub fn set_chunk_size(&mut self, size: usize) -> Result<(), ChunkError> {
        if size == 0 {
            return Err(ChunkError::zero_size());
        }
        self.chunk_size = size;
        self.recompute();
        debug!(size, total_chunks = self.total_chunks, "ChunkEngine::set_chunk_size");
        Ok(())
    }

    /// Recalculate the chunk count and clamp the cursor into range
    pub fn recompute(&mut self) {
        self.total_chunks = self.buffer.len().div_ceil(self.chunk_size).max(1);
        self.position = self.position.clamp(1, self.total_chunks);
    }

    /// Byte range of the chunk at `position`, or `None` outside `[1, total]`
    pub fn chunk_range(&self, position: usize) -> Option<Range<usize>> {
        if position < 1 || position > self.total_chunks {
            return None;
        }
        let len = self.buffer.len();
        let (start, end) = if self.is_reversed() {
            let after = (self.total_chunks - position).saturating_mul(self.chunk_size);
            let end = len.saturating_sub(after);
            (end.saturating_sub(self.chunk_size), end)
        } else {
            let start = ((position - 1).saturating_mul(self.chunk_size)).min(len);
            (start, start.saturating_add(self.chunk_size).min(len))
        };
        Some(start..end)
    }

    /// Raw bytes of the chunk at `position`; empty outside the valid range
    pub fn chunk_bytes(&self, position: usize) -> &[u8] {
        match self.chunk_range(position) {
            Some(range) => &self.buffer[range],
            None => &[],
        }
    }

    /// Chunk text at `position`. Byte slices that split a multi-byte
    /// character are decoded lossily.
    pub fn chunk_at(&self, position: usize) -> Cow<'_, str> {
        String::from_utf8_lossy(self.chunk_bytes(position))
    }

    /// Chunk under the cursor
    pub fn current_chunk(&self) -> Cow<'_, str> {
        self.chunk_at(self.position)
    }

    /// Effective direction: true when the partition is aligned to the end of
    /// the buffer and traversal runs from the last position down to 1
    pub fn is_reversed(&self) -> bool {
        self.tail_mode ^ self.inverted
    }

    /// Position that comes first in effective-direction order
    pub fn first_position(&self) -> usize {
        if self.is_reversed() { self.total_chunks } else { 1 }
    }

    /// Position that comes last in effective-direction order
    pub fn final_position(&self) -> usize {
        if self.is_reversed() { 1 } else { self.total_chunks }
    }

    /// True when the cursor is on the last position in traversal order
    pub fn is_at_final(&self) -> bool {
        self.position == self.final_position()
    }

    /// Position after `position` in effective order, wrapping past the end
    pub fn step_forward(&self, position: usize) -> usize {
        if self.is_reversed() {
            if position <= 1 { self.total_chunks } else { position - 1 }
        } else if position >= self.total_chunks {
            1
        } else {
            position + 1
        }
    }

    /// Move one chunk along the traversal order, stopping at the final one
    pub fn next(&mut self) {
        self.position = if self.is_reversed() {
            self.position.saturating_sub(1).max(1)
        } else {
            (self.position + 1).min(self.total_chunks)
        };
    }

    /// Move one chunk back along the traversal order, stopping at the first
    pub fn prev(&mut self) {
        self.position = if self.is_reversed() {
            (self.position + 1).min(self.total_chunks)
        } else {
            self.position.saturating_sub(1).max(1)
        };
    }

    /// Move to the first chunk in traversal order
    pub fn first(&mut self) {
        self.position = self.first_position();
    }

    /// Move to the last chunk in traversal order
    pub fn last(&mut self) {
        self.position = self.final_position();
    }

    /// Jump to an absolute position, clamped into `[1, total]`
    pub fn goto(&mut self, position: usize) {
        self.position = position.clamp(1, self.total_chunks);
    }

    /// Flip the inverted flag and mirror the cursor: position `p` becomes
    /// `total - p + 1`, so it keeps the same rank in traversal order.
    pub fn toggle_inverted(&mut self) {
        self.inverted = !self.inverted;
        self.position = self.total_chunks - self.position + 1;
        debug!(inverted = self.inverted, position = self.position, "ChunkEngine::toggle_inverted");
    }

    /// Cursor position in `[1, total_chunks]`
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of chunks, at least 1
    pub fn total_chunks(&self) -> usize {
        self.total_chunks
    }

    /// Bytes per chunk
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Whether the session started from the end of the text
    pub fn tail_mode(&self) -> bool {
        self.tail_mode
    }

    /// Whether the traversal order was flipped
    pub fn inverted(&self) -> bool {
        self.inverted
    }

    /// The whole text buffer
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Buffer length in bytes
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// True before any text was loaded
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(text: &str, size: usize, tail: bool) -> ChunkEngine {
        let mut engine = ChunkEngine::new(size, tail).unwrap();
        engine.load(text).unwrap();
        engine
    }

    fn chunks(engine: &ChunkEngine) -> Vec<String> {
        (1..=engine.total_chunks())
            .map(|pos| engine.chunk_at(pos).into_owned())
            .collect()
    }

    #[test]
    fn test_forward_partition() {
        let engine = engine("ABCDEFGHIJ", 3, false);
        assert_eq!(engine.total_chunks(), 4);
        assert_eq!(engine.position(), 1);
        assert_eq!(chunks(&engine), vec!["ABC", "DEF", "GHI", "J"]);
    }

    #[test]
    fn test_tail_partition() {
        let engine = engine("ABCDEFGHIJ", 3, true);
        assert_eq!(engine.position(), 4);
        assert_eq!(engine.chunk_at(4), "HIJ");
        assert_eq!(engine.chunk_at(1), "A");
        assert_eq!(chunks(&engine), vec!["A", "BCD", "EFG", "HIJ"]);
    }

    #[test]
    fn test_out_of_range_positions_are_empty() {
        let engine = engine("ABCDEFGHIJ", 3, false);
        assert_eq!(engine.chunk_at(0), "");
        assert_eq!(engine.chunk_at(5), "");
        assert!(engine.chunk_range(5).is_none());
    }

    #[test]
    fn test_empty_load_rejected() {
        let mut engine = ChunkEngine::new(3, false).unwrap();
        assert!(matches!(engine.load(""), Err(ChunkError::EmptyInput)));
        assert!(engine.is_empty());
        assert_eq!(engine.total_chunks(), 1);
        assert_eq!(engine.current_chunk(), "");
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        assert!(ChunkEngine::new(0, false).is_err());

        let mut engine = engine("ABCDEFGHIJ", 3, false);
        let err = engine.set_chunk_size(0).unwrap_err();
        assert!(matches!(err, ChunkError::InvalidChunkSize { size: 0, .. }));
        assert_eq!(engine.chunk_size(), 3);
        assert_eq!(engine.total_chunks(), 4);
    }

    #[test]
    fn test_oversized_chunk_gives_single_chunk() {
        let mut engine = engine("ABCDEFGHIJ", 3, true);
        engine.set_chunk_size(100).unwrap();
        assert_eq!(engine.total_chunks(), 1);
        assert_eq!(engine.position(), 1);
        assert_eq!(engine.current_chunk(), "ABCDEFGHIJ");
    }

    #[test]
    fn test_next_and_prev_follow_effective_direction() {
        let mut engine = engine("ABCDEFGHIJ", 3, false);
        engine.next();
        assert_eq!(engine.current_chunk(), "DEF");
        engine.prev();
        assert_eq!(engine.current_chunk(), "ABC");
        engine.prev();
        assert_eq!(engine.position(), 1);

        let mut engine = engine_tail();
        assert_eq!(engine.current_chunk(), "HIJ");
        engine.next();
        assert_eq!(engine.position(), 3);
        assert_eq!(engine.current_chunk(), "EFG");
        engine.prev();
        engine.prev();
        assert_eq!(engine.position(), 4);
    }

    fn engine_tail() -> ChunkEngine {
        engine("ABCDEFGHIJ", 3, true)
    }

    #[test]
    fn test_first_and_last() {
        let mut engine = engine_tail();
        engine.last();
        assert_eq!(engine.position(), 1);
        assert!(engine.is_at_final());
        engine.first();
        assert_eq!(engine.position(), 4);
        assert!(!engine.is_at_final());
    }

    #[test]
    fn test_toggle_inverted_mirrors_position() {
        let mut engine = engine("ABCDEFGHI", 3, false);
        engine.goto(1);
        engine.toggle_inverted();
        assert!(engine.is_reversed());
        assert_eq!(engine.position(), 3);
        assert_eq!(engine.current_chunk(), "GHI");
        // Still first in traversal order
        assert_eq!(engine.position(), engine.first_position());

        engine.toggle_inverted();
        assert!(!engine.inverted());
        assert_eq!(engine.position(), 1);
        assert_eq!(engine.current_chunk(), "ABC");
    }

    #[test]
    fn test_append_keeps_position() {
        let mut engine = engine("ABCDEFGHIJ", 3, false);
        engine.goto(4);
        engine.append(b"KL");
        assert_eq!(engine.position(), 4);
        assert_eq!(engine.current_chunk(), "JKL");

        engine.append(b"");
        assert_eq!(engine.len(), 12);
        engine.append(b"M");
        assert_eq!(engine.total_chunks(), 5);
        assert_eq!(engine.chunk_at(5), "M");
    }

    #[test]
    fn test_resize_clamps_position() {
        let mut engine = engine("ABCDEFGHIJ", 3, false);
        engine.last();
        engine.set_chunk_size(5).unwrap();
        assert_eq!(engine.total_chunks(), 2);
        assert_eq!(engine.position(), 2);
        assert_eq!(engine.current_chunk(), "FGHIJ");
    }

    #[test]
    fn test_goto_clamps() {
        let mut engine = engine("ABCDEFGHIJ", 3, false);
        engine.goto(0);
        assert_eq!(engine.position(), 1);
        engine.goto(99);
        assert_eq!(engine.position(), 4);
    }

    #[test]
    fn test_step_forward_wraps() {
        let engine = engine("ABCDEFGHIJ", 3, false);
        assert_eq!(engine.step_forward(2), 3);
        assert_eq!(engine.step_forward(4), 1);

        let engine = engine_tail();
        assert_eq!(engine.step_forward(3), 2);
        assert_eq!(engine.step_forward(1), 4);
    }

    #[test]
    fn test_multibyte_split_is_lossy_not_panic() {
        let engine = engine("héllo", 2, false);
        // 'é' is two bytes and straddles the first boundary
        assert_eq!(engine.total_chunks(), 3);
        assert_eq!(engine.chunk_bytes(1), b"h\xc3");
        assert!(engine.chunk_at(1).starts_with('h'));
    }
}
