//! Session controller: dispensing, deduplication and completion tracking

use std::collections::HashSet;
use std::fmt;

use tracing::{debug, info};

use crate::command::Command;
use crate::engine::ChunkEngine;
use crate::error::ChunkError;

/// Progress of a dedup session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Fewer distinct chunks were used than there are positions
    #[default]
    Active,
    /// As many chunks were used as there are positions, but the cursor is
    /// not on the final position yet
    Exhausted,
    /// As many chunks were used as there are positions and the cursor
    /// reached the final position. Stays set until usage is cleared or
    /// the buffer grows.
    Complete,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Exhausted => write!(f, "exhausted"),
            Self::Complete => write!(f, "complete"),
        }
    }
}

/// How `dispense` picked the chunk it returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispenseKind {
    /// The chunk under the cursor was unused
    Fresh,
    /// The cursor was on used content and moved forward to an unused chunk
    Skipped { from: usize },
    /// Nothing unused was left; the current chunk is handed out again
    AllUsed,
}

/// A chunk handed out by [`Session::dispense`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispensed {
    pub content: String,
    pub position: usize,
    pub kind: DispenseKind,
    pub state: SessionState,
}

/// Snapshot of the session counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    pub position: usize,
    pub total_chunks: usize,
    pub chunk_size: usize,
    pub buffer_len: usize,
    pub tail_mode: bool,
    pub inverted: bool,
    pub used_count: usize,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Chunk {}/{} ({} bytes total, {} byte chunks, {} mode{}, {} used)",
            self.position,
            self.total_chunks,
            self.buffer_len,
            self.chunk_size,
            if self.tail_mode { "tail" } else { "head" },
            if self.inverted { ", inverted" } else { "" },
            self.used_count
        )
    }
}

/// What a command did, for the front-end to report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Moved { position: usize },
    Inverted { inverted: bool, position: usize },
    Resized { from: usize, to: usize },
    Appended { bytes: usize },
    UsageReset,
    /// The command needs front-end I/O (recopy, reload, status, help)
    Deferred(Command),
    Quit,
}

/// Chunk engine plus the set of chunk contents already handed out
#[derive(Debug, Clone)]
pub struct Session {
    engine: ChunkEngine,
    used: HashSet<Vec<u8>>,
    state: SessionState,
}

impl Session {
    /// Wrap an engine with an empty used set
    pub fn new(engine: ChunkEngine) -> Self {
        Self {
            engine,
            used: HashSet::new(),
            state: SessionState::Active,
        }
    }

    pub fn engine(&self) -> &ChunkEngine {
        &self.engine
    }

    /// Current progress, updated after every dispense and navigation
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Replace the buffer. Usage is cleared since the old contents are gone.
    pub fn load(&mut self, text: impl Into<Vec<u8>>) -> Result<(), ChunkError> {
        self.engine.load(text)?;
        self.used.clear();
        self.state = SessionState::Active;
        info!(bytes = self.engine.len(), chunks = self.engine.total_chunks(), "Text loaded");
        Ok(())
    }

    /// Append text. New positions may be unused, so a finished session is
    /// re-evaluated instead of staying complete.
    pub fn append(&mut self, extra: &[u8]) {
        if extra.is_empty() {
            return;
        }
        self.engine.append(extra);
        self.state = SessionState::Active;
        self.refresh_state();
    }

    /// Manual resize: the size must be in `1..=buffer length`. A rejected
    /// size leaves the previous size in place.
    pub fn resize(&mut self, size: usize) -> Result<(), ChunkError> {
        let len = self.engine.len();
        if size > len {
            return Err(ChunkError::InvalidChunkSize {
                size,
                reason: format!("must be <= text length ({})", len),
            });
        }
        self.set_chunk_size(size)
    }

    /// Change the chunk size without the buffer-length check
    pub fn set_chunk_size(&mut self, size: usize) -> Result<(), ChunkError> {
        self.engine.set_chunk_size(size)?;
        self.reset_usage();
        Ok(())
    }

    /// Forget every used chunk; position and buffer are untouched
    pub fn reset_usage(&mut self) {
        self.used.clear();
        self.state = SessionState::Active;
        debug!("Session::reset_usage: usage cleared");
    }

    pub fn current_chunk(&self) -> String {
        self.engine.current_chunk().into_owned()
    }

    // Navigation goes through the engine, then re-checks completion

    pub fn next(&mut self) {
        self.engine.next();
        self.refresh_state();
    }

    pub fn prev(&mut self) {
        self.engine.prev();
        self.refresh_state();
    }

    pub fn first(&mut self) {
        self.engine.first();
        self.refresh_state();
    }

    pub fn last(&mut self) {
        self.engine.last();
        self.refresh_state();
    }

    pub fn goto(&mut self, position: usize) {
        self.engine.goto(position);
        self.refresh_state();
    }

    pub fn toggle_inverted(&mut self) {
        self.engine.toggle_inverted();
        self.refresh_state();
    }

    /// Whether the content at `position` was already dispensed
    pub fn is_used(&self, position: usize) -> bool {
        self.used.contains(self.engine.chunk_bytes(position))
    }

    /// True once the used set holds as many chunks as there are positions.
    /// Repeated contents count once, so a buffer with duplicate chunks never
    /// gets here; `dispense` reports [`DispenseKind::AllUsed`] for it instead.
    pub fn all_used(&self) -> bool {
        self.used.len() >= self.engine.total_chunks()
    }

    /// Same as `state() == SessionState::Complete`
    pub fn is_complete(&self) -> bool {
        self.state == SessionState::Complete
    }

    /// Hand out the current chunk, or the next unused one in effective order.
    /// When everything was used already the current chunk is returned with
    /// [`DispenseKind::AllUsed`] so the caller always has content.
    pub fn dispense(&mut self) -> Dispensed {
        let start = self.engine.position();
        let kind = match self.find_unused(start) {
            Some(pos) if pos == start => DispenseKind::Fresh,
            Some(pos) => {
                self.engine.goto(pos);
                DispenseKind::Skipped { from: start }
            }
            None => DispenseKind::AllUsed,
        };

        let position = self.engine.position();
        if kind != DispenseKind::AllUsed {
            self.used.insert(self.engine.chunk_bytes(position).to_vec());
        }
        self.refresh_state();

        debug!(position, ?kind, state = %self.state, "Session::dispense");
        Dispensed {
            content: self.current_chunk(),
            position,
            kind,
            state: self.state,
        }
    }

    /// Scan from `start` in effective order, wrapping once
    fn find_unused(&self, start: usize) -> Option<usize> {
        let mut pos = start;
        for _ in 0..self.engine.total_chunks() {
            if !self.is_used(pos) {
                return Some(pos);
            }
            pos = self.engine.step_forward(pos);
        }
        None
    }

    fn refresh_state(&mut self) {
        if self.state == SessionState::Complete {
            return;
        }
        let previous = self.state;
        self.state = if !self.all_used() {
            SessionState::Active
        } else if self.engine.is_at_final() {
            SessionState::Complete
        } else {
            SessionState::Exhausted
        };
        if previous != self.state {
            debug!(from = %previous, to = %self.state, "Session state changed");
        }
    }

    pub fn status(&self) -> Status {
        Status {
            position: self.engine.position(),
            total_chunks: self.engine.total_chunks(),
            chunk_size: self.engine.chunk_size(),
            buffer_len: self.engine.len(),
            tail_mode: self.engine.tail_mode(),
            inverted: self.engine.inverted(),
            used_count: self.used.len(),
        }
    }

    /// Apply a command that only touches session state. Commands that need
    /// the outside world come back as [`Outcome::Deferred`].
    pub fn execute(&mut self, command: Command) -> Result<Outcome, ChunkError> {
        debug!(?command, "Session::execute");
        let outcome = match command {
            Command::Next => {
                self.next();
                self.moved()
            }
            Command::Prev => {
                self.prev();
                self.moved()
            }
            Command::First => {
                self.first();
                self.moved()
            }
            Command::Last => {
                self.last();
                self.moved()
            }
            Command::Goto(position) => {
                self.goto(position);
                self.moved()
            }
            Command::Invert => {
                self.toggle_inverted();
                Outcome::Inverted {
                    inverted: self.engine.inverted(),
                    position: self.engine.position(),
                }
            }
            Command::Resize(size) => {
                let from = self.engine.chunk_size();
                self.resize(size)?;
                info!(from, to = size, "Chunk size changed");
                Outcome::Resized { from, to: size }
            }
            Command::Append(text) if !text.is_empty() => {
                self.append(text.as_bytes());
                Outcome::Appended { bytes: text.len() }
            }
            Command::ResetUsage => {
                self.reset_usage();
                Outcome::UsageReset
            }
            Command::Quit => Outcome::Quit,
            other => Outcome::Deferred(other),
        };
        Ok(outcome)
    }

    fn moved(&self) -> Outcome {
        Outcome::Moved {
            position: self.engine.position(),
        }
    }
}
