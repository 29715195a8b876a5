//! TextChunker - feed large text through the clipboard one chunk at a time
//!
//! Splits a text buffer into fixed-size chunks and walks them head-first or
//! tail-first, handing each one to a sink (normally the clipboard). In dedup
//! mode a chunk whose content was already handed out is skipped, and the
//! session ends once every chunk was used and the cursor reached the last one.
//!
//! # Modules
//!
//! - [`engine`] - partitioning and cursor navigation
//! - [`session`] - dispensing, dedup and completion state
//! - [`command`] - interactive command syntax
//! - [`clipboard`] - clipboard trait, OS tools backend and in-memory fake
//! - [`repl`] - the interactive loop used by the `tc` binary
//!
//! # Example
//!
//! ```
//! use textchunker::{ChunkEngine, Session, SessionState};
//!
//! let mut session = Session::new(ChunkEngine::new(3, false).unwrap());
//! session.load("ABCDEFGHIJ").unwrap();
//! assert_eq!(session.dispense().content, "ABC");
//! session.next();
//! assert_eq!(session.dispense().content, "DEF");
//! assert_eq!(session.state(), SessionState::Active);
//! ```

pub mod cli;
pub mod clipboard;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod mirror;
pub mod repl;
pub mod session;
pub mod source;

pub use clipboard::{Clipboard, MemoryClipboard, SystemClipboard};
pub use command::Command;
pub use config::{Config, Sink};
pub use engine::ChunkEngine;
pub use error::ChunkError;
pub use mirror::TextMirror;
pub use repl::{Flow, Repl, ReplOptions};
pub use session::{DispenseKind, Dispensed, Outcome, Session, SessionState, Status};
pub use source::read_text;

/// Default chunk size in bytes
pub const DEFAULT_CHUNK_SIZE: usize = 20000;
