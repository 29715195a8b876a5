//! Clipboard access
//!
//! The chunking core never touches the OS clipboard. Front-ends hand it a
//! [`Clipboard`] implementation: [`SystemClipboard`] goes through
//! `copypasta-ext` (wl-clipboard, xclip/xsel, pbcopy), [`MemoryClipboard`]
//! keeps everything in memory for tests.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use copypasta_ext::copypasta::ClipboardProvider;
use tracing::{debug, warn};

/// Default time allowed for a clipboard read before giving up
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(800);

/// Default time allowed for a clipboard write before giving up
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_millis(2000);

/// Source and sink for clipboard text
pub trait Clipboard {
    /// Current clipboard text, or `None` if it is empty or unavailable
    fn read(&mut self) -> Option<String>;

    /// Replace the clipboard text. Returns false if the write failed or
    /// timed out.
    fn write(&mut self, text: &str) -> bool;
}

/// OS clipboard through the best `copypasta-ext` context for the session
/// (Wayland or X11 tools on Linux, pbcopy on macOS)
#[derive(Debug, Clone)]
pub struct SystemClipboard {
    read_timeout: Duration,
    write_timeout: Duration,
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new(DEFAULT_READ_TIMEOUT, DEFAULT_WRITE_TIMEOUT)
    }
}

impl SystemClipboard {
    pub fn new(read_timeout: Duration, write_timeout: Duration) -> Self {
        Self {
            read_timeout,
            write_timeout,
        }
    }
}

impl Clipboard for SystemClipboard {
    fn read(&mut self) -> Option<String> {
        let text = with_timeout(self.read_timeout, "read", || {
            let mut ctx = copypasta_ext::try_context()?;
            match ctx.get_contents() {
                Ok(text) => Some(text),
                Err(e) => {
                    debug!(error = %e, "Clipboard read failed");
                    None
                }
            }
        })
        .filter(|text| !text.is_empty());

        match &text {
            Some(text) => debug!(bytes = text.len(), "Clipboard read"),
            None => warn!("Clipboard is empty or unavailable"),
        }
        text
    }

    fn write(&mut self, text: &str) -> bool {
        let owned = text.to_string();
        let written = with_timeout(self.write_timeout, "write", move || {
            let mut ctx = copypasta_ext::try_context()?;
            match ctx.set_contents(owned) {
                Ok(()) => Some(()),
                Err(e) => {
                    debug!(error = %e, "Clipboard write failed");
                    None
                }
            }
        })
        .is_some();

        if written {
            debug!(bytes = text.len(), "Clipboard written");
        } else {
            warn!(bytes = text.len(), "Clipboard write failed or timed out");
        }
        written
    }
}

/// Run a clipboard operation on a worker thread and stop waiting after
/// `timeout`. A tool holding the selection can block indefinitely; the
/// worker is left to finish on its own.
fn with_timeout<T, F>(timeout: Duration, op: &'static str, f: F) -> Option<T>
where
    T: Send + 'static,
    F: FnOnce() -> Option<T> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(f());
    });

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => {
            warn!(op, timeout_ms = timeout.as_millis() as u64, "Clipboard access timed out");
            None
        }
        Err(RecvTimeoutError::Disconnected) => {
            debug!(op, "Clipboard worker exited without a result");
            None
        }
    }
}

/// In-memory clipboard that records every write
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    pub content: Option<String>,
    pub writes: Vec<String>,
}

impl MemoryClipboard {
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            writes: Vec::new(),
        }
    }
}

impl Clipboard for MemoryClipboard {
    fn read(&mut self) -> Option<String> {
        self.content.clone().filter(|s| !s.is_empty())
    }

    fn write(&mut self, text: &str) -> bool {
        self.content = Some(text.to_string());
        self.writes.push(text.to_string());
        true
    }
}
