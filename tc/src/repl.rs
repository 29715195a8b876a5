//! Interactive command loop
//!
//! Each turn publishes a chunk, prints the status line and reads one command.
//! In dedup mode the loop ends by itself once the session is complete.

use std::io::Write;

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, info, warn};

use crate::clipboard::Clipboard;
use crate::command::Command;
use crate::config::{Config, Sink};
use crate::mirror::TextMirror;
use crate::session::{DispenseKind, Outcome, Session, SessionState};

/// What the loop does after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// The cursor or buffer changed: publish again
    Publish,
    /// Nothing to publish; just prompt again
    Hold,
    Quit,
}

/// Front-end settings taken from [`Config`]
#[derive(Debug, Clone)]
pub struct ReplOptions {
    pub sink: Sink,
    pub dedup: bool,
    pub mirror: Option<TextMirror>,
}

impl From<&Config> for ReplOptions {
    fn from(config: &Config) -> Self {
        Self {
            sink: config.sink,
            dedup: config.dedup,
            mirror: config.mirror.enabled.then(|| TextMirror::new(&config.mirror.dir)),
        }
    }
}

/// Drives a [`Session`] from terminal input
pub struct Repl<C: Clipboard, W: Write> {
    session: Session,
    clipboard: C,
    out: W,
    options: ReplOptions,
}

impl<C: Clipboard, W: Write> Repl<C, W> {
    pub fn new(session: Session, clipboard: C, out: W, options: ReplOptions) -> Self {
        Self {
            session,
            clipboard,
            out,
            options,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Run until quit, end of input, or (in dedup mode) completion
    pub fn run(&mut self) -> Result<()> {
        self.sync_mirror()?;
        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;
        let mut flow = Flow::Publish;

        loop {
            if flow == Flow::Publish {
                self.publish()?;
            }
            self.show_status()?;

            if self.options.dedup {
                match self.session.state() {
                    SessionState::Complete => {
                        writeln!(self.out, "{} All chunks processed. Auto-exiting...", "✓".green())?;
                        break;
                    }
                    SessionState::Exhausted => {
                        writeln!(self.out, "{} All chunks have been used!", "⚠".yellow())?;
                    }
                    SessionState::Active => {}
                }
            }

            let line = match rl.readline(&format!("{} ", "Command>".bright_green())) {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) => {
                    writeln!(self.out, "^C")?;
                    flow = Flow::Hold;
                    continue;
                }
                Err(ReadlineError::Eof) => break,
                Err(err) => return Err(eyre::eyre!("Readline error: {}", err)),
            };
            if !line.trim().is_empty() {
                let _ = rl.add_history_entry(line.trim());
            }

            let command = match Command::parse(&line) {
                Command::Append(text) if text.is_empty() => Command::Append(self.collect_append(&mut rl)?),
                other => other,
            };

            flow = self.handle(command)?;
            if flow == Flow::Quit {
                break;
            }
        }

        self.finish()
    }

    /// Read lines until an empty line or end of input
    fn collect_append(&mut self, rl: &mut DefaultEditor) -> Result<String> {
        writeln!(self.out, "Enter additional text (end with an empty line or Ctrl+D):")?;
        let mut text = String::new();
        loop {
            match rl.readline("") {
                Ok(line) if line.is_empty() => break,
                Ok(line) => {
                    text.push_str(&line);
                    text.push('\n');
                }
                Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => break,
                Err(err) => return Err(eyre::eyre!("Readline error: {}", err)),
            }
        }
        Ok(text)
    }

    /// Publish the chunk under the cursor. In dedup mode the session may move
    /// to the next unused chunk first.
    pub fn publish(&mut self) -> Result<()> {
        if !self.options.dedup {
            let chunk = self.session.current_chunk();
            return self.emit(&chunk, "copied");
        }

        let dispensed = self.session.dispense();
        match dispensed.kind {
            DispenseKind::Fresh => self.emit(&dispensed.content, "copied"),
            DispenseKind::Skipped { from } => {
                writeln!(
                    self.out,
                    "{} Chunk {} already used - moved to unused chunk {}",
                    "⚠".yellow(),
                    from,
                    dispensed.position
                )?;
                self.emit(&dispensed.content, "copied")
            }
            DispenseKind::AllUsed => {
                writeln!(self.out, "{} All chunks have been used (r to recopy)", "⚠".yellow())?;
                Ok(())
            }
        }
    }

    fn emit(&mut self, chunk: &str, verb: &str) -> Result<()> {
        match self.options.sink {
            Sink::Clipboard => {
                if self.clipboard.write(chunk) {
                    writeln!(self.out, "{} Chunk {} to clipboard", "✓".green(), verb)?;
                } else {
                    warn!(bytes = chunk.len(), "Failed to publish chunk");
                    writeln!(self.out, "{} Could not write to the clipboard", "✗".red())?;
                }
            }
            Sink::Stdout => {
                writeln!(self.out, "{}", "-----8<-----".dimmed())?;
                writeln!(self.out, "{}", chunk)?;
                writeln!(self.out, "{}", "----->8-----".dimmed())?;
            }
        }
        Ok(())
    }

    pub fn show_status(&mut self) -> Result<()> {
        writeln!(self.out, "{}", self.session.status().to_string().cyan())?;
        Ok(())
    }

    /// Apply one command and report what happened
    pub fn handle(&mut self, command: Command) -> Result<Flow> {
        let outcome = match self.session.execute(command) {
            Ok(outcome) => outcome,
            Err(e) if e.is_recoverable() => {
                writeln!(self.out, "{} {}", "✗".red(), e)?;
                return Ok(Flow::Hold);
            }
            Err(e) => return Err(e.into()),
        };

        let flow = match outcome {
            Outcome::Moved { .. } | Outcome::Inverted { .. } => Flow::Publish,
            Outcome::Resized { from, to } => {
                writeln!(self.out, "Changing chunk size from {} to {} bytes", from, to)?;
                self.sync_mirror()?;
                Flow::Publish
            }
            Outcome::Appended { bytes } => {
                writeln!(self.out, "Added {} bytes.", bytes)?;
                self.sync_mirror()?;
                Flow::Publish
            }
            Outcome::UsageReset => {
                writeln!(self.out, "Reset all chunks as unused")?;
                Flow::Publish
            }
            Outcome::Quit => Flow::Quit,
            Outcome::Deferred(command) => self.handle_deferred(command)?,
        };
        debug!(?flow, "Repl::handle");
        Ok(flow)
    }

    fn handle_deferred(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::Recopy => {
                let chunk = self.session.current_chunk();
                self.emit(&chunk, "recopied")?;
            }
            Command::Reload => {
                let text = self.clipboard.read().unwrap_or_default();
                match self.session.load(text) {
                    Ok(()) => {
                        writeln!(self.out, "{} Loaded new text from clipboard", "✓".green())?;
                        self.sync_mirror()?;
                        return Ok(Flow::Publish);
                    }
                    Err(e) => writeln!(self.out, "{} {}", "✗".red(), e)?,
                }
            }
            Command::ShowStatus => {
                let status = self.session.status();
                writeln!(self.out, "Used chunks: {}/{}", status.used_count, status.total_chunks)?;
            }
            Command::Append(_) => {
                writeln!(self.out, "Nothing to add.")?;
            }
            _ => self.print_help()?,
        }
        Ok(Flow::Hold)
    }

    fn print_help(&mut self) -> Result<()> {
        writeln!(self.out, "{}", "Commands:".bright_cyan())?;
        for (keys, description) in Command::usage() {
            writeln!(self.out, "  {:10} {}", keys.yellow(), description)?;
        }
        Ok(())
    }

    fn sync_mirror(&mut self) -> Result<()> {
        let Some(mirror) = self.options.mirror.as_mut() else {
            return Ok(());
        };
        match mirror.sync(self.session.engine().buffer()) {
            Ok(path) => writeln!(self.out, "Text saved to: {}", path.display())?,
            Err(e) => {
                warn!(error = %e, "Mirror write failed");
                writeln!(self.out, "{} {}", "⚠".yellow(), e)?;
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        let status = self.session.status();
        if self.options.dedup && self.session.state() == SessionState::Complete {
            writeln!(self.out, "Session completed successfully!")?;
            writeln!(self.out, "Processed {}/{} chunks", status.used_count, status.total_chunks)?;
        }
        if let Some(path) = self.options.mirror.as_ref().and_then(|m| m.path()) {
            writeln!(self.out, "Temp file preserved at: {}", path.display())?;
        }
        info!(used = status.used_count, total = status.total_chunks, "Session finished");
        Ok(())
    }
}
