//! Interactive command syntax
//!
//! Input lines are parsed once into a [`Command`]; nothing downstream looks at
//! the raw text again.

/// A single user command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Next,
    Prev,
    First,
    Last,
    Invert,
    /// Change the chunk size (`$N`)
    Resize(usize),
    /// Jump to an absolute position (`N`)
    Goto(usize),
    /// Append text (`a text`). An empty payload asks the front-end to
    /// collect the text interactively.
    Append(String),
    /// Publish the current chunk again even if it was already used
    Recopy,
    /// Replace the buffer with fresh text from the clipboard
    Reload,
    ResetUsage,
    ShowStatus,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line. Unrecognised input maps to [`Command::Help`].
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();

        if let Some(rest) = trimmed.strip_prefix('$') {
            return match parse_digits(rest) {
                Some(size) => Command::Resize(size),
                None => Command::Help,
            };
        }

        if let Some(position) = parse_digits(trimmed) {
            return Command::Goto(position);
        }

        let (word, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim_start()),
            None => (trimmed, ""),
        };

        match word.to_lowercase().as_str() {
            "" | "n" | "next" => Command::Next,
            "p" | "prev" => Command::Prev,
            "f" | "first" => Command::First,
            "l" | "last" => Command::Last,
            "i" | "invert" => Command::Invert,
            "a" | "add" | "append" => Command::Append(rest.to_string()),
            "r" | "c" | "recopy" => Command::Recopy,
            "v" | "reload" => Command::Reload,
            "u" | "s" | "status" => Command::ShowStatus,
            "reset" => Command::ResetUsage,
            "q" | "quit" | "exit" => Command::Quit,
            _ => Command::Help,
        }
    }

    /// Short help text listing the command syntax
    pub fn usage() -> &'static [(&'static str, &'static str)] {
        &[
            ("Enter, n", "next chunk"),
            ("p", "previous chunk"),
            ("f / l", "first / last chunk"),
            ("i", "invert the order"),
            ("<N>", "go to chunk N"),
            ("$<N>", "change chunk size to N"),
            ("a [text]", "append text (prompts when no text is given)"),
            ("r", "recopy the current chunk"),
            ("v", "reload text from the clipboard"),
            ("u", "show status and usage"),
            ("reset", "mark every chunk as unused"),
            ("q", "quit"),
        ]
    }
}

impl std::str::FromStr for Command {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Command::parse(s))
    }
}

fn parse_digits(s: &str) -> Option<usize> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
