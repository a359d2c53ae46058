//! Interactive input/output channel.
//!
//! Prompted reads come in two flavors: plain lines (email, menu choices) and
//! masked reads for passwords. Masking only happens when stdin is a real
//! terminal; piped input falls back to a plain line read so automated runs
//! stay deterministic.

use std::io::{self, BufRead, BufReader, IsTerminal, Stdin, Stdout, Write};

use thiserror::Error;

/// Failures from the interactive channel.
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("input was empty")]
    EmptyInput,
    #[error("input exceeds {max} characters")]
    TooLong { max: usize },
    #[error("input stream closed")]
    Eof,
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Capability for prompting and reporting to the user.
///
/// The session flows depend on this trait rather than stdio directly, so
/// tests substitute a scripted double with zero terminal state.
pub trait Console: Send {
    /// Write one line of output.
    fn write_line(&mut self, line: &str) -> Result<(), ConsoleError>;

    /// Write `prompt` (no newline), then read one line, trimmed.
    ///
    /// Empty-after-trim input is [`ConsoleError::EmptyInput`], input longer
    /// than `max_len` is [`ConsoleError::TooLong`], and end-of-stream is
    /// [`ConsoleError::Eof`].
    fn prompt_line(&mut self, prompt: &str, max_len: usize) -> Result<String, ConsoleError>;

    /// Write `prompt`, then read a password.
    ///
    /// On an interactive terminal the read suppresses echo and emits the
    /// trailing newline the suppressed echo omits; otherwise this is a plain
    /// unmasked line read.
    fn prompt_password(&mut self, prompt: &str) -> Result<String, ConsoleError>;
}

/// Console backed by arbitrary reader/writer halves.
///
/// [`StdConsole::stdio`] wires real stdin/stdout and detects whether stdin
/// is a terminal; [`StdConsole::from_parts`] pins the `interactive` flag so
/// both password paths are testable without touching terminal state.
pub struct StdConsole<R, W> {
    reader: R,
    writer: W,
    interactive: bool,
}

impl StdConsole<BufReader<Stdin>, Stdout> {
    pub fn stdio() -> Self {
        let interactive = io::stdin().is_terminal();
        Self {
            reader: BufReader::new(io::stdin()),
            writer: io::stdout(),
            interactive,
        }
    }
}

impl<R: BufRead, W: Write> StdConsole<R, W> {
    pub fn from_parts(reader: R, writer: W, interactive: bool) -> Self {
        Self {
            reader,
            writer,
            interactive,
        }
    }

    fn write_prompt(&mut self, prompt: &str) -> Result<(), ConsoleError> {
        write!(self.writer, "{prompt}")?;
        self.writer.flush()?;
        Ok(())
    }

    /// Read one raw line, surfacing end-of-stream as [`ConsoleError::Eof`].
    fn read_raw_line(&mut self) -> Result<String, ConsoleError> {
        let mut line = String::new();
        let read = self.reader.read_line(&mut line)?;
        if read == 0 {
            return Err(ConsoleError::Eof);
        }
        Ok(line)
    }
}

impl<R: BufRead + Send, W: Write + Send> Console for StdConsole<R, W> {
    fn write_line(&mut self, line: &str) -> Result<(), ConsoleError> {
        writeln!(self.writer, "{line}")?;
        Ok(())
    }

    fn prompt_line(&mut self, prompt: &str, max_len: usize) -> Result<String, ConsoleError> {
        self.write_prompt(prompt)?;
        let line = self.read_raw_line()?;
        let line = line.trim();
        if line.is_empty() {
            return Err(ConsoleError::EmptyInput);
        }
        if line.len() > max_len {
            return Err(ConsoleError::TooLong { max: max_len });
        }
        Ok(line.to_string())
    }

    fn prompt_password(&mut self, prompt: &str) -> Result<String, ConsoleError> {
        if self.interactive {
            self.write_prompt(prompt)?;
            let password = rpassword::read_password()?;
            // Suppressed echo swallows the user's newline.
            writeln!(self.writer)?;
            return Ok(password);
        }
        self.write_prompt(prompt)?;
        let line = self.read_raw_line()?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}
