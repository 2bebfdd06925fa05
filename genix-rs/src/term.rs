//! Console plumbing shared by the interactive applications.
//!
//! [`Console`] bundles the input, output and error streams so that every
//! application loop can be driven from a real terminal or from in-memory
//! buffers in tests.  [`Styler`] adds crossterm colouring when, and only
//! when, stdout is a terminal.

use std::io::{self, BufRead, IsTerminal, Write};

use crossterm::style::{StyledContent, Stylize};

// ── ColorMode ─────────────────────────────────────────────────────────────────

/// The `color` setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Colour only when stdout is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Some(ColorMode::Auto),
            "on" | "always" | "yes" | "1" => Some(ColorMode::Always),
            "off" | "never" | "no" | "0" => Some(ColorMode::Never),
            _ => None,
        }
    }
}

// ── Styler ────────────────────────────────────────────────────────────────────

/// Applies ANSI styling to fragments of output, or passes them through.
#[derive(Debug, Clone, Copy, Default)]
pub struct Styler {
    enabled: bool,
}

impl Styler {
    /// A styler that never emits escape sequences.
    pub fn plain() -> Self {
        Styler { enabled: false }
    }

    /// Resolve `mode` against the real stdout.
    pub fn detect(mode: ColorMode) -> Self {
        let enabled = match mode {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => io::stdout().is_terminal(),
        };
        Styler { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn paint(&self, text: &str, f: impl FnOnce(StyledContent<&str>) -> StyledContent<&str>) -> String {
        if self.enabled {
            f(text.stylize()).to_string()
        } else {
            text.to_owned()
        }
    }

    /// A calendar day that has events.
    pub fn event_day(&self, text: &str) -> String {
        self.paint(text, |s| s.yellow().bold())
    }

    /// Today's date in the calendar grid.
    pub fn today(&self, text: &str) -> String {
        self.paint(text, |s| s.reverse())
    }

    /// The `Error:` label.
    pub fn error_label(&self) -> String {
        self.paint("Error:", |s| s.red().bold())
    }
}

// ── Console ───────────────────────────────────────────────────────────────────

/// Input and output streams for one interactive session.
pub struct Console<'a> {
    pub input: &'a mut dyn BufRead,
    pub out: &'a mut dyn Write,
    pub err: &'a mut dyn Write,
    pub styler: Styler,
}

impl<'a> Console<'a> {
    pub fn new(
        input: &'a mut dyn BufRead,
        out: &'a mut dyn Write,
        err: &'a mut dyn Write,
        styler: Styler,
    ) -> Self {
        Console { input, out, err, styler }
    }

    /// Read one line with trailing CR/LF removed.  `None` at end of input.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    /// Print `text` without a newline, flush, and read the answer.
    pub fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.out, "{text}")?;
        self.out.flush()?;
        self.read_line()
    }

    /// Write `Error: <message>` to the error stream.
    pub fn error(&mut self, message: impl std::fmt::Display) -> io::Result<()> {
        let label = self.styler.error_label();
        writeln!(self.err, "{label} {message}")
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
