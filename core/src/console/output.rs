//! Output log — the append-only line buffer command handlers write to.
//!
//! Handlers never touch the terminal directly. They write through the
//! [`OutputSink`] trait, and the concrete [`OutputLog`] is rendered by
//! whatever frontend is attached (the TUI, or nothing at all in tests).
//! Lines are only ever appended; the log scrolls, it does not mutate.

use serde::{Deserialize, Serialize};


/// A display color for output lines.
///
/// Mirrors the terminal's named colors plus 24-bit RGB for theme accents.
/// `Default` means "whatever the ambient text color is".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Default,
    Red,
    Green,
    Yellow,
    Blue,
    Cyan,
    Magenta,
    White,
    Rgb(u8, u8, u8),
}


/// The colors the dispatcher and builtins use for their own lines.
///
/// Defaults are the solarized accents the console has always used: base
/// text for the prompt echo, yellow for warnings, red for errors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub echo: Color,
    pub warning: Color,
    pub error: Color,
}


impl Default for Palette {
    fn default() -> Self {
        Palette {
            echo: Color::Rgb(0x83, 0x94, 0x96),
            warning: Color::Rgb(0xb5, 0x89, 0x00),
            error: Color::Rgb(0xdc, 0x32, 0x2f),
        }
    }
}


/// One rendered line in the output log. Never mutated after append.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputLine {
    pub text: String,
    pub color: Option<Color>,
}


/// The write surface handed to command handlers.
///
/// Lines are rendered verbatim — callers are responsible for their own
/// escaping; the sink does not sanitize. Unless suppressed, one empty line
/// is appended after the given lines (the visual spacing convention between
/// command outputs). Every write scrolls the view to its end.
pub trait OutputSink {
    /// Append a batch of lines, all styled with `color` (or the ambient
    /// style when `None`).
    fn write_all(&mut self, lines: &[String], color: Option<Color>, suppress_trailing_blank: bool);

    /// Append a single line followed by the usual trailing blank.
    fn write_line(&mut self, line: &str, color: Option<Color>) {
        self.write_all(&[line.to_string()], color, false);
    }
}


/// The concrete output log: an append-only `Vec<OutputLine>` plus a
/// scroll position expressed as lines scrolled back from the end
/// (0 = pinned to the bottom).
#[derive(Debug, Default)]
pub struct OutputLog {
    lines: Vec<OutputLine>,
    scroll_back: usize,
}


impl OutputLog {
    pub fn new() -> Self {
        OutputLog::default()
    }

    /// All lines appended so far, in order.
    pub fn lines(&self) -> &[OutputLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// How many lines the view is scrolled back from the end.
    pub fn scroll_back(&self) -> usize {
        self.scroll_back
    }

    /// Scroll the view up (towards older lines), clamped to the log length.
    pub fn scroll_up(&mut self, n: usize) {
        self.scroll_back = (self.scroll_back + n).min(self.lines.len());
    }

    /// Scroll the view down (towards the end).
    pub fn scroll_down(&mut self, n: usize) {
        self.scroll_back = self.scroll_back.saturating_sub(n);
    }
}


impl OutputSink for OutputLog {
    fn write_all(&mut self, lines: &[String], color: Option<Color>, suppress_trailing_blank: bool) {
        for line in lines {
            self.lines.push(OutputLine {
                text: line.clone(),
                color,
            });
        }
        if !suppress_trailing_blank {
            self.lines.push(OutputLine {
                text: String::new(),
                color,
            });
        }
        // Every write snaps the view back to the end.
        self.scroll_back = 0;
    }
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
