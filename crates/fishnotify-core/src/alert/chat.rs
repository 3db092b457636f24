//! Text output collaborator.

use std::fmt::Write as _;
use std::io::Write;

use owo_colors::OwoColorize;
use tracing::debug;

/// A run of text, optionally highlighted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub highlight: bool,
}

/// Plain text with inline highlighted runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledMessage {
    segments: Vec<Segment>,
}

impl StyledMessage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.segments.push(Segment {
            text: text.into(),
            highlight: false,
        });
        self
    }

    pub fn highlight(mut self, text: impl Into<String>) -> Self {
        self.segments.push(Segment {
            text: text.into(),
            highlight: true,
        });
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The message without styling.
    pub fn plain_text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    /// The message with ANSI colors for a terminal.
    pub fn render_ansi(&self) -> String {
        let mut output = String::new();
        for segment in &self.segments {
            if segment.highlight {
                let _ = write!(output, "{}", segment.text.bright_cyan().bold());
            } else {
                output.push_str(&segment.text);
            }
        }
        output
    }
}

impl std::fmt::Display for StyledMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.plain_text())
    }
}

/// Fire-and-forget text output.
pub trait ChatSink {
    fn print(&mut self, message: &StyledMessage);
}

/// Prints messages to a terminal, colored unless disabled.
pub struct ConsoleChat<W: Write> {
    out: W,
    color: bool,
}

impl ConsoleChat<std::io::Stdout> {
    pub fn stdout(color: bool) -> Self {
        Self::new(std::io::stdout(), color)
    }
}

impl<W: Write> ConsoleChat<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ChatSink for ConsoleChat<W> {
    fn print(&mut self, message: &StyledMessage) {
        let line = if self.color {
            message.render_ansi()
        } else {
            message.plain_text()
        };
        if let Err(e) = writeln!(self.out, "{}", line) {
            debug!("Failed to print chat message: {}", e);
        }
    }
}
