use crate::services::StatusSink;
use colored::Colorize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Warning,
    Failure,
}

impl StatusKind {
    pub fn icon(self) -> &'static str {
        match self {
            StatusKind::Success => "✓",
            StatusKind::Warning => "!",
            StatusKind::Failure => "X",
        }
    }
}

/// One status line, rendered as `<icon> <message>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub kind: StatusKind,
    pub message: String,
}

impl StatusLine {
    pub fn new(kind: StatusKind, message: &str) -> Self {
        Self {
            kind,
            message: message.to_string(),
        }
    }

    /// Same as `Display`, with the icon colored for the terminal.
    pub fn colored(&self) -> String {
        let icon = match self.kind {
            StatusKind::Success => self.kind.icon().green(),
            StatusKind::Warning => self.kind.icon().yellow(),
            StatusKind::Failure => self.kind.icon().red(),
        };
        format!("{} {}", icon, self.message)
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.icon(), self.message)
    }
}

/// Writes status lines to stderr with colored icons.
#[derive(Debug, Default)]
pub struct TerminalStatus;

impl TerminalStatus {
    fn emit(&self, kind: StatusKind, message: &str) {
        eprintln!("{}", StatusLine::new(kind, message).colored());
    }
}

impl StatusSink for TerminalStatus {
    fn success(&self, message: &str) {
        self.emit(StatusKind::Success, message);
    }

    fn warning(&self, message: &str) {
        self.emit(StatusKind::Warning, message);
    }

    fn failure(&self, message: &str) {
        self.emit(StatusKind::Failure, message);
    }
}
