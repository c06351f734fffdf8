//! Shared diagnostic formatting for the three Hack translators.
//!
//! Every stage converts its first error into one line on stderr of the form
//! `Error: <kind>: <detail>`, with a `file:line` suffix when the error carries
//! a location. The format is fixed here so the assembler, VM translator, and
//! Jack compiler all report failures the same way.

use std::fmt;

/// A single translator-facing error, ready to print and exit on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: &'static str,
    pub detail: String,
    pub file: Option<String>,
    pub line: Option<usize>,
}

impl Diagnostic {
    #[must_use]
    pub fn new(kind: &'static str, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
            file: None,
            line: None,
        }
    }

    #[must_use]
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    #[must_use]
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error: {}: {}", self.kind, self.detail)?;
        match (&self.file, self.line) {
            (Some(file), Some(line)) => write!(f, " ({file}:{line})"),
            (Some(file), None) => write!(f, " ({file})"),
            (None, Some(line)) => write!(f, " (line {line})"),
            (None, None) => Ok(()),
        }
    }
}

/// Prints a diagnostic to stderr and returns the process exit code for it.
///
/// Every driver's `main` funnels its first error through this so the exit
/// code convention (0 success, 1 any error) stays identical across stages.
#[must_use]
pub fn report(diagnostic: &Diagnostic) -> i32 {
    eprintln!("{diagnostic}");
    1
}
