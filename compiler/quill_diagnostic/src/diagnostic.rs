use std::fmt::{self, Write};

use crate::ErrorCode;

/// Severity level for diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// A rendered-ready report: code, message, the source line it points at, and
/// any trailing notes.
///
/// Expression sources are short and carry no column information, so the
/// location is a 1-based line number only.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    pub message: String,
    pub line: Option<u32>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn error(code: ErrorCode) -> Self {
        Diagnostic {
            code,
            severity: Severity::Error,
            message: code.description().to_string(),
            line: None,
            notes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    #[must_use]
    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Render with the offending source line quoted beneath the header.
    ///
    /// ```text
    /// error[E1001]: expected `)`, found end of input
    ///  --> line 2
    ///   |
    /// 2 |   (a +
    ///   |
    ///   = note: ...
    /// ```
    pub fn render(&self, source: &str) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_to(&mut out, source);
        out
    }

    fn write_to(&self, out: &mut String, source: &str) -> fmt::Result {
        writeln!(out, "{self}")?;
        let quoted = self.line.and_then(|line| {
            let index = usize::try_from(line).ok()?.checked_sub(1)?;
            source.lines().nth(index).map(|text| (line, text))
        });
        let gutter = quoted.map_or(1, |(line, _)| line.to_string().len());
        if let Some((line, text)) = quoted {
            writeln!(out, "{:gutter$}--> line {line}", "")?;
            writeln!(out, "{:gutter$} |", "")?;
            writeln!(out, "{line} | {text}")?;
            writeln!(out, "{:gutter$} |", "")?;
        }
        for note in &self.notes {
            writeln!(out, "{:gutter$} = note: {note}", "")?;
        }
        Ok(())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)
    }
}
