//! Parse error types.

use quill_diagnostic::{Diagnostic, ErrorCode};
use quill_ir::{Token, TokenFlags, TokenKind};
use thiserror::Error;

/// What went wrong.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("expected {expected}, found {found}")]
    UnexpectedToken { found: String, expected: String },
    /// Input the lexer could not classify, or an unterminated quote.
    #[error("{found}")]
    InvalidToken { found: String, unterminated: bool },
    /// Number text the host number parser rejected.
    #[error("malformed number `{text}`: {reason}")]
    MalformedNumber { text: String, reason: String },
    /// String text the host string constructor rejected.
    #[error("malformed string \"{text}\": {reason}")]
    MalformedString { text: String, reason: String },
}

/// A syntax error with the line it was found on.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub line: u32,
}

impl ParseError {
    /// Error for an unexpected `found` token. Invalid tokens report
    /// themselves rather than what was expected in their place.
    pub fn unexpected(found: &Token, expected: impl Into<String>) -> Self {
        let kind = if found.kind == TokenKind::Invalid {
            ParseErrorKind::InvalidToken {
                found: found.to_string(),
                unterminated: found.flags.contains(TokenFlags::UNTERMINATED),
            }
        } else {
            ParseErrorKind::UnexpectedToken {
                found: found.to_string(),
                expected: expected.into(),
            }
        };
        ParseError {
            kind,
            line: found.line,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match &self.kind {
            ParseErrorKind::InvalidToken {
                unterminated: true, ..
            } => ErrorCode::E0001,
            ParseErrorKind::InvalidToken { .. } => ErrorCode::E0002,
            ParseErrorKind::MalformedNumber { .. } => ErrorCode::E0003,
            ParseErrorKind::MalformedString { .. } => ErrorCode::E0004,
            ParseErrorKind::UnexpectedToken { expected, .. } if expected == "expression" => {
                ErrorCode::E1002
            }
            ParseErrorKind::UnexpectedToken { .. } => ErrorCode::E1001,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.code())
            .with_message(self.kind.to_string())
            .with_line(self.line)
    }
}
