//! Compile-time and evaluation-time errors.
//!
//! The two phases never mix: [`CompileError`] aborts compilation with no
//! partial result, [`EvalError`] is the `Err` of one evaluation.

use std::fmt;

use quill_diagnostic::{Diagnostic, ErrorCode};
use quill_ir::Name;
use quill_parse::ParseError;
use thiserror::Error;

/// Number of arguments a function accepts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Arity {
    Fixed(usize),
    Any,
}

impl Arity {
    #[inline]
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Fixed(n) => n == count,
            Arity::Any => true,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Fixed(1) => write!(f, "1 argument"),
            Arity::Fixed(n) => write!(f, "{n} arguments"),
            Arity::Any => write!(f, "any number of arguments"),
        }
    }
}

/// Errors that abort compilation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("line {line}: unknown identifier `{name}`")]
    UnknownIdentifier { name: Name, line: u32 },
    #[error("line {line}: `{name}` is already defined in this scope")]
    DuplicateName { name: Name, line: u32 },
    /// A registered static function called with the wrong argument count.
    #[error("line {line}: `{name}` expects {expected}, found {found}")]
    ArityMismatch {
        name: Name,
        expected: Arity,
        found: usize,
        line: u32,
    },
    /// The grammar lacks a capability (or operator) this construct needs.
    #[error("line {line}: {construct} requires {requirement}")]
    Unsupported {
        construct: String,
        requirement: String,
        line: u32,
    },
}

impl CompileError {
    pub(crate) fn unsupported(
        construct: impl Into<String>,
        requirement: impl Into<String>,
        line: u32,
    ) -> Self {
        CompileError::Unsupported {
            construct: construct.into(),
            requirement: requirement.into(),
            line,
        }
    }

    pub fn line(&self) -> u32 {
        match self {
            CompileError::Parse(err) => err.line,
            CompileError::UnknownIdentifier { line, .. }
            | CompileError::DuplicateName { line, .. }
            | CompileError::ArityMismatch { line, .. }
            | CompileError::Unsupported { line, .. } => *line,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            CompileError::Parse(err) => err.code(),
            CompileError::UnknownIdentifier { .. } => ErrorCode::E2001,
            CompileError::DuplicateName { .. } => ErrorCode::E2002,
            CompileError::ArityMismatch { .. } => ErrorCode::E2003,
            CompileError::Unsupported { .. } => ErrorCode::E2004,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            CompileError::Parse(err) => err.to_diagnostic(),
            CompileError::UnknownIdentifier { name, line } => Diagnostic::error(self.code())
                .with_message(format!("unknown identifier `{name}`"))
                .with_line(*line),
            CompileError::DuplicateName { name, line } => Diagnostic::error(self.code())
                .with_message(format!("`{name}` is already defined in this scope"))
                .with_line(*line)
                .with_note("shadowing is allowed in nested closures, not in the same scope"),
            CompileError::ArityMismatch {
                name,
                expected,
                found,
                line,
            } => Diagnostic::error(self.code())
                .with_message(format!("`{name}` expects {expected}, found {found}"))
                .with_line(*line),
            CompileError::Unsupported {
                construct,
                requirement,
                line,
            } => Diagnostic::error(self.code())
                .with_message(format!("{construct} requires {requirement}"))
                .with_line(*line),
        }
    }
}

/// Evaluation error category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    NotCallable,
    ArityMismatch { expected: Arity, got: usize },
    UndefinedField { field: Name },
    UndefinedMethod { method: Name },
    /// A list or map operation received some other kind of value.
    WrongType { expected: &'static str },
    /// The configured call depth limit was reached.
    StackOverflow { depth: usize },
    /// Host code panicked; the payload message if it was a string.
    Panicked { message: String },
    /// Failure reported by a host handler.
    Custom { message: String },
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotCallable => write!(f, "value is not a function"),
            Self::ArityMismatch { expected, got } => {
                write!(f, "function expects {expected}, called with {got}")
            }
            Self::UndefinedField { field } => write!(f, "undefined field `{field}`"),
            Self::UndefinedMethod { method } => write!(f, "no method `{method}`"),
            Self::WrongType { expected } => write!(f, "expected a {expected}"),
            Self::StackOverflow { depth } => write!(f, "call depth limit of {depth} exceeded"),
            Self::Panicked { message } => write!(f, "evaluation panicked: {message}"),
            Self::Custom { message } => write!(f, "{message}"),
        }
    }
}

/// Evaluation error, stamped with the line of the innermost expression that
/// observed it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub line: Option<u32>,
}

impl EvalError {
    /// Error with a free-form message, for host handlers.
    pub fn new(message: impl Into<String>) -> Self {
        Self::from_kind(EvalErrorKind::Custom {
            message: message.into(),
        })
    }

    pub fn from_kind(kind: EvalErrorKind) -> Self {
        EvalError { kind, line: None }
    }

    pub fn not_callable() -> Self {
        Self::from_kind(EvalErrorKind::NotCallable)
    }

    pub fn arity_mismatch(expected: Arity, got: usize) -> Self {
        Self::from_kind(EvalErrorKind::ArityMismatch { expected, got })
    }

    pub fn undefined_field(field: &Name) -> Self {
        Self::from_kind(EvalErrorKind::UndefinedField {
            field: field.clone(),
        })
    }

    pub fn undefined_method(method: &Name) -> Self {
        Self::from_kind(EvalErrorKind::UndefinedMethod {
            method: method.clone(),
        })
    }

    pub fn wrong_type(expected: &'static str) -> Self {
        Self::from_kind(EvalErrorKind::WrongType { expected })
    }

    pub fn stack_overflow(depth: usize) -> Self {
        Self::from_kind(EvalErrorKind::StackOverflow { depth })
    }

    pub fn panicked(message: impl Into<String>) -> Self {
        Self::from_kind(EvalErrorKind::Panicked {
            message: message.into(),
        })
    }

    /// Set the line unless an inner expression already did.
    #[must_use]
    pub fn at_line(mut self, line: u32) -> Self {
        self.line.get_or_insert(line);
        self
    }

    pub fn code(&self) -> ErrorCode {
        match self.kind {
            EvalErrorKind::NotCallable => ErrorCode::E3001,
            EvalErrorKind::ArityMismatch { .. } => ErrorCode::E3002,
            EvalErrorKind::UndefinedField { .. } => ErrorCode::E3003,
            EvalErrorKind::UndefinedMethod { .. } => ErrorCode::E3004,
            EvalErrorKind::StackOverflow { .. } => ErrorCode::E3005,
            EvalErrorKind::Custom { .. } => ErrorCode::E3006,
            EvalErrorKind::WrongType { .. } => ErrorCode::E3007,
            EvalErrorKind::Panicked { .. } => ErrorCode::E9001,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code()).with_message(self.kind.to_string());
        match self.line {
            Some(line) => diag.with_line(line),
            None => diag,
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {line}: {}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for EvalError {}

/// Stamp `line` onto errors from `result`.
#[inline]
pub(crate) fn at_line<T>(result: Result<T, EvalError>, line: u32) -> Result<T, EvalError> {
    result.map_err(|err| err.at_line(line))
}

#[cfg(test)]
mod tests;
