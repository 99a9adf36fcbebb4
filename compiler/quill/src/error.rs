use quill_diagnostic::{Diagnostic, ErrorCode};
use quill_eval::{CompileError, EvalError};
use thiserror::Error;

/// Either stage's failure, for callers that compile and evaluate in one go.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl Error {
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::Compile(e) => e.code(),
            Error::Eval(e) => e.code(),
        }
    }

    /// 1-based source line, when known.
    pub fn line(&self) -> Option<u32> {
        match self {
            Error::Compile(e) => Some(e.line()),
            Error::Eval(e) => e.line,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Error::Compile(e) => e.to_diagnostic(),
            Error::Eval(e) => e.to_diagnostic(),
        }
    }
}
