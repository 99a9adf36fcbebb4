//! Diagnostics shared by every quill pipeline stage.
//!
//! Each stage keeps its own typed error (`ParseError`, `CompileError`,
//! `EvalError`) and converts it into a [`Diagnostic`] for display. The
//! [`ErrorCode`] identifies the failure class independently of the message.

mod diagnostic;
mod error_code;

pub use diagnostic::{Diagnostic, Severity};
pub use error_code::ErrorCode;
