//! Quill - an embeddable expression language.
//!
//! Hosts describe their value type, operators, constants and functions in a
//! [`Grammar`], then compile source text once and evaluate it many times:
//!
//! ```text
//! let grammar = quill::standard_grammar();
//! let area = grammar.compile_with("pi * r ^ 2", &CompileOptions::with_params(["r"]))?;
//! let value = area.evaluate(&[Value::Num(2.0)])?;
//! ```
//!
//! The engine crates are generic over the host value. This crate adds a
//! ready-made one: [`Value`] and the [`standard_grammar`] over it, plus the
//! [`eval`] shortcut and tracing setup for binaries and tests.

mod error;
mod standard;
mod value;

use std::sync::{Once, OnceLock};

pub use error::Error;
pub use standard::{standard_builder, standard_grammar, MAX_CALL_DEPTH};
pub use value::Value;

pub use quill_diagnostic::{Diagnostic, ErrorCode, Severity};
pub use quill_eval::{
    Arity, BinaryOperator, Closure, ClosureHandler, Code, CompileError, CompileOptions, Compiled,
    ConstantFolder, EvalError, EvalErrorKind, GenerateHook, Generator, Grammar, GrammarBuilder,
    HostValue, ListHandler, MapHandler, MethodHandler, Optimizer, Scope, StaticFunction,
    UnaryOperator, RECORD_PARAM,
};
pub use quill_fmt::{format_expr, format_expr_with, FormatConfig};
pub use quill_ir::{Expr, ExprKind, Name};

static STANDARD: OnceLock<Grammar<Value>> = OnceLock::new();

/// Shared instance of [`standard_grammar`].
pub fn standard() -> &'static Grammar<Value> {
    STANDARD.get_or_init(standard_grammar)
}

/// Compile and evaluate a parameterless expression with the standard grammar.
pub fn eval(source: &str) -> Result<Value, Error> {
    Ok(standard().compile(source)?.evaluate(&[])?)
}

static TRACING_INIT: Once = Once::new();

/// Initialize the tracing subscriber.
///
/// Does nothing unless `RUST_LOG` is set. Safe to call more than once.
///
/// ```bash
/// RUST_LOG=quill_eval=debug my-host
/// RUST_LOG=quill_eval=trace,quill_parse=debug my-host
/// ```
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            // A host may already have installed its own subscriber.
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init();
        }
    });
}
