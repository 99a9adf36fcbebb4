//! Quill evaluator: grammar registry, closure compiler and optimizer.
//!
//! A host builds a [`Grammar`] for its own value type, then compiles source
//! text into [`Compiled`] expressions:
//!
//! ```text
//! source --parse--> Expr<V> --optimize--> Expr<V> --generate--> Compiled<V>
//! ```
//!
//! # Architecture
//!
//! - [`GrammarBuilder`]: operator levels, constants, static functions,
//!   literal parsers and optional capabilities; frozen by `build()`
//! - [`Generator`]: resolves names to frame offsets and capture indices and
//!   produces [`Code`], nested host closures
//! - [`Scope`]: immutable compile-time scope, extended by copy
//! - [`Stack`]: runtime value stack sliced into call frames
//! - [`Closure`]: callable value with a private capture array
//! - [`ConstantFolder`]: default [`Optimizer`]
//!
//! Compiled code and grammars are immutable and `Send + Sync`; each
//! evaluation uses its own stack, so one compiled expression may be
//! evaluated from many threads at once.

mod capability;
mod closure;
mod errors;
mod generate;
mod grammar;
mod optimize;
mod scope;
mod stack;

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod test_support;

use std::fmt;

pub use capability::{ClosureHandler, GenerateHook, ListHandler, MapHandler, MethodHandler};
pub use closure::{Args, Closure, Code, Compiled};
pub use errors::{Arity, CompileError, EvalError, EvalErrorKind};
pub use generate::Generator;
pub use grammar::{
    BinaryOperator, CompileOptions, Grammar, GrammarBuilder, StaticFunction, UnaryOperator,
    RECORD_PARAM,
};
pub use optimize::{ConstantFolder, Optimizer};
pub use scope::{Binding, Scope};
pub use stack::Stack;

/// Requirements on a host value type.
///
/// `Display` renders folded literals; `Send + Sync` lets compiled code be
/// shared across threads.
pub trait HostValue: Clone + fmt::Debug + fmt::Display + Send + Sync + 'static {}

impl<T> HostValue for T where T: Clone + fmt::Debug + fmt::Display + Send + Sync + 'static {}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
