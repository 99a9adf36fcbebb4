//! Optional host capabilities.
//!
//! Each trait is one small interface the host may plug in. A grammar without
//! a capability still parses the constructs that need it; generating code for
//! them fails with `CompileError::Unsupported`.

use std::sync::Arc;

use quill_ir::{Expr, Name};

use crate::{Closure, Code, CompileError, EvalError, Generator, Scope};

/// List literals and `list[index]`.
pub trait ListHandler<V>: Send + Sync {
    fn construct(&self, items: Vec<V>) -> Result<V, EvalError>;
    fn index(&self, list: &V, index: &V) -> Result<V, EvalError>;
    fn is_list(&self, value: &V) -> bool;
}

/// Map literals and `map.key`.
pub trait MapHandler<V>: Send + Sync {
    fn construct(&self, entries: Vec<(Name, V)>) -> Result<V, EvalError>;
    /// Missing keys should be reported with `EvalError::undefined_field`.
    fn get(&self, map: &V, key: &Name) -> Result<V, EvalError>;
    fn is_map(&self, value: &V) -> bool;
}

/// Conversion between closures and host values. Needed for closure literals,
/// dynamic calls, and static functions used as values.
pub trait ClosureHandler<V>: Send + Sync {
    fn wrap(&self, closure: Arc<Closure<V>>) -> V;
    fn extract(&self, value: &V) -> Option<Arc<Closure<V>>>;
}

/// `receiver.method(args)` when the receiver is not a map holding a function
/// under that key.
pub trait MethodHandler<V>: Send + Sync {
    /// Report unknown methods with `EvalError::undefined_method`.
    fn call_method(&self, receiver: &V, method: &Name, args: Vec<V>) -> Result<V, EvalError>;
}

/// Custom code generation, consulted for every node before the built-in
/// rules. Returning `Ok(None)` falls through to the built-in generation.
///
/// Use [`Generator::generate`] to compile child expressions in `scope`.
pub trait GenerateHook<V>: Send + Sync {
    fn generate(
        &self,
        expr: &Expr<V>,
        generator: &Generator<'_, V>,
        scope: &Scope,
    ) -> Result<Option<Code<V>>, CompileError>;
}
