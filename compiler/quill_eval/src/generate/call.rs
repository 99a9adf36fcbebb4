//! Static calls, dynamic calls, and method calls.

use quill_ir::{Expr, Name};

use super::{run_all, Generator};
use crate::errors::at_line;
use crate::{Code, CompileError, EvalError, HostValue, Scope};

impl<V: HostValue> Generator<'_, V> {
    /// Call of a registered function; arity is checked here, at compile time.
    pub(super) fn generate_static_call(
        &self,
        function: &Name,
        args: &[Expr<V>],
        scope: &Scope,
        line: u32,
    ) -> Result<Code<V>, CompileError> {
        let Some(function_def) = self.grammar.function(function).cloned() else {
            return Err(CompileError::UnknownIdentifier {
                name: function.clone(),
                line,
            });
        };
        if !function_def.arity().accepts(args.len()) {
            return Err(CompileError::ArityMismatch {
                name: function.clone(),
                expected: function_def.arity(),
                found: args.len(),
                line,
            });
        }
        let args = self.generate_all(args, scope)?;
        Ok(Code::new(move |stack, closure| {
            let values = run_all(&args, stack, closure)?;
            at_line(function_def.apply(&values), line)
        }))
    }

    /// Call of a computed value. The callee is only known at evaluation, so
    /// callability and arity are checked then.
    pub(super) fn generate_call(
        &self,
        callee: &Expr<V>,
        args: &[Expr<V>],
        scope: &Scope,
        line: u32,
    ) -> Result<Code<V>, CompileError> {
        let closures = self.require_closures("function call", line)?;
        let callee = self.generate(callee, scope)?;
        let args = self.generate_all(args, scope)?;
        Ok(Code::new(move |stack, closure| {
            let target = callee.run(stack, closure)?;
            let Some(function) = closures.extract(&target) else {
                return Err(EvalError::not_callable().at_line(line));
            };
            let values = run_all(&args, stack, closure)?;
            at_line(function.invoke(stack, values), line)
        }))
    }

    /// `receiver.method(args)`: a function stored under `method` in a map
    /// receiver wins; otherwise the host method handler decides.
    pub(super) fn generate_method_call(
        &self,
        receiver: &Expr<V>,
        method: &Name,
        args: &[Expr<V>],
        scope: &Scope,
        line: u32,
    ) -> Result<Code<V>, CompileError> {
        let map_functions = self.grammar.maps.clone().zip(self.grammar.closures.clone());
        let methods = self.grammar.methods.clone();
        if map_functions.is_none() && methods.is_none() {
            return Err(CompileError::unsupported(
                format!("method call `.{method}()`"),
                "a method handler, or map and closure handlers",
                line,
            ));
        }
        let receiver = self.generate(receiver, scope)?;
        let args = self.generate_all(args, scope)?;
        let method = method.clone();
        Ok(Code::new(move |stack, closure| {
            let target = receiver.run(stack, closure)?;
            let values = run_all(&args, stack, closure)?;
            if let Some((maps, closures)) = &map_functions {
                if maps.is_map(&target) {
                    let function = maps
                        .get(&target, &method)
                        .ok()
                        .and_then(|field| closures.extract(&field));
                    if let Some(function) = function {
                        return at_line(function.invoke(stack, values), line);
                    }
                }
            }
            match &methods {
                Some(methods) => {
                    at_line(methods.call_method(&target, &method, values.into_vec()), line)
                }
                None => Err(EvalError::undefined_method(&method).at_line(line)),
            }
        }))
    }
}
