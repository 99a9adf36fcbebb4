//! Closure literals: free-variable analysis and capture plans.

use quill_ir::{Expr, ExprKind, Name, Visitor, Walk};
use tracing::debug;

use super::Generator;
use crate::{
    Arity, Binding, Closure, Code, CompileError, EvalError, Grammar, HostValue, Scope,
    RECORD_PARAM,
};

/// Where a capture slot is copied from when the closure value is created.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum CaptureSource {
    /// Creator's stack frame slot.
    Local(usize),
    /// Creator's own capture array.
    Capture(usize),
    /// The creator itself, when it is a recursive closure.
    Enclosing,
}

impl From<Binding> for CaptureSource {
    fn from(binding: Binding) -> Self {
        match binding {
            Binding::Local(offset) => CaptureSource::Local(offset),
            Binding::Capture(index) => CaptureSource::Capture(index),
            Binding::Recursive => CaptureSource::Enclosing,
        }
    }
}

impl<V: HostValue> Generator<'_, V> {
    /// Compile `params -> body`. `self_name` is the `let` name the closure is
    /// bound to, if any; the body may refer to it recursively.
    pub(crate) fn generate_closure(
        &self,
        params: &[Name],
        body: &Expr<V>,
        scope: &Scope,
        self_name: Option<&Name>,
        line: u32,
    ) -> Result<Code<V>, CompileError> {
        let closures = self.require_closures("closure literal", line)?;
        let free = free_variables(params, body);
        let recursive = self_name
            .filter(|name| free.iter().any(|(free_name, _)| free_name == *name))
            .cloned();

        let record = Name::from(RECORD_PARAM);
        let mut captured: Vec<Name> = Vec::new();
        let mut plan: Vec<CaptureSource> = Vec::new();
        let mut needs_record = false;
        for (name, use_line) in free {
            if recursive.as_ref() == Some(&name) {
                continue;
            }
            match scope.resolve(&name) {
                Some(binding) => {
                    captured.push(name);
                    plan.push(binding.into());
                }
                None if self.grammar.function(&name).is_some() => {}
                None if scope.implicit_record() && scope.resolve(&record).is_some() => {
                    needs_record = true;
                }
                None => {
                    return Err(CompileError::UnknownIdentifier {
                        name,
                        line: use_line,
                    })
                }
            }
        }
        if needs_record && !captured.contains(&record) {
            if let Some(binding) = scope.resolve(&record) {
                captured.push(record);
                plan.push(binding.into());
            }
        }

        let mut inner = scope.closure(&captured, recursive.clone());
        for param in params {
            if inner.is_local(param) {
                return Err(CompileError::DuplicateName {
                    name: param.clone(),
                    line,
                });
            }
            inner = inner.with_local(param.clone());
        }
        let body_code = self.generate(body, &inner)?;
        let arity = Arity::Fixed(params.len());
        let pure = plan.is_empty() && recursive.is_none() && is_pure_body(self.grammar, body);
        debug!(
            params = params.len(),
            captures = plan.len(),
            recursive = recursive.is_some(),
            pure,
            "closure capture plan"
        );

        // A recursive closure reaches itself through its weak self handle, so
        // without captures it is still context-free and built once.
        if plan.is_empty() {
            let value = closures.wrap(Closure::new(arity, body_code, Box::new([]), pure));
            return Ok(Code::constant(value));
        }

        Ok(Code::new(move |stack: &mut crate::Stack<V>, current| {
            let captures = plan
                .iter()
                .map(|source| match *source {
                    CaptureSource::Local(offset) => Ok(stack.local(offset).clone()),
                    CaptureSource::Capture(index) => Ok(current.capture(index).clone()),
                    CaptureSource::Enclosing => current.self_arc().map(|this| closures.wrap(this)),
                })
                .collect::<Result<Box<[V]>, EvalError>>()?;
            Ok(closures.wrap(Closure::new(arity, body_code.clone(), captures, false)))
        }))
    }
}

/// Names referenced by `body` and not bound by `params` or by binders inside
/// `body`, in first-use order, each with the line of its first use.
pub(crate) fn free_variables<V>(params: &[Name], body: &Expr<V>) -> Vec<(Name, u32)> {
    let mut collector = FreeVars {
        bound: params.to_vec(),
        free: Vec::new(),
    };
    body.traverse(&mut collector);
    collector.free
}

struct FreeVars {
    bound: Vec<Name>,
    free: Vec<(Name, u32)>,
}

impl<V> Visitor<V> for FreeVars {
    fn enter(&mut self, expr: &Expr<V>) -> Walk {
        match &expr.kind {
            ExprKind::Ident(name) => {
                let known = self.bound.contains(name) || self.free.iter().any(|(n, _)| n == name);
                if !known {
                    self.free.push((name.clone(), expr.line));
                }
                Walk::Continue
            }
            // A closure value sees its own name; any other value does not.
            ExprKind::Let { name, value, body } => {
                let mark = self.bound.len();
                if value.is_closure() {
                    self.bound.push(name.clone());
                    value.traverse(self);
                } else {
                    value.traverse(self);
                    self.bound.push(name.clone());
                }
                body.traverse(self);
                self.bound.truncate(mark);
                Walk::Skip
            }
            // Nested parameters are visible only inside the nested body.
            ExprKind::Closure { params, body } => {
                let mark = self.bound.len();
                self.bound.extend(params.iter().cloned());
                body.traverse(self);
                self.bound.truncate(mark);
                Walk::Skip
            }
            _ => Walk::Continue,
        }
    }

}

/// A body is pure when it applies only pure operators and pure static
/// functions and performs no dynamic or method calls.
fn is_pure_body<V: HostValue>(grammar: &Grammar<V>, body: &Expr<V>) -> bool {
    let mut check = PurityCheck { grammar, pure: true };
    body.traverse(&mut check);
    check.pure
}

struct PurityCheck<'g, V> {
    grammar: &'g Grammar<V>,
    pure: bool,
}

impl<V: HostValue> Visitor<V> for PurityCheck<'_, V> {
    fn enter(&mut self, expr: &Expr<V>) -> Walk {
        let pure = match &expr.kind {
            ExprKind::Call { .. } | ExprKind::MethodCall { .. } => false,
            ExprKind::Binary { op, .. } => self
                .grammar
                .binary_operator(op)
                .is_some_and(|op| op.is_pure()),
            ExprKind::Unary { op, .. } => self
                .grammar
                .unary_operator(op)
                .is_some_and(|op| op.is_pure()),
            ExprKind::StaticCall { function, .. } => self
                .grammar
                .function(function)
                .is_some_and(|function| function.is_pure()),
            // A nested literal is only a value here; running it needs a call.
            ExprKind::Closure { .. } => return Walk::Skip,
            _ => true,
        };
        self.pure &= pure;
        if self.pure {
            Walk::Continue
        } else {
            Walk::Skip
        }
    }
}
