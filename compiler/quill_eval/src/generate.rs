//! Code generation: AST to nested host closures.
//!
//! Every identifier is resolved here, once, to a frame offset, a capture
//! index, or the running closure itself. Evaluation never looks a name up.
//!
//! Stack discipline: when the code for a node runs, the current frame holds
//! exactly `scope.frame_len()` values. `let` pushes one value around its body
//! and call arguments are collected before the callee frame opens, which
//! keeps every compile-time offset valid.

mod call;
mod closure;

use std::sync::Arc;

use quill_ir::{Expr, ExprKind, Name};
use smallvec::SmallVec;

use crate::errors::at_line;
use crate::{
    Args, Binding, Closure, ClosureHandler, Code, CompileError, EvalError, Grammar, HostValue,
    Scope, RECORD_PARAM,
};

pub(crate) use closure::free_variables;

/// Compiles expressions against one grammar.
pub struct Generator<'g, V> {
    grammar: &'g Grammar<V>,
}

impl<'g, V: HostValue> Generator<'g, V> {
    pub fn new(grammar: &'g Grammar<V>) -> Self {
        Generator { grammar }
    }

    pub fn grammar(&self) -> &'g Grammar<V> {
        self.grammar
    }

    /// Compile `expr` in `scope`, consulting the grammar's hook first.
    pub fn generate(&self, expr: &Expr<V>, scope: &Scope) -> Result<Code<V>, CompileError> {
        quill_stack::ensure_sufficient_stack(|| {
            if let Some(hook) = &self.grammar.hook {
                if let Some(code) = hook.generate(expr, self, scope)? {
                    return Ok(code);
                }
            }
            self.generate_builtin(expr, scope)
        })
    }

    fn generate_builtin(&self, expr: &Expr<V>, scope: &Scope) -> Result<Code<V>, CompileError> {
        let line = expr.line;
        match &expr.kind {
            ExprKind::Literal(lit) => Ok(Code::constant(lit.value.clone())),
            ExprKind::Ident(name) => self.generate_ident(name, scope, line),
            ExprKind::Let { name, value, body } => self.generate_let(name, value, body, scope, line),
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let truthy = self
                    .grammar
                    .truthiness
                    .clone()
                    .ok_or_else(|| CompileError::unsupported("conditional", "a truthiness function", line))?;
                let cond = self.generate(cond, scope)?;
                let then_branch = self.generate(then_branch, scope)?;
                let else_branch = self.generate(else_branch, scope)?;
                Ok(Code::new(move |stack, closure| {
                    let value = cond.run(stack, closure)?;
                    if at_line(truthy(&value), line)? {
                        then_branch.run(stack, closure)
                    } else {
                        else_branch.run(stack, closure)
                    }
                }))
            }
            ExprKind::Switch {
                subject,
                cases,
                default,
            } => {
                let equals = self
                    .grammar
                    .equality
                    .clone()
                    .ok_or_else(|| CompileError::unsupported("switch", "an equality test", line))?;
                let subject = self.generate(subject, scope)?;
                let cases = cases
                    .iter()
                    .map(|case| {
                        Ok((
                            self.generate(&case.value, scope)?,
                            self.generate(&case.result, scope)?,
                        ))
                    })
                    .collect::<Result<Vec<_>, CompileError>>()?;
                let default = self.generate(default, scope)?;
                Ok(Code::new(move |stack, closure| {
                    let subject = subject.run(stack, closure)?;
                    for (value, result) in &cases {
                        let candidate = value.run(stack, closure)?;
                        if at_line(equals(&subject, &candidate), line)? {
                            return result.run(stack, closure);
                        }
                    }
                    default.run(stack, closure)
                }))
            }
            ExprKind::Binary { op, left, right } => {
                let Some(operator) = self.grammar.binary_operator(op).cloned() else {
                    return Err(CompileError::unsupported(
                        format!("operator `{op}`"),
                        "a registered binary operator",
                        line,
                    ));
                };
                let left = self.generate(left, scope)?;
                let right = self.generate(right, scope)?;
                Ok(Code::new(move |stack, closure| {
                    let l = left.run(stack, closure)?;
                    let r = right.run(stack, closure)?;
                    at_line(operator.apply(&l, &r), line)
                }))
            }
            ExprKind::Unary { op, operand } => {
                let Some(operator) = self.grammar.unary_operator(op).cloned() else {
                    return Err(CompileError::unsupported(
                        format!("operator `{op}`"),
                        "a registered unary operator",
                        line,
                    ));
                };
                let operand = self.generate(operand, scope)?;
                Ok(Code::new(move |stack, closure| {
                    let value = operand.run(stack, closure)?;
                    at_line(operator.apply(&value), line)
                }))
            }
            ExprKind::Index { receiver, index } => {
                let lists = self.grammar.lists.clone().ok_or_else(|| {
                    CompileError::unsupported("list access", "a list handler", line)
                })?;
                let receiver = self.generate(receiver, scope)?;
                let index = self.generate(index, scope)?;
                Ok(Code::new(move |stack, closure| {
                    let list = receiver.run(stack, closure)?;
                    let index = index.run(stack, closure)?;
                    if !lists.is_list(&list) {
                        return Err(EvalError::wrong_type("list").at_line(line));
                    }
                    at_line(lists.index(&list, &index), line)
                }))
            }
            ExprKind::Field { receiver, field } => {
                let receiver = self.generate(receiver, scope)?;
                self.field_access(receiver, field.clone(), line)
            }
            ExprKind::MethodCall {
                receiver,
                method,
                args,
            } => self.generate_method_call(receiver, method, args, scope, line),
            ExprKind::Call { callee, args } => self.generate_call(callee, args, scope, line),
            ExprKind::StaticCall { function, args } => {
                self.generate_static_call(function, args, scope, line)
            }
            ExprKind::Closure { params, body } => {
                self.generate_closure(params, body, scope, None, line)
            }
            ExprKind::List(items) => {
                let lists = self.grammar.lists.clone().ok_or_else(|| {
                    CompileError::unsupported("list literal", "a list handler", line)
                })?;
                let items = self.generate_all(items, scope)?;
                Ok(Code::new(move |stack, closure| {
                    let values = run_all(&items, stack, closure)?;
                    at_line(lists.construct(values.into_vec()), line)
                }))
            }
            ExprKind::Map(entries) => {
                let maps = self.grammar.maps.clone().ok_or_else(|| {
                    CompileError::unsupported("map literal", "a map handler", line)
                })?;
                let entries = entries
                    .iter()
                    .map(|entry| Ok((entry.key.clone(), self.generate(&entry.value, scope)?)))
                    .collect::<Result<Vec<_>, CompileError>>()?;
                Ok(Code::new(move |stack, closure| {
                    let mut values = Vec::with_capacity(entries.len());
                    for (key, value) in &entries {
                        values.push((key.clone(), value.run(stack, closure)?));
                    }
                    at_line(maps.construct(values), line)
                }))
            }
        }
    }

    fn generate_ident(&self, name: &Name, scope: &Scope, line: u32) -> Result<Code<V>, CompileError> {
        match scope.resolve(name) {
            Some(Binding::Local(offset)) => {
                Ok(Code::new(move |stack: &mut crate::Stack<V>, _| Ok(stack.local(offset).clone())))
            }
            Some(Binding::Capture(index)) => {
                Ok(Code::new(move |_: &mut crate::Stack<V>, closure| Ok(closure.capture(index).clone())))
            }
            Some(Binding::Recursive) => {
                let closures = self.require_closures("recursive closure", line)?;
                Ok(Code::new(move |_, closure| {
                    Ok(closures.wrap(closure.self_arc()?))
                }))
            }
            None => self.generate_unbound(name, scope, line),
        }
    }

    /// Names not in scope: static functions as values, then fields of the
    /// implicit record.
    fn generate_unbound(&self, name: &Name, scope: &Scope, line: u32) -> Result<Code<V>, CompileError> {
        if let Some(function) = self.grammar.function(name) {
            let closures = self.require_closures(format!("function `{name}` used as a value"), line)?;
            let imp = Arc::clone(function.imp());
            let value = closures.wrap(Closure::native(
                function.arity(),
                function.is_pure(),
                move |args| imp(args),
            ));
            return Ok(Code::constant(value));
        }
        let record = Name::from(RECORD_PARAM);
        if scope.implicit_record() && *name != record && scope.resolve(&record).is_some() {
            let receiver = self.generate_ident(&record, scope, line)?;
            return self.field_access(receiver, name.clone(), line);
        }
        Err(CompileError::UnknownIdentifier {
            name: name.clone(),
            line,
        })
    }

    fn generate_let(
        &self,
        name: &Name,
        value: &Expr<V>,
        body: &Expr<V>,
        scope: &Scope,
        line: u32,
    ) -> Result<Code<V>, CompileError> {
        if scope.is_local(name) {
            return Err(CompileError::DuplicateName {
                name: name.clone(),
                line,
            });
        }
        let value = match &value.kind {
            ExprKind::Closure { params, body } => {
                self.generate_closure(params, body, scope, Some(name), value.line)?
            }
            _ => self.generate(value, scope)?,
        };
        let body = self.generate(body, &scope.with_local(name.clone()))?;
        Ok(Code::new(move |stack, closure| {
            let bound = value.run(stack, closure)?;
            stack.push(bound);
            let result = body.run(stack, closure);
            stack.pop();
            result
        }))
    }

    /// `receiver.field` through the map capability.
    fn field_access(&self, receiver: Code<V>, field: Name, line: u32) -> Result<Code<V>, CompileError> {
        let maps = self
            .grammar
            .maps
            .clone()
            .ok_or_else(|| CompileError::unsupported("map access", "a map handler", line))?;
        Ok(Code::new(move |stack, closure| {
            let map = receiver.run(stack, closure)?;
            if !maps.is_map(&map) {
                return Err(EvalError::wrong_type("map").at_line(line));
            }
            at_line(maps.get(&map, &field), line)
        }))
    }

    fn generate_all(&self, exprs: &[Expr<V>], scope: &Scope) -> Result<Vec<Code<V>>, CompileError> {
        exprs.iter().map(|expr| self.generate(expr, scope)).collect()
    }

    fn require_closures(
        &self,
        construct: impl Into<String>,
        line: u32,
    ) -> Result<Arc<dyn ClosureHandler<V>>, CompileError> {
        self.grammar
            .closures
            .clone()
            .ok_or_else(|| CompileError::unsupported(construct, "a closure handler", line))
    }
}

/// Evaluate `codes` left to right.
pub(crate) fn run_all<V>(
    codes: &[Code<V>],
    stack: &mut crate::Stack<V>,
    closure: &Closure<V>,
) -> Result<Args<V>, EvalError> {
    let mut values = SmallVec::with_capacity(codes.len());
    for code in codes {
        values.push(code.run(stack, closure)?);
    }
    Ok(values)
}
