//! Constant folding.
//!
//! The optimizer is a single-node rewrite applied bottom-up to a fixpoint
//! (see `Expr::optimize`). It knows nothing about the value type beyond the
//! grammar's handlers and purity/commutativity flags. Any handler failure
//! during a fold abandons that fold and leaves the subtree as it was, so a
//! runtime error stays a runtime error.
//!
//! Folding `if`/`switch` on a literal discards the untaken branches, even
//! ones that would fail if evaluated.

use quill_ir::{Expr, ExprKind, Literal, MapEntry, Name, SwitchCase};

use crate::generate::free_variables;
use crate::{Arity, BinaryOperator, Closure, Generator, Grammar, HostValue, Scope};

/// Replaceable AST optimizer.
pub trait Optimizer<V>: Send + Sync {
    /// Replacement for `expr`, or `None` when it is final.
    fn rewrite(&self, expr: &Expr<V>, grammar: &Grammar<V>) -> Option<ExprKind<V>>;
}

/// The default optimizer: folds pure operations over literals.
#[derive(Copy, Clone, Debug, Default)]
pub struct ConstantFolder;

impl<V: HostValue> Optimizer<V> for ConstantFolder {
    fn rewrite(&self, expr: &Expr<V>, grammar: &Grammar<V>) -> Option<ExprKind<V>> {
        match &expr.kind {
            ExprKind::Binary { op, left, right } => fold_binary(grammar, op, left, right),
            ExprKind::Unary { op, operand } => {
                let operator = grammar.unary_operator(op).filter(|op| op.is_pure())?;
                operator.apply(operand.as_literal()?).ok().map(literal)
            }
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let taken = if grammar.truthy(cond.as_literal()?).ok()? {
                    then_branch
                } else {
                    else_branch
                };
                Some(taken.kind.clone())
            }
            ExprKind::Switch {
                subject,
                cases,
                default,
            } => fold_switch(grammar, subject, cases, default),
            ExprKind::List(items) => {
                let values = literal_values(items)?;
                grammar.lists()?.construct(values).ok().map(literal)
            }
            ExprKind::Map(entries) => fold_map(grammar, entries),
            ExprKind::StaticCall { function, args } => {
                let function = grammar.function(function).filter(|f| f.is_pure())?;
                if !function.arity().accepts(args.len()) {
                    return None;
                }
                function.apply(&literal_values(args)?).ok().map(literal)
            }
            ExprKind::Call { callee, args } => {
                let function = grammar.closures()?.extract(callee.as_literal()?)?;
                if !function.is_pure() || !function.arity().accepts(args.len()) {
                    return None;
                }
                function
                    .call_limited(&literal_values(args)?, grammar.max_call_depth())
                    .ok()
                    .map(literal)
            }
            ExprKind::Closure { params, body } => fold_closure(grammar, expr, params, body),
            _ => None,
        }
    }
}

fn literal<V>(value: V) -> ExprKind<V> {
    ExprKind::Literal(Literal { value, text: None })
}

fn literal_values<V: Clone>(exprs: &[Expr<V>]) -> Option<Vec<V>> {
    exprs.iter().map(|e| e.as_literal().cloned()).collect()
}

fn fold_binary<V: HostValue>(
    grammar: &Grammar<V>,
    op: &Name,
    left: &Expr<V>,
    right: &Expr<V>,
) -> Option<ExprKind<V>> {
    let operator = grammar.binary_operator(op).filter(|op| op.is_pure())?;
    match (left.as_literal(), right.as_literal()) {
        (Some(l), Some(r)) => operator.apply(l, r).ok().map(literal),
        (Some(l), None) if operator.is_commutative() => reassociate(operator, l, right),
        (None, Some(r)) if operator.is_commutative() => reassociate(operator, r, left),
        _ => None,
    }
}

/// `lit1 op (lit2 op x)` (any operand order) becomes `(lit1 op lit2) op x`,
/// so literals separated by a variable still combine.
fn reassociate<V: HostValue>(
    operator: &BinaryOperator<V>,
    outer: &V,
    other: &Expr<V>,
) -> Option<ExprKind<V>> {
    let ExprKind::Binary { op, left, right } = &other.kind else {
        return None;
    };
    if op != operator.name() {
        return None;
    }
    let (inner, rest) = match (left.as_literal(), right.as_literal()) {
        (Some(l), None) => (l, right),
        (None, Some(r)) => (r, left),
        _ => return None,
    };
    let combined = operator.apply(outer, inner).ok()?;
    Some(ExprKind::Binary {
        op: op.clone(),
        left: Box::new(Expr::literal(combined, None, other.line)),
        right: rest.clone(),
    })
}

/// Cases are tried in order; a non-literal case value stops folding since
/// its match is unknown.
fn fold_switch<V: HostValue>(
    grammar: &Grammar<V>,
    subject: &Expr<V>,
    cases: &[SwitchCase<V>],
    default: &Expr<V>,
) -> Option<ExprKind<V>> {
    let subject = subject.as_literal()?;
    for case in cases {
        if grammar.equals(subject, case.value.as_literal()?).ok()? {
            return Some(case.result.kind.clone());
        }
    }
    Some(default.kind.clone())
}

fn fold_map<V: HostValue>(grammar: &Grammar<V>, entries: &[MapEntry<V>]) -> Option<ExprKind<V>> {
    let values = entries
        .iter()
        .map(|entry| Some((entry.key.clone(), entry.value.as_literal()?.clone())))
        .collect::<Option<Vec<_>>>()?;
    grammar.maps()?.construct(values).ok().map(literal)
}

/// A closure literal with no free variables (static functions aside) becomes
/// a closure value. The literal keeps the closure's source rendering.
fn fold_closure<V: HostValue>(
    grammar: &Grammar<V>,
    expr: &Expr<V>,
    params: &[Name],
    body: &Expr<V>,
) -> Option<ExprKind<V>> {
    grammar.closures()?;
    let free = free_variables(params, body);
    if free.iter().any(|(name, _)| grammar.function(name).is_none()) {
        return None;
    }
    let code = Generator::new(grammar)
        .generate_closure(params, body, &Scope::root(false), None, expr.line)
        .ok()?;
    let value = Closure::new(Arity::Fixed(0), code, Box::new([]), false)
        .call(&[])
        .ok()?;
    Some(ExprKind::Literal(Literal {
        value,
        text: Some(Name::from(format!("({expr})"))),
    }))
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
