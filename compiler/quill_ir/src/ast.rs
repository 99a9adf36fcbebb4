//! Expression AST.
//!
//! `Expr<V>` is generic over the host value type: literals hold host values
//! directly, produced by the host's number parser, string constructor or
//! constant table at parse time, or by an optimizer fold.
//!
//! Equality ignores the source line: two trees are equal when their shapes,
//! names and literal values agree.

use crate::Name;

/// A literal host value, with the source text it was parsed from.
///
/// `text` is what rendering prints. Literals created by folding have no source
/// form unless the optimizer supplies one; those render through the value's
/// `Display`.
#[derive(Clone, Debug, PartialEq)]
pub struct Literal<V> {
    pub value: V,
    pub text: Option<Name>,
}

/// `case value: result` arm of a `switch`.
#[derive(Clone, Debug, PartialEq)]
pub struct SwitchCase<V> {
    pub value: Expr<V>,
    pub result: Expr<V>,
}

/// `key: value` entry of a map literal.
#[derive(Clone, Debug, PartialEq)]
pub struct MapEntry<V> {
    pub key: Name,
    pub value: Expr<V>,
}

/// An expression node: a kind plus the 1-based source line it started on.
#[derive(Clone, Debug)]
pub struct Expr<V> {
    pub kind: ExprKind<V>,
    pub line: u32,
}

/// Expression kinds.
#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind<V> {
    Literal(Literal<V>),
    Ident(Name),
    /// `let name = value; body`
    Let {
        name: Name,
        value: Box<Expr<V>>,
        body: Box<Expr<V>>,
    },
    /// `if cond then then_branch else else_branch`
    If {
        cond: Box<Expr<V>>,
        then_branch: Box<Expr<V>>,
        else_branch: Box<Expr<V>>,
    },
    /// `switch subject case c1: r1 ... default d`
    Switch {
        subject: Box<Expr<V>>,
        cases: Vec<SwitchCase<V>>,
        default: Box<Expr<V>>,
    },
    Binary {
        op: Name,
        left: Box<Expr<V>>,
        right: Box<Expr<V>>,
    },
    Unary {
        op: Name,
        operand: Box<Expr<V>>,
    },
    /// `receiver[index]`
    Index {
        receiver: Box<Expr<V>>,
        index: Box<Expr<V>>,
    },
    /// `receiver.field`
    Field {
        receiver: Box<Expr<V>>,
        field: Name,
    },
    /// `receiver.method(args)`
    MethodCall {
        receiver: Box<Expr<V>>,
        method: Name,
        args: Vec<Expr<V>>,
    },
    /// Call of a computed function value: `callee(args)`.
    Call {
        callee: Box<Expr<V>>,
        args: Vec<Expr<V>>,
    },
    /// Call of a host-registered static function, recognized at parse time.
    StaticCall { function: Name, args: Vec<Expr<V>> },
    /// `x -> body`, `(x, y) -> body`, `() -> body`
    Closure { params: Vec<Name>, body: Box<Expr<V>> },
    List(Vec<Expr<V>>),
    Map(Vec<MapEntry<V>>),
}

impl<V: PartialEq> PartialEq for Expr<V> {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl<V> Expr<V> {
    #[inline]
    pub fn new(kind: ExprKind<V>, line: u32) -> Self {
        Expr { kind, line }
    }

    pub fn literal(value: V, text: Option<Name>, line: u32) -> Self {
        Expr::new(ExprKind::Literal(Literal { value, text }), line)
    }

    pub fn ident(name: impl Into<Name>, line: u32) -> Self {
        Expr::new(ExprKind::Ident(name.into()), line)
    }

    pub fn binary(op: impl Into<Name>, left: Expr<V>, right: Expr<V>) -> Self {
        let line = left.line;
        Expr::new(
            ExprKind::Binary {
                op: op.into(),
                left: Box::new(left),
                right: Box::new(right),
            },
            line,
        )
    }

    #[inline]
    pub fn is_literal(&self) -> bool {
        matches!(self.kind, ExprKind::Literal(_))
    }

    /// Whether this node is a closure literal. A `let` binding a closure
    /// literal is visible inside its own value.
    #[inline]
    pub fn is_closure(&self) -> bool {
        matches!(self.kind, ExprKind::Closure { .. })
    }

    /// The literal value, if this node is a literal.
    #[inline]
    pub fn as_literal(&self) -> Option<&V> {
        match &self.kind {
            ExprKind::Literal(lit) => Some(&lit.value),
            _ => None,
        }
    }

    /// Short lowercase name of the node kind, for diagnostics and logs.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            ExprKind::Literal(_) => "literal",
            ExprKind::Ident(_) => "identifier",
            ExprKind::Let { .. } => "let binding",
            ExprKind::If { .. } => "conditional",
            ExprKind::Switch { .. } => "switch",
            ExprKind::Binary { .. } => "binary operation",
            ExprKind::Unary { .. } => "unary operation",
            ExprKind::Index { .. } => "list access",
            ExprKind::Field { .. } => "map access",
            ExprKind::MethodCall { .. } => "method call",
            ExprKind::Call { .. } => "function call",
            ExprKind::StaticCall { .. } => "static function call",
            ExprKind::Closure { .. } => "closure literal",
            ExprKind::List(_) => "list literal",
            ExprKind::Map(_) => "map literal",
        }
    }

    /// Call `f` on each direct child, in evaluation order.
    pub fn for_each_child<'a>(&'a self, f: &mut dyn FnMut(&'a Expr<V>)) {
        match &self.kind {
            ExprKind::Literal(_) | ExprKind::Ident(_) => {}
            ExprKind::Let { value, body, .. } => {
                f(value);
                f(body);
            }
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                f(cond);
                f(then_branch);
                f(else_branch);
            }
            ExprKind::Switch {
                subject,
                cases,
                default,
            } => {
                f(subject);
                for case in cases {
                    f(&case.value);
                    f(&case.result);
                }
                f(default);
            }
            ExprKind::Binary { left, right, .. } => {
                f(left);
                f(right);
            }
            ExprKind::Unary { operand, .. } => f(operand),
            ExprKind::Index { receiver, index } => {
                f(receiver);
                f(index);
            }
            ExprKind::Field { receiver, .. } => f(receiver),
            ExprKind::MethodCall { receiver, args, .. } => {
                f(receiver);
                args.iter().for_each(|a| f(a));
            }
            ExprKind::Call { callee, args } => {
                f(callee);
                args.iter().for_each(|a| f(a));
            }
            ExprKind::StaticCall { args, .. } | ExprKind::List(args) => {
                args.iter().for_each(|a| f(a));
            }
            ExprKind::Closure { body, .. } => f(body),
            ExprKind::Map(entries) => entries.iter().for_each(|e| f(&e.value)),
        }
    }

    /// Mutable counterpart of [`Expr::for_each_child`].
    pub fn for_each_child_mut(&mut self, f: &mut dyn FnMut(&mut Expr<V>)) {
        match &mut self.kind {
            ExprKind::Literal(_) | ExprKind::Ident(_) => {}
            ExprKind::Let { value, body, .. } => {
                f(value);
                f(body);
            }
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                f(cond);
                f(then_branch);
                f(else_branch);
            }
            ExprKind::Switch {
                subject,
                cases,
                default,
            } => {
                f(subject);
                for case in cases {
                    f(&mut case.value);
                    f(&mut case.result);
                }
                f(default);
            }
            ExprKind::Binary { left, right, .. } => {
                f(left);
                f(right);
            }
            ExprKind::Unary { operand, .. } => f(operand),
            ExprKind::Index { receiver, index } => {
                f(receiver);
                f(index);
            }
            ExprKind::Field { receiver, .. } => f(receiver),
            ExprKind::MethodCall { receiver, args, .. } => {
                f(receiver);
                args.iter_mut().for_each(|a| f(a));
            }
            ExprKind::Call { callee, args } => {
                f(callee);
                args.iter_mut().for_each(|a| f(a));
            }
            ExprKind::StaticCall { args, .. } | ExprKind::List(args) => {
                args.iter_mut().for_each(|a| f(a));
            }
            ExprKind::Closure { body, .. } => f(body),
            ExprKind::Map(entries) => entries.iter_mut().for_each(|e| f(&mut e.value)),
        }
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        let mut count = 1;
        self.for_each_child(&mut |child| count += child.node_count());
        count
    }
}

#[cfg(test)]
mod tests;
