//! Canonical single-line rendering.
//!
//! The output re-parses to a structurally equal tree under any grammar that
//! registers the operators used. Operator precedence is grammar-specific and
//! unknown here, so every compound operand is parenthesized.

use std::fmt::{self, Display, Formatter, Write};

use crate::token::{is_ascii_ident_continue, is_ascii_ident_start, is_keyword};
use crate::{Expr, ExprKind, Name};

/// Whether `text` can be written as a bare identifier.
pub fn is_plain_ident(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next().is_some_and(is_ascii_ident_start)
        && chars.all(is_ascii_ident_continue)
        && !is_keyword(text)
}

/// Whether `expr` must be parenthesized when used as a binary operand.
pub fn needs_parens_as_operand<V>(expr: &Expr<V>) -> bool {
    matches!(
        expr.kind,
        ExprKind::Binary { .. }
            | ExprKind::Let { .. }
            | ExprKind::If { .. }
            | ExprKind::Switch { .. }
            | ExprKind::Closure { .. }
    )
}

/// Nodes that bind at least as tightly as a postfix chain.
fn is_atom<V>(expr: &Expr<V>) -> bool {
    matches!(
        expr.kind,
        ExprKind::Ident(_)
            | ExprKind::List(_)
            | ExprKind::Map(_)
            | ExprKind::Index { .. }
            | ExprKind::Field { .. }
            | ExprKind::MethodCall { .. }
            | ExprKind::Call { .. }
            | ExprKind::StaticCall { .. }
    )
}

/// Whether `expr` must be parenthesized as the receiver of a postfix
/// operation.
pub fn needs_parens_as_receiver<V>(expr: &Expr<V>) -> bool {
    !is_atom(expr)
}

/// Whether `expr` must be parenthesized as the operand of a prefix operator.
pub fn needs_parens_as_prefix_operand<V>(expr: &Expr<V>) -> bool {
    !is_atom(expr) && !expr.is_literal()
}

/// Write an identifier, quoting it when it is not a plain identifier.
pub fn write_name(f: &mut impl Write, name: &Name) -> fmt::Result {
    if is_plain_ident(name) {
        f.write_str(name)
    } else if name.contains('\'') {
        write!(f, "\"{name}\"")
    } else {
        write!(f, "'{name}'")
    }
}

/// Whether `callee` must be parenthesized before an argument list.
///
/// A field callee would read back as a method call. An identifier that no
/// enclosing `let` or closure binds may name a static function and would
/// read back as a static call.
pub fn needs_parens_as_callee<V>(
    callee: &Expr<V>,
    is_bound: impl FnOnce(&Name) -> bool,
) -> bool {
    match &callee.kind {
        ExprKind::Field { .. } => true,
        ExprKind::Ident(name) => !is_bound(name),
        _ => needs_parens_as_receiver(callee),
    }
}

/// Names a `let` makes visible in its value: its own name only for a
/// closure literal.
pub fn let_value_binds<'a, V>(name: &'a Name, value: &Expr<V>) -> Option<&'a Name> {
    value.is_closure().then_some(name)
}

/// Rendering of an expression nested inside bindings of `bound`.
pub struct InScope<'a, V> {
    expr: &'a Expr<V>,
    bound: &'a [Name],
}

impl<V> Expr<V> {
    /// Render as if enclosed by bindings of `bound`.
    pub fn in_scope<'a>(&'a self, bound: &'a [Name]) -> InScope<'a, V> {
        InScope { expr: self, bound }
    }
}

impl<V: Display> Display for InScope<'_, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Renderer {
            bound: self.bound.to_vec(),
        }
        .render(f, self.expr)
    }
}

impl<V: Display> Display for Expr<V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Renderer { bound: Vec::new() }.render(f, self)
    }
}

/// Tracks the names bound by enclosing `let`s and closures.
struct Renderer {
    bound: Vec<Name>,
}

impl Renderer {
    fn render<V: Display>(&mut self, f: &mut Formatter<'_>, expr: &Expr<V>) -> fmt::Result {
        quill_stack::ensure_sufficient_stack(|| match &expr.kind {
            ExprKind::Literal(lit) => match &lit.text {
                Some(text) => f.write_str(text),
                None => write!(f, "{}", lit.value),
            },
            ExprKind::Ident(name) => write_name(f, name),
            ExprKind::Let { name, value, body } => {
                f.write_str("let ")?;
                write_name(f, name)?;
                f.write_str(" = ")?;
                let mark = self.bound.len();
                self.bound.extend(let_value_binds(name, value).cloned());
                self.render(f, value)?;
                self.bound.truncate(mark);
                f.write_str("; ")?;
                self.bound.push(name.clone());
                let result = self.render(f, body);
                self.bound.truncate(mark);
                result
            }
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                f.write_str("if ")?;
                self.render(f, cond)?;
                f.write_str(" then ")?;
                self.render(f, then_branch)?;
                f.write_str(" else ")?;
                self.render(f, else_branch)
            }
            ExprKind::Switch {
                subject,
                cases,
                default,
            } => {
                f.write_str("switch ")?;
                self.render(f, subject)?;
                for case in cases {
                    f.write_str(" case ")?;
                    self.render(f, &case.value)?;
                    f.write_str(": ")?;
                    self.render(f, &case.result)?;
                }
                f.write_str(" default ")?;
                self.render(f, default)
            }
            ExprKind::Binary { op, left, right } => {
                self.render_parenthesized(f, left, needs_parens_as_operand(left))?;
                write!(f, " {op} ")?;
                self.render_parenthesized(f, right, needs_parens_as_operand(right))
            }
            ExprKind::Unary { op, operand } => {
                f.write_str(op)?;
                self.render_parenthesized(f, operand, needs_parens_as_prefix_operand(operand))
            }
            ExprKind::Index { receiver, index } => {
                self.render_parenthesized(f, receiver, needs_parens_as_receiver(receiver))?;
                f.write_char('[')?;
                self.render(f, index)?;
                f.write_char(']')
            }
            ExprKind::Field { receiver, field } => {
                self.render_parenthesized(f, receiver, needs_parens_as_receiver(receiver))?;
                f.write_char('.')?;
                write_name(f, field)
            }
            ExprKind::MethodCall {
                receiver,
                method,
                args,
            } => {
                self.render_parenthesized(f, receiver, needs_parens_as_receiver(receiver))?;
                f.write_char('.')?;
                write_name(f, method)?;
                self.render_list(f, '(', args, ')')
            }
            ExprKind::Call { callee, args } => {
                let parens = needs_parens_as_callee(callee, |name| self.bound.contains(name));
                self.render_parenthesized(f, callee, parens)?;
                self.render_list(f, '(', args, ')')
            }
            ExprKind::StaticCall { function, args } => {
                write_name(f, function)?;
                self.render_list(f, '(', args, ')')
            }
            ExprKind::Closure { params, body } => {
                if let [param] = params.as_slice() {
                    write_name(f, param)?;
                } else {
                    f.write_char('(')?;
                    for (i, param) in params.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write_name(f, param)?;
                    }
                    f.write_char(')')?;
                }
                f.write_str(" -> ")?;
                let mark = self.bound.len();
                self.bound.extend_from_slice(params);
                let result = self.render(f, body);
                self.bound.truncate(mark);
                result
            }
            ExprKind::List(items) => self.render_list(f, '[', items, ']'),
            ExprKind::Map(entries) => {
                f.write_char('{')?;
                for (i, entry) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_name(f, &entry.key)?;
                    f.write_str(": ")?;
                    self.render(f, &entry.value)?;
                }
                f.write_char('}')
            }
        })
    }

    fn render_parenthesized<V: Display>(
        &mut self,
        f: &mut Formatter<'_>,
        expr: &Expr<V>,
        parens: bool,
    ) -> fmt::Result {
        if parens {
            f.write_char('(')?;
            self.render(f, expr)?;
            f.write_char(')')
        } else {
            self.render(f, expr)
        }
    }

    fn render_list<V: Display>(
        &mut self,
        f: &mut Formatter<'_>,
        open: char,
        items: &[Expr<V>],
        close: char,
    ) -> fmt::Result {
        f.write_char(open)?;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            self.render(f, item)?;
        }
        f.write_char(close)
    }
}
