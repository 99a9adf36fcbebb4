//! Multi-line layouts.
//!
//! ```text
//! let a = 1;          if cond then        switch x
//! let b = 2;              a                   case 1: a
//! a + b               else                    default b
//!                         b
//!
//! left                f(                  x ->
//!     + right             arg,                body
//!                         arg
//!                     )
//! ```

use std::fmt::Display;

use quill_ir::{
    let_value_binds, needs_parens_as_callee, needs_parens_as_operand,
    needs_parens_as_prefix_operand, needs_parens_as_receiver, Expr, ExprKind,
};

use super::Formatter;

impl<V: Display> Formatter<V> {
    pub(super) fn emit_broken(&mut self, expr: &Expr<V>) {
        match &expr.kind {
            ExprKind::Literal(_) | ExprKind::Ident(_) => self.emit_flat(expr),
            ExprKind::Let { .. } => self.emit_let_chain(expr),
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.ctx.emit("if ");
                self.format(cond);
                self.ctx.emit(" then");
                self.format_indented(then_branch);
                self.ctx.newline();
                self.ctx.emit("else");
                if matches!(else_branch.kind, ExprKind::If { .. }) {
                    self.ctx.emit_space();
                    self.format(else_branch);
                } else {
                    self.format_indented(else_branch);
                }
            }
            ExprKind::Switch {
                subject,
                cases,
                default,
            } => {
                self.ctx.emit("switch ");
                self.format(subject);
                self.ctx.indent();
                for case in cases {
                    self.ctx.newline();
                    self.ctx.emit("case ");
                    self.format(&case.value);
                    self.ctx.emit(": ");
                    self.format(&case.result);
                }
                self.ctx.newline();
                self.ctx.emit("default ");
                self.format(default);
                self.ctx.dedent();
            }
            ExprKind::Binary { op, left, right } => {
                self.format_operand(left, needs_parens_as_operand(left));
                self.ctx.indent();
                self.ctx.newline();
                self.ctx.emit(op);
                self.ctx.emit_space();
                self.format_operand(right, needs_parens_as_operand(right));
                self.ctx.dedent();
            }
            ExprKind::Unary { op, operand } => {
                self.ctx.emit(op);
                self.format_operand(operand, needs_parens_as_prefix_operand(operand));
            }
            ExprKind::Index { receiver, index } => {
                self.format_operand(receiver, needs_parens_as_receiver(receiver));
                self.emit_delimited("[", "]", std::slice::from_ref(&**index), Self::format);
            }
            ExprKind::Field { receiver, field } => {
                self.format_operand(receiver, needs_parens_as_receiver(receiver));
                self.ctx.emit(".");
                self.emit_name(field);
            }
            ExprKind::MethodCall {
                receiver,
                method,
                args,
            } => {
                self.format_operand(receiver, needs_parens_as_receiver(receiver));
                self.ctx.emit(".");
                self.emit_name(method);
                self.emit_delimited("(", ")", args, Self::format);
            }
            ExprKind::Call { callee, args } => {
                let parens = needs_parens_as_callee(callee, |name| self.bound.contains(name));
                self.format_operand(callee, parens);
                self.emit_delimited("(", ")", args, Self::format);
            }
            ExprKind::StaticCall { function, args } => {
                self.emit_name(function);
                self.emit_delimited("(", ")", args, Self::format);
            }
            ExprKind::Closure { params, body } => {
                if let [param] = params.as_slice() {
                    self.emit_name(param);
                } else {
                    self.ctx.emit("(");
                    for (i, param) in params.iter().enumerate() {
                        if i > 0 {
                            self.ctx.emit(", ");
                        }
                        self.emit_name(param);
                    }
                    self.ctx.emit(")");
                }
                self.ctx.emit(" ->");
                let mark = self.bound.len();
                self.bound.extend_from_slice(params);
                match self.width_calc.width(body, &self.bound) {
                    Some(width) if self.ctx.fits(width + 1) => {
                        self.ctx.emit_space();
                        self.emit_flat(body);
                    }
                    _ => self.format_indented(body),
                }
                self.bound.truncate(mark);
            }
            ExprKind::List(items) => self.emit_delimited("[", "]", items, Self::format),
            ExprKind::Map(entries) => self.emit_delimited("{", "}", entries, |this, entry| {
                this.emit_name(&entry.key);
                this.ctx.emit(": ");
                this.format(&entry.value);
            }),
        }
    }

    /// `let` bindings one per line, at the same indentation as the body.
    fn emit_let_chain(&mut self, expr: &Expr<V>) {
        let mark = self.bound.len();
        let mut current = expr;
        while let ExprKind::Let { name, value, body } = &current.kind {
            self.ctx.emit("let ");
            self.emit_name(name);
            self.ctx.emit(" = ");
            let depth = self.bound.len();
            self.bound.extend(let_value_binds(name, value).cloned());
            self.format(value);
            self.bound.truncate(depth);
            self.bound.push(name.clone());
            self.ctx.emit(";");
            self.ctx.newline();
            current = body;
        }
        self.format(current);
        self.bound.truncate(mark);
    }

    /// `open`, then one item per indented line, then `close` on its own line.
    fn emit_delimited<T>(
        &mut self,
        open: &str,
        close: &str,
        items: &[T],
        mut emit_item: impl FnMut(&mut Self, &T),
    ) {
        self.ctx.emit(open);
        if items.is_empty() {
            self.ctx.emit(close);
            return;
        }
        self.ctx.indent();
        for (i, item) in items.iter().enumerate() {
            self.ctx.newline();
            emit_item(self, item);
            if i + 1 < items.len() {
                self.ctx.emit(",");
            }
        }
        self.ctx.dedent();
        self.ctx.newline();
        self.ctx.emit(close);
    }
}
