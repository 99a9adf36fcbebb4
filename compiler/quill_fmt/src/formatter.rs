//! Formatter Core
//!
//! Top-down rendering engine that decides flat vs broken format for each node.
//!
//! # Algorithm
//!
//! 1. Measure the node (see [`WidthCalculator`])
//! 2. If it has a width and fits from the current column, render it flat
//! 3. Otherwise render it broken; its children decide again independently
//!
//! # Modules
//!
//! - [`broken`]: multi-line layouts per node kind

mod broken;
#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;

use std::fmt::Display;

use quill_ir::{write_name, Expr, Name};

use crate::context::{FormatConfig, FormatContext};
use crate::emitter::StringEmitter;
use crate::width::WidthCalculator;

/// Formatter for one expression tree.
pub struct Formatter<V> {
    width_calc: WidthCalculator<V>,
    ctx: FormatContext<StringEmitter>,
    /// Names bound by the enclosing `let`s and closures.
    bound: Vec<Name>,
}

impl<V: Display> Formatter<V> {
    pub fn new() -> Self {
        Self::with_config(FormatConfig::default())
    }

    pub fn with_config(config: FormatConfig) -> Self {
        Self {
            width_calc: WidthCalculator::new(config.node_budget),
            ctx: FormatContext::with_config(config),
            bound: Vec::new(),
        }
    }

    /// Start as if `column` characters precede the expression on its first
    /// line.
    #[must_use]
    pub fn with_starting_column(mut self, column: usize) -> Self {
        self.ctx.set_column(column);
        self
    }

    /// Format an expression and return the formatted string.
    pub fn format_expr(mut self, expr: &Expr<V>) -> String {
        self.format(expr);
        self.ctx.finalize()
    }

    /// Format an expression at the current position.
    pub fn format(&mut self, expr: &Expr<V>) {
        quill_stack::ensure_sufficient_stack(|| {
            match self.width_calc.width(expr, &self.bound) {
                Some(width) if self.ctx.fits(width) => self.emit_flat(expr),
                _ => self.emit_broken(expr),
            }
        });
    }

    /// Format, parenthesized when `parens` is set. A parenthesized group that
    /// does not fit puts its contents on their own indented lines.
    fn format_operand(&mut self, expr: &Expr<V>, parens: bool) {
        if !parens {
            self.format(expr);
            return;
        }
        match self.width_calc.width(expr, &self.bound) {
            Some(width) if self.ctx.fits(width + 2) => {
                self.ctx.emit("(");
                self.emit_flat(expr);
                self.ctx.emit(")");
            }
            _ => {
                self.ctx.emit("(");
                self.format_indented(expr);
                self.ctx.newline();
                self.ctx.emit(")");
            }
        }
    }

    /// Format on a new line, one level deeper.
    fn format_indented(&mut self, expr: &Expr<V>) {
        self.ctx.indent();
        self.ctx.newline();
        self.format(expr);
        self.ctx.dedent();
    }

    fn emit_flat(&mut self, expr: &Expr<V>) {
        let text = expr.in_scope(&self.bound).to_string();
        self.ctx.emit(&text);
    }

    fn emit_name(&mut self, name: &Name) {
        let mut text = String::new();
        // Writing into a String cannot fail.
        let _ = write_name(&mut text, name);
        self.ctx.emit(&text);
    }
}

impl<V: Display> Default for Formatter<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Format an expression with the default configuration.
pub fn format_expr<V: Display>(expr: &Expr<V>) -> String {
    Formatter::new().format_expr(expr)
}

/// Format an expression with a custom configuration.
pub fn format_expr_with<V: Display>(expr: &Expr<V>, config: FormatConfig) -> String {
    Formatter::with_config(config).format_expr(expr)
}
