//! Expressions, `let`, and operator precedence.

use quill_ir::{Expr, ExprKind, Name, TokenKind};
use tracing::trace;

use crate::{ParseError, Parser, Syntax};

impl<S: Syntax + ?Sized> Parser<'_, S> {
    /// `let NAME = expr ; expr` or a binary expression.
    pub(crate) fn parse_expr(&mut self) -> Result<Expr<S::Value>, ParseError> {
        quill_stack::ensure_sufficient_stack(|| {
            if self.cursor.check_keyword("let") {
                self.parse_let()
            } else {
                self.parse_binary(0)
            }
        })
    }

    /// The bound name is visible in the body, and in the value only when the
    /// value is a closure literal (so it can recurse).
    fn parse_let(&mut self) -> Result<Expr<S::Value>, ParseError> {
        let line = self.cursor.advance().line;
        let name = self.expect_name("a name after `let`")?;
        if !self.cursor.check_operator("=") {
            return Err(self.unexpected("`=`"));
        }
        self.cursor.advance();
        let value = if self.at_closure() {
            self.with_bound(std::slice::from_ref(&name), Self::parse_expr)?
        } else {
            self.parse_expr()?
        };
        self.expect_punct(";")?;
        let body = self.with_bound(std::slice::from_ref(&name), Self::parse_expr)?;
        Ok(Expr::new(
            ExprKind::Let {
                name,
                value: Box::new(value),
                body: Box::new(body),
            },
            line,
        ))
    }

    /// Left-associative binary operators at `level` and tighter.
    fn parse_binary(&mut self, level: usize) -> Result<Expr<S::Value>, ParseError> {
        if level >= self.syntax.binary_levels() {
            return self.parse_unary();
        }
        let mut left = self.parse_binary(level + 1)?;
        loop {
            let token = self.cursor.current();
            if token.kind != TokenKind::Operator
                || self.syntax.binary_level(&token.text) != Some(level)
            {
                break;
            }
            let op = self.cursor.advance();
            trace!(op = %op.text, level, "binary operator");
            let right = self.parse_binary(level + 1)?;
            left = Expr::binary(op.text, left, right);
        }
        Ok(left)
    }

    /// Prefix operators registered as unary, then a postfix chain.
    fn parse_unary(&mut self) -> Result<Expr<S::Value>, ParseError> {
        let token = self.cursor.current();
        if token.kind == TokenKind::Operator && self.syntax.is_unary(&token.text) {
            let op = self.cursor.advance();
            let operand = quill_stack::ensure_sufficient_stack(|| self.parse_unary())?;
            return Ok(Expr::new(
                ExprKind::Unary {
                    op: Name::from(op.text),
                    operand: Box::new(operand),
                },
                op.line,
            ));
        }
        self.parse_postfix()
    }

    /// Comma-separated expressions up to `close`; the opening delimiter has
    /// been consumed.
    pub(crate) fn parse_expr_list(&mut self, close: &str) -> Result<Vec<Expr<S::Value>>, ParseError> {
        let mut items = Vec::new();
        if self.cursor.eat_punct(close) {
            return Ok(items);
        }
        loop {
            items.push(self.parse_expr()?);
            if self.cursor.eat_punct(close) {
                return Ok(items);
            }
            if !self.cursor.eat_punct(",") {
                return Err(self.unexpected(&format!("`,` or `{close}`")));
            }
        }
    }
}
