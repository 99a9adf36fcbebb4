//! Postfix chain: `.name`, `.name(args)`, `(args)` and `[index]`, applied
//! left to right in any order and number.

use quill_ir::{Expr, ExprKind, Name, TokenKind};

use crate::{ParseError, Parser, Syntax};

impl<S: Syntax + ?Sized> Parser<'_, S> {
    pub(crate) fn parse_postfix(&mut self) -> Result<Expr<S::Value>, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            let line = self.cursor.line();
            let kind = if self.cursor.eat_punct(".") {
                let name = self.parse_member_name()?;
                if self.cursor.eat_punct("(") {
                    let args = self.parse_expr_list(")")?;
                    ExprKind::MethodCall {
                        receiver: Box::new(expr),
                        method: name,
                        args,
                    }
                } else {
                    ExprKind::Field {
                        receiver: Box::new(expr),
                        field: name,
                    }
                }
            } else if self.cursor.eat_punct("(") {
                let args = self.parse_expr_list(")")?;
                ExprKind::Call {
                    callee: Box::new(expr),
                    args,
                }
            } else if self.cursor.eat_punct("[") {
                let index = self.parse_expr()?;
                self.expect_punct("]")?;
                ExprKind::Index {
                    receiver: Box::new(expr),
                    index: Box::new(index),
                }
            } else {
                return Ok(expr);
            };
            expr = Expr::new(kind, line);
        }
    }

    /// Member names after `.`; keywords are unambiguous here.
    fn parse_member_name(&mut self) -> Result<Name, ParseError> {
        if self.cursor.current().kind == TokenKind::Ident {
            Ok(Name::from(self.cursor.advance().text))
        } else {
            Err(self.unexpected("a member name after `.`"))
        }
    }
}
