//! Primary expressions: literals, names, keyword forms, closures, groups,
//! list and map literals.

use quill_ir::{is_plain_ident, Expr, ExprKind, MapEntry, Name, SwitchCase, TokenKind};
use tracing::trace;

use crate::{ParseError, ParseErrorKind, Parser, Syntax};

impl<S: Syntax + ?Sized> Parser<'_, S> {
    pub(crate) fn parse_primary(&mut self) -> Result<Expr<S::Value>, ParseError> {
        let token = self.cursor.current();
        let line = token.line;
        match token.kind {
            TokenKind::Number => {
                let token = self.cursor.advance();
                let value = self.syntax.number(&token.text).map_err(|reason| ParseError {
                    kind: ParseErrorKind::MalformedNumber {
                        text: token.text.clone(),
                        reason,
                    },
                    line,
                })?;
                Ok(Expr::literal(value, Some(Name::from(token.text)), line))
            }
            TokenKind::Str => {
                let token = self.cursor.advance();
                let value = self.syntax.string(&token.text).map_err(|reason| ParseError {
                    kind: ParseErrorKind::MalformedString {
                        text: token.text.clone(),
                        reason,
                    },
                    line,
                })?;
                let text = format!("\"{}\"", token.text);
                Ok(Expr::literal(value, Some(Name::from(text)), line))
            }
            TokenKind::Ident if token.is_keyword("if") => {
                trace!("parse_primary -> if");
                self.parse_if()
            }
            TokenKind::Ident if token.is_keyword("switch") => {
                trace!("parse_primary -> switch");
                self.parse_switch()
            }
            TokenKind::Ident if token.is_name() => {
                if self.at_closure() {
                    trace!("parse_primary -> closure");
                    let param = self.expect_name("a parameter name")?;
                    return self.parse_closure_body(vec![param], line);
                }
                self.parse_name()
            }
            TokenKind::Punct if token.text == "(" => self.parse_paren(),
            TokenKind::Punct if token.text == "[" => {
                self.cursor.advance();
                let items = self.parse_expr_list("]")?;
                Ok(Expr::new(ExprKind::List(items), line))
            }
            TokenKind::Punct if token.text == "{" => self.parse_map(),
            _ => Err(self.unexpected("expression")),
        }
    }

    /// Identifier, constant, or static call, depending on what is bound.
    fn parse_name(&mut self) -> Result<Expr<S::Value>, ParseError> {
        let token = self.cursor.advance();
        let line = token.line;
        let name = Name::from(token.text);
        if self.is_bound(&name) {
            return Ok(Expr::new(ExprKind::Ident(name), line));
        }
        if let Some(value) = self.syntax.constant(&name) {
            let text = if is_plain_ident(&name) {
                name
            } else {
                Name::from(format!("'{name}'"))
            };
            return Ok(Expr::literal(value, Some(text), line));
        }
        if self.syntax.is_function(&name) && self.cursor.check_punct("(") {
            self.cursor.advance();
            let args = self.parse_expr_list(")")?;
            return Ok(Expr::new(
                ExprKind::StaticCall {
                    function: name,
                    args,
                },
                line,
            ));
        }
        Ok(Expr::new(ExprKind::Ident(name), line))
    }

    /// `if C then A else B`
    fn parse_if(&mut self) -> Result<Expr<S::Value>, ParseError> {
        let line = self.cursor.advance().line;
        let cond = self.parse_expr()?;
        self.expect_keyword("then")?;
        let then_branch = self.parse_expr()?;
        self.expect_keyword("else")?;
        let else_branch = self.parse_expr()?;
        Ok(Expr::new(
            ExprKind::If {
                cond: Box::new(cond),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            },
            line,
        ))
    }

    /// `switch V case C1: R1 ... default D`
    fn parse_switch(&mut self) -> Result<Expr<S::Value>, ParseError> {
        let line = self.cursor.advance().line;
        let subject = self.parse_expr()?;
        let mut cases = Vec::new();
        while self.cursor.check_keyword("case") {
            self.cursor.advance();
            let value = self.parse_expr()?;
            self.expect_punct(":")?;
            let result = self.parse_expr()?;
            cases.push(SwitchCase { value, result });
        }
        if !self.cursor.check_keyword("default") {
            return Err(self.unexpected("`case` or `default`"));
        }
        self.cursor.advance();
        let default = self.parse_expr()?;
        Ok(Expr::new(
            ExprKind::Switch {
                subject: Box::new(subject),
                cases,
                default: Box::new(default),
            },
            line,
        ))
    }

    /// A parenthesized group or a closure parameter list.
    ///
    /// `()` followed by `->`, `(name,`, and `(name)` followed by `->` open a
    /// closure; anything else is a group.
    fn parse_paren(&mut self) -> Result<Expr<S::Value>, ParseError> {
        let is_closure = self.at_closure();
        let line = self.cursor.advance().line;
        if !is_closure {
            let expr = self.parse_expr()?;
            self.expect_punct(")")?;
            return Ok(expr);
        }

        trace!("parse_primary -> closure parameter list");
        let mut params = Vec::new();
        if !self.cursor.eat_punct(")") {
            loop {
                params.push(self.expect_name("a parameter name")?);
                if self.cursor.eat_punct(")") {
                    break;
                }
                self.expect_punct(",")?;
            }
        }
        self.parse_closure_body(params, line)
    }

    /// Whether the current token starts a closure literal: `name ->`, `() ->`,
    /// `(name,` or `(name) ->`.
    pub(crate) fn at_closure(&mut self) -> bool {
        let (is_name, is_paren) = {
            let token = self.cursor.current();
            (token.kind == TokenKind::Ident && token.is_name(), token.is_punct("("))
        };
        if is_name {
            return self.cursor.peek_nth(1).is_operator("->");
        }
        if !is_paren {
            return false;
        }
        let first = self.cursor.peek_nth(1);
        if first.is_punct(")") {
            self.cursor.peek_nth(2).is_operator("->")
        } else if first.is_name() {
            let second = self.cursor.peek_nth(2);
            second.is_punct(",")
                || (second.is_punct(")") && self.cursor.peek_nth(3).is_operator("->"))
        } else {
            false
        }
    }

    /// `-> body` with `params` bound while parsing the body.
    fn parse_closure_body(
        &mut self,
        params: Vec<Name>,
        line: u32,
    ) -> Result<Expr<S::Value>, ParseError> {
        if !self.cursor.check_operator("->") {
            return Err(self.unexpected("`->`"));
        }
        self.cursor.advance();
        let body = self.with_bound(&params, Self::parse_expr)?;
        Ok(Expr::new(
            ExprKind::Closure {
                params,
                body: Box::new(body),
            },
            line,
        ))
    }

    /// `{key: value, ...}` with identifier, verbatim or string keys.
    fn parse_map(&mut self) -> Result<Expr<S::Value>, ParseError> {
        let line = self.cursor.advance().line;
        let mut entries = Vec::new();
        if self.cursor.eat_punct("}") {
            return Ok(Expr::new(ExprKind::Map(entries), line));
        }
        loop {
            let token = self.cursor.current();
            if !matches!(token.kind, TokenKind::Ident | TokenKind::Str) {
                return Err(self.unexpected("a map key"));
            }
            let key = Name::from(self.cursor.advance().text);
            self.expect_punct(":")?;
            let value = self.parse_expr()?;
            entries.push(MapEntry { key, value });
            if self.cursor.eat_punct("}") {
                return Ok(Expr::new(ExprKind::Map(entries), line));
            }
            self.expect_punct(",")?;
        }
    }
}
