//! Recursive-descent parser for quill expressions.
//!
//! Precedence climbing over the host's operator levels, with unary prefix
//! operators binding tighter than every binary level and a postfix chain
//! (`.name`, `.name(args)`, `(args)`, `[index]`) after each primary.
//!
//! The parser tracks which names are lexically bound (top-level parameters,
//! `let` names, closure parameters). An unbound identifier that names a host
//! constant becomes a literal, and an unbound registered function followed by
//! `(` becomes a static call. Bound names always shadow both.

mod cursor;
mod error;
mod grammar;
mod syntax;

pub use error::{ParseError, ParseErrorKind};
pub use syntax::Syntax;

use quill_ir::{Expr, Name};
use tracing::debug;

use cursor::Cursor;

/// Parse a complete expression. `bound` lists names already in scope, such
/// as the compiled function's parameters.
pub fn parse<S: Syntax + ?Sized>(
    source: &str,
    syntax: &S,
    bound: &[Name],
) -> Result<Expr<S::Value>, ParseError> {
    let mut parser = Parser::new(source, syntax, bound);
    let expr = parser.parse_program()?;
    debug!(nodes = expr.node_count(), "parsed expression");
    Ok(expr)
}

/// Parser state: the token cursor, the host grammar, and the stack of
/// lexically bound names.
pub struct Parser<'a, S: Syntax + ?Sized> {
    cursor: Cursor<'a>,
    syntax: &'a S,
    bound: Vec<Name>,
}

impl<'a, S: Syntax + ?Sized> Parser<'a, S> {
    pub fn new(source: &'a str, syntax: &'a S, bound: &[Name]) -> Self {
        Parser {
            cursor: Cursor::new(source, syntax.lex_options()),
            syntax,
            bound: bound.to_vec(),
        }
    }

    /// Parse one expression followed by end of input.
    pub fn parse_program(&mut self) -> Result<Expr<S::Value>, ParseError> {
        let expr = self.parse_expr()?;
        if !self.cursor.is_at_end() {
            return Err(self.unexpected("end of input"));
        }
        Ok(expr)
    }

    fn is_bound(&self, name: &str) -> bool {
        self.bound.iter().rev().any(|bound| bound.as_str() == name)
    }

    /// Run `f` with `names` bound, unbinding them afterwards.
    fn with_bound<T>(&mut self, names: &[Name], f: impl FnOnce(&mut Self) -> T) -> T {
        let depth = self.bound.len();
        self.bound.extend_from_slice(names);
        let result = f(self);
        self.bound.truncate(depth);
        result
    }

    fn unexpected(&mut self, expected: &str) -> ParseError {
        ParseError::unexpected(self.cursor.current(), expected)
    }

    fn expect_punct(&mut self, p: &str) -> Result<(), ParseError> {
        if self.cursor.eat_punct(p) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("`{p}`")))
        }
    }

    fn expect_keyword(&mut self, kw: &str) -> Result<(), ParseError> {
        if self.cursor.check_keyword(kw) {
            self.cursor.advance();
            Ok(())
        } else {
            Err(self.unexpected(&format!("`{kw}`")))
        }
    }

    /// Consume a name token: a verbatim identifier or a non-keyword
    /// identifier.
    fn expect_name(&mut self, what: &str) -> Result<Name, ParseError> {
        if self.cursor.current().is_name() {
            Ok(Name::from(self.cursor.advance().text))
        } else {
            Err(self.unexpected(what))
        }
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
