//! Token cursor with unbounded lookahead over the lazy lexer.

use std::collections::VecDeque;

use quill_ir::{Token, TokenKind};
use quill_lexer::{LexOptions, Lexer};

pub(crate) struct Cursor<'a> {
    lexer: Lexer<'a>,
    lookahead: VecDeque<Token>,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(source: &'a str, options: &'a LexOptions) -> Self {
        Cursor {
            lexer: Lexer::new(source, options),
            lookahead: VecDeque::with_capacity(4),
        }
    }

    /// The token `n` positions ahead of the current one (0 = current).
    pub(crate) fn peek_nth(&mut self, n: usize) -> &Token {
        while self.lookahead.len() <= n {
            let token = self.lexer.next_token();
            self.lookahead.push_back(token);
        }
        &self.lookahead[n]
    }

    #[inline]
    pub(crate) fn current(&mut self) -> &Token {
        self.peek_nth(0)
    }

    pub(crate) fn line(&mut self) -> u32 {
        self.current().line
    }

    /// Consume and return the current token.
    pub(crate) fn advance(&mut self) -> Token {
        self.peek_nth(0);
        match self.lookahead.pop_front() {
            Some(token) => token,
            None => Token::eof(self.lexer.line()),
        }
    }

    pub(crate) fn check_punct(&mut self, p: &str) -> bool {
        self.current().is_punct(p)
    }

    pub(crate) fn check_keyword(&mut self, kw: &str) -> bool {
        self.current().is_keyword(kw)
    }

    pub(crate) fn check_operator(&mut self, op: &str) -> bool {
        self.current().is_operator(op)
    }

    /// Consume the current token if it is the punctuation `p`.
    pub(crate) fn eat_punct(&mut self, p: &str) -> bool {
        let matched = self.check_punct(p);
        if matched {
            self.advance();
        }
        matched
    }

    pub(crate) fn is_at_end(&mut self) -> bool {
        self.current().kind == TokenKind::Eof
    }
}
