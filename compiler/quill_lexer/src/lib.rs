//! Lexer for quill expressions.
//!
//! Produces tokens lazily: [`Lexer`] is an iterator that yields each token,
//! then one [`TokenKind::Eof`] token, then `None`. The parser instead calls
//! [`Lexer::next_token`], which keeps returning `Eof` once input is exhausted.
//!
//! The lexer never fails. Input it cannot classify becomes a
//! [`TokenKind::Invalid`] token and the parser reports it.

mod classes;

pub use classes::{CharClasses, LexOptions, ASCII_OPERATOR_CHARS};

use quill_ir::{Token, TokenFlags, TokenKind};

/// Single-character punctuation.
const PUNCTUATION: &str = "()[]{}.,:;";

/// Tokenize the whole source, including the trailing `Eof` token.
pub fn tokenize(source: &str, options: &LexOptions) -> Vec<Token> {
    Lexer::new(source, options).collect()
}

/// Lazy tokenizer over a source string.
pub struct Lexer<'a> {
    source: &'a str,
    options: &'a LexOptions,
    pos: usize,
    line: u32,
    emitted_eof: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, options: &'a LexOptions) -> Self {
        Lexer {
            source,
            options,
            pos: 0,
            line: 1,
            emitted_eof: false,
        }
    }

    /// Current line, 1-based.
    pub fn line(&self) -> u32 {
        self.line
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn eat_while(&mut self, mut pred: impl FnMut(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.bump();
        }
        &self.source[start..self.pos]
    }

    fn at_comment(&self) -> bool {
        self.options.line_comments && self.rest().starts_with("//")
    }

    fn skip_trivia(&mut self) {
        loop {
            self.eat_while(char::is_whitespace);
            if !self.at_comment() {
                return;
            }
            self.eat_while(|c| c != '\n');
        }
    }

    /// Next token; `Eof` forever once input is exhausted.
    pub fn next_token(&mut self) -> Token {
        self.skip_trivia();
        let line = self.line;
        let Some(c) = self.peek() else {
            return Token::eof(line);
        };
        let options = self.options;
        let classes = &options.classes;
        let start = self.pos;

        if (classes.ident_start)(c) {
            self.bump();
            self.eat_while(classes.ident_continue);
            return Token::new(TokenKind::Ident, &self.source[start..self.pos], line);
        }
        if (classes.number_start)(c) {
            let mut prev = c;
            self.bump();
            self.eat_while(|next| {
                let ok = (classes.number_continue)(prev, next);
                prev = next;
                ok
            });
            return Token::new(TokenKind::Number, &self.source[start..self.pos], line);
        }
        if c == '"' || c == '\'' {
            return self.quoted(c, line);
        }
        if PUNCTUATION.contains(c) {
            self.bump();
            return Token::new(TokenKind::Punct, c.to_string(), line);
        }
        if (classes.operator_start)(c) {
            return self.operator(line);
        }

        self.bump();
        Token::new(TokenKind::Invalid, c.to_string(), line)
    }

    /// `"raw string"` or `'verbatim identifier'`. No escapes; the text between
    /// the quotes is taken as-is and may span lines.
    fn quoted(&mut self, quote: char, line: u32) -> Token {
        self.bump();
        let text = self.eat_while(|c| c != quote);
        if self.bump().is_none() {
            return Token::new(TokenKind::Invalid, quote.to_string(), line)
                .with_flags(TokenFlags::UNTERMINATED);
        }
        if quote == '"' {
            Token::new(TokenKind::Str, text, line)
        } else {
            Token::new(TokenKind::Ident, text, line).with_flags(TokenFlags::VERBATIM)
        }
    }

    fn operator(&mut self, line: u32) -> Token {
        let options = self.options;
        let classes = &options.classes;
        let rest = self.rest();
        let mut end = 0;
        for (i, c) in rest.char_indices() {
            let allowed = if i == 0 {
                (classes.operator_start)(c)
            } else {
                (classes.operator_continue)(c)
                    && !(options.line_comments && rest[i..].starts_with("//"))
            };
            if !allowed {
                break;
            }
            end = i + c.len_utf8();
        }
        let len = options.operator_len(&rest[..end]);
        self.pos += len;
        Token::new(TokenKind::Operator, &rest[..len], line)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.emitted_eof {
            return None;
        }
        let token = self.next_token();
        self.emitted_eof = token.is_eof();
        Some(token)
    }
}
