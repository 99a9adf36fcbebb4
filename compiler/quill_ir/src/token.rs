//! Lexer tokens.
//!
//! The token vocabulary is deliberately small: the set of operators is not
//! fixed by the engine but by whatever the host registers, so operators are
//! carried as text and classified by the parser.

use std::fmt;

use bitflags::bitflags;

/// Words with syntactic meaning. A plain identifier token with one of these
/// texts is never treated as a name; the verbatim form `'let'` is.
pub const KEYWORDS: &[&str] = &["let", "if", "then", "else", "switch", "case", "default"];

/// Check whether `text` is one of [`KEYWORDS`].
#[inline]
pub fn is_keyword(text: &str) -> bool {
    KEYWORDS.contains(&text)
}

/// Default identifier-start rule: ASCII letter or underscore.
#[inline]
pub fn is_ascii_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Default identifier-continue rule: ASCII letter, digit or underscore.
#[inline]
pub fn is_ascii_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Token category.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Plain or verbatim (`'...'`) identifier; keywords are identifiers too.
    Ident,
    /// Loosely validated number text; the host parser has the final say.
    Number,
    /// Contents of a double-quoted raw string (no escapes).
    Str,
    /// A run of operator characters.
    Operator,
    /// One of `( ) [ ] { } . , : ;`.
    Punct,
    /// End of input. Repeats forever once reached.
    Eof,
    /// Input the lexer could not classify, or an unterminated quote.
    Invalid,
}

bitflags! {
    /// Per-token metadata bits.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TokenFlags: u8 {
        /// Identifier written in single quotes; never a keyword.
        const VERBATIM = 1 << 0;
        /// String or verbatim identifier missing its closing quote.
        const UNTERMINATED = 1 << 1;
    }
}

/// A lexed token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Token text. Quotes are stripped from strings and verbatim identifiers.
    pub text: String,
    /// 1-based source line of the token's first character.
    pub line: u32,
    pub flags: TokenFlags,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: u32) -> Self {
        Token {
            kind,
            text: text.into(),
            line,
            flags: TokenFlags::empty(),
        }
    }

    #[must_use]
    pub fn with_flags(mut self, flags: TokenFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn eof(line: u32) -> Self {
        Token::new(TokenKind::Eof, "", line)
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    /// Punctuation check, e.g. `tok.is_punct("(")`.
    #[inline]
    pub fn is_punct(&self, p: &str) -> bool {
        self.kind == TokenKind::Punct && self.text == p
    }

    #[inline]
    pub fn is_operator(&self, op: &str) -> bool {
        self.kind == TokenKind::Operator && self.text == op
    }

    /// A plain (non-verbatim) identifier spelling `kw`.
    #[inline]
    pub fn is_keyword(&self, kw: &str) -> bool {
        self.kind == TokenKind::Ident && !self.is_verbatim() && self.text == kw
    }

    #[inline]
    pub fn is_verbatim(&self) -> bool {
        self.flags.contains(TokenFlags::VERBATIM)
    }

    /// An identifier usable as a name: verbatim, or plain and not a keyword.
    pub fn is_name(&self) -> bool {
        self.kind == TokenKind::Ident && (self.is_verbatim() || !is_keyword(&self.text))
    }
}

impl fmt::Display for Token {
    /// Human description used in "expected X, found Y" messages.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Ident if self.is_verbatim() => write!(f, "identifier '{}'", self.text),
            TokenKind::Ident if is_keyword(&self.text) => write!(f, "keyword `{}`", self.text),
            TokenKind::Ident => write!(f, "identifier `{}`", self.text),
            TokenKind::Number => write!(f, "number `{}`", self.text),
            TokenKind::Str => write!(f, "string \"{}\"", self.text),
            TokenKind::Operator => write!(f, "operator `{}`", self.text),
            TokenKind::Punct => write!(f, "`{}`", self.text),
            TokenKind::Eof => write!(f, "end of input"),
            TokenKind::Invalid if self.flags.contains(TokenFlags::UNTERMINATED) => {
                write!(f, "unterminated `{}`", self.text)
            }
            TokenKind::Invalid => write!(f, "invalid input `{}`", self.text),
        }
    }
}
