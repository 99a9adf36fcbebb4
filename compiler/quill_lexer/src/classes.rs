//! Host-pluggable character classification.

use quill_ir::{is_ascii_ident_continue, is_ascii_ident_start};
use rustc_hash::FxHashSet;

/// Characters that may start or continue an operator under the default rules.
pub const ASCII_OPERATOR_CHARS: &str = "+-*/^<>=!&|~%?#@$";

/// Predicates deciding which characters form identifiers, numbers and
/// operators.
///
/// Number scanning is deliberately loose: the lexer only groups characters,
/// and the host's number parser validates the text. `number_continue` sees the
/// previous character so exponent signs (`1e-3`) can be accepted without
/// swallowing an ordinary minus (`1-3`).
#[derive(Copy, Clone, Debug)]
pub struct CharClasses {
    pub ident_start: fn(char) -> bool,
    pub ident_continue: fn(char) -> bool,
    pub number_start: fn(char) -> bool,
    pub number_continue: fn(prev: char, c: char) -> bool,
    pub operator_start: fn(char) -> bool,
    pub operator_continue: fn(char) -> bool,
}

fn ascii_number_start(c: char) -> bool {
    c.is_ascii_digit()
}

fn ascii_number_continue(prev: char, c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.' || (matches!(c, '+' | '-') && matches!(prev, 'e' | 'E'))
}

fn ascii_operator(c: char) -> bool {
    ASCII_OPERATOR_CHARS.contains(c)
}

impl CharClasses {
    /// ASCII identifiers (`[A-Za-z_][A-Za-z0-9_]*`), decimal-looking numbers,
    /// and runs of [`ASCII_OPERATOR_CHARS`].
    pub const ASCII: CharClasses = CharClasses {
        ident_start: is_ascii_ident_start,
        ident_continue: is_ascii_ident_continue,
        number_start: ascii_number_start,
        number_continue: ascii_number_continue,
        operator_start: ascii_operator,
        operator_continue: ascii_operator,
    };
}

impl Default for CharClasses {
    fn default() -> Self {
        CharClasses::ASCII
    }
}

/// Lexer configuration.
#[derive(Clone, Debug, Default)]
pub struct LexOptions {
    pub classes: CharClasses,
    /// Treat `//` to end of line as a comment. When off, `//` lexes as an
    /// operator run.
    pub line_comments: bool,
    /// Operators the host registered. When non-empty, an operator run is cut
    /// to its longest registered prefix, so `2*-3` yields `*` then `-`.
    pub operators: FxHashSet<String>,
}

impl LexOptions {
    #[must_use]
    pub fn with_line_comments(mut self, enabled: bool) -> Self {
        self.line_comments = enabled;
        self
    }

    #[must_use]
    pub fn with_operators<I, S>(mut self, operators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.operators.extend(operators.into_iter().map(Into::into));
        self
    }

    /// Length in bytes of the operator token at the start of `run`.
    pub(crate) fn operator_len(&self, run: &str) -> usize {
        if self.operators.is_empty() {
            return run.len();
        }
        run.char_indices()
            .map(|(i, c)| i + c.len_utf8())
            .rev()
            .find(|&end| self.operators.contains(&run[..end]))
            .unwrap_or(run.len())
    }
}
