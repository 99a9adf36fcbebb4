//! What the parser needs to know about a host grammar.

use quill_lexer::LexOptions;

/// Host grammar queries used while parsing.
///
/// Literal values are produced at parse time, so the AST is already typed by
/// the host value. The lexer options must include `=` and `->` in their
/// operator set when the set is non-empty, or `let` and closure syntax may be
/// split into unknown operators.
pub trait Syntax {
    type Value;

    fn lex_options(&self) -> &LexOptions;

    /// Precedence level of a binary operator; 0 binds loosest.
    fn binary_level(&self, op: &str) -> Option<usize>;

    /// Number of binary precedence levels.
    fn binary_levels(&self) -> usize;

    fn is_unary(&self, op: &str) -> bool;

    /// Value of a registered named constant.
    fn constant(&self, name: &str) -> Option<Self::Value>;

    /// Whether `name` is a registered static function.
    fn is_function(&self, name: &str) -> bool;

    /// Convert number text to a value; `Err` carries the reason.
    fn number(&self, text: &str) -> Result<Self::Value, String>;

    /// Convert the contents of a string literal to a value.
    fn string(&self, text: &str) -> Result<Self::Value, String>;
}
