//! Expression grammar, split by concern: binary and unary operators and
//! `let` in `expr`, the postfix chain in `postfix`, atoms and keyword forms
//! in `primary`.

mod expr;
mod postfix;
mod primary;
