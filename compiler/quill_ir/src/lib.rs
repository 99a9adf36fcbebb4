//! Quill IR - shared data types for the quill expression engine.
//!
//! This crate holds everything the pipeline stages exchange:
//!
//! - [`Name`]: cheaply clonable identifier text
//! - [`Token`], [`TokenKind`], [`TokenFlags`]: lexer output
//! - [`Expr`], [`ExprKind`]: the AST, generic over the host value type `V`
//! - [`Visitor`]: pre-order traversal with per-subtree veto
//! - [`Rewrite`]: the bottom-up substitution protocol used by optimizers
//! - `Display` for `Expr<V>`: canonical single-line rendering that re-parses
//!   to a structurally equal tree
//!
//! The AST is a plain owned tree. A parent exclusively owns its children and
//! recursion is always by name, never by back-reference.

mod ast;
mod name;
mod render;
mod token;
mod visitor;

pub use ast::{Expr, ExprKind, Literal, MapEntry, SwitchCase};
pub use name::Name;
pub use render::{
    is_plain_ident, let_value_binds, needs_parens_as_callee, needs_parens_as_operand,
    needs_parens_as_prefix_operand, needs_parens_as_receiver, write_name, InScope,
};
pub use token::{
    is_ascii_ident_continue, is_ascii_ident_start, is_keyword, Token, TokenFlags, TokenKind,
    KEYWORDS,
};
pub use visitor::{Rewrite, Visitor, Walk, MAX_REWRITES_PER_NODE};
