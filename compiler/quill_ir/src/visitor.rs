//! AST traversal and the rewrite protocol.
//!
//! # Traversal
//!
//! [`Expr::traverse`] walks a tree pre-order. [`Visitor::enter`] may return
//! [`Walk::Skip`] to veto descent into the current subtree; a visitor that
//! needs custom scoping for some node (for example, binding a closure's
//! parameters before looking at its body) skips it and walks the children
//! itself. [`Visitor::leave`] runs for every entered node, skipped or not.
//!
//! # Rewriting
//!
//! [`Expr::optimize`] applies a [`Rewrite`] bottom-up: children first, then the
//! node itself, repeatedly, until the rewrite reports no change. A rewrite
//! returns a replacement *kind*; the node keeps its source line.

use quill_stack::ensure_sufficient_stack;

use crate::{Expr, ExprKind};

/// Upper bound on successive rewrites of a single node.
///
/// A well-behaved rewrite reaches a fixpoint in a handful of steps; the bound
/// only stops a rewrite that keeps producing new shapes forever.
pub const MAX_REWRITES_PER_NODE: usize = 32;

/// Traversal decision returned by [`Visitor::enter`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Walk {
    /// Visit this node's children.
    Continue,
    /// Do not descend into this node's children.
    Skip,
}

/// Pre-order AST visitor.
pub trait Visitor<V> {
    fn enter(&mut self, expr: &Expr<V>) -> Walk;

    fn leave(&mut self, _expr: &Expr<V>) {}
}

/// A single-node rewrite step.
///
/// Returns `None` when the node is already in its final form. Implementations
/// must never fail: a rewrite that cannot be performed leaves the node alone.
pub trait Rewrite<V> {
    fn rewrite(&self, expr: &Expr<V>) -> Option<ExprKind<V>>;
}

impl<V> Expr<V> {
    /// Walk this subtree pre-order with `visitor`.
    pub fn traverse<W: Visitor<V> + ?Sized>(&self, visitor: &mut W) {
        ensure_sufficient_stack(|| {
            if visitor.enter(self) == Walk::Continue {
                self.for_each_child(&mut |child| child.traverse(visitor));
            }
            visitor.leave(self);
        });
    }

    /// Optimize this subtree in place. Returns the number of rewrites applied.
    pub fn optimize<R: Rewrite<V> + ?Sized>(&mut self, rewrite: &R) -> usize {
        ensure_sufficient_stack(|| {
            let mut applied = 0;
            self.for_each_child_mut(&mut |child| applied += child.optimize(rewrite));
            for _ in 0..MAX_REWRITES_PER_NODE {
                match rewrite.rewrite(self) {
                    Some(kind) => {
                        self.replace(kind);
                        applied += 1;
                    }
                    None => break,
                }
            }
            applied
        })
    }

    /// Substitute this node's kind, keeping its source line.
    #[inline]
    pub fn replace(&mut self, kind: ExprKind<V>) {
        self.kind = kind;
    }
}
