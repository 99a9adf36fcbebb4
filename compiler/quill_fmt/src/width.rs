//! Width Calculation
//!
//! Flat width of each node, measured on demand and cached by node address.
//!
//! A node's flat form is its canonical rendering inside the names bound
//! around it (an unbound callee gains parentheses). Measuring is
//! bounded: a [`NodeBudget`] visitor walks the subtree first and vetoes
//! descent once the budget is spent, and only subtrees within budget are
//! rendered. Over-budget subtrees report no width and always break.

use std::fmt::Display;

use quill_ir::{Expr, Name, Visitor, Walk};
use rustc_hash::FxHashMap;

/// Flat widths of the nodes of one tree.
///
/// Cached by node address; the calculator must only be used with nodes of
/// trees that outlive it unchanged, each measured with the names bound
/// around it.
pub struct WidthCalculator<V> {
    node_budget: usize,
    cache: FxHashMap<*const Expr<V>, Option<usize>>,
}

impl<V: Display> WidthCalculator<V> {
    pub fn new(node_budget: usize) -> Self {
        Self {
            node_budget,
            cache: FxHashMap::default(),
        }
    }

    /// Single-line width of `expr` nested in bindings of `bound`, or `None`
    /// when it is over the node budget or its rendering spans several lines.
    pub fn width(&mut self, expr: &Expr<V>, bound: &[Name]) -> Option<usize> {
        let key: *const Expr<V> = expr;
        if let Some(&width) = self.cache.get(&key) {
            return width;
        }
        let width = self.measure(expr, bound);
        self.cache.insert(key, width);
        width
    }

    fn measure(&self, expr: &Expr<V>, bound: &[Name]) -> Option<usize> {
        if !within_budget(expr, self.node_budget) {
            return None;
        }
        let text = expr.in_scope(bound).to_string();
        if text.contains('\n') {
            None
        } else {
            Some(text.chars().count())
        }
    }
}

/// Whether `expr` has at most `budget` nodes.
pub fn within_budget<V>(expr: &Expr<V>, budget: usize) -> bool {
    let mut visitor = NodeBudget {
        remaining: budget,
        exhausted: false,
    };
    expr.traverse(&mut visitor);
    !visitor.exhausted
}

/// Counts nodes until the budget runs out, then refuses to descend further.
struct NodeBudget {
    remaining: usize,
    exhausted: bool,
}

impl<V> Visitor<V> for NodeBudget {
    fn enter(&mut self, _: &Expr<V>) -> Walk {
        if self.exhausted || self.remaining == 0 {
            self.exhausted = true;
            return Walk::Skip;
        }
        self.remaining -= 1;
        Walk::Continue
    }
}
