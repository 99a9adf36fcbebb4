//! Quill Formatter
//!
//! Pretty printer for quill expression trees.
//!
//! # Architecture
//!
//! Two passes over each node:
//!
//! 1. **Measure**: flat width of the node, or "too complex" once a node
//!    budget is spent (see [`WidthCalculator`])
//! 2. **Render**: flat if the node is measured and fits the remaining line,
//!    broken over indented lines otherwise
//!
//! Breaking only ever inserts whitespace between the tokens of the flat
//! rendering, so the output always re-parses to the same tree.
//!
//! # Modules
//!
//! - [`width`]: flat width with a node budget
//! - [`emitter`]: output sink
//! - [`context`]: column and indentation tracking
//! - [`formatter`]: the rendering engine

pub mod context;
pub mod emitter;
pub mod formatter;
pub mod width;

pub use context::{FormatConfig, FormatContext, INDENT_WIDTH, MAX_LINE_WIDTH, NODE_BUDGET};
pub use emitter::{Emitter, StringEmitter};
pub use formatter::{format_expr, format_expr_with, Formatter};
pub use width::WidthCalculator;
