//! Formatting Context
//!
//! Tracks column position and indentation while emitting.

use crate::emitter::{Emitter, StringEmitter};

/// Default maximum line width before breaking.
pub const MAX_LINE_WIDTH: usize = 100;

/// Spaces per indentation level.
pub const INDENT_WIDTH: usize = 4;

/// Largest subtree, in nodes, that may be rendered on one line.
pub const NODE_BUDGET: usize = 48;

/// Configuration for the formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatConfig {
    /// Maximum line width before breaking to multiple lines.
    pub max_width: usize,
    /// Indentation size in spaces.
    pub indent_size: usize,
    /// Subtrees with more nodes than this always break, whatever their width.
    pub node_budget: usize,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            max_width: MAX_LINE_WIDTH,
            indent_size: INDENT_WIDTH,
            node_budget: NODE_BUDGET,
        }
    }
}

impl FormatConfig {
    pub fn with_max_width(max_width: usize) -> Self {
        Self {
            max_width,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn node_budget(mut self, node_budget: usize) -> Self {
        self.node_budget = node_budget;
        self
    }
}

/// Formatting state: output plus the current column and indentation level.
pub struct FormatContext<E: Emitter> {
    emitter: E,
    column: usize,
    indent_level: usize,
    config: FormatConfig,
}

impl FormatContext<StringEmitter> {
    pub fn with_config(config: FormatConfig) -> Self {
        Self::with_emitter(StringEmitter::new(), config)
    }

    /// Finish formatting and return the text.
    pub fn finalize(mut self) -> String {
        self.emitter.trim_trailing_whitespace();
        self.emitter.output()
    }
}

impl<E: Emitter> FormatContext<E> {
    pub fn with_emitter(emitter: E, config: FormatConfig) -> Self {
        Self {
            emitter,
            column: 0,
            indent_level: 0,
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &FormatConfig {
        &self.config
    }

    #[inline]
    pub fn column(&self) -> usize {
        self.column
    }

    /// Set the column without emitting anything, for output that continues
    /// a line the caller already wrote.
    pub fn set_column(&mut self, column: usize) {
        self.column = column;
    }

    /// Emit text that may itself contain newlines (multi-line string
    /// literals); the column follows the last line.
    pub fn emit(&mut self, text: &str) {
        self.emitter.emit(text);
        match text.rfind('\n') {
            Some(pos) => self.column = text[pos + 1..].chars().count(),
            None => self.column += text.chars().count(),
        }
    }

    pub fn emit_space(&mut self) {
        self.emitter.emit_space();
        self.column += 1;
    }

    /// Newline followed by the current indentation.
    pub fn newline(&mut self) {
        self.emitter.emit_newline();
        let width = self.indent_level * self.config.indent_size;
        self.emitter.emit_indent(width);
        self.column = width;
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    /// Whether `width` more columns fit on the current line.
    #[inline]
    pub fn fits(&self, width: usize) -> bool {
        self.column + width <= self.config.max_width
    }
}
