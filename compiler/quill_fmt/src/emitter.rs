//! Output Emitter
//!
//! Abstraction for output production during formatting.

/// Sink for formatted text.
pub trait Emitter {
    /// Emit a text fragment.
    fn emit(&mut self, text: &str);

    /// Emit a newline (Unix-style `\n`).
    fn emit_newline(&mut self);

    /// Emit `width` spaces of indentation.
    fn emit_indent(&mut self, width: usize);

    /// Emit a single space.
    fn emit_space(&mut self);
}

/// In-memory emitter.
#[derive(Default)]
pub struct StringEmitter {
    buffer: String,
}

impl StringEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: String::with_capacity(capacity),
        }
    }

    /// Get the formatted output.
    pub fn output(self) -> String {
        self.buffer
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Strip trailing spaces left on the last line.
    pub fn trim_trailing_whitespace(&mut self) {
        let len = self.buffer.trim_end_matches(' ').len();
        self.buffer.truncate(len);
    }
}

impl Emitter for StringEmitter {
    #[inline]
    fn emit(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    #[inline]
    fn emit_newline(&mut self) {
        self.buffer.push('\n');
    }

    fn emit_indent(&mut self, width: usize) {
        for _ in 0..width {
            self.buffer.push(' ');
        }
    }

    #[inline]
    fn emit_space(&mut self) {
        self.buffer.push(' ');
    }
}
