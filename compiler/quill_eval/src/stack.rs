//! Runtime evaluation stack.
//!
//! One growable vector per top-level evaluation, sliced into LIFO frames.
//! A frame starts at `base` and holds the callee's arguments followed by its
//! `let` bindings, so compiled code addresses them by small fixed offsets
//! resolved at generation time.

use tracing::debug;

use crate::EvalError;

/// Saved caller state, restored by [`Stack::leave`].
#[derive(Copy, Clone, Debug)]
pub(crate) struct Frame {
    base: usize,
    len: usize,
}

pub struct Stack<V> {
    values: Vec<V>,
    base: usize,
    depth: usize,
    max_depth: Option<usize>,
}

impl<V> Default for Stack<V> {
    fn default() -> Self {
        Stack::new(None)
    }
}

impl<V> Stack<V> {
    /// Empty stack; `max_depth` bounds nested calls.
    pub fn new(max_depth: Option<usize>) -> Self {
        Stack {
            values: Vec::with_capacity(16),
            base: 0,
            depth: 0,
            max_depth,
        }
    }

    /// Number of active frames.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values of the current frame: arguments, then live `let` bindings.
    #[inline]
    pub fn frame(&self) -> &[V] {
        &self.values[self.base..]
    }

    /// Slot `offset` of the current frame.
    #[inline]
    pub(crate) fn local(&self, offset: usize) -> &V {
        &self.values[self.base + offset]
    }

    #[inline]
    pub(crate) fn push(&mut self, value: V) {
        self.values.push(value);
    }

    #[inline]
    pub(crate) fn pop(&mut self) {
        self.values.pop();
    }

    /// Open a frame holding `args`.
    pub(crate) fn enter(&mut self, args: impl IntoIterator<Item = V>) -> Result<Frame, EvalError> {
        if let Some(max) = self.max_depth {
            if self.depth >= max {
                debug!(
                    depth = self.depth,
                    remaining_stack = ?quill_stack::remaining_stack(),
                    "call depth limit reached"
                );
                return Err(EvalError::stack_overflow(max));
            }
        }
        let saved = Frame {
            base: self.base,
            len: self.values.len(),
        };
        self.values.extend(args);
        self.base = saved.len;
        self.depth += 1;
        Ok(saved)
    }

    /// Discard the current frame and restore the caller's.
    pub(crate) fn leave(&mut self, frame: Frame) {
        self.values.truncate(frame.len);
        self.base = frame.base;
        self.depth -= 1;
    }
}
