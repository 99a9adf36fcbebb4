//! Compile-time lexical scope.
//!
//! An immutable value threaded down the generator by reference and extended
//! by copy, so sibling subexpressions never observe each other's bindings.
//! The persistent maps make each extension O(log n) with structural sharing.

use im::HashMap;
use quill_ir::Name;

/// Where a name lives at runtime.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Binding {
    /// Slot in the current stack frame.
    Local(usize),
    /// Slot in the running closure's capture array.
    Capture(usize),
    /// The running closure itself (a recursive `let`).
    Recursive,
}

/// Name resolution context for one function body.
#[derive(Clone, Debug, Default)]
pub struct Scope {
    locals: HashMap<Name, usize>,
    frame_len: usize,
    captures: HashMap<Name, usize>,
    recursive: Option<Name>,
    implicit_record: bool,
}

impl Scope {
    /// Empty top-level scope.
    pub fn root(implicit_record: bool) -> Self {
        Scope {
            implicit_record,
            ..Scope::default()
        }
    }

    /// Scope of a closure body: fresh frame, the given captures, and
    /// optionally the closure's own name.
    pub(crate) fn closure(&self, captures: &[Name], recursive: Option<Name>) -> Self {
        Scope {
            locals: HashMap::new(),
            frame_len: 0,
            captures: captures.iter().cloned().zip(0..).collect(),
            recursive,
            implicit_record: self.implicit_record,
        }
    }

    /// Locals first, then the recursive self name, then captures.
    pub fn resolve(&self, name: &Name) -> Option<Binding> {
        if let Some(&offset) = self.locals.get(name) {
            return Some(Binding::Local(offset));
        }
        if self.recursive.as_ref() == Some(name) {
            return Some(Binding::Recursive);
        }
        self.captures.get(name).map(|&index| Binding::Capture(index))
    }

    /// Whether `name` is already declared in the current frame.
    pub fn is_local(&self, name: &Name) -> bool {
        self.locals.contains_key(name)
    }

    /// This scope plus `name` in the next frame slot.
    #[must_use]
    pub fn with_local(&self, name: Name) -> Self {
        Scope {
            locals: self.locals.update(name, self.frame_len),
            frame_len: self.frame_len + 1,
            ..self.clone()
        }
    }

    /// Number of frame slots in use.
    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    /// Whether unresolved names fall back to fields of the `this` record.
    pub fn implicit_record(&self) -> bool {
        self.implicit_record
    }
}

#[cfg(test)]
mod tests;
