//! Stack growth for recursive passes.
//!
//! Parsing, optimization, code generation and closure invocation all recurse
//! once per nesting level of the source expression (or per call, for recursive
//! closures). Each of those steps runs inside [`ensure_sufficient_stack`], which
//! switches to a freshly allocated stack segment when the current one is close
//! to exhausted.
//!
//! On `wasm32` the engine manages its own stack and the wrapper is a plain call.

/// Remaining stack below which a new segment is allocated.
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated segment.
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if less than [`RED_ZONE`] bytes remain.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// Run `f` directly; wasm hosts own the stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// Remaining stack in bytes, if the platform can report it.
///
/// Used in diagnostics when a host-imposed call depth limit trips.
#[cfg(not(target_arch = "wasm32"))]
pub fn remaining_stack() -> Option<usize> {
    stacker::remaining_stack()
}

/// Remaining stack in bytes; unknown on wasm.
#[cfg(target_arch = "wasm32")]
pub fn remaining_stack() -> Option<usize> {
    None
}
