//! Compiled code, closure values and the top-level evaluation entry point.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};

use quill_ir::Name;
use smallvec::SmallVec;

use crate::{Arity, EvalError, HostValue, Stack};

/// Call arguments; most calls pass a handful.
pub type Args<V> = SmallVec<[V; 4]>;

type CodeFn<V> = dyn Fn(&mut Stack<V>, &Closure<V>) -> Result<V, EvalError> + Send + Sync;

/// Compiled expression: a host closure over (runtime stack, current closure).
///
/// Stateless. Locals are read from the stack frame and captures from the
/// closure being executed, so one `Code` may run on many threads at once.
pub struct Code<V>(Arc<CodeFn<V>>);

impl<V> Clone for Code<V> {
    fn clone(&self) -> Self {
        Code(Arc::clone(&self.0))
    }
}

impl<V> Code<V> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut Stack<V>, &Closure<V>) -> Result<V, EvalError> + Send + Sync + 'static,
    {
        Code(Arc::new(f))
    }

    #[inline]
    pub fn run(&self, stack: &mut Stack<V>, closure: &Closure<V>) -> Result<V, EvalError> {
        (self.0)(stack, closure)
    }
}

impl<V: HostValue> Code<V> {
    /// Code that always yields `value`.
    pub fn constant(value: V) -> Self {
        Code::new(move |_, _| Ok(value.clone()))
    }
}

/// A callable value: compiled body, private capture array, arity.
///
/// Closures are always created inside an `Arc` and keep a weak handle to
/// themselves, which is how a recursive closure refers to its own value
/// without a strong reference cycle.
pub struct Closure<V> {
    arity: Arity,
    code: Code<V>,
    captures: Box<[V]>,
    this: Weak<Closure<V>>,
    pure: bool,
}

impl<V: HostValue> Closure<V> {
    pub fn new(arity: Arity, code: Code<V>, captures: Box<[V]>, pure: bool) -> Arc<Self> {
        Arc::new_cyclic(|this| Closure {
            arity,
            code,
            captures,
            this: this.clone(),
            pure,
        })
    }

    /// Wrap a host function as a closure value body. Arguments are read from
    /// the callee frame.
    pub fn native<F>(arity: Arity, pure: bool, f: F) -> Arc<Self>
    where
        F: Fn(&[V]) -> Result<V, EvalError> + Send + Sync + 'static,
    {
        Closure::new(
            arity,
            Code::new(move |stack, _| f(stack.frame())),
            Box::new([]),
            pure,
        )
    }

    #[inline]
    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Whether calling this closure with literal arguments may be folded.
    #[inline]
    pub fn is_pure(&self) -> bool {
        self.pure
    }

    #[inline]
    pub fn captures(&self) -> &[V] {
        &self.captures
    }

    #[inline]
    pub(crate) fn capture(&self, index: usize) -> &V {
        &self.captures[index]
    }

    /// Strong handle to this closure, for recursive self-reference.
    pub(crate) fn self_arc(&self) -> Result<Arc<Self>, EvalError> {
        self.this
            .upgrade()
            .ok_or_else(|| EvalError::new("closure value was dropped while running"))
    }

    /// Run the body in a new frame on `stack`.
    pub(crate) fn invoke(&self, stack: &mut Stack<V>, args: Args<V>) -> Result<V, EvalError> {
        if !self.arity.accepts(args.len()) {
            return Err(EvalError::arity_mismatch(self.arity, args.len()));
        }
        let frame = stack.enter(args)?;
        let result = quill_stack::ensure_sufficient_stack(|| self.code.run(stack, self));
        stack.leave(frame);
        result
    }

    /// Call from host code on a fresh private stack. Safe to use from any
    /// thread.
    pub fn call(&self, args: &[V]) -> Result<V, EvalError> {
        self.call_limited(args, None)
    }

    /// [`call`](Self::call) with nested calls bounded by `max_depth`.
    pub fn call_limited(&self, args: &[V], max_depth: Option<usize>) -> Result<V, EvalError> {
        let mut stack = Stack::new(max_depth);
        self.invoke(&mut stack, args.iter().cloned().collect())
    }
}

impl<V> fmt::Debug for Closure<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closure")
            .field("arity", &self.arity)
            .field("captures", &self.captures.len())
            .field("pure", &self.pure)
            .finish_non_exhaustive()
    }
}

/// A compiled expression, ready to evaluate any number of times from any
/// number of threads.
pub struct Compiled<V> {
    root: Arc<Closure<V>>,
    params: Vec<Name>,
    implicit_record: bool,
    max_call_depth: Option<usize>,
}

impl<V: HostValue> Compiled<V> {
    pub(crate) fn new(
        root: Arc<Closure<V>>,
        params: Vec<Name>,
        implicit_record: bool,
        max_call_depth: Option<usize>,
    ) -> Self {
        Compiled {
            root,
            params,
            implicit_record,
            max_call_depth,
        }
    }

    /// Declared parameter names, excluding the implicit record.
    pub fn params(&self) -> &[Name] {
        &self.params
    }

    /// The expression as a closure taking its parameters (record first, if
    /// any).
    pub fn closure(&self) -> &Arc<Closure<V>> {
        &self.root
    }

    /// Evaluate with positional arguments.
    ///
    /// The single outermost boundary: every failure, including a panic in
    /// host code, comes back as `Err`.
    pub fn evaluate(&self, args: &[V]) -> Result<V, EvalError> {
        let mut stack = Stack::new(self.max_call_depth);
        let args: Args<V> = args.iter().cloned().collect();
        panic::catch_unwind(AssertUnwindSafe(|| self.root.invoke(&mut stack, args)))
            .unwrap_or_else(|payload| Err(EvalError::panicked(panic_message(&*payload))))
    }

    /// Evaluate with `record` bound as `this`. Without implicit record access
    /// the record is ignored.
    pub fn evaluate_record(&self, record: V, args: &[V]) -> Result<V, EvalError> {
        if !self.implicit_record {
            return self.evaluate(args);
        }
        let mut all = Vec::with_capacity(args.len() + 1);
        all.push(record);
        all.extend_from_slice(args);
        self.evaluate(&all)
    }
}

impl<V> fmt::Debug for Compiled<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compiled")
            .field("params", &self.params)
            .field("implicit_record", &self.implicit_record)
            .finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
