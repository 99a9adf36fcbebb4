//! Operator and static function registrations.

use std::fmt;
use std::sync::Arc;

use quill_ir::Name;

use crate::{Arity, EvalError};

pub(crate) type BinaryFn<V> = Arc<dyn Fn(&V, &V) -> Result<V, EvalError> + Send + Sync>;
pub(crate) type UnaryFn<V> = Arc<dyn Fn(&V) -> Result<V, EvalError> + Send + Sync>;
pub(crate) type NativeFn<V> = Arc<dyn Fn(&[V]) -> Result<V, EvalError> + Send + Sync>;

/// An infix operator. Pure by default, which licenses constant folding.
pub struct BinaryOperator<V> {
    name: Name,
    imp: BinaryFn<V>,
    commutative: bool,
    pure: bool,
}

impl<V> BinaryOperator<V> {
    pub fn new<F>(name: impl Into<Name>, imp: F) -> Self
    where
        F: Fn(&V, &V) -> Result<V, EvalError> + Send + Sync + 'static,
    {
        BinaryOperator {
            name: name.into(),
            imp: Arc::new(imp),
            commutative: false,
            pure: true,
        }
    }

    /// `a op b == b op a` and `a op (b op c) == (a op b) op c`; enables
    /// re-association during folding. Equality is commutative but not
    /// associative, so it must not be marked.
    #[must_use]
    pub fn commutative(mut self) -> Self {
        self.commutative = true;
        self
    }

    #[must_use]
    pub fn impure(mut self) -> Self {
        self.pure = false;
        self
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn is_commutative(&self) -> bool {
        self.commutative
    }

    pub fn is_pure(&self) -> bool {
        self.pure
    }

    #[inline]
    pub fn apply(&self, left: &V, right: &V) -> Result<V, EvalError> {
        (self.imp)(left, right)
    }
}

impl<V> Clone for BinaryOperator<V> {
    fn clone(&self) -> Self {
        BinaryOperator {
            name: self.name.clone(),
            imp: Arc::clone(&self.imp),
            commutative: self.commutative,
            pure: self.pure,
        }
    }
}

impl<V> fmt::Debug for BinaryOperator<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryOperator")
            .field("name", &self.name)
            .field("commutative", &self.commutative)
            .field("pure", &self.pure)
            .finish_non_exhaustive()
    }
}

/// A prefix operator.
pub struct UnaryOperator<V> {
    name: Name,
    imp: UnaryFn<V>,
    pure: bool,
}

impl<V> UnaryOperator<V> {
    pub fn new<F>(name: impl Into<Name>, imp: F) -> Self
    where
        F: Fn(&V) -> Result<V, EvalError> + Send + Sync + 'static,
    {
        UnaryOperator {
            name: name.into(),
            imp: Arc::new(imp),
            pure: true,
        }
    }

    #[must_use]
    pub fn impure(mut self) -> Self {
        self.pure = false;
        self
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn is_pure(&self) -> bool {
        self.pure
    }

    #[inline]
    pub fn apply(&self, operand: &V) -> Result<V, EvalError> {
        (self.imp)(operand)
    }
}

impl<V> Clone for UnaryOperator<V> {
    fn clone(&self) -> Self {
        UnaryOperator {
            name: self.name.clone(),
            imp: Arc::clone(&self.imp),
            pure: self.pure,
        }
    }
}

/// A host function callable by name, with its arity checked at compile time.
pub struct StaticFunction<V> {
    imp: NativeFn<V>,
    arity: Arity,
    pure: bool,
}

impl<V> StaticFunction<V> {
    pub fn new<F>(arity: Arity, imp: F) -> Self
    where
        F: Fn(&[V]) -> Result<V, EvalError> + Send + Sync + 'static,
    {
        StaticFunction {
            imp: Arc::new(imp),
            arity,
            pure: true,
        }
    }

    #[must_use]
    pub fn impure(mut self) -> Self {
        self.pure = false;
        self
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    pub fn is_pure(&self) -> bool {
        self.pure
    }

    #[inline]
    pub fn apply(&self, args: &[V]) -> Result<V, EvalError> {
        (self.imp)(args)
    }

    pub(crate) fn imp(&self) -> &NativeFn<V> {
        &self.imp
    }
}

impl<V> Clone for StaticFunction<V> {
    fn clone(&self) -> Self {
        StaticFunction {
            imp: Arc::clone(&self.imp),
            arity: self.arity,
            pure: self.pure,
        }
    }
}
