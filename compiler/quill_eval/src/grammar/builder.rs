//! Grammar registration.

use std::sync::Arc;

use quill_ir::Name;
use quill_lexer::{CharClasses, LexOptions};
use rustc_hash::FxHashMap;
use tracing::debug;

use super::{EqualityFn, Grammar, LiteralFn, TruthFn};
use crate::{
    BinaryOperator, ClosureHandler, ConstantFolder, EvalError, GenerateHook, HostValue,
    ListHandler, MapHandler, MethodHandler, Optimizer, StaticFunction, UnaryOperator,
};

/// Builder for [`Grammar`].
///
/// Binary operator precedence follows registration order: each
/// [`binary`](Self::binary) call opens a new level binding tighter than every
/// earlier one, and [`binary_alongside`](Self::binary_alongside) adds an
/// operator to the most recent level. Operators on one level associate left.
///
/// # Example
///
/// ```text
/// Grammar::builder()
///     .binary(BinaryOperator::new("+", add).commutative())
///     .binary_alongside(BinaryOperator::new("-", sub))
///     .binary(BinaryOperator::new("*", mul).commutative())
///     .unary(UnaryOperator::new("-", neg))
///     .number_parser(parse_number)
///     .build()
/// ```
#[must_use]
pub struct GrammarBuilder<V> {
    binary: FxHashMap<Name, (usize, BinaryOperator<V>)>,
    levels: usize,
    unary: FxHashMap<Name, UnaryOperator<V>>,
    constants: FxHashMap<Name, V>,
    functions: FxHashMap<Name, StaticFunction<V>>,
    number_parser: Option<LiteralFn<V>>,
    string_constructor: Option<LiteralFn<V>>,
    truthiness: Option<TruthFn<V>>,
    equality: Option<EqualityFn<V>>,
    lists: Option<Arc<dyn ListHandler<V>>>,
    maps: Option<Arc<dyn MapHandler<V>>>,
    closures: Option<Arc<dyn ClosureHandler<V>>>,
    methods: Option<Arc<dyn MethodHandler<V>>>,
    hook: Option<Arc<dyn GenerateHook<V>>>,
    optimizer: Option<Arc<dyn Optimizer<V>>>,
    classes: CharClasses,
    line_comments: bool,
    max_call_depth: Option<usize>,
}

impl<V: HostValue> Default for GrammarBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: HostValue> GrammarBuilder<V> {
    /// Empty grammar with the constant-folding optimizer.
    pub fn new() -> Self {
        GrammarBuilder {
            binary: FxHashMap::default(),
            levels: 0,
            unary: FxHashMap::default(),
            constants: FxHashMap::default(),
            functions: FxHashMap::default(),
            number_parser: None,
            string_constructor: None,
            truthiness: None,
            equality: None,
            lists: None,
            maps: None,
            closures: None,
            methods: None,
            hook: None,
            optimizer: Some(Arc::new(ConstantFolder)),
            classes: CharClasses::default(),
            line_comments: false,
            max_call_depth: None,
        }
    }

    /// Register `op` on a new precedence level. Re-registering a name
    /// replaces the implementation and keeps its level.
    pub fn binary(mut self, op: BinaryOperator<V>) -> Self {
        if let Some((_, existing)) = self.binary.get_mut(op.name()) {
            *existing = op;
            return self;
        }
        let level = self.levels;
        self.levels += 1;
        self.binary.insert(op.name().clone(), (level, op));
        self
    }

    /// Register `op` on the most recently opened precedence level.
    pub fn binary_alongside(mut self, op: BinaryOperator<V>) -> Self {
        if self.levels == 0 {
            return self.binary(op);
        }
        let level = self.levels - 1;
        self.binary.insert(op.name().clone(), (level, op));
        self
    }

    pub fn unary(mut self, op: UnaryOperator<V>) -> Self {
        self.unary.insert(op.name().clone(), op);
        self
    }

    /// Named constant, substituted as a literal wherever the name is not
    /// lexically bound.
    pub fn constant(mut self, name: impl Into<Name>, value: V) -> Self {
        self.constants.insert(name.into(), value);
        self
    }

    pub fn function(mut self, name: impl Into<Name>, function: StaticFunction<V>) -> Self {
        self.functions.insert(name.into(), function);
        self
    }

    /// Converts number text to a value. The lexer only groups characters, so
    /// this decides the accepted number syntax.
    pub fn number_parser<F>(mut self, parse: F) -> Self
    where
        F: Fn(&str) -> Result<V, String> + Send + Sync + 'static,
    {
        self.number_parser = Some(Arc::new(parse));
        self
    }

    /// Converts the raw contents of a `"..."` literal to a value.
    pub fn string_constructor<F>(mut self, construct: F) -> Self
    where
        F: Fn(&str) -> Result<V, String> + Send + Sync + 'static,
    {
        self.string_constructor = Some(Arc::new(construct));
        self
    }

    /// Boolean conversion used by `if` and by the default equality test.
    pub fn truthiness<F>(mut self, truthy: F) -> Self
    where
        F: Fn(&V) -> Result<bool, EvalError> + Send + Sync + 'static,
    {
        self.truthiness = Some(Arc::new(truthy));
        self
    }

    /// Equality test for `switch`. Defaults to the truthiness of the `=`
    /// operator's result when both are registered.
    pub fn equality<F>(mut self, equals: F) -> Self
    where
        F: Fn(&V, &V) -> Result<bool, EvalError> + Send + Sync + 'static,
    {
        self.equality = Some(Arc::new(equals));
        self
    }

    pub fn lists(mut self, handler: impl ListHandler<V> + 'static) -> Self {
        self.lists = Some(Arc::new(handler));
        self
    }

    pub fn maps(mut self, handler: impl MapHandler<V> + 'static) -> Self {
        self.maps = Some(Arc::new(handler));
        self
    }

    pub fn closures(mut self, handler: impl ClosureHandler<V> + 'static) -> Self {
        self.closures = Some(Arc::new(handler));
        self
    }

    pub fn methods(mut self, handler: impl MethodHandler<V> + 'static) -> Self {
        self.methods = Some(Arc::new(handler));
        self
    }

    pub fn hook(mut self, hook: impl GenerateHook<V> + 'static) -> Self {
        self.hook = Some(Arc::new(hook));
        self
    }

    /// Replace the optimizer.
    pub fn optimizer(mut self, optimizer: impl Optimizer<V> + 'static) -> Self {
        self.optimizer = Some(Arc::new(optimizer));
        self
    }

    pub fn without_optimizer(mut self) -> Self {
        self.optimizer = None;
        self
    }

    pub fn char_classes(mut self, classes: CharClasses) -> Self {
        self.classes = classes;
        self
    }

    /// Toggle `//` line comments. Off by default, since it changes how `/`
    /// followed by `/` tokenizes.
    pub fn line_comments(mut self, enabled: bool) -> Self {
        self.line_comments = enabled;
        self
    }

    /// Limit nested calls per evaluation; `None` leaves recursion bounded
    /// only by the host's resources.
    pub fn max_call_depth(mut self, depth: Option<usize>) -> Self {
        self.max_call_depth = depth;
        self
    }

    /// Freeze the registrations.
    pub fn build(self) -> Grammar<V> {
        let operators = self
            .binary
            .keys()
            .chain(self.unary.keys())
            .map(|name| name.as_str())
            .chain(["=", "->"])
            .map(str::to_string);
        let lex = LexOptions {
            classes: self.classes,
            ..LexOptions::default()
        }
        .with_line_comments(self.line_comments)
        .with_operators(operators.collect::<Vec<_>>());

        let equality = self.equality.or_else(|| {
            let (_, eq) = self.binary.get("=")?;
            let eq = eq.clone();
            let truthy = self.truthiness.clone()?;
            let derived: EqualityFn<V> = Arc::new(move |a: &V, b: &V| truthy(&eq.apply(a, b)?));
            Some(derived)
        });

        debug!(
            binary = self.binary.len(),
            levels = self.levels,
            unary = self.unary.len(),
            functions = self.functions.len(),
            "grammar built"
        );

        Grammar {
            binary: self.binary,
            levels: self.levels,
            unary: self.unary,
            constants: self.constants,
            functions: self.functions,
            number_parser: self.number_parser,
            string_constructor: self.string_constructor,
            truthiness: self.truthiness,
            equality,
            lists: self.lists,
            maps: self.maps,
            closures: self.closures,
            methods: self.methods,
            hook: self.hook,
            optimizer: self.optimizer,
            lex,
            max_call_depth: self.max_call_depth,
        }
    }
}
