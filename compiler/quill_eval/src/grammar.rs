//! Host grammar: operators, constants, static functions, literal parsers,
//! capabilities, and the compile entry points.
//!
//! Registration happens on a [`GrammarBuilder`]; [`GrammarBuilder::build`]
//! freezes it into an immutable [`Grammar`] that can be shared across threads
//! and used to compile any number of expressions.

mod builder;
mod operators;

pub use builder::GrammarBuilder;
pub use operators::{BinaryOperator, StaticFunction, UnaryOperator};

use std::sync::Arc;

use quill_ir::{Expr, ExprKind, Name, Rewrite};
use quill_lexer::LexOptions;
use quill_parse::Syntax;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::{
    Arity, ClosureHandler, Closure, CompileError, Compiled, EvalError, GenerateHook, Generator,
    ListHandler, MapHandler, MethodHandler, Optimizer, Scope,
};

/// Name of the implicit record parameter.
pub const RECORD_PARAM: &str = "this";

pub(crate) type LiteralFn<V> = Arc<dyn Fn(&str) -> Result<V, String> + Send + Sync>;
pub(crate) type TruthFn<V> = Arc<dyn Fn(&V) -> Result<bool, EvalError> + Send + Sync>;
pub(crate) type EqualityFn<V> = Arc<dyn Fn(&V, &V) -> Result<bool, EvalError> + Send + Sync>;

/// Per-compile settings.
#[derive(Clone, Debug, Default)]
pub struct CompileOptions {
    /// Positional parameter names, bound in order.
    pub params: Vec<Name>,
    /// Bind a leading `this` record parameter and resolve otherwise unknown
    /// identifiers as its fields.
    pub implicit_record: bool,
}

impl CompileOptions {
    pub fn with_params<I, S>(params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Name>,
    {
        CompileOptions {
            params: params.into_iter().map(Into::into).collect(),
            implicit_record: false,
        }
    }

    #[must_use]
    pub fn implicit_record(mut self) -> Self {
        self.implicit_record = true;
        self
    }

    /// Names of the root frame slots, in order.
    fn frame_params(&self) -> Vec<Name> {
        let record = self
            .implicit_record
            .then(|| Name::from(RECORD_PARAM));
        record.into_iter().chain(self.params.iter().cloned()).collect()
    }
}

/// Frozen host grammar.
pub struct Grammar<V> {
    pub(crate) binary: FxHashMap<Name, (usize, BinaryOperator<V>)>,
    pub(crate) levels: usize,
    pub(crate) unary: FxHashMap<Name, UnaryOperator<V>>,
    pub(crate) constants: FxHashMap<Name, V>,
    pub(crate) functions: FxHashMap<Name, StaticFunction<V>>,
    pub(crate) number_parser: Option<LiteralFn<V>>,
    pub(crate) string_constructor: Option<LiteralFn<V>>,
    pub(crate) truthiness: Option<TruthFn<V>>,
    pub(crate) equality: Option<EqualityFn<V>>,
    pub(crate) lists: Option<Arc<dyn ListHandler<V>>>,
    pub(crate) maps: Option<Arc<dyn MapHandler<V>>>,
    pub(crate) closures: Option<Arc<dyn ClosureHandler<V>>>,
    pub(crate) methods: Option<Arc<dyn MethodHandler<V>>>,
    pub(crate) hook: Option<Arc<dyn GenerateHook<V>>>,
    pub(crate) optimizer: Option<Arc<dyn Optimizer<V>>>,
    pub(crate) lex: LexOptions,
    pub(crate) max_call_depth: Option<usize>,
}

impl<V: crate::HostValue> Grammar<V> {
    pub fn builder() -> GrammarBuilder<V> {
        GrammarBuilder::new()
    }

    /// Compile an expression with no parameters.
    pub fn compile(&self, source: &str) -> Result<Compiled<V>, CompileError> {
        self.compile_with(source, &CompileOptions::default())
    }

    /// Parse, optimize and generate.
    #[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
    pub fn compile_with(
        &self,
        source: &str,
        options: &CompileOptions,
    ) -> Result<Compiled<V>, CompileError> {
        let mut expr = self.parse(source, options)?;
        let rewrites = self.optimize(&mut expr);
        debug!(rewrites, nodes = expr.node_count(), "optimized");
        self.generate(&expr, options)
    }

    /// Parse only, with the compile options' parameters bound.
    pub fn parse(&self, source: &str, options: &CompileOptions) -> Result<Expr<V>, CompileError> {
        Ok(quill_parse::parse(source, self, &options.frame_params())?)
    }

    /// Run the configured optimizer to a fixpoint; returns the number of
    /// rewrites applied.
    pub fn optimize(&self, expr: &mut Expr<V>) -> usize {
        match &self.optimizer {
            Some(optimizer) => expr.optimize(&OptimizerPass {
                grammar: self,
                optimizer: &**optimizer,
            }),
            None => 0,
        }
    }

    /// Generate code for an already parsed (and possibly optimized) tree.
    pub fn generate(
        &self,
        expr: &Expr<V>,
        options: &CompileOptions,
    ) -> Result<Compiled<V>, CompileError> {
        let params = options.frame_params();
        let mut scope = Scope::root(options.implicit_record);
        for param in &params {
            if scope.is_local(param) {
                return Err(CompileError::DuplicateName {
                    name: param.clone(),
                    line: expr.line,
                });
            }
            scope = scope.with_local(param.clone());
        }
        let code = Generator::new(self).generate(expr, &scope)?;
        let root = Closure::new(Arity::Fixed(params.len()), code, Box::new([]), false);
        Ok(Compiled::new(
            root,
            options.params.clone(),
            options.implicit_record,
            self.max_call_depth,
        ))
    }

    pub fn binary_operator(&self, name: &str) -> Option<&BinaryOperator<V>> {
        self.binary.get(name).map(|(_, op)| op)
    }

    pub fn unary_operator(&self, name: &str) -> Option<&UnaryOperator<V>> {
        self.unary.get(name)
    }

    pub fn function(&self, name: &str) -> Option<&StaticFunction<V>> {
        self.functions.get(name)
    }

    /// Boolean conversion of a value.
    pub fn truthy(&self, value: &V) -> Result<bool, EvalError> {
        match &self.truthiness {
            Some(truthy) => truthy(value),
            None => Err(EvalError::new("no truthiness conversion registered")),
        }
    }

    /// Equality test used by `switch`.
    pub fn equals(&self, left: &V, right: &V) -> Result<bool, EvalError> {
        match &self.equality {
            Some(equals) => equals(left, right),
            None => Err(EvalError::new("no equality test registered")),
        }
    }

    pub fn lists(&self) -> Option<&Arc<dyn ListHandler<V>>> {
        self.lists.as_ref()
    }

    pub fn maps(&self) -> Option<&Arc<dyn MapHandler<V>>> {
        self.maps.as_ref()
    }

    pub fn closures(&self) -> Option<&Arc<dyn ClosureHandler<V>>> {
        self.closures.as_ref()
    }

    pub fn methods(&self) -> Option<&Arc<dyn MethodHandler<V>>> {
        self.methods.as_ref()
    }

    pub fn max_call_depth(&self) -> Option<usize> {
        self.max_call_depth
    }
}

impl<V: Clone> Syntax for Grammar<V> {
    type Value = V;

    fn lex_options(&self) -> &LexOptions {
        &self.lex
    }

    fn binary_level(&self, op: &str) -> Option<usize> {
        self.binary.get(op).map(|(level, _)| *level)
    }

    fn binary_levels(&self) -> usize {
        self.levels
    }

    fn is_unary(&self, op: &str) -> bool {
        self.unary.contains_key(op)
    }

    fn constant(&self, name: &str) -> Option<V> {
        self.constants.get(name).cloned()
    }

    fn is_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    fn number(&self, text: &str) -> Result<V, String> {
        match &self.number_parser {
            Some(parse) => parse(text),
            None => Err("no number parser registered".to_string()),
        }
    }

    fn string(&self, text: &str) -> Result<V, String> {
        match &self.string_constructor {
            Some(construct) => construct(text),
            None => Err("no string constructor registered".to_string()),
        }
    }
}

/// Adapts an [`Optimizer`] to the AST rewrite protocol.
struct OptimizerPass<'g, V> {
    grammar: &'g Grammar<V>,
    optimizer: &'g dyn Optimizer<V>,
}

impl<V> Rewrite<V> for OptimizerPass<'_, V> {
    fn rewrite(&self, expr: &Expr<V>) -> Option<ExprKind<V>> {
        self.optimizer.rewrite(expr, self.grammar)
    }
}
