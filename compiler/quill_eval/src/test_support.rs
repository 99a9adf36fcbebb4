//! Small integer-valued host used by the unit tests.

use std::fmt;
use std::sync::Arc;

use quill_ir::Name;

use crate::{
    Arity, BinaryOperator, Closure, ClosureHandler, CompileOptions, EvalError, Grammar,
    GrammarBuilder, ListHandler, MapHandler, MethodHandler, StaticFunction, UnaryOperator,
};

#[derive(Clone, Debug)]
pub(crate) enum Val {
    Int(i64),
    Bool(bool),
    Str(String),
    List(Arc<Vec<Val>>),
    Map(Arc<Vec<(Name, Val)>>),
    Func(Arc<Closure<Val>>),
}

impl PartialEq for Val {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Val::Int(a), Val::Int(b)) => a == b,
            (Val::Bool(a), Val::Bool(b)) => a == b,
            (Val::Str(a), Val::Str(b)) => a == b,
            (Val::List(a), Val::List(b)) => a == b,
            (Val::Map(a), Val::Map(b)) => a == b,
            (Val::Func(a), Val::Func(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Val {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Val::Int(n) => write!(f, "{n}"),
            Val::Bool(b) => write!(f, "{b}"),
            Val::Str(s) => write!(f, "\"{s}\""),
            Val::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Val::Map(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
            Val::Func(_) => f.write_str("<closure>"),
        }
    }
}

fn int(value: &Val) -> Result<i64, EvalError> {
    match value {
        Val::Int(n) => Ok(*n),
        _ => Err(EvalError::wrong_type("integer")),
    }
}

fn arith(f: fn(i64, i64) -> Option<i64>) -> impl Fn(&Val, &Val) -> Result<Val, EvalError> {
    move |a: &Val, b: &Val| {
        f(int(a)?, int(b)?)
            .map(Val::Int)
            .ok_or_else(|| EvalError::new("arithmetic error"))
    }
}

pub(crate) struct Lists;

impl ListHandler<Val> for Lists {
    fn construct(&self, items: Vec<Val>) -> Result<Val, EvalError> {
        Ok(Val::List(Arc::new(items)))
    }

    fn index(&self, list: &Val, index: &Val) -> Result<Val, EvalError> {
        let Val::List(items) = list else {
            return Err(EvalError::wrong_type("list"));
        };
        usize::try_from(int(index)?)
            .ok()
            .and_then(|i| items.get(i).cloned())
            .ok_or_else(|| EvalError::new("index out of range"))
    }

    fn is_list(&self, value: &Val) -> bool {
        matches!(value, Val::List(_))
    }
}

struct Maps;

impl MapHandler<Val> for Maps {
    fn construct(&self, entries: Vec<(Name, Val)>) -> Result<Val, EvalError> {
        Ok(Val::Map(Arc::new(entries)))
    }

    fn get(&self, map: &Val, key: &Name) -> Result<Val, EvalError> {
        let Val::Map(entries) = map else {
            return Err(EvalError::wrong_type("map"));
        };
        entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .ok_or_else(|| EvalError::undefined_field(key))
    }

    fn is_map(&self, value: &Val) -> bool {
        matches!(value, Val::Map(_))
    }
}

pub(crate) struct Funcs;

impl ClosureHandler<Val> for Funcs {
    fn wrap(&self, closure: Arc<Closure<Val>>) -> Val {
        Val::Func(closure)
    }

    fn extract(&self, value: &Val) -> Option<Arc<Closure<Val>>> {
        match value {
            Val::Func(closure) => Some(Arc::clone(closure)),
            _ => None,
        }
    }
}

struct Methods;

impl MethodHandler<Val> for Methods {
    fn call_method(&self, receiver: &Val, method: &Name, args: Vec<Val>) -> Result<Val, EvalError> {
        match (receiver, method.as_str(), args.as_slice()) {
            (Val::List(items), "len", []) => Ok(Val::Int(i64::try_from(items.len()).unwrap_or(i64::MAX))),
            (Val::Str(s), "len", []) => Ok(Val::Int(i64::try_from(s.len()).unwrap_or(i64::MAX))),
            _ => Err(EvalError::undefined_method(method)),
        }
    }
}

/// Everything registered except optional capabilities.
pub(crate) fn base() -> GrammarBuilder<Val> {
    Grammar::<Val>::builder()
        .binary(BinaryOperator::new("|", |a: &Val, b: &Val| {
            Ok(Val::Bool(a == &Val::Bool(true) || b == &Val::Bool(true)))
        }))
        .binary(BinaryOperator::new("&", |a: &Val, b: &Val| {
            Ok(Val::Bool(a == &Val::Bool(true) && b == &Val::Bool(true)))
        }))
        .binary(BinaryOperator::new("=", |a: &Val, b: &Val| Ok(Val::Bool(a == b))))
        .binary_alongside(BinaryOperator::new("!=", |a: &Val, b: &Val| Ok(Val::Bool(a != b))))
        .binary(BinaryOperator::new("<", |a: &Val, b: &Val| Ok(Val::Bool(int(a)? < int(b)?))))
        .binary(BinaryOperator::new("+", arith(i64::checked_add)).commutative())
        .binary_alongside(BinaryOperator::new("-", arith(i64::checked_sub)))
        .binary(BinaryOperator::new("*", arith(i64::checked_mul)).commutative())
        .binary_alongside(BinaryOperator::new("/", arith(i64::checked_div)))
        .unary(UnaryOperator::new("-", |a: &Val| Ok(Val::Int(-int(a)?))))
        .unary(UnaryOperator::new("!", |a: &Val| match a {
            Val::Bool(b) => Ok(Val::Bool(!b)),
            _ => Err(EvalError::wrong_type("boolean")),
        }))
        .constant("true", Val::Bool(true))
        .constant("false", Val::Bool(false))
        .function(
            "max",
            StaticFunction::new(Arity::Fixed(2), |args: &[Val]| Ok(Val::Int(int(&args[0])?.max(int(&args[1])?)))),
        )
        .function(
            "sum",
            StaticFunction::new(Arity::Any, |args: &[Val]| {
                args.iter().map(int).sum::<Result<i64, _>>().map(Val::Int)
            }),
        )
        .function(
            "roll",
            StaticFunction::new(Arity::Fixed(0), |_: &[Val]| Ok(Val::Int(4))).impure(),
        )
        .number_parser(|text| text.parse().map(Val::Int).map_err(|e| format!("{e}")))
        .string_constructor(|text| Ok(Val::Str(text.to_string())))
        .truthiness(|value| match value {
            Val::Bool(b) => Ok(*b),
            _ => Err(EvalError::wrong_type("boolean")),
        })
}

/// Full grammar with every capability.
pub(crate) fn grammar() -> Grammar<Val> {
    base().lists(Lists).maps(Maps).closures(Funcs).methods(Methods).build()
}

pub(crate) fn eval(source: &str) -> Result<Val, EvalError> {
    grammar().compile(source).unwrap().evaluate(&[])
}

pub(crate) fn eval_with(source: &str, params: &[&str], args: &[Val]) -> Result<Val, EvalError> {
    grammar()
        .compile_with(source, &CompileOptions::with_params(params.iter().copied()))
        .unwrap()
        .evaluate(args)
}

pub(crate) fn list(items: &[i64]) -> Val {
    Val::List(Arc::new(items.iter().copied().map(Val::Int).collect()))
}
