//! The standard grammar over [`Value`].

use std::cmp::Ordering;
use std::sync::Arc;

use quill_eval::{
    Arity, BinaryOperator, Closure, ClosureHandler, Code, CompileError, EvalError, GenerateHook,
    Generator, Grammar, GrammarBuilder, ListHandler, MapHandler, MethodHandler, Scope,
    StaticFunction, UnaryOperator,
};
use quill_ir::{Expr, ExprKind, Name};

use crate::Value;

fn num(f: fn(f64, f64) -> f64) -> impl Fn(&Value, &Value) -> Result<Value, EvalError> {
    move |a: &Value, b: &Value| Ok(Value::Num(f(a.as_num()?, b.as_num()?)))
}

fn compare(a: &Value, b: &Value) -> Result<Ordering, EvalError> {
    let ordering = match (a, b) {
        (Value::Num(x), Value::Num(y)) => x.partial_cmp(y),
        (Value::Str(x), Value::Str(y)) => Some(x.cmp(y)),
        _ => return Err(EvalError::wrong_type("number or string")),
    };
    ordering.ok_or_else(|| EvalError::new("NaN is not ordered"))
}

fn ordered(test: fn(Ordering) -> bool) -> impl Fn(&Value, &Value) -> Result<Value, EvalError> {
    move |a: &Value, b: &Value| Ok(Value::Bool(test(compare(a, b)?)))
}

fn length(value: &Value) -> Result<Value, EvalError> {
    let len = match value {
        Value::Str(s) => s.chars().count(),
        Value::List(items) => items.len(),
        Value::Map(entries) => entries.len(),
        _ => return Err(EvalError::wrong_type("string, list or map")),
    };
    #[expect(clippy::cast_precision_loss, reason = "lengths stay far below 2^52")]
    let len = len as f64;
    Ok(Value::Num(len))
}

fn parse_number(text: &str) -> Result<Value, String> {
    text.parse::<f64>()
        .map(Value::Num)
        .map_err(|_| format!("`{text}` is not a number"))
}

/// Nested call limit of the standard grammar.
pub const MAX_CALL_DEPTH: usize = 10_000;

/// Registrations without capabilities or the short-circuit hook.
///
/// Operator levels, loosest first: `|`; `&`; `=` `!=`; `<` `>` `<=` `>=`;
/// `+` `-` `~`; `*` `/`; `^`.
pub fn standard_builder() -> GrammarBuilder<Value> {
    Grammar::<Value>::builder()
        .binary(BinaryOperator::new("|", |a: &Value, b: &Value| {
            Ok(Value::Bool(a.truthy()? || b.truthy()?))
        }))
        .binary(BinaryOperator::new("&", |a: &Value, b: &Value| {
            Ok(Value::Bool(a.truthy()? && b.truthy()?))
        }))
        .binary(BinaryOperator::new("=", |a: &Value, b: &Value| Ok(Value::Bool(a == b))))
        .binary_alongside(BinaryOperator::new("!=", |a: &Value, b: &Value| Ok(Value::Bool(a != b))))
        .binary(BinaryOperator::new("<", ordered(Ordering::is_lt)))
        .binary_alongside(BinaryOperator::new(">", ordered(Ordering::is_gt)))
        .binary_alongside(BinaryOperator::new("<=", ordered(Ordering::is_le)))
        .binary_alongside(BinaryOperator::new(">=", ordered(Ordering::is_ge)))
        .binary(BinaryOperator::new("+", num(|a, b| a + b)).commutative())
        .binary_alongside(BinaryOperator::new("-", num(|a, b| a - b)))
        .binary_alongside(BinaryOperator::new("~", |a: &Value, b: &Value| {
            Ok(Value::from(a.to_text() + &b.to_text()))
        }))
        .binary(BinaryOperator::new("*", num(|a, b| a * b)).commutative())
        .binary_alongside(BinaryOperator::new("/", |a: &Value, b: &Value| {
            let divisor = b.as_num()?;
            if divisor == 0.0 {
                return Err(EvalError::new("division by zero"));
            }
            Ok(Value::Num(a.as_num()? / divisor))
        }))
        .binary(BinaryOperator::new("^", num(f64::powf)))
        .unary(UnaryOperator::new("-", |a: &Value| Ok(Value::Num(-a.as_num()?))))
        .unary(UnaryOperator::new("!", |a: &Value| Ok(Value::Bool(!a.truthy()?))))
        .constant("true", Value::Bool(true))
        .constant("false", Value::Bool(false))
        .constant("nil", Value::Nil)
        .constant("pi", Value::Num(std::f64::consts::PI))
        .function(
            "min",
            StaticFunction::new(Arity::Fixed(2), |args: &[Value]| {
                Ok(Value::Num(args[0].as_num()?.min(args[1].as_num()?)))
            }),
        )
        .function(
            "max",
            StaticFunction::new(Arity::Fixed(2), |args: &[Value]| {
                Ok(Value::Num(args[0].as_num()?.max(args[1].as_num()?)))
            }),
        )
        .function(
            "abs",
            StaticFunction::new(Arity::Fixed(1), |args: &[Value]| {
                Ok(Value::Num(args[0].as_num()?.abs()))
            }),
        )
        .function(
            "len",
            StaticFunction::new(Arity::Fixed(1), |args: &[Value]| length(&args[0])),
        )
        .number_parser(parse_number)
        .string_constructor(|text| Ok(Value::from(text)))
        .truthiness(Value::truthy)
        .max_call_depth(Some(MAX_CALL_DEPTH))
}

/// The standard grammar: every operator, constant and function of
/// [`standard_builder`], all capabilities, and short-circuiting `&` and `|`.
pub fn standard_grammar() -> Grammar<Value> {
    standard_builder()
        .lists(Lists)
        .maps(Maps)
        .closures(Funcs)
        .methods(Methods)
        .hook(ShortCircuit)
        .build()
}

struct Lists;

impl ListHandler<Value> for Lists {
    fn construct(&self, items: Vec<Value>) -> Result<Value, EvalError> {
        Ok(Value::from(items))
    }

    fn index(&self, list: &Value, index: &Value) -> Result<Value, EvalError> {
        let Value::List(items) = list else {
            return Err(EvalError::wrong_type("list"));
        };
        let position = index.as_num()?;
        if position.fract() != 0.0 || position < 0.0 {
            return Err(EvalError::new(format!("invalid list index {position}")));
        }
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "checked non-negative and integral above"
        )]
        let position = position as usize;
        items.get(position).cloned().ok_or_else(|| {
            EvalError::new(format!(
                "index {position} out of range for list of length {}",
                items.len()
            ))
        })
    }

    fn is_list(&self, value: &Value) -> bool {
        matches!(value, Value::List(_))
    }
}

struct Maps;

impl MapHandler<Value> for Maps {
    /// Later entries replace earlier ones with the same key.
    fn construct(&self, entries: Vec<(Name, Value)>) -> Result<Value, EvalError> {
        Ok(Value::map(entries))
    }

    fn get(&self, map: &Value, key: &Name) -> Result<Value, EvalError> {
        let Value::Map(entries) = map else {
            return Err(EvalError::wrong_type("map"));
        };
        entries
            .get(key)
            .cloned()
            .ok_or_else(|| EvalError::undefined_field(key))
    }

    fn is_map(&self, value: &Value) -> bool {
        matches!(value, Value::Map(_))
    }
}

struct Funcs;

impl ClosureHandler<Value> for Funcs {
    fn wrap(&self, closure: Arc<Closure<Value>>) -> Value {
        Value::Func(closure)
    }

    fn extract(&self, value: &Value) -> Option<Arc<Closure<Value>>> {
        match value {
            Value::Func(closure) => Some(Arc::clone(closure)),
            _ => None,
        }
    }
}

fn function_arg(args: &[Value]) -> Result<&Arc<Closure<Value>>, EvalError> {
    match args {
        [Value::Func(f)] => Ok(f),
        [_] => Err(EvalError::wrong_type("function")),
        _ => Err(EvalError::arity_mismatch(Arity::Fixed(1), args.len())),
    }
}

struct Methods;

impl MethodHandler<Value> for Methods {
    fn call_method(&self, receiver: &Value, method: &Name, args: Vec<Value>) -> Result<Value, EvalError> {
        match (receiver, method.as_str()) {
            (Value::Str(_) | Value::List(_) | Value::Map(_), "len") if args.is_empty() => {
                length(receiver)
            }
            (Value::Map(entries), "keys") if args.is_empty() => Ok(Value::list(
                entries.keys().map(|key| Value::from(key.as_str())),
            )),
            (Value::List(items), "map") => {
                let f = function_arg(&args)?;
                items
                    .iter()
                    .map(|item| f.call(std::slice::from_ref(item)))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::from)
            }
            (Value::List(items), "filter") => {
                let f = function_arg(&args)?;
                let mut kept = Vec::new();
                for item in items.iter() {
                    if f.call(std::slice::from_ref(item))?.truthy()? {
                        kept.push(item.clone());
                    }
                }
                Ok(Value::from(kept))
            }
            _ => Err(EvalError::undefined_method(method)),
        }
    }
}

/// `&` and `|` skip their right operand once the left one decides the result.
struct ShortCircuit;

impl GenerateHook<Value> for ShortCircuit {
    fn generate(
        &self,
        expr: &Expr<Value>,
        generator: &Generator<'_, Value>,
        scope: &Scope,
    ) -> Result<Option<Code<Value>>, CompileError> {
        let ExprKind::Binary { op, left, right } = &expr.kind else {
            return Ok(None);
        };
        let decided_by = match op.as_str() {
            "&" => false,
            "|" => true,
            _ => return Ok(None),
        };
        let line = expr.line;
        let left = generator.generate(left, scope)?;
        let right = generator.generate(right, scope)?;
        Ok(Some(Code::new(move |stack, closure| {
            let truth = |value: Value| value.truthy().map_err(|e| e.at_line(line));
            if truth(left.run(stack, closure)?)? == decided_by {
                return Ok(Value::Bool(decided_by));
            }
            truth(right.run(stack, closure)?).map(Value::Bool)
        })))
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
