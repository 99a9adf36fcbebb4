use pretty_assertions::assert_eq;
use quill_eval::{CompileError, EvalErrorKind};

use crate::{eval, Error, Value};

fn num(source: &str) -> f64 {
    match eval(source).unwrap() {
        Value::Num(n) => n,
        other => panic!("`{source}` gave {other}"),
    }
}

fn eval_error(source: &str) -> EvalErrorKind {
    match eval(source) {
        Err(Error::Eval(e)) => e.kind,
        other => panic!("`{source}` gave {other:?}"),
    }
}

#[test]
fn test_arithmetic_levels() {
    assert_eq!(num("2 + 3 * 4"), 14.0);
    assert_eq!(num("2 * 3 ^ 2"), 18.0);
    assert_eq!(num("10 - 4 - 3"), 3.0);
    assert_eq!(num("-2 - 3"), -5.0);
    assert_eq!(num("7 / 2"), 3.5);
}

#[test]
fn test_comparisons() {
    assert_eq!(eval("1 < 2 & 2 <= 2 & 3 >= 4 = false").unwrap(), Value::Bool(true));
    assert_eq!(eval("\"apple\" < \"banana\"").unwrap(), Value::Bool(true));
    assert_eq!(eval("1 != 1").unwrap(), Value::Bool(false));
    assert!(matches!(
        eval_error("1 < \"a\""),
        EvalErrorKind::WrongType { .. }
    ));
}

#[test]
fn test_concatenation() {
    assert_eq!(eval("\"n=\" ~ (1 + 2)").unwrap(), Value::from("n=3"));
    assert_eq!(eval("\"a\" ~ \"b\" ~ 1").unwrap(), Value::from("ab1"));
}

#[test]
fn test_constants_and_functions() {
    assert_eq!(num("pi"), std::f64::consts::PI);
    assert_eq!(num("max(3, min(10, 7))"), 7.0);
    assert_eq!(num("abs(-4)"), 4.0);
    assert_eq!(num("len(\"hello\") + len([1, 2]) + len({a: 1})"), 8.0);
    assert_eq!(eval("nil").unwrap(), Value::Nil);
}

#[test]
fn test_static_arity_is_checked() {
    for source in ["max(1)", "max(1, 2, 3)", "abs()"] {
        assert!(
            matches!(
                eval(source),
                Err(Error::Compile(CompileError::ArityMismatch { .. }))
            ),
            "{source}"
        );
    }
}

#[test]
fn test_division_by_zero() {
    assert_eq!(
        eval_error("let z = 0; 1 / z"),
        EvalErrorKind::Custom {
            message: "division by zero".to_string()
        }
    );
}

#[test]
fn test_short_circuit_skips_right_operand() {
    // The right operand would fail if it ran.
    assert_eq!(eval("let z = 0; false & 1 / z = 1").unwrap(), Value::Bool(false));
    assert_eq!(eval("let z = 0; true | 1 / z = 1").unwrap(), Value::Bool(true));
    assert_eq!(eval("let t = true; t & nil").unwrap(), Value::Bool(false));
}

#[test]
fn test_short_circuit_reports_line() {
    let Err(Error::Eval(err)) = eval("let n = 1;\nn & true") else {
        panic!("expected an evaluation error");
    };
    assert_eq!(err.line, Some(2));
    assert_eq!(
        err.kind,
        EvalErrorKind::WrongType {
            expected: "boolean"
        }
    );
}

#[test]
fn test_list_indexing() {
    assert_eq!(num("[10, 20, 30][1]"), 20.0);
    assert_eq!(
        eval_error("let i = 3; [1, 2][i]"),
        EvalErrorKind::Custom {
            message: "index 3 out of range for list of length 2".to_string()
        }
    );
    assert!(matches!(
        eval_error("let i = 0.5; [1][i]"),
        EvalErrorKind::Custom { .. }
    ));
}

#[test]
fn test_maps() {
    assert_eq!(num("{a: 1, a: 2}.a"), 2.0);
    assert_eq!(
        eval("{b: 1, a: 2}.keys()").unwrap(),
        Value::list([Value::from("a"), Value::from("b")])
    );
    assert!(matches!(
        eval_error("let m = {a: 1}; m.b"),
        EvalErrorKind::UndefinedField { .. }
    ));
}

#[test]
fn test_list_methods() {
    assert_eq!(
        eval("[1, 2, 3].map(x -> x * 10)").unwrap(),
        Value::list([Value::Num(10.0), Value::Num(20.0), Value::Num(30.0)])
    );
    assert_eq!(
        eval("[1, 2, 3, 4].filter(x -> x > 2).len()").unwrap(),
        Value::Num(2.0)
    );
    assert!(matches!(
        eval_error("[1].map(2)"),
        EvalErrorKind::WrongType {
            expected: "function"
        }
    ));
    assert!(matches!(
        eval_error("let n = 1; n.len()"),
        EvalErrorKind::UndefinedMethod { .. }
    ));
}

#[test]
fn test_functions_are_values() {
    assert_eq!(num("let f = abs; f(-2)"), 2.0);
    assert_eq!(num("[-1, 2].map(abs)[0]"), 1.0);
}

#[test]
fn test_runaway_recursion_is_an_error() {
    assert_eq!(
        eval_error("let f = n -> f(n + 1); f(0)"),
        EvalErrorKind::StackOverflow {
            depth: crate::MAX_CALL_DEPTH
        }
    );
}
