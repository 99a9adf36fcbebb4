use pretty_assertions::assert_eq;
use quill_diagnostic::ErrorCode;
use quill_ir::Name;

use super::*;

#[test]
fn test_arity_display() {
    assert_eq!(Arity::Fixed(1).to_string(), "1 argument");
    assert_eq!(Arity::Fixed(2).to_string(), "2 arguments");
    assert_eq!(Arity::Any.to_string(), "any number of arguments");
    assert!(Arity::Any.accepts(7));
    assert!(!Arity::Fixed(2).accepts(3));
}

#[test]
fn test_innermost_line_wins() {
    let err = EvalError::new("division by zero").at_line(4).at_line(1);
    assert_eq!(err.line, Some(4));
    assert_eq!(err.to_string(), "line 4: division by zero");
    assert_eq!(err.code(), ErrorCode::E3006);
}

#[test]
fn test_eval_error_messages() {
    assert_eq!(
        EvalError::arity_mismatch(Arity::Fixed(2), 1).to_string(),
        "function expects 2 arguments, called with 1"
    );
    assert_eq!(
        EvalError::undefined_field(&Name::from("x")).to_string(),
        "undefined field `x`"
    );
    assert_eq!(EvalError::not_callable().code(), ErrorCode::E3001);
    assert_eq!(EvalError::panicked("boom").code(), ErrorCode::E9001);
}

#[test]
fn test_compile_error_diagnostic() {
    let err = CompileError::ArityMismatch {
        name: Name::from("max"),
        expected: Arity::Fixed(2),
        found: 3,
        line: 2,
    };
    assert_eq!(err.to_string(), "line 2: `max` expects 2 arguments, found 3");
    let diag = err.to_diagnostic();
    assert_eq!(diag.code, ErrorCode::E2003);
    assert_eq!(diag.line, Some(2));
    assert_eq!(err.line(), 2);
}
