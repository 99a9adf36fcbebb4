use pretty_assertions::assert_eq;
use quill_diagnostic::ErrorCode;

use crate::test_support::{eval, grammar, Val};
use crate::{CompileError, EvalErrorKind};

#[test]
fn test_compile_error_renders_with_source_line() {
    let source = "let a = 1;\nb + a";
    let err = grammar().compile(source).unwrap_err();
    assert_eq!(err.code(), ErrorCode::E2001);
    assert_eq!(
        err.to_diagnostic().render(source),
        "error[E2001]: unknown identifier `b`\n --> line 2\n  |\n2 | b + a\n  |\n"
    );
}

#[test]
fn test_eval_error_diagnostic() {
    let err = eval("1 / (2 - 2)").unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::Custom { message: "arithmetic error".to_string() });
    assert_eq!(err.to_diagnostic().code, ErrorCode::E3006);
    assert_eq!(err.to_diagnostic().line, Some(1));
}

#[test]
fn test_compile_phase_never_evaluates() {
    // `roll` is impure, so nothing here runs before `evaluate`.
    let compiled = grammar().compile("roll() + roll()").unwrap();
    assert_eq!(compiled.evaluate(&[]), Ok(Val::Int(8)));
    assert!(matches!(
        grammar().compile("roll(1)"),
        Err(CompileError::ArityMismatch { found: 1, .. })
    ));
}
