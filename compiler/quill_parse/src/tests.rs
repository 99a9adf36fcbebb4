use std::fmt;

use pretty_assertions::assert_eq;
use quill_diagnostic::ErrorCode;
use quill_ir::{Expr, ExprKind, Name};
use quill_lexer::LexOptions;

use super::*;

#[derive(Clone, Debug, PartialEq)]
enum Val {
    Num(f64),
    Str(String),
}

impl fmt::Display for Val {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Val::Num(n) => write!(f, "{n}"),
            Val::Str(s) => write!(f, "\"{s}\""),
        }
    }
}

const LEVELS: &[&[&str]] = &[
    &["|"],
    &["&"],
    &["=", "!="],
    &["<", ">", "<=", ">="],
    &["+", "-", "~"],
    &["*", "/"],
    &["^"],
];

struct TestSyntax {
    lex: LexOptions,
}

impl TestSyntax {
    fn new() -> Self {
        let operators = LEVELS
            .iter()
            .flat_map(|level| level.iter().copied())
            .chain(["!", "->"]);
        TestSyntax {
            lex: LexOptions::default().with_operators(operators),
        }
    }
}

impl Syntax for TestSyntax {
    type Value = Val;

    fn lex_options(&self) -> &LexOptions {
        &self.lex
    }

    fn binary_level(&self, op: &str) -> Option<usize> {
        LEVELS.iter().position(|level| level.contains(&op))
    }

    fn binary_levels(&self) -> usize {
        LEVELS.len()
    }

    fn is_unary(&self, op: &str) -> bool {
        op == "-" || op == "!"
    }

    fn constant(&self, name: &str) -> Option<Val> {
        (name == "pi").then_some(Val::Num(std::f64::consts::PI))
    }

    fn is_function(&self, name: &str) -> bool {
        name == "max"
    }

    fn number(&self, text: &str) -> Result<Val, String> {
        text.parse().map(Val::Num).map_err(|e| format!("{e}"))
    }

    fn string(&self, text: &str) -> Result<Val, String> {
        if text.contains('\n') {
            Err("newline in string".to_string())
        } else {
            Ok(Val::Str(text.to_string()))
        }
    }
}

fn parse_with(source: &str, bound: &[&str]) -> Result<Expr<Val>, ParseError> {
    let bound: Vec<Name> = bound.iter().copied().map(Name::from).collect();
    parse(source, &TestSyntax::new(), &bound)
}

/// Parse and render; the rendering parenthesizes every compound operand,
/// which makes the tree shape visible.
fn shape(source: &str) -> String {
    parse_with(source, &[]).unwrap().to_string()
}

#[test]
fn test_precedence_levels() {
    assert_eq!(shape("2+3*4"), "2 + (3 * 4)");
    assert_eq!(shape("(2+3)*4"), "(2 + 3) * 4");
    assert_eq!(shape("a < b + 1 & c | d"), "((a < (b + 1)) & c) | d");
    assert_eq!(shape("a = b != c"), "(a = b) != c");
}

#[test]
fn test_left_associative_within_level() {
    assert_eq!(shape("a - b + c"), "(a - b) + c");
    assert_eq!(shape("a / b * c"), "(a / b) * c");
    assert_eq!(shape("2 ^ 3 ^ 2"), "(2 ^ 3) ^ 2");
}

#[test]
fn test_unary_binds_tighter() {
    assert_eq!(shape("-2-3"), "-2 - 3");
    assert_eq!(shape("-x^2"), "-x ^ 2");
    assert_eq!(shape("!!a"), "!(!a)");
    assert_eq!(shape("2*-3"), "2 * -3");
    let tree = parse_with("-2-3", &[]).unwrap();
    let ExprKind::Binary { left, .. } = &tree.kind else {
        panic!("expected binary, got {}", tree.kind_name());
    };
    assert!(matches!(left.kind, ExprKind::Unary { .. }));
}

#[test]
fn test_postfix_chains() {
    assert_eq!(shape("a.b.c(1)[2](3)"), "a.b.c(1)[2](3)");
    assert_eq!(shape("xs[i + 1].name"), "xs[i + 1].name");
    assert_eq!(shape("(a + b).len()"), "(a + b).len()");
    assert_eq!(shape("m.'then'"), "m.'then'");
}

#[test]
fn test_let_chain_is_right_nested() {
    assert_eq!(
        shape("let a = 1; let b = a + 1; a * b"),
        "let a = 1; let b = a + 1; a * b"
    );
    let tree = parse_with("let a = 1; a", &[]).unwrap();
    assert_eq!(tree.kind_name(), "let binding");
}

#[test]
fn test_closures() {
    assert_eq!(shape("x -> x * 2"), "x -> x * 2");
    assert_eq!(shape("(x, y) -> x + y"), "(x, y) -> x + y");
    assert_eq!(shape("(x) -> x"), "x -> x");
    assert_eq!(shape("() -> 1"), "() -> 1");
    assert_eq!(shape("(x)"), "x");
    assert_eq!(shape("f(x -> x, 2)"), "f(x -> x, 2)");
}

#[test]
fn test_if_and_switch() {
    assert_eq!(shape("if a then b else c + 1"), "if a then b else c + 1");
    assert_eq!(
        shape("switch v case 1: \"one\" case 2: \"two\" default \"many\""),
        "switch v case 1: \"one\" case 2: \"two\" default \"many\""
    );
    assert_eq!(shape("switch v default 0"), "switch v default 0");
}

#[test]
fn test_collections() {
    assert_eq!(shape("[]"), "[]");
    assert_eq!(shape("[1, [2, 3]]"), "[1, [2, 3]]");
    assert_eq!(shape("{}"), "{}");
    assert_eq!(
        shape("{a: 1, 'b c': 2, \"d\": 3}"),
        "{a: 1, 'b c': 2, d: 3}"
    );
}

#[test]
fn test_constants_and_static_calls() {
    let tree = parse_with("pi", &[]).unwrap();
    assert_eq!(tree.as_literal(), Some(&Val::Num(std::f64::consts::PI)));
    assert_eq!(tree.to_string(), "pi");

    let call = parse_with("max(1, 2)", &[]).unwrap();
    assert_eq!(call.kind_name(), "static function call");

    // Without a call, a function name is an ordinary identifier.
    assert_eq!(parse_with("max", &[]).unwrap().kind_name(), "identifier");
}

#[test]
fn test_bound_names_shadow_constants_and_functions() {
    assert_eq!(parse_with("pi", &["pi"]).unwrap().kind_name(), "identifier");
    assert_eq!(
        parse_with("max(1)", &["max"]).unwrap().kind_name(),
        "function call"
    );
    let let_bound = parse_with("let pi = 3; pi", &[]).unwrap();
    let ExprKind::Let { body, .. } = &let_bound.kind else {
        panic!("expected let");
    };
    assert_eq!(body.kind_name(), "identifier");

    let param = parse_with("max -> max(1)", &[]).unwrap();
    let ExprKind::Closure { body, .. } = &param.kind else {
        panic!("expected closure");
    };
    assert_eq!(body.kind_name(), "function call");

    // Bindings end with their scope.
    let after = parse_with("[x -> pi, pi]", &[]).unwrap();
    let ExprKind::List(items) = &after.kind else {
        panic!("expected list");
    };
    assert!(items[1].is_literal());
}

#[test]
fn test_let_name_is_bound_in_value_only_for_closures() {
    // A plain value still sees the outer meaning of the name.
    let tree = parse_with("let pi = pi * 2; pi", &[]).unwrap();
    let ExprKind::Let { value, body, .. } = &tree.kind else {
        panic!("expected let");
    };
    let ExprKind::Binary { left, .. } = &value.kind else {
        panic!("expected binary value");
    };
    assert!(left.is_literal());
    assert_eq!(body.kind_name(), "identifier");

    let tree = parse_with("let max = max(1, 2); max", &[]).unwrap();
    let ExprKind::Let { value, .. } = &tree.kind else {
        panic!("expected let");
    };
    assert_eq!(value.kind_name(), "static function call");

    // A closure value sees its own name so it can recurse.
    for source in ["let max = n -> max(n); 1", "let max = (a, b) -> max(a); 1"] {
        let tree = parse_with(source, &[]).unwrap();
        let ExprKind::Let { value, .. } = &tree.kind else {
            panic!("expected let");
        };
        let ExprKind::Closure { body, .. } = &value.kind else {
            panic!("expected closure");
        };
        assert_eq!(body.kind_name(), "function call", "{source}");
    }
}

#[test]
fn test_lines_are_recorded() {
    let tree = parse_with("1 +\n\n  foo", &[]).unwrap();
    let ExprKind::Binary { right, .. } = &tree.kind else {
        panic!("expected binary");
    };
    assert_eq!(tree.line, 1);
    assert_eq!(right.line, 3);
}

#[test]
fn test_unexpected_token() {
    let err = parse_with("(1 + 2", &[]).unwrap_err();
    assert_eq!(
        err,
        ParseError {
            kind: ParseErrorKind::UnexpectedToken {
                found: "end of input".to_string(),
                expected: "`)`".to_string(),
            },
            line: 1,
        }
    );
    assert_eq!(err.code(), ErrorCode::E1001);
    assert_eq!(err.to_string(), "line 1: expected `)`, found end of input");
}

#[test]
fn test_expected_expression() {
    let err = parse_with("1 +\n* 2", &[]).unwrap_err();
    assert_eq!(err.line, 2);
    assert_eq!(err.code(), ErrorCode::E1002);
    assert_eq!(
        err.to_string(),
        "line 2: expected expression, found operator `*`"
    );

    let keyword = parse_with("then", &[]).unwrap_err();
    assert_eq!(
        keyword.to_string(),
        "line 1: expected expression, found keyword `then`"
    );
}

#[test]
fn test_trailing_input() {
    let err = parse_with("a b", &[]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "line 1: expected end of input, found identifier `b`"
    );
}

#[test]
fn test_invalid_and_unterminated() {
    let err = parse_with("1 + #", &[]).unwrap_err();
    assert_eq!(err.to_string(), "line 1: expected expression, found operator `#`");

    let err = parse_with("1 + \u{00a7}", &[]).unwrap_err();
    assert_eq!(err.code(), ErrorCode::E0002);

    let err = parse_with("\"abc", &[]).unwrap_err();
    assert_eq!(err.code(), ErrorCode::E0001);
    assert_eq!(err.to_string(), "line 1: unterminated `\"`");
}

#[test]
fn test_malformed_literals() {
    let err = parse_with("1.2.3", &[]).unwrap_err();
    assert!(matches!(err.kind, ParseErrorKind::MalformedNumber { .. }));
    assert_eq!(err.code(), ErrorCode::E0003);

    let err = parse_with("\"a\nb\"", &[]).unwrap_err();
    assert_eq!(
        err.kind,
        ParseErrorKind::MalformedString {
            text: "a\nb".to_string(),
            reason: "newline in string".to_string(),
        }
    );
    let diag = err.to_diagnostic();
    assert_eq!(diag.code, ErrorCode::E0004);
    assert_eq!(diag.line, Some(1));
}

#[test]
fn test_switch_requires_default() {
    let err = parse_with("switch v case 1: 2", &[]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "line 1: expected `case` or `default`, found end of input"
    );
}

#[test]
fn test_deep_nesting() {
    let depth = 5_000;
    let source = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
    let tree = parse_with(&source, &[]).unwrap();
    assert!(tree.is_literal());
}
