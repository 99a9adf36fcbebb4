use pretty_assertions::assert_eq;
use quill_ir::ExprKind;

use crate::test_support::{base, grammar, list, Val};
use crate::{CompileOptions, Grammar};

fn optimized_with(grammar: &Grammar<Val>, source: &str) -> String {
    let mut expr = grammar
        .parse(source, &CompileOptions::default())
        .unwrap();
    grammar.optimize(&mut expr);
    expr.to_string()
}

fn optimized(source: &str) -> String {
    optimized_with(&grammar(), source)
}

#[test]
fn test_folds_pure_operators() {
    assert_eq!(optimized("1 + 2 * 3"), "7");
    assert_eq!(optimized("-(2 + 3)"), "-5");
    assert_eq!(optimized("1 < 2 & !false"), "true");
}

#[test]
fn test_reassociates_commutative_operators() {
    assert_eq!(optimized("1 + (a + 2)"), "3 + a");
    assert_eq!(optimized("(a + 2) + 1"), "3 + a");
    assert_eq!(optimized("2 * (3 * (4 * a))"), "24 * a");
}

#[test]
fn test_leaves_non_commutative_chains() {
    assert_eq!(optimized("a - 1 - 2"), "(a - 1) - 2");
    assert_eq!(optimized("1 - (a - 2)"), "1 - (a - 2)");
    // Equality is commutative but not associative.
    assert_eq!(optimized("1 = (2 = a)"), "1 = (2 = a)");
}

#[test]
fn test_failed_fold_keeps_subtree() {
    assert_eq!(optimized("1 / 0"), "1 / 0");
    assert_eq!(optimized("1 + true"), "1 + true");
}

#[test]
fn test_folds_conditionals_on_literals() {
    assert_eq!(optimized("if true then a else b"), "a");
    assert_eq!(optimized("if 1 < 0 then a else b + 1"), "b + 1");
    assert_eq!(optimized("if c then 1 else 2"), "if c then 1 else 2");
    assert_eq!(optimized("switch 2 case 1: a case 1 + 1: b default c"), "b");
    assert_eq!(optimized("switch 3 case 1: a default c"), "c");
    assert_eq!(
        optimized("switch 3 case x: a default c"),
        "switch 3 case x: a default c"
    );
}

#[test]
fn test_folds_static_calls() {
    assert_eq!(optimized("max(2, 5) + 1"), "6");
    assert_eq!(optimized("sum()"), "0");
    assert_eq!(optimized("roll() + 1"), "roll() + 1");
    assert_eq!(optimized("max(a, 5)"), "max(a, 5)");
}

#[test]
fn test_folds_collection_literals() {
    let grammar = grammar();
    let mut expr = grammar
        .parse("[1, 1 + 1]", &CompileOptions::default())
        .unwrap();
    grammar.optimize(&mut expr);
    assert_eq!(expr.as_literal(), Some(&list(&[1, 2])));

    let mut expr = grammar
        .parse("[1, a]", &CompileOptions::default())
        .unwrap();
    grammar.optimize(&mut expr);
    assert!(matches!(expr.kind, ExprKind::List(_)));
}

#[test]
fn test_folds_closed_closures_and_their_calls() {
    assert_eq!(optimized("(x -> x * 2)(4)"), "8");
    assert_eq!(optimized("(x -> max(x, 3))(1)"), "3");
    assert_eq!(optimized("y -> y + 1"), "(y -> y + 1)");
    assert_eq!(optimized("(x -> x + a)(1)"), "(x -> x + a)(1)");
}

#[test]
fn test_impure_closure_is_folded_but_not_called() {
    let grammar = grammar();
    let mut expr = grammar
        .parse("(x -> roll() + x)(1)", &CompileOptions::default())
        .unwrap();
    grammar.optimize(&mut expr);
    let ExprKind::Call { callee, .. } = &expr.kind else {
        panic!("call was folded: {expr}");
    };
    let Some(Val::Func(closure)) = callee.as_literal() else {
        panic!("callee was not folded: {callee}");
    };
    assert!(!closure.is_pure());
}

#[test]
fn test_closure_folding_needs_closure_handler() {
    let grammar = base().build();
    assert_eq!(optimized_with(&grammar, "y -> y + 1"), "y -> y + 1");
}

#[test]
fn test_optimizing_twice_changes_nothing() {
    let grammar = grammar();
    for source in [
        "1 + (a + 2)",
        "if true then (x -> x)(a) else 0",
        "let f = x -> x + 1 * 2; f(a)",
        "[1, 2, a + 3 * 4]",
    ] {
        let mut expr = grammar.parse(source, &CompileOptions::default()).unwrap();
        grammar.optimize(&mut expr);
        let once = expr.clone();
        assert_eq!(grammar.optimize(&mut expr), 0, "{source}");
        assert_eq!(expr, once);
    }
}

#[test]
fn test_folded_program_evaluates_the_same() {
    let grammar = grammar();
    let plain = base()
        .lists(crate::test_support::Lists)
        .closures(crate::test_support::Funcs)
        .without_optimizer()
        .build();
    for source in [
        "1 + (a + 2) * 3",
        "(x -> x * a)(max(2, 7))",
        "switch a case 1 + 1: 10 default [a, 2][1]",
        "let k = 1 + 2; k * a",
    ] {
        let options = CompileOptions::with_params(["a"]);
        let folded = grammar.compile_with(source, &options).unwrap();
        let unfolded = plain.compile_with(source, &options).unwrap();
        assert_eq!(
            folded.evaluate(&[Val::Int(2)]),
            unfolded.evaluate(&[Val::Int(2)]),
            "{source}"
        );
    }
}
