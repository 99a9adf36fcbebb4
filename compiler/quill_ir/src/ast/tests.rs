use pretty_assertions::assert_eq;

use super::*;

fn lit(n: i64) -> Expr<i64> {
    Expr::literal(n, Some(Name::from(n.to_string())), 1)
}

#[test]
fn equality_ignores_lines() {
    let a = Expr::binary("+", lit(1), Expr::ident("x", 1));
    let mut b = Expr::binary("+", lit(1), Expr::ident("x", 7));
    b.line = 9;
    assert_eq!(a, b);
}

#[test]
fn equality_sees_operator_and_value_differences() {
    let a = Expr::binary("+", lit(1), lit(2));
    assert_ne!(a, Expr::binary("-", lit(1), lit(2)));
    assert_ne!(a, Expr::binary("+", lit(1), lit(3)));
}

#[test]
fn children_are_visited_in_evaluation_order() {
    let expr: Expr<i64> = Expr::new(
        ExprKind::Switch {
            subject: Box::new(Expr::ident("s", 1)),
            cases: vec![SwitchCase {
                value: lit(1),
                result: Expr::ident("a", 1),
            }],
            default: Box::new(Expr::ident("d", 1)),
        },
        1,
    );
    let mut seen = Vec::new();
    expr.for_each_child(&mut |child| seen.push(child.clone()));
    assert_eq!(
        seen,
        vec![Expr::ident("s", 1), lit(1), Expr::ident("a", 1), Expr::ident("d", 1)]
    );
}

#[test]
fn node_count_includes_every_descendant() {
    let expr = Expr::new(
        ExprKind::Call {
            callee: Box::new(Expr::ident("f", 1)),
            args: vec![lit(1), Expr::binary("*", lit(2), lit(3))],
        },
        1,
    );
    assert_eq!(expr.node_count(), 6);
}

#[test]
fn literal_accessors() {
    assert_eq!(lit(4).as_literal(), Some(&4));
    assert!(lit(4).is_literal());
    assert_eq!(Expr::<i64>::ident("y", 1).as_literal(), None);
    assert_eq!(Expr::<i64>::ident("y", 1).kind_name(), "identifier");
}
