use pretty_assertions::assert_eq;
use quill_ir::Expr;
use quill_lexer::LexOptions;
use quill_parse::{parse, Syntax};

use super::*;

const LEVELS: &[&[&str]] = &[&["="], &["+", "-"], &["*", "/"]];

struct Calc {
    lex: LexOptions,
}

impl Calc {
    fn new() -> Self {
        let operators = LEVELS
            .iter()
            .flat_map(|level| level.iter().copied())
            .chain(["!", "->"]);
        Calc {
            lex: LexOptions::default().with_operators(operators),
        }
    }
}

impl Syntax for Calc {
    type Value = f64;

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

    fn constant(&self, _: &str) -> Option<f64> {
        None
    }

    fn is_function(&self, name: &str) -> bool {
        name == "max"
    }

    fn number(&self, text: &str) -> Result<f64, String> {
        text.parse().map_err(|e| format!("{e}"))
    }

    fn string(&self, _: &str) -> Result<f64, String> {
        Ok(0.0)
    }
}

fn parse_source(source: &str) -> Expr<f64> {
    parse(source, &Calc::new(), &[]).unwrap()
}

fn format_at(source: &str, width: usize) -> String {
    format_expr_with(&parse_source(source), FormatConfig::with_max_width(width))
}

#[test]
fn test_short_expression_stays_flat() {
    assert_eq!(format_expr(&parse_source("a + b * c")), "a + (b * c)");
    assert_eq!(format_expr(&parse_source("let x = 1; x")), "let x = 1; x");
}

#[test]
fn test_let_chain_breaks_one_binding_per_line() {
    assert_eq!(
        format_at("let alpha = 1; let beta = alpha + 2; alpha * beta", 20),
        "let alpha = 1;\nlet beta = alpha + 2;\nalpha * beta"
    );
}

#[test]
fn test_if_breaks_branches() {
    assert_eq!(
        format_at("if alpha = beta then first + 1 else second + 2", 20),
        "if alpha = beta then\n    first + 1\nelse\n    second + 2"
    );
}

#[test]
fn test_else_if_chain_stays_at_one_level() {
    assert_eq!(
        format_at("if a then first else if b then second else third", 20),
        "if a then\n    first\nelse if b then\n    second\nelse\n    third"
    );
}

#[test]
fn test_switch_puts_cases_on_lines() {
    assert_eq!(
        format_at("switch value case 1: one case 2: two default other", 30),
        "switch value\n    case 1: one\n    case 2: two\n    default other"
    );
}

#[test]
fn test_long_arguments_break() {
    assert_eq!(
        format_at("max(first_argument, second_argument)", 20),
        "max(\n    first_argument,\n    second_argument\n)"
    );
    assert_eq!(
        format_at("{alpha: 1, 'two words': [item, 2]}", 30),
        "{\n    alpha: 1,\n    'two words': [item, 2]\n}"
    );
}

#[test]
fn test_closure_body_moves_to_next_line() {
    assert_eq!(
        format_at("f -> alpha + beta + gamma", 20),
        "f ->\n    (alpha + beta)\n        + gamma"
    );
    assert_eq!(format_at("(a, b) -> a", 20), "(a, b) -> a");
}

#[test]
fn test_node_budget_forces_breaks() {
    let expr = parse_source("a + b + c");
    let config = FormatConfig::default().node_budget(3);
    assert_eq!(format_expr_with(&expr, config), "(a + b)\n    + c");
}

#[test]
fn test_starting_column_counts_against_width() {
    let expr = parse_source("alpha + beta");
    let text = Formatter::with_config(FormatConfig::with_max_width(15))
        .with_starting_column(10)
        .format_expr(&expr);
    assert_eq!(text, "alpha\n    + beta");
}

#[test]
fn test_output_reparses_to_same_tree() {
    let sources = [
        "let total = price * quantity; let taxed = total + total * rate; if taxed = 0 then none else taxed",
        "switch kind case 1: first.value case 2: second[index + 1] default max(left, right)",
        "(x, y) -> let z = x * y; [z, z + 1, {k: z, 'odd key': \"text\"}]",
        "items.filter(item -> item.price = limit).map(item -> -item.price)",
        "-(a + b) * !c - (f -> f(1))(g -> g * 2)",
        "((a)) + (let b = 1; b) + (if c then d else e)",
        "((0).a)() + (max)(1, 2) + (record.handler)(event, context)",
        "let recurse = n -> if n then recurse(n - 1) else callback(n); recurse(10)",
    ];
    for source in sources {
        let expr = parse_source(source);
        for width in [1, 10, 20, 40, 100] {
            for budget in [2, 8, 48] {
                let config = FormatConfig::with_max_width(width).node_budget(budget);
                let text = format_expr_with(&expr, config);
                assert_eq!(parse_source(&text), expr, "width {width}, budget {budget}:\n{text}");
            }
        }
    }
}

#[test]
fn test_callees_keep_their_call_kind() {
    assert_eq!(format_expr(&parse_source("((0).a)()")), "((0).a)()");
    assert_eq!(format_expr(&parse_source("(max)(1, 2)")), "(max)(1, 2)");
    assert_eq!(format_expr(&parse_source("max(1, 2)")), "max(1, 2)");
    assert_eq!(format_expr(&parse_source("let f = x -> x; f(1)")), "let f = x -> x; f(1)");
    assert_eq!(
        format_at("let f = x -> x * 2; f(1) + f(2)", 12),
        "let f = x ->\n    x * 2;\nf(1) + f(2)"
    );
}

#[test]
fn test_deep_nesting_formats() {
    let depth = 300;
    let source = format!("{}0{}", "1 + (".repeat(depth), ")".repeat(depth));
    let expr = parse_source(&source);
    let text = format_expr_with(&expr, FormatConfig::with_max_width(40));
    assert_eq!(parse_source(&text), expr);
}
