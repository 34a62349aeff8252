//! Expression parser tests: precedence, associativity, unary minus,
//! parentheses, and error reporting.

use pretty_assertions::assert_eq;
use shonen_parser::{parse_expression, ExprError};
use shonen_types::ast::{BinOp, Expr, UnaryOp};

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

fn parse(source: &str) -> Expr {
    parse_expression(source).unwrap_or_else(|e| panic!("parse of '{source}' failed: {e}"))
}

fn error(source: &str) -> ExprError {
    parse_expression(source).expect_err("expected a parse error")
}

fn bin(left: Expr, op: BinOp, right: Expr) -> Expr {
    Expr::Binary {
        left: Box::new(left),
        op,
        right: Box::new(right),
    }
}

fn int(n: i64) -> Expr {
    Expr::Integer(n)
}

fn var(name: &str) -> Expr {
    Expr::Variable(name.into())
}

// ─────────────────────────────────────────────────────────────────────
// Precedence
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_comparison_binds_loosest() {
    assert_eq!(
        parse("hp POWERUP 1 STRONGER limit FUSION 2"),
        bin(
            bin(var("hp"), BinOp::Add, int(1)),
            BinOp::Greater,
            bin(var("limit"), BinOp::Mul, int(2)),
        )
    );
}

#[test]
fn test_every_comparison_word() {
    let cases = [
        ("STRONGER", BinOp::Greater),
        ("WEAKER", BinOp::Less),
        ("EQUALS", BinOp::Eq),
        ("APART", BinOp::NotEq),
        ("ABS", BinOp::GreaterEq),
        ("ABW", BinOp::LessEq),
    ];
    for (word, op) in cases {
        assert_eq!(parse(&format!("a {word} b")), bin(var("a"), op, var("b")), "{word}");
    }
}

#[test]
fn test_division_is_left_associative() {
    assert_eq!(
        parse("8 SLICE 4 SLICE 2"),
        bin(bin(int(8), BinOp::Div, int(4)), BinOp::Div, int(2))
    );
}

#[test]
fn test_parentheses_override_precedence() {
    assert_eq!(
        parse("(1 + 2) * 3"),
        bin(bin(int(1), BinOp::Add, int(2)), BinOp::Mul, int(3))
    );
}

#[test]
fn test_unary_minus() {
    assert_eq!(
        parse("-x * 2"),
        bin(
            Expr::Unary {
                op: UnaryOp::Neg,
                operand: Box::new(var("x")),
            },
            BinOp::Mul,
            int(2),
        )
    );
    assert_eq!(
        parse("3 - -1"),
        bin(
            int(3),
            BinOp::Sub,
            Expr::Unary {
                op: UnaryOp::Neg,
                operand: Box::new(int(1)),
            },
        )
    );
}

#[test]
fn test_literals() {
    assert_eq!(parse("2.5"), Expr::Float(2.5));
    assert_eq!(parse("'hi'"), Expr::Text("hi".into()));
    assert_eq!(parse(r#""a" EQUALS name"#), bin(Expr::Text("a".into()), BinOp::Eq, var("name")));
}

#[test]
fn test_parenthesized_comparisons_may_be_compared() {
    assert_eq!(
        parse("(a WEAKER b) EQUALS (c WEAKER d)"),
        bin(
            bin(var("a"), BinOp::Less, var("b")),
            BinOp::Eq,
            bin(var("c"), BinOp::Less, var("d")),
        )
    );
}

// ─────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_empty_expression() {
    assert_eq!(error("").to_string(), "expected a value, found 'end of expression' at column 1");
}

#[test]
fn test_missing_operand() {
    assert_eq!(error("1 POWERUP").message, "expected a value, found 'end of expression'");
}

#[test]
fn test_unclosed_parenthesis() {
    assert_eq!(error("(1 + 2").message, "expected ')', found 'end of expression'");
}

#[test]
fn test_trailing_tokens() {
    let err = error("1 2");
    assert_eq!(err.message, "unexpected '2' after expression");
    assert_eq!(err.col, 3);
}

#[test]
fn test_chained_comparison() {
    assert_eq!(
        error("a EQUALS b APART c").message,
        "comparison operators cannot be chained"
    );
}

#[test]
fn test_lex_errors_surface() {
    let err = error("x = 1");
    assert_eq!(err.message, "unexpected character '='");
    assert_eq!(err.col, 3);
}

#[test]
fn test_long_operator_chain_is_rejected() {
    let chain = vec!["1"; 20_000].join(" POWERUP ");
    let err = error(&chain);
    assert_eq!(err.message, "expression has more than 256 operators");
}
