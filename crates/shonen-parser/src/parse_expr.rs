//! Expression parsing by precedence climbing.
//!
//! Precedence (lowest → highest):
//! 1. `STRONGER`, `WEAKER`, `EQUALS`, `APART`, `ABS`, `ABW` (no chaining)
//! 2. `POWERUP`, `DAMAGE`
//! 3. `FUSION`, `SLICE`
//! 4. unary `-`
//! 5. literals, variables, `( ... )`
//!
//! Binary operators are left-associative.

use shonen_lexer::{LexError, Lexer, Token, TokenKind};
use shonen_types::ast::{BinOp, Expr, UnaryOp};
use thiserror::Error;

/// Maximum depth of nested parentheses and unary minus.
pub const MAX_EXPR_DEPTH: u32 = 64;

/// Maximum number of binary operators in one expression. Bounds the depth
/// of the left-leaning tree a long operator chain builds.
pub const MAX_EXPR_OPERATORS: u32 = 256;

/// Failure to lex or parse an expression.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} at column {col}")]
pub struct ExprError {
    pub message: String,
    /// 1-based column inside the expression text.
    pub col: u32,
}

impl From<LexError> for ExprError {
    fn from(err: LexError) -> Self {
        Self {
            message: err.message,
            col: err.col,
        }
    }
}

/// Parse a complete expression. Trailing tokens are an error.
pub fn parse_expression(source: &str) -> Result<Expr, ExprError> {
    let tokens = Lexer::new(source).lex()?;
    let mut parser = ExprParser {
        tokens,
        pos: 0,
        depth: 0,
        operators: 0,
    };
    let expr = parser.parse_binary(1)?;
    match parser.peek() {
        TokenKind::Eof => Ok(expr),
        other => Err(parser.error(format!("unexpected '{other}' after expression"))),
    }
}

struct ExprParser {
    /// Always ends with `Eof`.
    tokens: Vec<Token>,
    pos: usize,
    depth: u32,
    operators: u32,
}

impl ExprParser {
    // ══════════════════════════════════════════════════════════════════════════
    // Token Helpers
    // ══════════════════════════════════════════════════════════════════════════

    fn current(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.pos.min(last)]
    }

    fn peek(&self) -> &TokenKind {
        &self.current().kind
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn error(&self, message: impl Into<String>) -> ExprError {
        ExprError {
            message: message.into(),
            col: self.current().col,
        }
    }

    fn enter(&mut self) -> Result<(), ExprError> {
        self.depth += 1;
        if self.depth > MAX_EXPR_DEPTH {
            return Err(self.error(format!(
                "maximum expression nesting depth is {MAX_EXPR_DEPTH}"
            )));
        }
        Ok(())
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Precedence Climbing
    // ══════════════════════════════════════════════════════════════════════════

    /// Parse operators whose precedence is at least `min_prec`.
    fn parse_binary(&mut self, min_prec: u8) -> Result<Expr, ExprError> {
        let mut left = self.parse_unary()?;
        let mut compared = false;

        while let Some(op) = self.peek().binary_op() {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            if op.is_comparison() {
                if compared {
                    return Err(self.error("comparison operators cannot be chained"));
                }
                compared = true;
            }
            self.operators += 1;
            if self.operators > MAX_EXPR_OPERATORS {
                return Err(self.error(format!(
                    "expression has more than {MAX_EXPR_OPERATORS} operators"
                )));
            }
            self.advance();
            let right = self.parse_binary(prec + 1)?;
            left = binary(left, op, right);
        }
        Ok(left)
    }

    /// `Unary = "-" Unary | Primary`
    fn parse_unary(&mut self) -> Result<Expr, ExprError> {
        if *self.peek() != TokenKind::Minus {
            return self.parse_primary();
        }
        self.advance();
        self.enter()?;
        let operand = self.parse_unary()?;
        self.depth -= 1;
        Ok(Expr::Unary {
            op: UnaryOp::Neg,
            operand: Box::new(operand),
        })
    }

    /// `Primary = Integer | Float | Text | Identifier | "(" Expr ")"`
    fn parse_primary(&mut self) -> Result<Expr, ExprError> {
        match self.peek().clone() {
            TokenKind::IntegerLit(n) => {
                self.advance();
                Ok(Expr::Integer(n))
            }
            TokenKind::FloatLit(n) => {
                self.advance();
                Ok(Expr::Float(n))
            }
            TokenKind::TextLit(text) => {
                self.advance();
                Ok(Expr::Text(text))
            }
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(Expr::Variable(name))
            }
            TokenKind::LParen => {
                self.advance();
                self.enter()?;
                let inner = self.parse_binary(1)?;
                if *self.peek() != TokenKind::RParen {
                    return Err(self.error(format!("expected ')', found '{}'", self.peek())));
                }
                self.advance();
                self.depth -= 1;
                Ok(inner)
            }
            other => Err(self.error(format!("expected a value, found '{other}'"))),
        }
    }
}

fn binary(left: Expr, op: BinOp, right: Expr) -> Expr {
    Expr::Binary {
        left: Box::new(left),
        op,
        right: Box::new(right),
    }
}
