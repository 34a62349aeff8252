//! Expression evaluator: walks a parsed expression against [`Memory`].
//!
//! Variables are resolved as whole identifier tokens, so a variable's value
//! is never re-read as source text.

use shonen_lexer::scan::is_identifier;
use shonen_parser::parse_expression;
use shonen_types::ast::{BinOp, Expr, ShowPart, UnaryOp};

use crate::error::{EvalError, EvalResult};
use crate::memory::Memory;
use crate::value::{Number, Value};

/// Evaluates expressions over a borrowed memory.
pub struct Evaluator<'m> {
    memory: &'m Memory,
}

impl<'m> Evaluator<'m> {
    pub fn new(memory: &'m Memory) -> Self {
        Self { memory }
    }

    /// Parse and evaluate an expression fragment.
    pub fn evaluate(&self, source: &str) -> EvalResult<Value> {
        let expr = parse_expression(source).map_err(|err| EvalError::Eval {
            source_text: source.to_string(),
            message: err.to_string(),
        })?;
        self.eval_expr(&expr)
    }

    /// Evaluate a loop or `BIND` condition.
    pub fn condition(&self, source: &str) -> EvalResult<bool> {
        self.evaluate(source).map(|value| value.is_truthy())
    }

    /// Resolve one `SHOW` fragment to its printed text.
    pub fn show_part(&self, part: &ShowPart) -> EvalResult<String> {
        match part {
            ShowPart::Literal(text) => Ok(text.clone()),
            ShowPart::Expr(name) if is_identifier(name) && self.memory.contains(name) => {
                self.memory.display(name)
            }
            ShowPart::Expr(source) => self.evaluate(source).map(|value| value.to_string()),
        }
    }

    /// Resolve every fragment and join them with a single space.
    pub fn show_line(&self, parts: &[ShowPart]) -> EvalResult<String> {
        let texts = parts
            .iter()
            .map(|part| self.show_part(part))
            .collect::<EvalResult<Vec<_>>>()?;
        Ok(texts.join(" "))
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expression evaluation
    // ══════════════════════════════════════════════════════════════════════

    pub fn eval_expr(&self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Integer(n) => Ok(Value::Integer(*n)),
            Expr::Float(f) => Ok(Value::Float(*f)),
            Expr::Text(s) => Ok(Value::Text(s.clone())),
            Expr::Variable(name) => self.memory.get(name).cloned(),
            Expr::Unary { op, operand } => self.eval_unary(*op, operand),
            Expr::Binary { left, op, right } => self.eval_binary(left, *op, right),
        }
    }

    fn eval_unary(&self, op: UnaryOp, operand: &Expr) -> EvalResult<Value> {
        let val = self.eval_expr(operand)?;
        match op {
            UnaryOp::Neg => match val.as_number() {
                Some(Number::Int(n)) => n
                    .checked_neg()
                    .map(Value::Integer)
                    .ok_or_else(|| EvalError::Overflow(format!("negation of {n}"))),
                Some(Number::Float(f)) => Ok(Value::Float(-f)),
                None => Err(EvalError::TypeMismatch(format!(
                    "cannot negate {}",
                    val.type_name()
                ))),
            },
        }
    }

    fn eval_binary(&self, left: &Expr, op: BinOp, right: &Expr) -> EvalResult<Value> {
        let lv = self.eval_expr(left)?;
        let rv = self.eval_expr(right)?;

        match op {
            BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div => {
                let (a, b) = self.operands(&lv, &rv, op)?;
                eval_arith(a, b, op).map(Number::into_value)
            }
            BinOp::Eq => Ok(Value::Flag(values_equal(&lv, &rv))),
            BinOp::NotEq => Ok(Value::Flag(!values_equal(&lv, &rv))),
            BinOp::Greater | BinOp::Less | BinOp::GreaterEq | BinOp::LessEq => {
                let (a, b) = self.operands(&lv, &rv, op)?;
                Ok(Value::Flag(eval_ordering(a, b, op)))
            }
        }
    }

    /// Both sides as numbers; text only supports `EQUALS` and `APART`.
    fn operands(&self, lv: &Value, rv: &Value, op: BinOp) -> EvalResult<(Number, Number)> {
        match (lv.as_number(), rv.as_number()) {
            (Some(a), Some(b)) => Ok((a, b)),
            _ => Err(EvalError::TypeMismatch(format!(
                "cannot apply {op} to {} and {}",
                lv.type_name(),
                rv.type_name()
            ))),
        }
    }
}

fn eval_arith(a: Number, b: Number, op: BinOp) -> EvalResult<Number> {
    if op == BinOp::Div && b.is_zero() {
        return Err(EvalError::DivisionByZero);
    }
    let overflow = || EvalError::Overflow(format!("{} {op} {}", a.as_f64(), b.as_f64()));

    if let (Number::Int(x), Number::Int(y)) = (a, b) {
        let result = match op {
            BinOp::Add => x.checked_add(y),
            BinOp::Sub => x.checked_sub(y),
            BinOp::Mul => x.checked_mul(y),
            _ => match x.checked_rem(y) {
                Some(0) => x.checked_div(y),
                Some(_) => return Ok(Number::Float(x as f64 / y as f64)),
                None => None,
            },
        };
        return result.map(Number::Int).ok_or_else(overflow);
    }

    let (x, y) = (a.as_f64(), b.as_f64());
    let result = match op {
        BinOp::Add => x + y,
        BinOp::Sub => x - y,
        BinOp::Mul => x * y,
        _ => x / y,
    };
    if result.is_finite() {
        Ok(Number::Float(result))
    } else {
        Err(overflow())
    }
}

fn eval_ordering(a: Number, b: Number, op: BinOp) -> bool {
    let ordering = match (a, b) {
        (Number::Int(x), Number::Int(y)) => Some(x.cmp(&y)),
        _ => a.as_f64().partial_cmp(&b.as_f64()),
    };
    let Some(ordering) = ordering else {
        return false;
    };
    match op {
        BinOp::Greater => ordering.is_gt(),
        BinOp::Less => ordering.is_lt(),
        BinOp::GreaterEq => ordering.is_ge(),
        _ => ordering.is_le(),
    }
}

/// Text equals text by content; numbers and flags compare numerically;
/// text never equals a non-text value.
fn values_equal(lv: &Value, rv: &Value) -> bool {
    match (lv, rv) {
        (Value::Text(a), Value::Text(b)) => a == b,
        (Value::Text(_), _) | (_, Value::Text(_)) => false,
        _ => match (lv.as_number(), rv.as_number()) {
            (Some(Number::Int(x)), Some(Number::Int(y))) => x == y,
            (Some(a), Some(b)) => a.as_f64() == b.as_f64(),
            _ => false,
        },
    }
}
