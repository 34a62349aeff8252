//! Runtime values and the coercion rules between them and declared types.

use std::fmt;

use shonen_types::ast::VarType;

use crate::error::{EvalError, EvalResult};

/// A runtime value.
///
/// `Char` and `Text` variables both hold [`Value::Text`]; the declared type
/// limits a `Char` to at most one character.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Text(String),
    /// Produced by comparisons and held by `SPIRIT` variables.
    Flag(bool),
}

/// A value seen as a number. Flags count as 0 or 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(f) => f,
        }
    }

    pub fn is_zero(self) -> bool {
        match self {
            Number::Int(n) => n == 0,
            Number::Float(f) => f == 0.0,
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Number::Int(n) => Value::Integer(n),
            Number::Float(f) => Value::Float(f),
        }
    }
}

impl Value {
    /// The value a fresh `SUMMON` gives each type.
    pub fn default_for(ty: VarType) -> Value {
        match ty {
            VarType::Integer => Value::Integer(0),
            VarType::Float => Value::Float(0.0),
            VarType::Char | VarType::Text => Value::Text(String::new()),
            VarType::Flag => Value::Flag(false),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Flag(_) => "flag",
        }
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Integer(n) => Some(Number::Int(*n)),
            Value::Float(f) => Some(Number::Float(*f)),
            Value::Flag(b) => Some(Number::Int(i64::from(*b))),
            Value::Text(_) => None,
        }
    }

    /// Condition truthiness: the flag itself, a non-zero number, non-empty text.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Flag(b) => *b,
            Value::Text(s) => !s.is_empty(),
            other => other.as_number().is_some_and(|n| !n.is_zero()),
        }
    }

    /// Convert a value for storage in a variable of type `ty`.
    pub fn coerce_to(self, ty: VarType) -> EvalResult<Value> {
        match ty {
            VarType::Integer => match self {
                Value::Integer(n) => Ok(Value::Integer(n)),
                Value::Flag(b) => Ok(Value::Integer(i64::from(b))),
                Value::Float(f) => truncate(f).map(Value::Integer),
                Value::Text(_) => Err(mismatch(&self, ty)),
            },
            VarType::Float => match self.as_number() {
                Some(n) => Ok(Value::Float(n.as_f64())),
                None => Err(mismatch(&self, ty)),
            },
            // Flags are stored as text in their `0`/`1` form.
            VarType::Text => Ok(Value::Text(self.render(VarType::Flag))),
            VarType::Char => {
                let text = self.render(VarType::Flag);
                if text.chars().count() <= 1 {
                    Ok(Value::Text(text))
                } else {
                    Err(EvalError::TypeMismatch(format!(
                        "SYMBOL holds at most one character, got '{text}'"
                    )))
                }
            }
            VarType::Flag => match self {
                Value::Flag(b) => Ok(Value::Flag(b)),
                Value::Text(_) => Err(mismatch(&self, ty)),
                other => Ok(Value::Flag(other.is_truthy())),
            },
        }
    }

    /// Convert a `READ` answer for a variable of type `ty`.
    ///
    /// Numbers that fail to parse become `0`.
    pub fn from_input(raw: &str, ty: VarType) -> EvalResult<Value> {
        let trimmed = raw.trim();
        if ty.is_numeric() {
            let number = match trimmed.parse::<i64>() {
                Ok(n) => Value::Integer(n),
                Err(_) => Value::Float(parse_finite(trimmed).unwrap_or(0.0)),
            };
            // Unparsable or out-of-range text reads as zero.
            return Ok(number
                .coerce_to(ty)
                .unwrap_or_else(|_| Value::default_for(ty)));
        }
        match ty {
            VarType::Integer | VarType::Float => Ok(Value::default_for(ty)),
            VarType::Text => Ok(Value::Text(raw.to_string())),
            VarType::Char if raw.chars().count() <= 1 => Ok(Value::Text(raw.to_string())),
            VarType::Flag => match trimmed.to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(Value::Flag(true)),
                "false" | "0" | "" => Ok(Value::Flag(false)),
                _ => Err(invalid_input(raw, ty)),
            },
            VarType::Char => Err(invalid_input(raw, ty)),
        }
    }

    /// Display form when read back from a variable of type `ty`.
    ///
    /// Flag variables show as `0`/`1`; everything else uses [`Display`].
    ///
    /// [`Display`]: fmt::Display
    pub fn render(&self, ty: VarType) -> String {
        match (ty, self) {
            (VarType::Flag, Value::Flag(b)) => i64::from(*b).to_string(),
            _ => self.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{n}"),
            // `-0` prints as `0`; whole floats print without a fraction.
            Value::Float(x) if *x == 0.0 => f.write_str("0"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => f.write_str(s),
            Value::Flag(b) => write!(f, "{b}"),
        }
    }
}

fn truncate(f: f64) -> EvalResult<i64> {
    let t = f.trunc();
    if t.is_finite() && t >= i64::MIN as f64 && t < i64::MAX as f64 {
        Ok(t as i64)
    } else {
        Err(EvalError::Overflow(format!("conversion of {f} to POWER")))
    }
}

fn parse_finite(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|f| f.is_finite())
}

fn mismatch(value: &Value, ty: VarType) -> EvalError {
    EvalError::TypeMismatch(format!(
        "cannot store {} '{value}' in a {ty} variable",
        value.type_name()
    ))
}

fn invalid_input(raw: &str, ty: VarType) -> EvalError {
    EvalError::InvalidInput {
        input: raw.to_string(),
        expected: ty.keyword().to_string(),
    }
}
