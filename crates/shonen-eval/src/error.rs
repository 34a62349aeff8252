//! Runtime error types for the ShonenX evaluator.

use shonen_types::ErrorCode;
use thiserror::Error;

/// A run-time failure. The engine attaches the statement line.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// `SUMMON` of a name that already exists.
    #[error("'{0}' is already declared")]
    AlreadyDeclared(String),
    /// Read, write or type query of an unknown name.
    #[error("'{0}' is not declared")]
    Undeclared(String),
    /// Malformed or unparsable expression.
    #[error("invalid expression '{source_text}': {message}")]
    Eval {
        source_text: String,
        message: String,
    },
    /// Operand or assignment of the wrong type.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),
    #[error("division by zero")]
    DivisionByZero,
    /// `READ` answer not acceptable for the target type.
    #[error("invalid input '{input}' for a {expected} variable")]
    InvalidInput { input: String, expected: String },
    /// The step ceiling was reached; most likely an infinite loop.
    #[error("step limit of {0} exceeded (infinite loop?)")]
    StepLimitExceeded(u64),
    #[error("arithmetic overflow in {0}")]
    Overflow(String),
}

impl EvalError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::AlreadyDeclared(_) => ErrorCode::ALREADY_DECLARED,
            Self::Undeclared(_) => ErrorCode::UNDECLARED,
            Self::Eval { .. } => ErrorCode::EVAL_ERROR,
            Self::TypeMismatch(_) => ErrorCode::TYPE_MISMATCH,
            Self::DivisionByZero => ErrorCode::DIVISION_BY_ZERO,
            Self::InvalidInput { .. } => ErrorCode::INVALID_INPUT,
            Self::StepLimitExceeded(_) => ErrorCode::STEP_LIMIT_EXCEEDED,
            Self::Overflow(_) => ErrorCode::ARITHMETIC_OVERFLOW,
        }
    }
}

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, EvalError>;

#[cfg(test)]
mod tests {
    use super::*;
    use shonen_types::ErrorCategory;

    #[test]
    fn test_codes_are_runtime_or_scope() {
        assert_eq!(EvalError::Undeclared("x".into()).code(), ErrorCode::UNDECLARED);
        assert_eq!(EvalError::StepLimitExceeded(10).code(), ErrorCode::STEP_LIMIT_EXCEEDED);
        assert_eq!(EvalError::DivisionByZero.code().category(), ErrorCategory::Runtime);
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            EvalError::AlreadyDeclared("hp".into()).to_string(),
            "'hp' is already declared"
        );
        assert_eq!(
            EvalError::StepLimitExceeded(50_000).to_string(),
            "step limit of 50000 exceeded (infinite loop?)"
        );
    }
}
