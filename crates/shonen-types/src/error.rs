use crate::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of errors reported before fail-fast.
pub const MAX_ERRORS: usize = 20;

/// Error severity. ShonenX has no warnings; every diagnostic is fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
}

/// Error category, determined by error code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Syntax,
    Scope,
    Structure,
    Runtime,
}

/// Numeric error code (E100–E799).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    // ── Syntax errors (E100–E199) ──
    pub const UNRECOGNIZED_STATEMENT: Self = Self(100);
    pub const INVALID_INLINE_ACTION: Self = Self(101);
    pub const RESERVED_NAME: Self = Self(102);
    pub const INVALID_LOOP_INIT: Self = Self(103);

    // ── Scope errors (E500–E599) ──
    pub const ALREADY_DECLARED: Self = Self(500);
    pub const UNDECLARED: Self = Self(501);

    // ── Structure errors (E600–E699) ──
    pub const DUPLICATE_OPENING: Self = Self(600);
    pub const ENDING_WITHOUT_OPENING: Self = Self(601);
    pub const CODE_OUTSIDE_OPENING: Self = Self(602);
    pub const UNMATCHED_BLOCK_END: Self = Self(603);
    pub const UNCLOSED_BLOCK: Self = Self(604);
    pub const MISSING_ENDING: Self = Self(605);
    pub const LOOP_WITHOUT_BLOCK: Self = Self(606);
    pub const MISSING_OPENING: Self = Self(607);

    // ── Runtime errors (E700–E799) ──
    pub const EVAL_ERROR: Self = Self(700);
    pub const TYPE_MISMATCH: Self = Self(701);
    pub const DIVISION_BY_ZERO: Self = Self(702);
    pub const INVALID_INPUT: Self = Self(703);
    pub const STEP_LIMIT_EXCEEDED: Self = Self(704);
    pub const ARITHMETIC_OVERFLOW: Self = Self(705);

    /// Get the category for this error code.
    pub fn category(self) -> ErrorCategory {
        match self.0 {
            100..=199 => ErrorCategory::Syntax,
            500..=599 => ErrorCategory::Scope,
            600..=699 => ErrorCategory::Structure,
            700..=799 => ErrorCategory::Runtime,
            _ => ErrorCategory::Syntax,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

/// A structured ShonenX diagnostic, build-time or run-time.
///
/// Front ends render these directly; they must not parse free-form strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShonenError {
    /// Source file name.
    pub file: String,
    /// Error code (e.g., E600).
    pub code: ErrorCode,
    /// Error severity.
    pub severity: Severity,
    /// Error category (derived from code).
    pub category: ErrorCategory,
    /// Human-readable error message.
    pub message: String,
    /// Source location.
    #[serde(flatten)]
    pub span: Span,
    /// The offending source line, trimmed.
    pub source_line: String,
    /// Optional fix suggestion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ShonenError {
    /// Create a new error.
    pub fn new(
        file: impl Into<String>,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
        source_line: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            code,
            severity: Severity::Error,
            category: code.category(),
            message: message.into(),
            span,
            source_line: source_line.into(),
            suggestion: None,
        }
    }

    /// Attach a fix suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// The 1-based line the error points at.
    pub fn line(&self) -> u32 {
        self.span.line
    }
}

impl fmt::Display for ShonenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}: {} [{}] {}",
            self.span.line, self.code, self.category, self.message
        )
    }
}

impl std::error::Error for ShonenError {}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax => write!(f, "syntax"),
            Self::Scope => write!(f, "scope"),
            Self::Structure => write!(f, "structure"),
            Self::Runtime => write!(f, "runtime"),
        }
    }
}

/// Batched diagnostics, serialized as the JSON error report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileErrors {
    pub errors: Vec<ShonenError>,
    pub total_errors: usize,
}

impl CompileErrors {
    /// Create an empty result (no errors).
    pub fn empty() -> Self {
        Self {
            errors: Vec::new(),
            total_errors: 0,
        }
    }

    /// Wrap a single error.
    pub fn single(error: ShonenError) -> Self {
        let mut errs = Self::empty();
        errs.push_error(error);
        errs
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    /// Returns `true` once the stored list is full.
    pub fn is_full(&self) -> bool {
        self.total_errors >= MAX_ERRORS
    }

    /// Add an error, respecting the MAX_ERRORS limit.
    pub fn push_error(&mut self, error: ShonenError) {
        if self.errors.len() < MAX_ERRORS {
            self.errors.push(error);
        }
        self.total_errors += 1;
    }

    /// Error codes in report order.
    pub fn codes(&self) -> Vec<ErrorCode> {
        self.errors.iter().map(|e| e.code).collect()
    }
}

impl Default for CompileErrors {
    fn default() -> Self {
        Self::empty()
    }
}
