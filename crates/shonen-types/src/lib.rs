//! Shared types for the ShonenX front end and interpreter.
//!
//! This crate defines the statement and expression AST, source spans,
//! and the structured diagnostics used across all stages.

mod error;
mod span;
pub mod ast;

pub use error::{CompileErrors, ErrorCategory, ErrorCode, Severity, ShonenError, MAX_ERRORS};
pub use span::{SourceFile, SourceLine, Span};

/// Result type used throughout the ShonenX front end.
pub type Result<T> = std::result::Result<T, ShonenError>;
