//! ShonenX parser: turns source lines into a validated [`Program`].
//!
//! [`Program`]: shonen_types::ast::Program

mod builder;
mod matcher;
mod parse_expr;

pub use builder::{BuildResult, ProgramBuilder};
pub use matcher::Matcher;
pub use parse_expr::{parse_expression, ExprError, MAX_EXPR_DEPTH, MAX_EXPR_OPERATORS};
