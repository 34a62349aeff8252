//! ShonenX tree-walking interpreter.
//!
//! Runs a built [`Program`](shonen_types::ast::Program) against a fresh
//! [`Memory`], drawing `READ` answers from an [`InputSource`].

pub mod engine;
pub mod error;
pub mod evaluator;
pub mod input;
pub mod memory;
pub mod value;

pub use engine::{Engine, EngineConfig, Execution, RuntimeError, DEFAULT_STEP_LIMIT};
pub use error::{EvalError, EvalResult};
pub use evaluator::Evaluator;
pub use input::{InputSource, NoInput, ScriptedInput};
pub use memory::{Memory, Variable};
pub use value::Value;
