//! Execution engine: walks a built [`Program`] with an instruction pointer.
//!
//! Loop exits and back-edges come from the program's block map, so no
//! statement is ever rescanned at run time. Every dispatch costs one step;
//! exceeding [`EngineConfig::step_limit`] stops the run.

use shonen_types::ast::{BlockOwner, InlineAction, Program, Statement, StatementKind, VarType};
use shonen_types::{ErrorCode, ShonenError, Span};
use thiserror::Error;
use tracing::{debug, trace};

use crate::error::{EvalError, EvalResult};
use crate::evaluator::Evaluator;
use crate::input::InputSource;
use crate::memory::Memory;
use crate::value::{Number, Value};

/// Default ceiling on dispatched statements.
pub const DEFAULT_STEP_LIMIT: u64 = 50_000;

/// Engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum number of dispatches before the run fails.
    pub step_limit: u64,
    /// Report output produced before a failure instead of discarding it.
    pub keep_partial_output: bool,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_step_limit(mut self, step_limit: u64) -> Self {
        self.step_limit = step_limit;
        self
    }

    pub fn with_keep_partial_output(mut self, keep: bool) -> Self {
        self.keep_partial_output = keep;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            step_limit: DEFAULT_STEP_LIMIT,
            keep_partial_output: false,
        }
    }
}

/// A run-time failure at a statement.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("line {}: {error}", .span.line)]
pub struct RuntimeError {
    pub span: Span,
    #[source]
    pub error: EvalError,
}

impl RuntimeError {
    pub fn line(&self) -> u32 {
        self.span.line
    }

    pub fn code(&self) -> ErrorCode {
        self.error.code()
    }

    /// Convert into the diagnostic record build errors use.
    pub fn into_diagnostic(self, file: &str, source_line: &str) -> ShonenError {
        ShonenError::new(
            file,
            self.error.code(),
            self.error.to_string(),
            self.span,
            source_line.trim(),
        )
    }
}

/// Everything a run produced, successful or not.
#[derive(Debug, Clone)]
pub struct Execution {
    /// `SHOW` lines in order, up to the failure if there was one.
    pub output: Vec<String>,
    pub steps: u64,
    pub memory: Memory,
    pub result: Result<(), RuntimeError>,
}

impl Execution {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Where to go after a dispatch.
enum Flow {
    Next,
    Jump(usize),
    Halt,
}

/// Executes one program once.
pub struct Engine<'p, 'i> {
    program: &'p Program,
    input: &'i mut dyn InputSource,
    config: EngineConfig,
    memory: Memory,
    output: Vec<String>,
    ip: usize,
    steps: u64,
}

impl<'p, 'i> Engine<'p, 'i> {
    pub fn new(program: &'p Program, input: &'i mut dyn InputSource, config: EngineConfig) -> Self {
        Self {
            program,
            input,
            config,
            memory: Memory::new(),
            output: Vec::new(),
            ip: 0,
            steps: 0,
        }
    }

    /// Run to `ENDING`, the end of the program, or the first error.
    pub fn run(mut self) -> Execution {
        let result = self.run_loop();
        match &result {
            Ok(()) => debug!(steps = self.steps, lines = self.output.len(), "run finished"),
            Err(err) => debug!(steps = self.steps, error = %err, "run failed"),
        }
        Execution {
            output: self.output,
            steps: self.steps,
            memory: self.memory,
            result,
        }
    }

    fn run_loop(&mut self) -> Result<(), RuntimeError> {
        let program = self.program;
        while let Some(statement) = program.get(self.ip) {
            let flow = self
                .tick()
                .and_then(|()| self.dispatch(statement))
                .map_err(|error| RuntimeError {
                    span: statement.span,
                    error,
                })?;
            match flow {
                Flow::Next => self.ip += 1,
                Flow::Jump(target) => self.ip = target,
                Flow::Halt => break,
            }
        }
        Ok(())
    }

    /// Consume one step. Errors once the ceiling is passed.
    fn tick(&mut self) -> EvalResult<()> {
        self.steps += 1;
        if self.steps > self.config.step_limit {
            Err(EvalError::StepLimitExceeded(self.config.step_limit))
        } else {
            Ok(())
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Dispatch
    // ══════════════════════════════════════════════════════════════════════

    fn dispatch(&mut self, statement: &Statement) -> EvalResult<Flow> {
        trace!(ip = self.ip, line = statement.line(), kind = statement.kind.name(), "dispatch");
        match &statement.kind {
            StatementKind::NoOp | StatementKind::BlockStart => Ok(Flow::Next),
            StatementKind::EndProgram => Ok(Flow::Halt),
            StatementKind::BlockEnd => self.block_end(),
            StatementKind::Declare { name, ty } => {
                self.memory.declare(name, *ty)?;
                Ok(Flow::Next)
            }
            StatementKind::Assign { target, expr } => {
                self.assign(target, expr)?;
                Ok(Flow::Next)
            }
            StatementKind::Show { parts } => {
                let line = Evaluator::new(&self.memory).show_line(parts)?;
                self.output.push(line);
                Ok(Flow::Next)
            }
            StatementKind::Read { prompt, target } => {
                self.read(prompt, target)?;
                Ok(Flow::Next)
            }
            StatementKind::Conditional {
                condition,
                then_action,
                else_action,
            } => {
                let holds = match Evaluator::new(&self.memory).condition(condition) {
                    Ok(holds) => holds,
                    Err(err) => {
                        debug!(line = statement.line(), error = %err, "condition failed, taken as false");
                        false
                    }
                };
                let action = if holds {
                    Some(then_action)
                } else {
                    else_action.as_ref()
                };
                if let Some(action) = action {
                    self.inline_action(action)?;
                }
                Ok(Flow::Next)
            }
            StatementKind::WhileLoop { condition }
            | StatementKind::CountedLoop { condition, .. } => {
                if Evaluator::new(&self.memory).condition(condition)? {
                    Ok(Flow::Next)
                } else {
                    let exit = self.program.blocks().exit_of(self.ip);
                    Ok(Flow::Jump(exit.unwrap_or(self.program.len())))
                }
            }
        }
    }

    /// Back-edge for loop blocks, fall-through for plain ones.
    fn block_end(&mut self) -> EvalResult<Flow> {
        match self.program.blocks().owner_of(self.ip) {
            Some(BlockOwner::While(header)) => Ok(Flow::Jump(header)),
            Some(BlockOwner::CountedLoop(header)) => {
                if let Some(StatementKind::CountedLoop { iterator, mode, .. }) =
                    self.program.get(header).map(|s| &s.kind)
                {
                    self.step_iterator(iterator, mode.step())?;
                }
                Ok(Flow::Jump(header))
            }
            Some(BlockOwner::Plain) | None => Ok(Flow::Next),
        }
    }

    fn step_iterator(&mut self, iterator: &str, step: i64) -> EvalResult<()> {
        let ty = self.memory.type_of(iterator)?;
        let current = self.memory.get(iterator)?;
        let next = match current.as_number() {
            Some(Number::Int(n)) => n
                .checked_add(step)
                .map(Value::Integer)
                .ok_or_else(|| EvalError::Overflow(format!("loop counter '{iterator}'")))?,
            Some(Number::Float(f)) => Value::Float(f + step as f64),
            None => {
                return Err(EvalError::TypeMismatch(format!(
                    "loop counter '{iterator}' must be a number, found {}",
                    current.type_name()
                )))
            }
        };
        self.memory.set(iterator, next.coerce_to(ty)?)
    }

    // ══════════════════════════════════════════════════════════════════════
    // Statement helpers
    // ══════════════════════════════════════════════════════════════════════

    fn assign(&mut self, target: &str, expr: &str) -> EvalResult<()> {
        let ty = self.memory.type_of(target)?;
        let value = Evaluator::new(&self.memory).evaluate(expr)?;
        self.memory.set(target, value.coerce_to(ty)?)
    }

    fn read(&mut self, prompt: &str, target: &str) -> EvalResult<()> {
        let ty: VarType = self.memory.type_of(target)?;
        let answer = self.input.prompt(prompt).unwrap_or_default();
        trace!(prompt, answer = %answer, "read");
        let value = Value::from_input(&answer, ty)?;
        self.memory.set(target, value)
    }

    fn inline_action(&mut self, action: &InlineAction) -> EvalResult<()> {
        match action {
            InlineAction::Show(parts) => {
                let line = Evaluator::new(&self.memory).show_line(parts)?;
                self.output.push(line);
                Ok(())
            }
            InlineAction::Assign { target, expr } => self.assign(target, expr),
        }
    }
}
