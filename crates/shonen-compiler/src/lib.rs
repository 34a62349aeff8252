//! ShonenX pipeline: orchestrates building and running a program.
//!
//! ```text
//! Source → Statement Matcher → Program Builder → Execution Engine → RunResult
//! ```

use std::sync::Once;

use serde::{Deserialize, Serialize};
use shonen_eval::{Engine, RuntimeError};
use shonen_parser::ProgramBuilder;
use shonen_types::ast::Program;
use shonen_types::SourceFile;
use tracing::debug;

pub use shonen_eval::{EngineConfig, InputSource, NoInput, ScriptedInput, DEFAULT_STEP_LIMIT};
pub use shonen_types::{CompileErrors, ErrorCode, ShonenError};

/// Outcome of a full run, serialized as the JSON result report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// Whether the program built and ran to completion.
    pub success: bool,
    /// `SHOW` lines. Empty on failure unless partial output was requested.
    pub output: Vec<String>,
    /// Build diagnostics, or the single runtime error.
    pub errors: CompileErrors,
    /// Statements dispatched.
    pub steps: u64,
}

impl RunResult {
    fn failed(errors: CompileErrors) -> Self {
        Self {
            success: false,
            output: Vec::new(),
            errors,
            steps: 0,
        }
    }
}

/// Build a program, returning every build diagnostic on failure.
pub fn build(source: &str, filename: &str) -> Result<Program, CompileErrors> {
    let source_file = SourceFile::new(filename, source);
    build_file(&source_file)
}

/// Build diagnostics only.
pub fn check(source: &str, filename: &str) -> CompileErrors {
    match build(source, filename) {
        Ok(_) => CompileErrors::empty(),
        Err(errors) => errors,
    }
}

/// Build and run a program. Execution never starts if the build failed.
pub fn run(
    source: &str,
    filename: &str,
    input: &mut dyn InputSource,
    config: &EngineConfig,
) -> RunResult {
    let source_file = SourceFile::new(filename, source);
    let program = match build_file(&source_file) {
        Ok(program) => program,
        Err(errors) => return RunResult::failed(errors),
    };

    let execution = Engine::new(&program, input, *config).run();
    debug!(file = filename, steps = execution.steps, "run complete");
    match execution.result {
        Ok(()) => RunResult {
            success: true,
            output: execution.output,
            errors: CompileErrors::empty(),
            steps: execution.steps,
        },
        Err(err) => RunResult {
            success: false,
            output: if config.keep_partial_output {
                execution.output
            } else {
                Vec::new()
            },
            errors: CompileErrors::single(runtime_diagnostic(&source_file, err)),
            steps: execution.steps,
        },
    }
}

fn build_file(source_file: &SourceFile) -> Result<Program, CompileErrors> {
    let result = ProgramBuilder::new(source_file).build();
    match result.program {
        Some(program) if !result.errors.has_errors() => Ok(program),
        _ => Err(result.errors),
    }
}

fn runtime_diagnostic(source_file: &SourceFile, err: RuntimeError) -> ShonenError {
    let source_line = source_file.line(err.line()).unwrap_or("").to_string();
    err.into_diagnostic(&source_file.name, &source_line)
}

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber when `RUST_LOG` is set.
///
/// Safe to call more than once. Enable with `RUST_LOG=shonen_eval=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}
