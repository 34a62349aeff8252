//! ShonenX interpreter as a WASM module for browser editors.
//!
//! This crate exposes the ShonenX pipeline via `wasm-bindgen`. `READ`
//! answers cannot block in a browser, so they are supplied up front.
//!
//! # Usage (JavaScript)
//!
//! ```js
//! import init, { run, check } from 'shonen-wasm';
//!
//! await init();
//!
//! const result = run(editor.value, "main.sx", JSON.stringify(["Goku"]));
//! console.log(JSON.parse(result));
//! // { success: true, output: ["Goku is ready!"], errors: { ... }, steps: 42 }
//! ```

use shonen_compiler::{CompileErrors, EngineConfig, ErrorCode, RunResult, ShonenError};
use shonen_types::Span;
use wasm_bindgen::prelude::*;

/// Build and run a ShonenX program.
///
/// `inputs_json` is a JSON array of `READ` answers consumed in order; a
/// `null` entry or a missing answer counts as cancelled. Returns a JSON
/// `RunResult`:
/// ```json
/// {
///   "success": true,
///   "output": ["1", "2", "3"],
///   "errors": { "errors": [], "total_errors": 0 },
///   "steps": 17
/// }
/// ```
#[wasm_bindgen]
pub fn run(source: &str, filename: &str, inputs_json: &str) -> String {
    let result = match parse_inputs(inputs_json) {
        Ok(inputs) => {
            let mut answers = inputs.into_iter();
            let mut input = move |_prompt: &str| answers.next().flatten();
            shonen_compiler::run(source, filename, &mut input, &EngineConfig::default())
        }
        Err(message) => RunResult {
            success: false,
            output: Vec::new(),
            errors: CompileErrors::single(ShonenError::new(
                filename,
                ErrorCode::INVALID_INPUT,
                message,
                Span::line(0),
                "",
            )),
            steps: 0,
        },
    };
    serde_json::to_string(&result).unwrap_or_else(|e| {
        format!(
            r#"{{"success":false,"output":[],"errors":{{"errors":[{{"message":"Serialization error: {}"}}],"total_errors":1}},"steps":0}}"#,
            e
        )
    })
}

/// Report build diagnostics without running.
///
/// Returns a JSON string containing structured errors.
#[wasm_bindgen]
pub fn check(source: &str, filename: &str) -> String {
    let errors = shonen_compiler::check(source, filename);
    serde_json::to_string(&errors).unwrap_or_else(|e| {
        format!(
            r#"{{"errors":[{{"message":"Serialization error: {}"}}],"total_errors":1}}"#,
            e
        )
    })
}

/// Return the interpreter version string.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// An empty string means no answers.
fn parse_inputs(inputs_json: &str) -> Result<Vec<Option<String>>, String> {
    if inputs_json.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(inputs_json)
        .map_err(|e| format!("inputs must be a JSON array of strings: {e}"))
}
