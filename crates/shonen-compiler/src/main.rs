//! ShonenX CLI
//!
//! Builds and runs `.sx` programs from the terminal.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use shonen_compiler::{
    check, init_tracing, run, CompileErrors, EngineConfig, InputSource, DEFAULT_STEP_LIMIT,
};

/// Answers `READ` prompts from standard input, one line per prompt.
struct StdinInput;

impl InputSource for StdinInput {
    fn prompt(&mut self, prompt: &str) -> Option<String> {
        print!("{prompt} ");
        io::stdout().flush().ok()?;
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}

/// Flags accepted by `shonenx run`.
#[derive(Debug, Default)]
struct RunOptions {
    config: EngineConfig,
    json: bool,
}

fn main() -> ExitCode {
    init_tracing();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::FAILURE;
    }

    match args[1].as_str() {
        "run" => {
            let mut options = RunOptions::default();
            let mut file_path = None;

            for arg in args.iter().skip(2) {
                if let Some(limit) = arg.strip_prefix("--step-limit=") {
                    let Ok(limit) = limit.parse::<u64>() else {
                        eprintln!("error: invalid step limit '{limit}'");
                        return ExitCode::FAILURE;
                    };
                    options.config = options.config.with_step_limit(limit);
                } else if arg == "--keep-partial-output" {
                    options.config = options.config.with_keep_partial_output(true);
                } else if arg == "--json" {
                    options.json = true;
                } else if !arg.starts_with('-') && file_path.is_none() {
                    file_path = Some(arg.as_str());
                } else {
                    eprintln!("error: unknown option '{arg}'");
                    return ExitCode::FAILURE;
                }
            }

            let Some(path) = file_path else {
                eprintln!("error: missing file path");
                eprintln!("Usage: shonenx run <file.sx> [--step-limit=N] [--keep-partial-output] [--json]");
                return ExitCode::FAILURE;
            };
            run_file(path, &options)
        }
        "check" => {
            if args.len() < 3 {
                eprintln!("Usage: shonenx check <file.sx> [--json]");
                return ExitCode::FAILURE;
            }
            let json = args.iter().skip(3).any(|arg| arg == "--json");
            check_file(&args[2], json)
        }
        "version" | "--version" | "-V" => {
            println!("shonenx {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        "help" | "--help" | "-h" => {
            print_usage();
            ExitCode::SUCCESS
        }
        other => {
            eprintln!("error: unknown command '{other}'");
            print_usage();
            ExitCode::FAILURE
        }
    }
}

fn run_file(path: &str, options: &RunOptions) -> ExitCode {
    let Some(source) = read_source(path) else {
        return ExitCode::FAILURE;
    };
    let result = run(&source, path, &mut StdinInput, &options.config);

    if options.json {
        print_json(&result);
    } else {
        for line in &result.output {
            println!("> {line}");
        }
        report(&result.errors);
    }

    if result.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn check_file(path: &str, json: bool) -> ExitCode {
    let Some(source) = read_source(path) else {
        return ExitCode::FAILURE;
    };
    let errors = check(&source, path);

    if json {
        print_json(&errors);
    } else if !errors.has_errors() {
        println!("{path}: ok");
    } else {
        report(&errors);
    }

    if errors.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn read_source(path: &str) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(source) => Some(source),
        Err(e) => {
            eprintln!("error: cannot read '{path}': {e}");
            None
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("error: cannot serialize result: {e}"),
    }
}

fn report(errors: &CompileErrors) {
    for error in &errors.errors {
        eprintln!("error[{}]: {}", error.code, error.message);
        eprintln!("  --> {}:{}", error.file, error.span);
        if !error.source_line.is_empty() {
            eprintln!("   | {}", error.source_line);
        }
        if let Some(suggestion) = &error.suggestion {
            eprintln!("   = help: {suggestion}");
        }
    }
    let hidden = errors.total_errors.saturating_sub(errors.errors.len());
    if hidden > 0 {
        eprintln!("... and {hidden} more errors");
    }
}

fn print_usage() {
    print!("{}", usage());
}

fn usage() -> String {
    format!(
        "ShonenX interpreter

Usage: shonenx <command> [options]

Commands:
  run <file.sx>      Build and run a program
  check <file.sx>    Report build errors without running
  version            Print the version
  help               Show this message

Run options:
  --step-limit=<n>         Maximum statements to dispatch (default: {DEFAULT_STEP_LIMIT})
  --keep-partial-output    Print output produced before a runtime error
  --json                   Print the result as JSON

SHOW output is printed once the run finishes, so READ prompts appear
before any lines shown earlier in the program.

Set RUST_LOG=shonen_eval=trace to log every dispatched statement.
"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_explains_output_timing() {
        let text = usage();
        assert!(text.contains("SHOW output is printed once the run finishes"));
        assert!(text.contains("(default: 50000)"));
    }
}
