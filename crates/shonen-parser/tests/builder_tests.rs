//! Program builder tests for ShonenX.
//!
//! Covers: statement classification for every keyword form, the
//! OPENING/ENDING wrapper, brace balance, loop headers and their blocks,
//! the build-time block map, batched diagnostics, and determinism.

use pretty_assertions::assert_eq;
use shonen_parser::{BuildResult, ProgramBuilder};
use shonen_types::ast::*;
use shonen_types::{ErrorCode, SourceFile, MAX_ERRORS};

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

fn build(source: &str) -> BuildResult {
    let sf = SourceFile::new("test.sx", source);
    ProgramBuilder::new(&sf).build()
}

/// Build and return the program, panicking if there are errors.
fn build_ok(source: &str) -> Program {
    let result = build(source);
    if result.errors.has_errors() {
        for e in &result.errors.errors {
            eprintln!("  ERROR: {e}");
        }
        panic!("unexpected build errors (see above)");
    }
    result.program.expect("no program returned")
}

/// Statement kinds of a wrapped body, without the NoOp and EndProgram.
fn body_kinds(body: &str) -> Vec<StatementKind> {
    let program = build_ok(&format!("OPENING\n{body}\nENDING"));
    let statements = program.statements();
    statements[1..statements.len() - 1]
        .iter()
        .map(|s| s.kind.clone())
        .collect()
}

fn codes(source: &str) -> Vec<ErrorCode> {
    let result = build(source);
    assert!(result.program.is_none(), "program returned despite errors");
    result.errors.codes()
}

/// First error's code and line.
fn first_error(source: &str) -> (ErrorCode, u32) {
    let result = build(source);
    let first = result.errors.errors.first().expect("expected a build error");
    (first.code, first.line())
}

// ─────────────────────────────────────────────────────────────────────
// Statement forms
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_minimal_program() {
    let program = build_ok("OPENING\nENDING");
    let kinds: Vec<_> = program.statements().iter().map(|s| s.kind.clone()).collect();
    assert_eq!(kinds, vec![StatementKind::NoOp, StatementKind::EndProgram]);
}

#[test]
fn test_declarations_for_every_type() {
    let kinds = body_kinds(
        "SUMMON POWER a;\nSUMMON MANA b;\nSUMMON SYMBOL c;\nSUMMON SOUL d;\nSUMMON SPIRIT e;",
    );
    let types: Vec<VarType> = kinds
        .iter()
        .map(|k| match k {
            StatementKind::Declare { ty, .. } => *ty,
            other => panic!("expected Declare, got {other:?}"),
        })
        .collect();
    assert_eq!(types, VarType::ALL.to_vec());
}

#[test]
fn test_assignment_keeps_expression_text() {
    assert_eq!(
        body_kinds("GIVE hp = hp POWERUP 10 ;"),
        vec![StatementKind::Assign {
            target: "hp".into(),
            expr: "hp POWERUP 10".into(),
        }]
    );
}

#[test]
fn test_show_parts() {
    assert_eq!(
        body_kinds(r#"SHOW "Power, level:", hp, hp FUSION 2, 'x';"#),
        vec![StatementKind::Show {
            parts: vec![
                ShowPart::Literal("Power, level:".into()),
                ShowPart::Expr("hp".into()),
                ShowPart::Expr("hp FUSION 2".into()),
                ShowPart::Literal("x".into()),
            ],
        }]
    );
}

#[test]
fn test_read() {
    assert_eq!(
        body_kinds(r#"READ "Your name, fighter?" , name ;"#),
        vec![StatementKind::Read {
            prompt: "Your name, fighter?".into(),
            target: "name".into(),
        }]
    );
}

#[test]
fn test_bind_with_and_without_vile() {
    let kinds = body_kinds(
        "BIND hp STRONGER 9000 WORTHY SHOW \"over\";\nBIND x EQUALS 1 WORTHY GIVE x = 2; VILE SHOW x;",
    );
    assert_eq!(
        kinds,
        vec![
            StatementKind::Conditional {
                condition: "hp STRONGER 9000".into(),
                then_action: InlineAction::Show(vec![ShowPart::Literal("over".into())]),
                else_action: None,
            },
            StatementKind::Conditional {
                condition: "x EQUALS 1".into(),
                then_action: InlineAction::Assign {
                    target: "x".into(),
                    expr: "2".into(),
                },
                else_action: Some(InlineAction::Show(vec![ShowPart::Expr("x".into())])),
            },
        ]
    );
}

#[test]
fn test_toserve_init_becomes_assign() {
    let kinds = body_kinds("TOSERVE i = 1 UNTIL i ABW 3 i GROWS\n{\n}");
    assert_eq!(
        kinds,
        vec![
            StatementKind::Assign {
                target: "i".into(),
                expr: "1".into(),
            },
            StatementKind::CountedLoop {
                condition: "i ABW 3".into(),
                iterator: "i".into(),
                mode: IterMode::Grow,
            },
            StatementKind::BlockStart,
            StatementKind::BlockEnd,
        ]
    );
}

#[test]
fn test_toserve_condition_may_contain_until_in_text() {
    let kinds = body_kinds("TOSERVE n UNTIL s APART \"UNTIL\" n SHRINKS {\n}");
    assert_eq!(
        kinds[0],
        StatementKind::CountedLoop {
            condition: "s APART \"UNTIL\"".into(),
            iterator: "n".into(),
            mode: IterMode::Shrink,
        }
    );
}

#[test]
fn test_comments_blank_lines_and_crlf_are_skipped() {
    let program = build_ok("// header\r\nOPENING\r\n\r\n   // note\r\nSHOW 1;\r\nENDING\r\n");
    assert_eq!(program.len(), 3);
    assert_eq!(program.statements()[1].line(), 5);
}

#[test]
fn test_span_columns_follow_indentation() {
    let program = build_ok("OPENING\n    SHOW 1;\nENDING");
    let span = program.statements()[1].span;
    assert_eq!((span.line, span.start_col, span.end_col), (2, 5, 11));
}

// ─────────────────────────────────────────────────────────────────────
// Block map
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_nested_loop_block_map() {
    // 0 NoOp, 1 While, 2 {, 3 Assign, 4 Counted, 5 {, 6 Show, 7 }, 8 }, 9 EndProgram
    let program = build_ok(
        "OPENING
DURING x WEAKER 3 {
TOSERVE i = 0 UNTIL i WEAKER 2 i GROWS
{
SHOW i;
}
}
ENDING",
    );
    assert_eq!(program.len(), 10);
    let blocks = program.blocks();
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks.owner_of(7), Some(BlockOwner::CountedLoop(4)));
    assert_eq!(blocks.owner_of(8), Some(BlockOwner::While(1)));
    assert_eq!(blocks.exit_of(4), Some(8));
    assert_eq!(blocks.exit_of(1), Some(9));
}

#[test]
fn test_loop_header_may_be_separated_from_brace_by_comments() {
    let program = build_ok("OPENING\nDURING 1 WEAKER 0\n// body follows\n\n{\n}\nENDING");
    assert_eq!(program.blocks().exit_of(1), Some(4));
}

#[test]
fn test_braces_on_wrapper_lines_are_not_blocks() {
    let program = build_ok("OPENING {\nSHOW 1;\n} ENDING");
    assert!(program.blocks().is_empty());
    assert_eq!(program.len(), 3);
}

// ─────────────────────────────────────────────────────────────────────
// Structural errors
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_code_outside_opening() {
    assert_eq!(first_error("SHOW 1;\nOPENING\nENDING"), (ErrorCode::CODE_OUTSIDE_OPENING, 1));
    assert_eq!(
        first_error("OPENING\nENDING\nSHOW 1;"),
        (ErrorCode::CODE_OUTSIDE_OPENING, 3)
    );
}

#[test]
fn test_duplicate_opening() {
    assert_eq!(
        first_error("OPENING\nOPENING\nENDING"),
        (ErrorCode::DUPLICATE_OPENING, 2)
    );
    assert_eq!(
        codes("OPENING\nENDING\nOPENING\nENDING"),
        vec![ErrorCode::DUPLICATE_OPENING, ErrorCode::ENDING_WITHOUT_OPENING]
    );
}

#[test]
fn test_ending_without_opening() {
    assert_eq!(codes("ENDING"), vec![ErrorCode::ENDING_WITHOUT_OPENING]);
}

#[test]
fn test_unmatched_block_end() {
    assert_eq!(
        first_error("OPENING\n}\nENDING"),
        (ErrorCode::UNMATCHED_BLOCK_END, 2)
    );
}

#[test]
fn test_unclosed_block_before_ending() {
    assert_eq!(
        first_error("OPENING\n{\nSHOW 1;\nENDING"),
        (ErrorCode::UNCLOSED_BLOCK, 2)
    );
}

#[test]
fn test_missing_ending() {
    assert_eq!(codes("OPENING\nSHOW 1;"), vec![ErrorCode::MISSING_ENDING]);
    assert_eq!(
        codes("OPENING\n{"),
        vec![ErrorCode::UNCLOSED_BLOCK, ErrorCode::MISSING_ENDING]
    );
}

#[test]
fn test_missing_opening() {
    assert_eq!(codes(""), vec![ErrorCode::MISSING_OPENING]);
    assert_eq!(codes("// only a comment"), vec![ErrorCode::MISSING_OPENING]);
}

#[test]
fn test_loop_without_block() {
    assert_eq!(
        first_error("OPENING\nDURING 1\nSHOW 1;\nENDING"),
        (ErrorCode::LOOP_WITHOUT_BLOCK, 2)
    );
    assert_eq!(
        codes("OPENING\nDURING 1"),
        vec![ErrorCode::LOOP_WITHOUT_BLOCK, ErrorCode::MISSING_ENDING]
    );
}

#[test]
fn test_accepts_iff_well_nested() {
    let well_formed = [
        "OPENING\nENDING",
        "OPENING\n{\n{\n}\n}\nENDING",
        "OPENING {\nDURING 0 {\n}\n} ENDING",
    ];
    for source in well_formed {
        assert!(build(source).program.is_some(), "{source}");
    }
    let malformed = [
        "OPENING\n{\n{\n}\nENDING",
        "OPENING\n{\n}\n}\nENDING",
        "{\nOPENING\nENDING\n}",
        "OPENING\n{\nENDING\n}",
    ];
    for source in malformed {
        assert!(build(source).program.is_none(), "{source}");
    }
}

// ─────────────────────────────────────────────────────────────────────
// Syntax errors
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_unrecognized_statement() {
    let result = build("OPENING\nFLY away;\nENDING");
    let first = result.errors.errors.first().unwrap();
    assert_eq!(first.code, ErrorCode::UNRECOGNIZED_STATEMENT);
    assert_eq!(first.source_line, "FLY away;");
    assert_eq!(first.message, "unrecognized syntax: \"FLY away;\"");
}

#[test]
fn test_missing_semicolon_suggestion() {
    let result = build("OPENING\nSHOW 1\nENDING");
    let first = result.errors.errors.first().unwrap();
    assert_eq!(first.code, ErrorCode::UNRECOGNIZED_STATEMENT);
    assert_eq!(first.suggestion.as_deref(), Some("Statements end with ';'"));
}

#[test]
fn test_unknown_type() {
    let result = build("OPENING\nSUMMON LEVEL x;\nENDING");
    let first = result.errors.errors.first().unwrap();
    assert_eq!(first.message, "unknown type 'LEVEL'");
}

#[test]
fn test_reserved_names() {
    for name in ["POWERUP", "OPENING", "SOUL", "ABW"] {
        let source = format!("OPENING\nSUMMON POWER {name};\nENDING");
        assert_eq!(first_error(&source), (ErrorCode::RESERVED_NAME, 2), "{name}");
    }
}

#[test]
fn test_invalid_inline_action() {
    assert_eq!(
        first_error("OPENING\nBIND 1 WORTHY READ \"x\", y;\nENDING"),
        (ErrorCode::INVALID_INLINE_ACTION, 2)
    );
}

#[test]
fn test_invalid_loop_init() {
    assert_eq!(
        first_error("OPENING\nTOSERVE 1 POWERUP 2 UNTIL i ABW 3 i GROWS\n{\n}\nENDING"),
        (ErrorCode::INVALID_LOOP_INIT, 2)
    );
}

// ─────────────────────────────────────────────────────────────────────
// Batch reporting
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_errors_are_batched() {
    assert_eq!(
        codes("OPENING\nshow 1;\nGIVE = 3;\n}\nENDING"),
        vec![
            ErrorCode::UNRECOGNIZED_STATEMENT,
            ErrorCode::UNRECOGNIZED_STATEMENT,
            ErrorCode::UNMATCHED_BLOCK_END,
        ]
    );
}

#[test]
fn test_error_list_is_capped() {
    let body = "nonsense;\n".repeat(30);
    let result = build(&format!("OPENING\n{body}ENDING"));
    assert_eq!(result.errors.errors.len(), MAX_ERRORS);
    assert!(result.errors.total_errors >= MAX_ERRORS);
}

// ─────────────────────────────────────────────────────────────────────
// Determinism
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_build_determinism_100_iterations() {
    let source = "OPENING
SUMMON POWER i;
TOSERVE i = 1 UNTIL i ABW 3 i GROWS {
BIND i EQUALS 2 WORTHY SHOW \"two\"; VILE SHOW i;
}
ENDING";
    let first = build_ok(source);
    for i in 0..100 {
        assert_eq!(first, build_ok(source), "Determinism failure at iteration {i}");
    }
}
