//! Program builder: drives the matcher line by line and validates block
//! structure once, producing an immutable [`Program`] with its [`BlockMap`].

use shonen_types::ast::{BlockMap, BlockOwner, Program, Statement, StatementKind};
use shonen_types::{CompileErrors, ErrorCode, ShonenError, SourceFile, SourceLine, Span};
use tracing::debug;

use crate::matcher::Matcher;

/// A `{` that has not been closed yet.
#[derive(Debug, Clone, Copy)]
struct OpenBlock {
    owner: BlockOwner,
    span: Span,
}

/// Builds a program from source, collecting structural errors in batch.
pub struct ProgramBuilder<'src> {
    /// Source file for iteration and error context.
    source_file: &'src SourceFile,
    matcher: Matcher<'src>,
    statements: Vec<Statement>,
    blocks: BlockMap,
    /// Stack of unclosed blocks, innermost last.
    open_blocks: Vec<OpenBlock>,
    /// Loop header waiting for its `{`.
    pending_loop: Option<usize>,
    /// An `OPENING` is currently open.
    inside_body: bool,
    /// An `OPENING` has been seen at all.
    seen_opening: bool,
    /// Collected errors.
    errors: CompileErrors,
}

/// Result of building.
pub struct BuildResult {
    /// Present only when there are no errors.
    pub program: Option<Program>,
    pub errors: CompileErrors,
}

impl<'src> ProgramBuilder<'src> {
    pub fn new(source_file: &'src SourceFile) -> Self {
        Self {
            source_file,
            matcher: Matcher::new(&source_file.name),
            statements: Vec::new(),
            blocks: BlockMap::new(),
            open_blocks: Vec::new(),
            pending_loop: None,
            inside_body: false,
            seen_opening: false,
            errors: CompileErrors::empty(),
        }
    }

    /// Match every code line and validate the result.
    pub fn build(mut self) -> BuildResult {
        let source_file = self.source_file;
        for line in source_file.code_lines() {
            if self.errors.is_full() {
                break;
            }
            self.push_line(line);
        }
        self.finish()
    }

    fn push_line(&mut self, line: SourceLine<'_>) {
        match self.matcher.match_line(line, self.inside_body) {
            Ok(statements) => {
                for statement in statements {
                    self.push_statement(statement, line.text);
                }
            }
            Err(err) => self.errors.push_error(err),
        }
    }

    fn push_statement(&mut self, statement: Statement, text: &str) {
        let index = self.statements.len();
        let span = statement.span;

        let loop_header = self.pending_loop.take();
        if let Some(header) = loop_header {
            if statement.kind != StatementKind::BlockStart {
                let header_span = self.statements[header].span;
                self.error_at(
                    ErrorCode::LOOP_WITHOUT_BLOCK,
                    "loop header must be followed by '{'",
                    header_span,
                );
            }
        }

        match &statement.kind {
            StatementKind::NoOp => {
                if self.seen_opening {
                    self.errors.push_error(ShonenError::new(
                        &self.source_file.name,
                        ErrorCode::DUPLICATE_OPENING,
                        "a program has exactly one OPENING",
                        span,
                        text,
                    ));
                    return;
                }
                self.seen_opening = true;
                self.inside_body = true;
            }
            StatementKind::EndProgram => {
                self.close_remaining_blocks();
                self.inside_body = false;
            }
            StatementKind::BlockStart => {
                let owner = match loop_header.map(|h| (h, &self.statements[h].kind)) {
                    Some((h, StatementKind::WhileLoop { .. })) => BlockOwner::While(h),
                    Some((h, StatementKind::CountedLoop { .. })) => BlockOwner::CountedLoop(h),
                    _ => BlockOwner::Plain,
                };
                self.open_blocks.push(OpenBlock { owner, span });
            }
            StatementKind::BlockEnd => match self.open_blocks.pop() {
                Some(open) => self.blocks.close(index, open.owner),
                None => {
                    self.error_at(
                        ErrorCode::UNMATCHED_BLOCK_END,
                        "'}' without a matching '{'",
                        span,
                    );
                    return;
                }
            },
            kind if kind.is_loop_header() => self.pending_loop = Some(index),
            _ => {}
        }

        self.statements.push(statement);
    }

    /// Report every block still open when the body ends.
    fn close_remaining_blocks(&mut self) {
        for open in std::mem::take(&mut self.open_blocks) {
            self.error_at(
                ErrorCode::UNCLOSED_BLOCK,
                "block is never closed before ENDING",
                open.span,
            );
        }
    }

    fn finish(mut self) -> BuildResult {
        let last_line = Span::line(self.source_file.line_count() as u32);
        if let Some(header) = self.pending_loop.take() {
            let header_span = self.statements[header].span;
            self.error_at(
                ErrorCode::LOOP_WITHOUT_BLOCK,
                "loop header must be followed by '{'",
                header_span,
            );
        }
        if !self.seen_opening {
            if !self.errors.has_errors() {
                self.error_at(
                    ErrorCode::MISSING_OPENING,
                    "program has no OPENING ... ENDING body",
                    last_line,
                );
            }
        } else if self.inside_body {
            self.close_remaining_blocks();
            self.error_at(
                ErrorCode::MISSING_ENDING,
                "reached end of input without ENDING",
                last_line,
            );
        }

        debug!(
            file = %self.source_file.name,
            statements = self.statements.len(),
            blocks = self.blocks.len(),
            errors = self.errors.total_errors,
            "program built"
        );

        let program = if self.errors.has_errors() {
            None
        } else {
            Some(Program::new(self.statements, self.blocks))
        };
        BuildResult {
            program,
            errors: self.errors,
        }
    }

    // ── Error Reporting ───────────────────────────────────────────────────────

    fn error_at(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        let source_line = self
            .source_file
            .line(span.line)
            .unwrap_or("")
            .trim()
            .to_string();
        let error = ShonenError::new(&self.source_file.name, code, message, span, source_line);
        self.errors.push_error(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(source: &str) -> BuildResult {
        let sf = SourceFile::new("test.sx", source);
        ProgramBuilder::new(&sf).build()
    }

    #[test]
    fn test_loop_block_map() {
        let result = build("OPENING\nDURING 1\n{\nSHOW 1;\n}\nENDING");
        let program = result.program.expect("program");
        // NoOp, WhileLoop, BlockStart, Show, BlockEnd, EndProgram
        assert_eq!(program.len(), 6);
        assert_eq!(program.blocks().owner_of(4), Some(BlockOwner::While(1)));
        assert_eq!(program.blocks().exit_of(1), Some(5));
    }

    #[test]
    fn test_plain_block_has_no_owner() {
        let result = build("OPENING\n{\nSHOW 1;\n}\nENDING");
        let program = result.program.expect("program");
        assert_eq!(program.blocks().owner_of(3), Some(BlockOwner::Plain));
    }

    #[test]
    fn test_missing_opening_on_empty_source() {
        let result = build("\n// nothing here\n");
        assert!(result.program.is_none());
        assert_eq!(result.errors.codes(), vec![ErrorCode::MISSING_OPENING]);
    }
}
