//! Statement matcher: classifies one trimmed source line.
//!
//! Each keyword form is recognized by its leading word and its required
//! punctuation. Expressions are kept verbatim and only parsed when the
//! engine evaluates them.

use shonen_lexer::scan::{
    is_identifier, quoted_literal, split_at_first, split_at_last, split_unquoted, strip_keyword,
};
use shonen_lexer::{is_reserved, ALL_KEYWORDS};
use shonen_types::ast::{InlineAction, IterMode, ShowPart, Statement, StatementKind, VarType};
use shonen_types::{ErrorCode, ShonenError, SourceLine};

/// Classifies source lines into statements.
pub struct Matcher<'src> {
    /// File name for diagnostics.
    file_name: &'src str,
}

impl<'src> Matcher<'src> {
    pub fn new(file_name: &'src str) -> Self {
        Self { file_name }
    }

    /// Match one code line.
    ///
    /// `inside_body` says whether an `OPENING` is currently open. Almost
    /// every line yields one statement; a `TOSERVE` with an `ID = EXPR`
    /// initializer yields the `Assign` followed by the `CountedLoop`.
    pub fn match_line(
        &self,
        line: SourceLine<'_>,
        inside_body: bool,
    ) -> Result<Vec<Statement>, ShonenError> {
        let text = line.text;
        let one = |kind: StatementKind| -> Result<Vec<Statement>, ShonenError> {
            Ok(vec![Statement::new(kind, line.span)])
        };

        if is_opening(text) {
            if inside_body {
                return Err(self.error(
                    &line,
                    ErrorCode::DUPLICATE_OPENING,
                    "OPENING appears again inside the program body",
                ));
            }
            return one(StatementKind::NoOp);
        }
        if is_ending(text) {
            if !inside_body {
                return Err(self.error(
                    &line,
                    ErrorCode::ENDING_WITHOUT_OPENING,
                    "ENDING without a matching OPENING",
                ));
            }
            return one(StatementKind::EndProgram);
        }
        if !inside_body {
            return Err(self
                .error(
                    &line,
                    ErrorCode::CODE_OUTSIDE_OPENING,
                    "code outside the OPENING ... ENDING body",
                )
                .with_suggestion("Move this line between OPENING and ENDING"));
        }

        match text {
            "{" => return one(StatementKind::BlockStart),
            "}" => return one(StatementKind::BlockEnd),
            _ => {}
        }

        if let Some(rest) = strip_keyword(text, "SUMMON") {
            return self.match_summon(&line, rest).and_then(one);
        }
        if let Some(rest) = strip_keyword(text, "GIVE") {
            let body = self.terminated(&line, rest)?;
            let (target, expr) = self.assignment(&line, body)?;
            return one(StatementKind::Assign { target, expr });
        }
        if let Some(rest) = strip_keyword(text, "SHOW") {
            let body = self.terminated(&line, rest)?;
            return one(StatementKind::Show {
                parts: show_parts(body),
            });
        }
        if let Some(rest) = strip_keyword(text, "READ") {
            return self.match_read(&line, rest).and_then(one);
        }
        if let Some(rest) = strip_keyword(text, "BIND") {
            return self.match_bind(&line, rest).and_then(one);
        }

        // Loop headers may open their block on the same line.
        let (header, opens_block) = split_trailing_brace(text);
        let block_start = || Statement::new(StatementKind::BlockStart, line.span);
        if let Some(condition) = strip_keyword(header, "DURING") {
            let mut statements = vec![Statement::new(
                StatementKind::WhileLoop {
                    condition: condition.to_string(),
                },
                line.span,
            )];
            if opens_block {
                statements.push(block_start());
            }
            return Ok(statements);
        }
        if let Some(rest) = strip_keyword(header, "TOSERVE") {
            let mut statements = self.match_toserve(&line, rest)?;
            if opens_block {
                statements.push(block_start());
            }
            return Ok(statements);
        }

        Err(self.unrecognized(&line))
    }

    // ── Statement forms ───────────────────────────────────────────────────────

    /// `SUMMON <TYPE> <ID> ;`
    fn match_summon(&self, line: &SourceLine<'_>, rest: &str) -> Result<StatementKind, ShonenError> {
        let body = self.terminated(line, rest)?;
        let words: Vec<&str> = body.split_whitespace().collect();
        let [type_word, name] = words.as_slice() else {
            return Err(self.unrecognized(line));
        };
        let Some(ty) = VarType::from_keyword(type_word) else {
            return Err(self
                .error(
                    line,
                    ErrorCode::UNRECOGNIZED_STATEMENT,
                    format!("unknown type '{type_word}'"),
                )
                .with_suggestion("Types are POWER, MANA, SYMBOL, SOUL and SPIRIT"));
        };
        let name = self.variable_name(line, name)?;
        Ok(StatementKind::Declare { name, ty })
    }

    /// `READ "<prompt>" , <ID> ;`
    fn match_read(&self, line: &SourceLine<'_>, rest: &str) -> Result<StatementKind, ShonenError> {
        let body = self.terminated(line, rest)?;
        let parsed = body.strip_prefix('"').and_then(|after| {
            let (prompt, tail) = after.split_once('"')?;
            let target = tail.trim_start().strip_prefix(',')?.trim();
            is_identifier(target).then(|| (prompt, target))
        });
        match parsed {
            Some((prompt, target)) => Ok(StatementKind::Read {
                prompt: prompt.to_string(),
                target: target.to_string(),
            }),
            None => Err(self
                .unrecognized(line)
                .with_suggestion("READ takes a quoted prompt and a variable: READ \"Name?\", name;")),
        }
    }

    /// `BIND <COND> WORTHY <ACTION> [VILE <ACTION>]`
    ///
    /// The condition ends at the first `WORTHY` and the first action at the
    /// first `VILE` after it; keywords inside quotes do not count.
    fn match_bind(&self, line: &SourceLine<'_>, rest: &str) -> Result<StatementKind, ShonenError> {
        let Some((condition, actions)) = split_at_first(rest, "WORTHY") else {
            return Err(self
                .unrecognized(line)
                .with_suggestion("BIND needs a condition and an action: BIND x STRONGER 1 WORTHY SHOW x;"));
        };
        let (then_text, else_text) = match split_at_first(actions, "VILE") {
            Some((then_text, else_text)) => (then_text, Some(else_text)),
            None => (actions, None),
        };
        let then_action = self.inline_action(line, then_text)?;
        let else_action = else_text
            .map(|text| self.inline_action(line, text))
            .transpose()?;
        Ok(StatementKind::Conditional {
            condition: condition.to_string(),
            then_action,
            else_action,
        })
    }

    /// `TOSERVE <INIT> UNTIL <COND> <ID> GROWS|SHRINKS`
    fn match_toserve(
        &self,
        line: &SourceLine<'_>,
        rest: &str,
    ) -> Result<Vec<Statement>, ShonenError> {
        let parsed = rest.rsplit_once(char::is_whitespace).and_then(|(head, mode)| {
            let mode = IterMode::from_keyword(mode)?;
            let (head, iterator) = head.trim_end().rsplit_once(char::is_whitespace)?;
            if !is_identifier(iterator) {
                return None;
            }
            let (init, condition) = split_at_last(head.trim_end(), "UNTIL")?;
            (!init.is_empty() && !condition.is_empty()).then_some((init, condition, iterator, mode))
        });
        let Some((init, condition, iterator, mode)) = parsed else {
            return Err(self.unrecognized(line).with_suggestion(
                "TOSERVE needs an init, a condition and a direction: TOSERVE i = 1 UNTIL i ABW 3 i GROWS",
            ));
        };

        let mut statements = Vec::with_capacity(2);
        if !is_identifier(init) {
            if !init.contains('=') {
                return Err(self.error(
                    line,
                    ErrorCode::INVALID_LOOP_INIT,
                    format!("loop initializer '{init}' must be 'name = expression'"),
                ));
            }
            let (target, expr) = self.assignment(line, init)?;
            statements.push(Statement::new(
                StatementKind::Assign { target, expr },
                line.span,
            ));
        }
        statements.push(Statement::new(
            StatementKind::CountedLoop {
                condition: condition.to_string(),
                iterator: iterator.to_string(),
                mode,
            },
            line.span,
        ));
        Ok(statements)
    }

    // ── Pieces ────────────────────────────────────────────────────────────────

    /// A `BIND` branch: `SHOW ...` or `GIVE x = ...`, trailing `;` optional.
    fn inline_action(&self, line: &SourceLine<'_>, text: &str) -> Result<InlineAction, ShonenError> {
        let text = text.trim();
        let text = text.strip_suffix(';').unwrap_or(text).trim_end();
        if let Some(body) = strip_keyword(text, "SHOW") {
            return Ok(InlineAction::Show(show_parts(body)));
        }
        if let Some(body) = strip_keyword(text, "GIVE") {
            let (target, expr) = self.assignment(line, body)?;
            return Ok(InlineAction::Assign { target, expr });
        }
        Err(self
            .error(
                line,
                ErrorCode::INVALID_INLINE_ACTION,
                format!("'{text}' is not an inline action"),
            )
            .with_suggestion("WORTHY and VILE branches run a single SHOW or GIVE"))
    }

    /// `<ID> = <EXPR>`
    fn assignment(&self, line: &SourceLine<'_>, body: &str) -> Result<(String, String), ShonenError> {
        let Some((target, expr)) = body.split_once('=') else {
            return Err(self.unrecognized(line));
        };
        let target = target.trim();
        let expr = expr.trim();
        if !is_identifier(target) || expr.is_empty() {
            return Err(self.unrecognized(line));
        }
        Ok((target.to_string(), expr.to_string()))
    }

    /// A name being declared.
    fn variable_name(&self, line: &SourceLine<'_>, name: &str) -> Result<String, ShonenError> {
        if !is_identifier(name) {
            return Err(self.error(
                line,
                ErrorCode::UNRECOGNIZED_STATEMENT,
                format!("'{name}' is not a valid variable name"),
            ));
        }
        if is_reserved(name) {
            return Err(self.error(
                line,
                ErrorCode::RESERVED_NAME,
                format!("'{name}' is reserved and cannot name a variable"),
            ));
        }
        Ok(name.to_string())
    }

    /// Strip the statement terminator.
    fn terminated<'a>(&self, line: &SourceLine<'_>, rest: &'a str) -> Result<&'a str, ShonenError> {
        match rest.trim_end().strip_suffix(';') {
            Some(body) if !body.trim().is_empty() => Ok(body.trim()),
            _ => Err(self
                .unrecognized(line)
                .with_suggestion("Statements end with ';'")),
        }
    }

    // ── Diagnostics ───────────────────────────────────────────────────────────

    fn error(
        &self,
        line: &SourceLine<'_>,
        code: ErrorCode,
        message: impl Into<String>,
    ) -> ShonenError {
        ShonenError::new(self.file_name, code, message, line.span, line.text)
    }

    fn unrecognized(&self, line: &SourceLine<'_>) -> ShonenError {
        let err = self.error(
            line,
            ErrorCode::UNRECOGNIZED_STATEMENT,
            format!("unrecognized syntax: \"{}\"", line.text),
        );
        let first = line.text.split_whitespace().next().unwrap_or("");
        let upper = first.to_ascii_uppercase();
        if first != upper && ALL_KEYWORDS.contains(&upper.as_str()) {
            err.with_suggestion(format!("Keywords are upper-case: {upper}"))
        } else {
            err
        }
    }
}

/// `OPENING` or `OPENING {`
fn is_opening(text: &str) -> bool {
    text.strip_prefix("OPENING")
        .is_some_and(|rest| matches!(rest.trim_start(), "" | "{"))
}

/// `ENDING` or `} ENDING`
fn is_ending(text: &str) -> bool {
    text == "ENDING"
        || text
            .strip_prefix('}')
            .is_some_and(|rest| rest.trim_start() == "ENDING")
}

/// `DURING x ABW 3 {` → (`DURING x ABW 3`, true)
fn split_trailing_brace(text: &str) -> (&str, bool) {
    match text.strip_suffix('{') {
        Some(head) if head.ends_with(char::is_whitespace) => (head.trim_end(), true),
        _ => (text, false),
    }
}

fn show_parts(body: &str) -> Vec<ShowPart> {
    split_unquoted(body, ',')
        .into_iter()
        .map(|fragment| match quoted_literal(fragment) {
            Some(text) => ShowPart::Literal(text.to_string()),
            None => ShowPart::Expr(fragment.to_string()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shonen_types::Span;

    fn matched(text: &str) -> Result<Vec<StatementKind>, ShonenError> {
        let line = SourceLine {
            text,
            span: Span::new(1, 1, text.len() as u32),
        };
        Matcher::new("test.sx")
            .match_line(line, true)
            .map(|stmts| stmts.into_iter().map(|s| s.kind).collect())
    }

    #[test]
    fn test_opening_variants() {
        assert!(is_opening("OPENING"));
        assert!(is_opening("OPENING {"));
        assert!(is_opening("OPENING{"));
        assert!(!is_opening("OPENINGS"));
        assert!(!is_opening("OPENING { SHOW 1;"));
    }

    #[test]
    fn test_ending_variants() {
        assert!(is_ending("ENDING"));
        assert!(is_ending("} ENDING"));
        assert!(is_ending("}ENDING"));
        assert!(!is_ending("ENDING }"));
    }

    #[test]
    fn test_read_requires_identifier_target() {
        assert!(matched(r#"READ "Age?", age;"#).is_ok());
        let err = matched(r#"READ "Age?", 9age;"#).unwrap_err();
        assert_eq!(err.code, ErrorCode::UNRECOGNIZED_STATEMENT);
    }

    #[test]
    fn test_lowercase_keyword_gets_suggestion() {
        let err = matched("show 1;").unwrap_err();
        assert_eq!(err.suggestion.as_deref(), Some("Keywords are upper-case: SHOW"));
    }

    #[test]
    fn test_loop_header_may_open_block() {
        let kinds = matched("DURING x WEAKER 3 {").unwrap();
        assert_eq!(
            kinds,
            vec![
                StatementKind::WhileLoop {
                    condition: "x WEAKER 3".into()
                },
                StatementKind::BlockStart,
            ]
        );
        assert_eq!(split_trailing_brace("DURING x APART \"{\""), ("DURING x APART \"{\"", false));
    }

    #[test]
    fn test_bare_iterator_init_emits_no_assign() {
        let kinds = matched("TOSERVE i UNTIL i ABW 3 i GROWS").unwrap();
        assert_eq!(kinds.len(), 1);
        assert!(matches!(kinds[0], StatementKind::CountedLoop { .. }));
    }
}
