//! Quote-aware scanning helpers used by the statement matcher.
//!
//! Statement text is matched by keyword rather than tokenized, but commas
//! and keywords that sit inside `"..."` or `'...'` must never split a
//! statement. Every helper here skips quoted regions.

/// Byte offsets in `text` that are outside any quoted region.
fn unquoted_indices(text: &str) -> impl Iterator<Item = (usize, char)> + '_ {
    let mut quote: Option<char> = None;
    text.char_indices().filter(move |&(_, c)| match quote {
        Some(q) => {
            if c == q {
                quote = None;
            }
            false
        }
        None => {
            if c == '"' || c == '\'' {
                quote = Some(c);
                false
            } else {
                true
            }
        }
    })
}

/// Split `text` on `sep` wherever it appears outside quotes.
///
/// Fragments are returned trimmed; an empty input yields one empty fragment.
pub fn split_unquoted(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    for (i, c) in unquoted_indices(text) {
        if c == sep {
            parts.push(text[start..i].trim());
            start = i + c.len_utf8();
        }
    }
    parts.push(text[start..].trim());
    parts
}

/// Byte offsets of every standalone occurrence of `keyword` outside quotes.
///
/// A standalone occurrence has whitespace on both sides, so a keyword can
/// never be the first or last word of `text`.
pub fn keyword_positions(text: &str, keyword: &str) -> Vec<usize> {
    let bytes = text.as_bytes();
    unquoted_indices(text)
        .filter(|&(i, _)| text[i..].starts_with(keyword))
        .filter(|&(i, _)| {
            let before = i > 0 && bytes[i - 1].is_ascii_whitespace();
            let after = bytes
                .get(i + keyword.len())
                .is_some_and(|b| b.is_ascii_whitespace());
            before && after
        })
        .map(|(i, _)| i)
        .collect()
}

/// Split `text` around the first standalone `keyword`.
pub fn split_at_first<'a>(text: &'a str, keyword: &str) -> Option<(&'a str, &'a str)> {
    let pos = *keyword_positions(text, keyword).first()?;
    Some((text[..pos].trim(), text[pos + keyword.len()..].trim()))
}

/// Split `text` around the last standalone `keyword`.
pub fn split_at_last<'a>(text: &'a str, keyword: &str) -> Option<(&'a str, &'a str)> {
    let pos = *keyword_positions(text, keyword).last()?;
    Some((text[..pos].trim(), text[pos + keyword.len()..].trim()))
}

/// If `line` starts with `keyword` followed by whitespace, return the rest.
pub fn strip_keyword<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(keyword)?;
    if rest.starts_with(char::is_whitespace) {
        Some(rest.trim_start())
    } else {
        None
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// If `text` is a single quoted literal, return its contents.
pub fn quoted_literal(text: &str) -> Option<&str> {
    let first = text.chars().next()?;
    if (first == '"' || first == '\'') && text.len() >= 2 && text.ends_with(first) {
        let inner = &text[1..text.len() - 1];
        if !inner.contains(first) {
            return Some(inner);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_unquoted_ignores_commas_in_text() {
        assert_eq!(
            split_unquoted(r#""a, b", x , 'c,d'"#, ','),
            vec![r#""a, b""#, "x", "'c,d'"]
        );
    }

    #[test]
    fn test_keyword_positions_skip_quotes_and_partial_words() {
        let text = r#"x WORTHY SHOW " VILE "; VILEST VILE SHOW 1;"#;
        let found = keyword_positions(text, "VILE");
        assert_eq!(found.len(), 1);
        assert_eq!(&text[found[0]..found[0] + 4], "VILE");
        assert!(text[found[0]..].starts_with("VILE SHOW 1;"));
    }

    #[test]
    fn test_split_first_and_last() {
        assert_eq!(
            split_at_first("a UNTIL b UNTIL c", "UNTIL"),
            Some(("a", "b UNTIL c"))
        );
        assert_eq!(
            split_at_last("a UNTIL b UNTIL c", "UNTIL"),
            Some(("a UNTIL b", "c"))
        );
        assert_eq!(split_at_first("UNTIL c", "UNTIL"), None);
    }

    #[test]
    fn test_split_borrows_only_from_text() {
        let text = "x WORTHY SHOW x VILE SHOW 0";
        let (cond, rest) = {
            let keyword = String::from("WORTHY");
            split_at_first(text, &keyword).unwrap()
        };
        assert_eq!((cond, rest), ("x", "SHOW x VILE SHOW 0"));
        let (action, other) = {
            let keyword = String::from("VILE");
            split_at_last(rest, &keyword).unwrap()
        };
        assert_eq!((action, other), ("SHOW x", "SHOW 0"));
    }

    #[test]
    fn test_strip_keyword_requires_whitespace() {
        assert_eq!(strip_keyword("SHOW  x;", "SHOW"), Some("x;"));
        assert_eq!(strip_keyword("SHOWx;", "SHOW"), None);
        assert_eq!(strip_keyword("SHOW", "SHOW"), None);
    }

    #[test]
    fn test_identifiers() {
        assert!(is_identifier("_hp2"));
        assert!(!is_identifier("2hp"));
        assert!(!is_identifier("hp-2"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn test_quoted_literal() {
        assert_eq!(quoted_literal(r#""hi there""#), Some("hi there"));
        assert_eq!(quoted_literal("'x'"), Some("x"));
        assert_eq!(quoted_literal(r#""""#), Some(""));
        assert_eq!(quoted_literal(r#""a" POWERUP "b""#), None);
        assert_eq!(quoted_literal("\""), None);
    }
}
