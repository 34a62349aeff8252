use serde::{Deserialize, Serialize};
use std::fmt;

/// Source location of a statement.
///
/// ShonenX statements never span lines, so a span is a single 1-based line
/// plus the 1-based column range of the trimmed statement text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub line: u32,
    #[serde(rename = "column")]
    pub start_col: u32,
    #[serde(rename = "end_column")]
    pub end_col: u32,
}

impl Span {
    /// Create a new span.
    pub fn new(line: u32, start_col: u32, end_col: u32) -> Self {
        Self {
            line,
            start_col,
            end_col,
        }
    }

    /// Create a span covering a whole line starting at column 1.
    pub fn line(line: u32) -> Self {
        Self::new(line, 1, 1)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.start_col)
    }
}

/// A non-empty, non-comment source line, trimmed, with its location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine<'src> {
    /// The trimmed text.
    pub text: &'src str,
    /// Where the trimmed text sits in the file.
    pub span: Span,
}

/// Holds the source text for error reporting and line iteration.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub source: String,
    /// Cached line start byte offsets for fast line lookup.
    line_starts: Vec<usize>,
}

impl SourceFile {
    /// Marker that starts a comment line.
    pub const COMMENT_MARKER: &'static str = "//";

    /// Create a new source file.
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        let source = source.into();
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            name: name.into(),
            source,
            line_starts,
        }
    }

    /// Extract a source line by 1-based line number, without its line ending.
    ///
    /// Returns `None` if the line number is out of range.
    pub fn line(&self, line_number: u32) -> Option<&str> {
        let idx = line_number.checked_sub(1)? as usize;
        if idx >= self.line_starts.len() {
            return None;
        }
        let start = self.line_starts[idx];
        let end = self
            .line_starts
            .get(idx + 1)
            .map(|&s| s.saturating_sub(1))
            .unwrap_or(self.source.len());
        Some(self.source[start..end].trim_end_matches('\r'))
    }

    /// Get the total number of lines.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Iterate over the lines that carry code: trimmed, skipping blank lines
    /// and `//` comment lines.
    pub fn code_lines(&self) -> impl Iterator<Item = SourceLine<'_>> + '_ {
        (1..=self.line_count() as u32).filter_map(move |number| {
            let raw = self.line(number)?;
            let text = raw.trim();
            if text.is_empty() || text.starts_with(Self::COMMENT_MARKER) {
                return None;
            }
            let leading = raw.len() - raw.trim_start().len();
            let start_col = raw[..leading].chars().count() as u32 + 1;
            let end_col = start_col + text.chars().count() as u32 - 1;
            Some(SourceLine {
                text,
                span: Span::new(number, start_col, end_col),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_display() {
        let s = Span::new(3, 7, 15);
        assert_eq!(format!("{s}"), "3:7");
    }

    #[test]
    fn test_source_file_line_extraction() {
        let src = SourceFile::new("test.sx", "OPENING\nSHOW 1;\nENDING");
        assert_eq!(src.line(1), Some("OPENING"));
        assert_eq!(src.line(2), Some("SHOW 1;"));
        assert_eq!(src.line(3), Some("ENDING"));
        assert_eq!(src.line(0), None);
        assert_eq!(src.line(4), None);
    }

    #[test]
    fn test_source_file_crlf() {
        let src = SourceFile::new("test.sx", "OPENING\r\nENDING\r\n");
        assert_eq!(src.line(1), Some("OPENING"));
        assert_eq!(src.line(2), Some("ENDING"));
    }

    #[test]
    fn test_source_file_empty() {
        let src = SourceFile::new("test.sx", "");
        assert_eq!(src.line_count(), 1);
        assert_eq!(src.line(1), Some(""));
        assert_eq!(src.code_lines().count(), 0);
    }

    #[test]
    fn test_code_lines_skip_blank_and_comments() {
        let src = SourceFile::new(
            "test.sx",
            "OPENING\n\n   // a comment\n    SHOW \"hi\";\r\nENDING\n",
        );
        let lines: Vec<_> = src.code_lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].text, "SHOW \"hi\";");
        assert_eq!(lines[1].span, Span::new(4, 5, 14));
        assert_eq!(lines[2].span.line, 5);
    }

    #[test]
    fn test_span_serializes_line_and_column() {
        let json = serde_json::to_string(&Span::new(2, 3, 9)).unwrap();
        assert_eq!(json, r#"{"line":2,"column":3,"end_column":9}"#);
    }
}
