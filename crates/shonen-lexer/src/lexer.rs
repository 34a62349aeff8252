//! Expression lexer: converts one expression fragment to a token stream.
//!
//! Features:
//! - Named operator words (`POWERUP`, `ABW`, ...) matched as whole tokens
//! - The equivalent operator symbols (`+`, `<=`, ...)
//! - Integer and decimal literals, `"..."` and `'...'` text literals
//! - Fails on the first unexpected character; fragments are one line long

use thiserror::Error;

use crate::token::{Token, TokenKind};

/// A lexing failure inside an expression fragment.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} at column {col}")]
pub struct LexError {
    pub message: String,
    /// 1-based column inside the fragment.
    pub col: u32,
}

/// The ShonenX expression lexer.
pub struct Lexer<'src> {
    /// The fragment as chars with byte offsets.
    chars: Vec<(usize, char)>,
    /// The fragment text.
    source: &'src str,
    /// Current index into `chars`.
    pos: usize,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            chars: source.char_indices().collect(),
            source,
            pos: 0,
        }
    }

    /// Lex the whole fragment. The stream always ends with [`TokenKind::Eof`].
    pub fn lex(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.scan()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                return Ok(tokens);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Character-level helpers
    // ─────────────────────────────────────────────────────────────

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|&(_, c)| c)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    fn col(&self) -> u32 {
        self.pos as u32 + 1
    }

    fn byte_offset(&self, index: usize) -> usize {
        self.chars
            .get(index)
            .map(|&(offset, _)| offset)
            .unwrap_or(self.source.len())
    }

    fn slice_from(&self, start: usize) -> &'src str {
        &self.source[self.byte_offset(start)..self.byte_offset(self.pos)]
    }

    fn error(&self, message: impl Into<String>, col: u32) -> LexError {
        LexError {
            message: message.into(),
            col,
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Scanning
    // ─────────────────────────────────────────────────────────────

    fn scan(&mut self) -> Result<Token, LexError> {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }

        let start = self.pos;
        let col = self.col();
        let Some(ch) = self.advance() else {
            return Ok(Token::new(TokenKind::Eof, col));
        };

        let kind = match ch {
            '"' | '\'' => self.scan_text(ch, col)?,
            '0'..='9' => self.scan_number(start, col)?,
            c if c.is_ascii_alphabetic() || c == '_' => self.scan_word(start),

            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '>' => self.with_eq(TokenKind::GreaterEq, TokenKind::Greater),
            '<' => self.with_eq(TokenKind::LessEq, TokenKind::Less),
            '=' if self.peek() == Some('=') => {
                self.advance();
                TokenKind::EqEq
            }
            '!' if self.peek() == Some('=') => {
                self.advance();
                TokenKind::BangEq
            }
            other => return Err(self.error(format!("unexpected character '{other}'"), col)),
        };
        Ok(Token::new(kind, col))
    }

    /// `>` / `>=` and `<` / `<=`.
    fn with_eq(&mut self, with: TokenKind, without: TokenKind) -> TokenKind {
        if self.peek() == Some('=') {
            self.advance();
            with
        } else {
            without
        }
    }

    fn scan_text(&mut self, quote: char, col: u32) -> Result<TokenKind, LexError> {
        let mut buf = String::new();
        loop {
            match self.advance() {
                Some(c) if c == quote => return Ok(TokenKind::TextLit(buf)),
                Some(c) => buf.push(c),
                None => return Err(self.error("unterminated text literal", col)),
            }
        }
    }

    fn scan_number(&mut self, start: usize, col: u32) -> Result<TokenKind, LexError> {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        let is_decimal = self.peek() == Some('.')
            && self
                .chars
                .get(self.pos + 1)
                .is_some_and(|&(_, c)| c.is_ascii_digit());
        if is_decimal {
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        let text = self.slice_from(start);
        if !is_decimal {
            if let Ok(n) = text.parse::<i64>() {
                return Ok(TokenKind::IntegerLit(n));
            }
        }
        text.parse::<f64>()
            .map(TokenKind::FloatLit)
            .map_err(|_| self.error(format!("invalid number '{text}'"), col))
    }

    fn scan_word(&mut self, start: usize) -> TokenKind {
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.advance();
        }
        let word = self.slice_from(start);
        TokenKind::from_operator_word(word).unwrap_or_else(|| TokenKind::Identifier(word.to_string()))
    }
}
