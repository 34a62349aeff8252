//! Token types for the ShonenX expression lexer.
//!
//! Defines [`TokenKind`] covering every lexeme an expression may contain and
//! [`Token`], which pairs a kind with its column inside the fragment.

use shonen_types::ast::BinOp;
use std::fmt;

/// Statement and type keywords. None of these may name a variable.
pub const ALL_KEYWORDS: &[&str] = &[
    // Structure (2)
    "OPENING", "ENDING",
    // Statements (8)
    "SUMMON", "GIVE", "SHOW", "READ", "BIND", "WORTHY", "VILE", "DURING",
    // Counted loop (4)
    "TOSERVE", "UNTIL", "GROWS", "SHRINKS",
    // Types (5)
    "POWER", "MANA", "SYMBOL", "SOUL", "SPIRIT",
];

/// The ten named operators, in the order the lexer documents them.
pub const OPERATOR_WORDS: &[&str] = &[
    "POWERUP", "DAMAGE", "FUSION", "SLICE", "STRONGER", "WEAKER", "EQUALS", "APART", "ABS",
    "ABW",
];

/// Returns `true` if `name` is a keyword or an operator word.
pub fn is_reserved(name: &str) -> bool {
    ALL_KEYWORDS.contains(&name) || OPERATOR_WORDS.contains(&name)
}

// ─────────────────────────────────────────────────────────────────────
// Token
// ─────────────────────────────────────────────────────────────────────

/// A single token produced by the expression lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// What kind of token this is.
    pub kind: TokenKind,
    /// 1-based column inside the expression fragment.
    pub col: u32,
}

impl Token {
    pub fn new(kind: TokenKind, col: u32) -> Self {
        Self { kind, col }
    }
}

// ─────────────────────────────────────────────────────────────────────
// TokenKind
// ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ── Literals ──────────────────────────────────────────────

    /// `42`
    IntegerLit(i64),
    /// `3.14`
    FloatLit(f64),
    /// `"text"` or `'text'`, quotes removed
    TextLit(String),

    /// Variable name: `hp`, `_count2`
    Identifier(String),

    // ── Operators (word or symbol form) ──────────────────────

    /// `POWERUP` / `+`
    Plus,
    /// `DAMAGE` / `-`
    Minus,
    /// `FUSION` / `*`
    Star,
    /// `SLICE` / `/`
    Slash,
    /// `STRONGER` / `>`
    Greater,
    /// `WEAKER` / `<`
    Less,
    /// `EQUALS` / `==`
    EqEq,
    /// `APART` / `!=`
    BangEq,
    /// `ABS` / `>=`
    GreaterEq,
    /// `ABW` / `<=`
    LessEq,

    // ── Punctuation ──────────────────────────────────────────

    LParen,
    RParen,

    Eof,
}

impl TokenKind {
    /// Map a named operator word to its token.
    pub fn from_operator_word(word: &str) -> Option<TokenKind> {
        Some(match word {
            "POWERUP" => TokenKind::Plus,
            "DAMAGE" => TokenKind::Minus,
            "FUSION" => TokenKind::Star,
            "SLICE" => TokenKind::Slash,
            "STRONGER" => TokenKind::Greater,
            "WEAKER" => TokenKind::Less,
            "EQUALS" => TokenKind::EqEq,
            "APART" => TokenKind::BangEq,
            "ABS" => TokenKind::GreaterEq,
            "ABW" => TokenKind::LessEq,
            _ => return None,
        })
    }

    /// The binary operator this token stands for, if any.
    pub fn binary_op(&self) -> Option<BinOp> {
        Some(match self {
            TokenKind::Plus => BinOp::Add,
            TokenKind::Minus => BinOp::Sub,
            TokenKind::Star => BinOp::Mul,
            TokenKind::Slash => BinOp::Div,
            TokenKind::Greater => BinOp::Greater,
            TokenKind::Less => BinOp::Less,
            TokenKind::EqEq => BinOp::Eq,
            TokenKind::BangEq => BinOp::NotEq,
            TokenKind::GreaterEq => BinOp::GreaterEq,
            TokenKind::LessEq => BinOp::LessEq,
            _ => return None,
        })
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::IntegerLit(n) => write!(f, "{n}"),
            TokenKind::FloatLit(n) => write!(f, "{n}"),
            TokenKind::TextLit(s) => write!(f, "\"{s}\""),
            TokenKind::Identifier(name) => f.write_str(name),
            TokenKind::LParen => f.write_str("("),
            TokenKind::RParen => f.write_str(")"),
            TokenKind::Eof => f.write_str("end of expression"),
            op => match op.binary_op() {
                Some(bin) => f.write_str(bin.word()),
                None => f.write_str("?"),
            },
        }
    }
}
