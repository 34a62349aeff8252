//! ShonenX lexer: expression fragments to token streams, plus the
//! quote-aware scanning helpers the statement matcher is built on.

pub mod lexer;
pub mod scan;
pub mod token;

pub use lexer::{LexError, Lexer};
pub use token::{is_reserved, Token, TokenKind, ALL_KEYWORDS, OPERATOR_WORDS};
