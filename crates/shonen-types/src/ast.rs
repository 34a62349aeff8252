//! AST node types for the ShonenX language.
//!
//! A program is a flat, ordered list of [`Statement`]s addressed by index.
//! Block structure lives beside it in a [`BlockMap`] computed once at build
//! time, so the engine never rescans statements to find a matching brace.
//! Expressions are kept as raw text on statements and parsed into [`Expr`]
//! when evaluated.

use crate::Span;
use std::collections::BTreeMap;
use std::fmt;

// ══════════════════════════════════════════════════════════════════════════════
// Types
// ══════════════════════════════════════════════════════════════════════════════

/// The declared type of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarType {
    /// `POWER`
    Integer,
    /// `MANA`
    Float,
    /// `SYMBOL`
    Char,
    /// `SOUL`
    Text,
    /// `SPIRIT`
    Flag,
}

impl VarType {
    pub const ALL: [VarType; 5] = [
        VarType::Integer,
        VarType::Float,
        VarType::Char,
        VarType::Text,
        VarType::Flag,
    ];

    /// Resolve a type keyword used after `SUMMON`.
    pub fn from_keyword(word: &str) -> Option<Self> {
        Some(match word {
            "POWER" => VarType::Integer,
            "MANA" => VarType::Float,
            "SYMBOL" => VarType::Char,
            "SOUL" => VarType::Text,
            "SPIRIT" => VarType::Flag,
            _ => return None,
        })
    }

    /// The source keyword for this type.
    pub fn keyword(self) -> &'static str {
        match self {
            VarType::Integer => "POWER",
            VarType::Float => "MANA",
            VarType::Char => "SYMBOL",
            VarType::Text => "SOUL",
            VarType::Flag => "SPIRIT",
        }
    }

    /// Integer and Float read numbers from input.
    pub fn is_numeric(self) -> bool {
        matches!(self, VarType::Integer | VarType::Float)
    }
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Direction a counted loop moves its iterator on each back-edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterMode {
    /// `GROWS`: `+1`
    Grow,
    /// `SHRINKS`: `-1`
    Shrink,
}

impl IterMode {
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "GROWS" => Some(IterMode::Grow),
            "SHRINKS" => Some(IterMode::Shrink),
            _ => None,
        }
    }

    pub fn step(self) -> i64 {
        match self {
            IterMode::Grow => 1,
            IterMode::Shrink => -1,
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Statements
// ══════════════════════════════════════════════════════════════════════════════

/// One fragment of a `SHOW` list.
#[derive(Debug, Clone, PartialEq)]
pub enum ShowPart {
    /// A quoted literal, quotes removed.
    Literal(String),
    /// A variable name or an expression, resolved at run time.
    Expr(String),
}

/// The single action a `BIND` branch may run.
#[derive(Debug, Clone, PartialEq)]
pub enum InlineAction {
    Show(Vec<ShowPart>),
    Assign { target: String, expr: String },
}

/// A statement with its source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    pub span: Span,
}

impl Statement {
    pub fn new(kind: StatementKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// 1-based source line.
    pub fn line(&self) -> u32 {
        self.span.line
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    /// `OPENING`
    NoOp,
    /// `ENDING`
    EndProgram,
    /// `{`
    BlockStart,
    /// `}`
    BlockEnd,
    /// `SUMMON <TYPE> <ID> ;`
    Declare { name: String, ty: VarType },
    /// `GIVE <ID> = <EXPR> ;`
    Assign { target: String, expr: String },
    /// `SHOW <EXPR-list> ;`
    Show { parts: Vec<ShowPart> },
    /// `READ "<prompt>" , <ID> ;`
    Read { prompt: String, target: String },
    /// `BIND <COND> WORTHY <ACTION> [VILE <ACTION>]`
    Conditional {
        condition: String,
        then_action: InlineAction,
        else_action: Option<InlineAction>,
    },
    /// `DURING <COND>`
    WhileLoop { condition: String },
    /// `TOSERVE ... UNTIL <COND> <ID> GROWS|SHRINKS`
    CountedLoop {
        condition: String,
        iterator: String,
        mode: IterMode,
    },
}

impl StatementKind {
    /// Short name used in logs and diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            StatementKind::NoOp => "OPENING",
            StatementKind::EndProgram => "ENDING",
            StatementKind::BlockStart => "{",
            StatementKind::BlockEnd => "}",
            StatementKind::Declare { .. } => "SUMMON",
            StatementKind::Assign { .. } => "GIVE",
            StatementKind::Show { .. } => "SHOW",
            StatementKind::Read { .. } => "READ",
            StatementKind::Conditional { .. } => "BIND",
            StatementKind::WhileLoop { .. } => "DURING",
            StatementKind::CountedLoop { .. } => "TOSERVE",
        }
    }

    pub fn is_loop_header(&self) -> bool {
        matches!(
            self,
            StatementKind::WhileLoop { .. } | StatementKind::CountedLoop { .. }
        )
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Program
// ══════════════════════════════════════════════════════════════════════════════

/// The statement that owns a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockOwner {
    /// Body of the `DURING` header at this index.
    While(usize),
    /// Body of the `TOSERVE` header at this index.
    CountedLoop(usize),
    /// A bare `{ ... }` with no owner.
    Plain,
}

/// Block structure resolved at build time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockMap {
    /// `BlockEnd` index → the owner of the block it closes.
    owners: BTreeMap<usize, BlockOwner>,
    /// Loop header index → index just past its matching `BlockEnd`.
    exits: BTreeMap<usize, usize>,
}

impl BlockMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a closed block.
    pub fn close(&mut self, end_index: usize, owner: BlockOwner) {
        self.owners.insert(end_index, owner);
        match owner {
            BlockOwner::While(header) | BlockOwner::CountedLoop(header) => {
                self.exits.insert(header, end_index + 1);
            }
            BlockOwner::Plain => {}
        }
    }

    /// Owner of the block closed at `end_index`.
    pub fn owner_of(&self, end_index: usize) -> Option<BlockOwner> {
        self.owners.get(&end_index).copied()
    }

    /// Where to continue when the loop at `header_index` is not entered.
    pub fn exit_of(&self, header_index: usize) -> Option<usize> {
        self.exits.get(&header_index).copied()
    }

    /// Number of closed blocks.
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

/// A validated, immutable ShonenX program.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    statements: Vec<Statement>,
    blocks: BlockMap,
}

impl Program {
    pub fn new(statements: Vec<Statement>, blocks: BlockMap) -> Self {
        Self { statements, blocks }
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn get(&self, index: usize) -> Option<&Statement> {
        self.statements.get(index)
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn blocks(&self) -> &BlockMap {
        &self.blocks
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

/// A parsed expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Integer(i64),
    Float(f64),
    Text(String),
    Variable(String),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
}

/// Binary operators, each with its named source word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    /// `POWERUP`
    Add,
    /// `DAMAGE`
    Sub,
    /// `FUSION`
    Mul,
    /// `SLICE`
    Div,
    /// `STRONGER`
    Greater,
    /// `WEAKER`
    Less,
    /// `EQUALS`
    Eq,
    /// `APART`
    NotEq,
    /// `ABS`
    GreaterEq,
    /// `ABW`
    LessEq,
}

impl BinOp {
    /// Binding power: comparisons 1, additive 2, multiplicative 3.
    pub fn precedence(self) -> u8 {
        match self {
            BinOp::Mul | BinOp::Div => 3,
            BinOp::Add | BinOp::Sub => 2,
            _ => 1,
        }
    }

    pub fn is_comparison(self) -> bool {
        self.precedence() == 1
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Greater => ">",
            BinOp::Less => "<",
            BinOp::Eq => "==",
            BinOp::NotEq => "!=",
            BinOp::GreaterEq => ">=",
            BinOp::LessEq => "<=",
        }
    }

    pub fn word(self) -> &'static str {
        match self {
            BinOp::Add => "POWERUP",
            BinOp::Sub => "DAMAGE",
            BinOp::Mul => "FUSION",
            BinOp::Div => "SLICE",
            BinOp::Greater => "STRONGER",
            BinOp::Less => "WEAKER",
            BinOp::Eq => "EQUALS",
            BinOp::NotEq => "APART",
            BinOp::GreaterEq => "ABS",
            BinOp::LessEq => "ABW",
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.word())
    }
}
