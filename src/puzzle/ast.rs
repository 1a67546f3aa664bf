//! The clue expression tree produced by the ZBC parser.
//!
//! Nodes form a closed sum type over the operator vocabulary; the solver
//! dispatches on it with exhaustive matches. Kind mismatches (a positional
//! operator over arithmetic, a mixed-kind set) are rejected by the parser,
//! so downstream matches never see them.

use std::fmt;

/// Identity of a node within one parsed puzzle, used to key the
/// branch-local solved-clue memo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Source position of a node, `[line, column]`, both 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: u32,
    pub column: u32,
}

/// The value kind a node evaluates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Returns {
    Logical,
    Arithmetic,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    /// `&`
    And,
    /// `|`
    Or,
    /// `^`
    Xor,
    /// `<=>`
    Iff,
    /// `=>`
    Implies,
}

/// The two operators that also exist in n-ary form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NaryOp {
    All,
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl RelOp {
    pub fn apply(self, lhs: i64, rhs: i64) -> bool {
        match self {
            RelOp::Eq => lhs == rhs,
            RelOp::Ne => lhs != rhs,
            RelOp::Lt => lhs < rhs,
            RelOp::Le => lhs <= rhs,
            RelOp::Gt => lhs > rhs,
            RelOp::Ge => lhs >= rhs,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionalOp {
    /// `A = B`: same position.
    Same,
    /// `A -k B`: A exactly `k` positions left of B (`-` alone means k = 1).
    LeftBy(usize),
    /// `A -- B`: A somewhere strictly left of B.
    LeftOf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    /// `diff`: absolute difference.
    Diff,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprKind {
    /// `!a`
    Not(Box<Expr>),
    /// `a & b`, `a | b`, `a ^ b`, `a <=> b`, `a => b`
    Logical {
        op: LogicalOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// `a & b & c ...`, `a | b | c ...`
    Nary { op: NaryOp, operands: Vec<Expr> },
    /// `x == y` and friends, over arithmetic operands.
    Relational {
        op: RelOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// `A = B`, `A -k B`, `A -- B`, over identifier operands.
    Positional {
        op: PositionalOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// `x in (a, b, ...)` or `x in [lo, hi]`.
    In {
        needle: Box<Expr>,
        haystack: Box<Expr>,
    },
    /// `x + y` and friends.
    Arith {
        op: ArithOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Number(i64),
    /// `symbol:category`: the numeric value of the category item sharing
    /// symbol's position.
    NumericIdent { symbol: String, category: String },
    /// A row reference: short name, `category.item`, `#n` or `$`.
    Ident(String),
    Set(Vec<Expr>),
    Range { start: Box<Expr>, end: Box<Expr> },
    /// `truths(c1, ..., cn)`: how many member clues currently check true.
    Truths(Vec<Expr>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expr {
    pub id: NodeId,
    pub span: Span,
    /// Whether the subtree mentions the dynamic position `$`.
    pub dollar: bool,
    pub kind: ExprKind,
}

impl Expr {
    pub fn returns(&self) -> Returns {
        match &self.kind {
            ExprKind::Not(_)
            | ExprKind::Logical { .. }
            | ExprKind::Nary { .. }
            | ExprKind::Relational { .. }
            | ExprKind::Positional { .. }
            | ExprKind::In { .. } => Returns::Logical,
            ExprKind::Arith { .. }
            | ExprKind::Number(_)
            | ExprKind::NumericIdent { .. }
            | ExprKind::Truths(_) => Returns::Arithmetic,
            ExprKind::Ident(_) | ExprKind::Set(_) | ExprKind::Range { .. } => Returns::Other,
        }
    }
}

fn join(operands: &[Expr], sep: &str) -> String {
    operands
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(sep)
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Not(inner) => write!(f, "!{}", inner),
            ExprKind::Logical { op, lhs, rhs } => {
                let sym = match op {
                    LogicalOp::And => "&",
                    LogicalOp::Or => "|",
                    LogicalOp::Xor => "^",
                    LogicalOp::Iff => "<=>",
                    LogicalOp::Implies => "=>",
                };
                write!(f, "({} {} {})", lhs, sym, rhs)
            }
            ExprKind::Nary { op, operands } => {
                let sym = match op {
                    NaryOp::All => " & ",
                    NaryOp::Any => " | ",
                };
                write!(f, "({})", join(operands, sym))
            }
            ExprKind::Relational { op, lhs, rhs } => {
                let sym = match op {
                    RelOp::Eq => "==",
                    RelOp::Ne => "!=",
                    RelOp::Lt => "<",
                    RelOp::Le => "<=",
                    RelOp::Gt => ">",
                    RelOp::Ge => ">=",
                };
                write!(f, "{} {} {}", lhs, sym, rhs)
            }
            ExprKind::Positional { op, lhs, rhs } => match op {
                PositionalOp::Same => write!(f, "{} = {}", lhs, rhs),
                PositionalOp::LeftBy(1) => write!(f, "{} - {}", lhs, rhs),
                PositionalOp::LeftBy(k) => write!(f, "{} -{} {}", lhs, k, rhs),
                PositionalOp::LeftOf => write!(f, "{} -- {}", lhs, rhs),
            },
            ExprKind::In { needle, haystack } => write!(f, "{} in {}", needle, haystack),
            ExprKind::Arith { op, lhs, rhs } => {
                let sym = match op {
                    ArithOp::Add => "+",
                    ArithOp::Sub => "-",
                    ArithOp::Mul => "*",
                    ArithOp::Div => "/",
                    ArithOp::Rem => "%",
                    ArithOp::Diff => "diff",
                };
                write!(f, "({} {} {})", lhs, sym, rhs)
            }
            ExprKind::Number(n) => write!(f, "{}", n),
            ExprKind::NumericIdent { symbol, category } => write!(f, "{}:{}", symbol, category),
            ExprKind::Ident(symbol) => write!(f, "{}", symbol),
            ExprKind::Set(members) => write!(f, "({})", join(members, ", ")),
            ExprKind::Range { start, end } => write!(f, "[{}, {}]", start, end),
            ExprKind::Truths(members) => write!(f, "truths({})", join(members, ", ")),
        }
    }
}
