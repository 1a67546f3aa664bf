//! The clue checker.
//!
//! Evaluates whether a clue currently holds against a (possibly still
//! ambiguous) matrix. The answer is three-valued: definitely true,
//! definitely false, or not yet determined, and an under-determined clue
//! is reported as *true* to the caller, because the checker's job is to
//! reject impossible branches, never to prune live ones.
//!
//! Two sentinel conditions surface while reading positions: a row with no
//! remaining cell (a contradiction someone else will reject) and a row
//! with several (not yet determined). Both are raised as [`Undetermined`]
//! inside the operator bodies, which lets each body assume singleton rows,
//! and both convert to "not yet determined" at the dispatch boundary.
//!
//! Definite verdicts whose operands are all themselves solved are recorded
//! in a branch-local memo keyed by node identity. The memo travels with its
//! branch (and forks with it), never on the shared AST. Subtrees mentioning
//! `$` are evaluated once per binding and stay out of the memo.

use crate::error::Result;
use crate::puzzle::ast::{Expr, ExprKind, LogicalOp, NaryOp, NodeId, PositionalOp};
use crate::solver::arith;
use crate::solver::matrix::{Matrix, RowId};
use crate::solver::resolve::resolve_symbol;

/// Branch-local record of finally-solved subtrees.
pub type SolvedMemo = im::HashMap<NodeId, bool>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    True,
    False,
    Unknown,
}

impl Verdict {
    fn from_bool(b: bool) -> Verdict {
        if b {
            Verdict::True
        } else {
            Verdict::False
        }
    }

    /// The conservative reading: only a definite `False` counts as false.
    pub fn value(self) -> bool {
        !matches!(self, Verdict::False)
    }

    pub fn solved(self) -> bool {
        !matches!(self, Verdict::Unknown)
    }
}

/// Sentinel raised when a row cannot be read as a single position.
enum Undetermined {
    /// No remaining cell.
    Contradiction,
    /// More than one remaining cell.
    Ambiguous,
}

fn position_of(m: &Matrix, row: RowId) -> std::result::Result<usize, Undetermined> {
    let set = m.row(row);
    if set.is_empty() {
        Err(Undetermined::Contradiction)
    } else {
        set.as_singleton().ok_or(Undetermined::Ambiguous)
    }
}

/// Checks a top-level clue, expanding `$` over every position.
/// Conservative: false only when some instantiation is definitely false.
pub fn check_clue(clue: &Expr, m: &Matrix, memo: &mut SolvedMemo) -> Result<bool> {
    let bindings = if clue.dollar { m.positions() } else { 1 };
    for d in 1..=bindings {
        if !check(clue, m, d, memo)?.value() {
            return Ok(false);
        }
    }
    Ok(true)
}

/// The conservative truth value of one instantiation.
pub fn check_value(expr: &Expr, m: &Matrix, binding: usize, memo: &mut SolvedMemo) -> Result<bool> {
    Ok(check(expr, m, binding, memo)?.value())
}

pub fn check(expr: &Expr, m: &Matrix, binding: usize, memo: &mut SolvedMemo) -> Result<Verdict> {
    if !expr.dollar {
        if let Some(&value) = memo.get(&expr.id) {
            return Ok(Verdict::from_bool(value));
        }
    }

    let (verdict, finalised) = match &expr.kind {
        ExprKind::Not(inner) => {
            let inner = check(inner, m, binding, memo)?;
            let verdict = match inner {
                Verdict::True => Verdict::False,
                Verdict::False => Verdict::True,
                Verdict::Unknown => Verdict::Unknown,
            };
            (verdict, inner.solved())
        }
        ExprKind::Logical { op, lhs, rhs } => {
            let a = check(lhs, m, binding, memo)?;
            let b = check(rhs, m, binding, memo)?;
            (binary_verdict(*op, a, b), a.solved() && b.solved())
        }
        ExprKind::Nary { op, operands } => {
            let mut verdicts = Vec::with_capacity(operands.len());
            for operand in operands {
                verdicts.push(check(operand, m, binding, memo)?);
            }
            (nary_verdict(*op, &verdicts), verdicts.iter().all(|v| v.solved()))
        }
        ExprKind::Relational { op, lhs, rhs } => {
            let verdict = match (
                arith::eval(lhs, m, binding, memo)?,
                arith::eval(rhs, m, binding, memo)?,
            ) {
                (Some(l), Some(r)) => Verdict::from_bool(op.apply(l, r)),
                _ => Verdict::Unknown,
            };
            (verdict, verdict.solved())
        }
        ExprKind::Positional { op, lhs, rhs } => {
            let a = resolve_ident(lhs, m, binding)?;
            let b = resolve_ident(rhs, m, binding)?;
            let verdict = match positional(*op, a, b, m) {
                Ok(holds) => Verdict::from_bool(holds),
                Err(_) => Verdict::Unknown,
            };
            (verdict, verdict.solved())
        }
        ExprKind::In { needle, haystack } => {
            let verdict = membership(needle, haystack, m, binding, memo)?;
            (verdict, verdict.solved())
        }
        // Arithmetic kinds never appear as logical roots; the parser
        // rejects them.
        _ => (Verdict::Unknown, false),
    };

    if finalised && verdict.solved() && !expr.dollar {
        memo.insert(expr.id, matches!(verdict, Verdict::True));
    }
    Ok(verdict)
}

fn resolve_ident(expr: &Expr, m: &Matrix, binding: usize) -> Result<RowId> {
    match &expr.kind {
        ExprKind::Ident(symbol) => resolve_symbol(m.table(), symbol, expr.span, binding),
        other => unreachable!("positional operand is always an identifier, got {other:?}"),
    }
}

fn positional(
    op: PositionalOp,
    a: RowId,
    b: RowId,
    m: &Matrix,
) -> std::result::Result<bool, Undetermined> {
    let pa = position_of(m, a)?;
    let pb = position_of(m, b)?;
    Ok(match op {
        PositionalOp::Same => pa == pb,
        PositionalOp::LeftBy(k) => pb as i64 - pa as i64 == k as i64,
        PositionalOp::LeftOf => pa < pb,
    })
}

fn binary_verdict(op: LogicalOp, a: Verdict, b: Verdict) -> Verdict {
    use Verdict::*;
    match op {
        LogicalOp::And => match (a, b) {
            (False, _) | (_, False) => False,
            (True, True) => True,
            _ => Unknown,
        },
        LogicalOp::Or => match (a, b) {
            (True, _) | (_, True) => True,
            (False, False) => False,
            _ => Unknown,
        },
        LogicalOp::Xor => match (a, b) {
            (Unknown, _) | (_, Unknown) => Unknown,
            _ => Verdict::from_bool(a != b),
        },
        LogicalOp::Iff => match (a, b) {
            (Unknown, _) | (_, Unknown) => Unknown,
            _ => Verdict::from_bool(a == b),
        },
        LogicalOp::Implies => match (a, b) {
            (False, _) | (_, True) => True,
            (True, False) => False,
            _ => Unknown,
        },
    }
}

fn nary_verdict(op: NaryOp, verdicts: &[Verdict]) -> Verdict {
    match op {
        NaryOp::All => {
            if verdicts.iter().any(|v| matches!(v, Verdict::False)) {
                Verdict::False
            } else if verdicts.iter().all(|v| matches!(v, Verdict::True)) {
                Verdict::True
            } else {
                Verdict::Unknown
            }
        }
        NaryOp::Any => {
            if verdicts.iter().any(|v| matches!(v, Verdict::True)) {
                Verdict::True
            } else if verdicts.iter().all(|v| matches!(v, Verdict::False)) {
                Verdict::False
            } else {
                Verdict::Unknown
            }
        }
    }
}

fn membership(
    needle: &Expr,
    haystack: &Expr,
    m: &Matrix,
    binding: usize,
    memo: &mut SolvedMemo,
) -> Result<Verdict> {
    match (&needle.kind, &haystack.kind) {
        // A row among rows: compare columns once every row involved is a
        // singleton.
        (ExprKind::Ident(symbol), ExprKind::Set(members)) => {
            let row = resolve_symbol(m.table(), symbol, needle.span, binding)?;
            let target = match position_of(m, row) {
                Ok(p) => p,
                Err(_) => return Ok(Verdict::Unknown),
            };
            let mut saw_unknown = false;
            for member in members {
                let member_row = resolve_ident(member, m, binding)?;
                match position_of(m, member_row) {
                    Ok(p) if p == target => return Ok(Verdict::True),
                    Ok(_) => {}
                    Err(_) => saw_unknown = true,
                }
            }
            Ok(if saw_unknown { Verdict::Unknown } else { Verdict::False })
        }
        (_, ExprKind::Set(members)) => {
            let Some(target) = arith::eval(needle, m, binding, memo)? else {
                return Ok(Verdict::Unknown);
            };
            let mut saw_unknown = false;
            for member in members {
                match arith::eval(member, m, binding, memo)? {
                    Some(v) if v == target => return Ok(Verdict::True),
                    Some(_) => {}
                    None => saw_unknown = true,
                }
            }
            Ok(if saw_unknown { Verdict::Unknown } else { Verdict::False })
        }
        (_, ExprKind::Range { start, end }) => {
            let (Some(v), Some(lo), Some(hi)) = (
                arith::eval(needle, m, binding, memo)?,
                arith::eval(start, m, binding, memo)?,
                arith::eval(end, m, binding, memo)?,
            ) else {
                return Ok(Verdict::Unknown);
            };
            Ok(Verdict::from_bool(lo <= v && v <= hi))
        }
        other => unreachable!("parser rejects malformed membership, got {other:?}"),
    }
}
