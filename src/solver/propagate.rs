//! The clue propagator.
//!
//! Each rule narrows the matrix by clearing cells no consistent completion
//! of the clue could use. Rules are sound and monotone but deliberately
//! incomplete: operators without a cheap narrowing rule (negation, xor,
//! implication, equivalence, most membership shapes) contribute nothing
//! here and are enforced by the checker instead.

use tracing::debug;

use crate::error::Result;
use crate::puzzle::ast::{Expr, ExprKind, LogicalOp, NaryOp, PositionalOp, RelOp};
use crate::solver::arith;
use crate::solver::check::SolvedMemo;
use crate::solver::combinations::Combinations;
use crate::solver::eliminate::eliminate;
use crate::solver::matrix::{Matrix, PositionSet, RowId};
use crate::solver::resolve::resolve_symbol;

/// Propagates one clue, expanding `$` over every position.
/// Returns whether the matrix changed.
pub fn propagate_clue(
    clue: &Expr,
    m: &mut Matrix,
    combos: &Combinations,
    memo: &mut SolvedMemo,
) -> Result<bool> {
    let bindings = if clue.dollar { m.positions() } else { 1 };
    let mut changed = false;
    for d in 1..=bindings {
        changed |= propagate(clue, m, d, combos, memo)?;
    }
    Ok(changed)
}

fn propagate(
    expr: &Expr,
    m: &mut Matrix,
    binding: usize,
    combos: &Combinations,
    memo: &mut SolvedMemo,
) -> Result<bool> {
    // A finalised subtree has nothing left to contribute.
    if !expr.dollar && memo.contains_key(&expr.id) {
        return Ok(false);
    }

    match &expr.kind {
        ExprKind::Positional { op, lhs, rhs } => {
            let a = resolve_ident(lhs, m, binding)?;
            let b = resolve_ident(rhs, m, binding)?;
            Ok(positional(*op, a, b, m))
        }
        ExprKind::Logical {
            op: LogicalOp::And,
            lhs,
            rhs,
        } => {
            let mut changed = propagate(lhs, m, binding, combos, memo)?;
            changed |= propagate(rhs, m, binding, combos, memo)?;
            Ok(changed)
        }
        ExprKind::Nary {
            op: NaryOp::All,
            operands,
        } => {
            let mut changed = false;
            for operand in operands {
                changed |= propagate(operand, m, binding, combos, memo)?;
            }
            Ok(changed)
        }
        ExprKind::Logical {
            op: LogicalOp::Or,
            lhs,
            rhs,
        } => disjunction(&[lhs.as_ref(), rhs.as_ref()], m, binding, combos, memo),
        ExprKind::Nary {
            op: NaryOp::Any,
            operands,
        } => {
            let operands: Vec<&Expr> = operands.iter().collect();
            disjunction(&operands, m, binding, combos, memo)
        }
        ExprKind::In { needle, haystack } => {
            if let (ExprKind::Ident(symbol), ExprKind::Set(members)) =
                (&needle.kind, &haystack.kind)
            {
                let row = resolve_symbol(m.table(), symbol, needle.span, binding)?;
                let mut allowed = PositionSet::EMPTY;
                for member in members {
                    let member_row = resolve_ident(member, m, binding)?;
                    allowed = allowed.union(m.row(member_row));
                }
                Ok(m.restrict(row, allowed))
            } else {
                Ok(false)
            }
        }
        ExprKind::Relational { op, lhs, rhs } => {
            let mut changed = relational(*op, lhs, rhs, false, m, binding, memo)?;
            changed |= relational(*op, rhs, lhs, true, m, binding, memo)?;
            Ok(changed)
        }
        // Negation, xor, implication, equivalence: checking only.
        _ => Ok(false),
    }
}

fn resolve_ident(expr: &Expr, m: &Matrix, binding: usize) -> Result<RowId> {
    match &expr.kind {
        ExprKind::Ident(symbol) => resolve_symbol(m.table(), symbol, expr.span, binding),
        other => unreachable!("positional operand is always an identifier, got {other:?}"),
    }
}

fn positional(op: PositionalOp, a: RowId, b: RowId, m: &mut Matrix) -> bool {
    let n = m.positions();
    match op {
        PositionalOp::Same => {
            let shared = m.row(a).intersect(m.row(b));
            let mut changed = m.restrict(a, shared);
            changed |= m.restrict(b, shared);
            changed
        }
        PositionalOp::LeftBy(k) => {
            let keep_a = m.row(b).shifted_down(k);
            let keep_b = m.row(a).shifted_up(k, n);
            let mut changed = m.restrict(a, keep_a);
            changed |= m.restrict(b, keep_b);
            changed
        }
        PositionalOp::LeftOf => {
            // B cannot sit at or before A's leftmost cell; once B has
            // narrowed, A cannot sit at or after B's rightmost cell.
            let keep_b = match m.row(a).first() {
                Some(first) => PositionSet::above(first, n),
                None => PositionSet::EMPTY,
            };
            let mut changed = m.restrict(b, keep_b);
            let keep_a = match m.row(b).last() {
                Some(last) => PositionSet::below(last),
                None => PositionSet::EMPTY,
            };
            changed |= m.restrict(a, keep_a);
            changed
        }
    }
}

/// A cell survives a disjunction if it survives at least one disjunct.
/// Each disjunct is explored on its own copy of the matrix (and of the
/// memo, so conclusions drawn under its assumption cannot leak back).
fn disjunction(
    disjuncts: &[&Expr],
    m: &mut Matrix,
    binding: usize,
    combos: &Combinations,
    memo: &mut SolvedMemo,
) -> Result<bool> {
    let mut union: Vec<PositionSet> = vec![PositionSet::EMPTY; m.table().row_count()];
    for disjunct in disjuncts {
        let mut case = m.clone();
        let mut case_memo = memo.clone();
        propagate(disjunct, &mut case, binding, combos, &mut case_memo)?;
        eliminate(&mut case, combos);
        for (row, keep) in union.iter_mut().enumerate() {
            *keep = keep.union(case.row(row));
        }
    }

    let mut changed = false;
    for (row, keep) in union.into_iter().enumerate() {
        changed |= m.restrict(row, keep);
    }
    if changed {
        debug!(binding, "disjunction narrowed the matrix");
    }
    Ok(changed)
}

/// When one side is a numeric identifier already pinned to a column, items
/// of its referenced category that cannot satisfy the comparison against
/// the other side's definite value are cleared from that column.
fn relational(
    op: RelOp,
    pinned: &Expr,
    other: &Expr,
    flipped: bool,
    m: &mut Matrix,
    binding: usize,
    memo: &mut SolvedMemo,
) -> Result<bool> {
    let ExprKind::NumericIdent { symbol, category } = &pinned.kind else {
        return Ok(false);
    };
    let table = m.table().clone();
    let row = resolve_symbol(&table, symbol, pinned.span, binding)?;
    let Some(p) = m.row(row).as_singleton() else {
        return Ok(false);
    };
    let Some(cat) = table.category_index(category) else {
        return Err(crate::error::SolverError::UnknownCategory {
            name: category.clone(),
            line: pinned.span.line,
            column: pinned.span.column,
        }
        .into());
    };
    let Some(reference) = arith::eval(other, m, binding, memo)? else {
        return Ok(false);
    };

    let mut changed = false;
    for item in table.rows_of(cat) {
        let Some(v) = table.row(item).numeric else {
            continue;
        };
        let holds = if flipped {
            op.apply(reference, v)
        } else {
            op.apply(v, reference)
        };
        if !holds {
            changed |= m.clear(item, p);
        }
    }
    Ok(changed)
}
