//! The arithmetic evaluator.
//!
//! Reduces an arithmetic expression against the current matrix to either
//! a definite integer or "unknown" (`None`). Unknown propagates through
//! every operator; a `truths` count is definite only once every member
//! clue has been decided, since a half-decided count would let a
//! comparison against it reject branches that are still alive.

use crate::error::{Result, SolverError};
use crate::puzzle::ast::{ArithOp, Expr, ExprKind};
use crate::solver::check::{self, SolvedMemo};
use crate::solver::matrix::Matrix;
use crate::solver::resolve::resolve_symbol;

pub fn eval(expr: &Expr, m: &Matrix, binding: usize, memo: &mut SolvedMemo) -> Result<Option<i64>> {
    match &expr.kind {
        ExprKind::Number(n) => Ok(Some(*n)),
        ExprKind::NumericIdent { symbol, category } => {
            eval_numeric_ident(expr, symbol, category, m, binding)
        }
        ExprKind::Arith { op, lhs, rhs } => {
            let Some(lhs) = eval(lhs, m, binding, memo)? else {
                return Ok(None);
            };
            let Some(rhs) = eval(rhs, m, binding, memo)? else {
                return Ok(None);
            };
            Ok(apply(*op, lhs, rhs))
        }
        ExprKind::Truths(members) => {
            let mut count = 0;
            for member in members {
                match check::check(member, m, binding, memo)? {
                    check::Verdict::True => count += 1,
                    check::Verdict::False => {}
                    check::Verdict::Unknown => return Ok(None),
                }
            }
            Ok(Some(count))
        }
        // The parser only hands arithmetic kinds to this evaluator.
        _ => Ok(None),
    }
}

fn apply(op: ArithOp, lhs: i64, rhs: i64) -> Option<i64> {
    match op {
        ArithOp::Add => Some(lhs + rhs),
        ArithOp::Sub => Some(lhs - rhs),
        ArithOp::Mul => Some(lhs * rhs),
        ArithOp::Div => (rhs != 0).then(|| lhs / rhs),
        ArithOp::Rem => (rhs != 0).then(|| lhs % rhs),
        ArithOp::Diff => Some((lhs - rhs).abs()),
    }
}

/// `symbol:category`: the value of the `category` item sharing symbol's
/// position. While the symbol's row or the column is still ambiguous, the
/// value is definite only if every surviving pairing agrees on it.
fn eval_numeric_ident(
    expr: &Expr,
    symbol: &str,
    category: &str,
    m: &Matrix,
    binding: usize,
) -> Result<Option<i64>> {
    let table = m.table().clone();
    let row = resolve_symbol(&table, symbol, expr.span, binding)?;
    let Some(cat) = table.category_index(category) else {
        return Err(SolverError::UnknownCategory {
            name: category.to_string(),
            line: expr.span.line,
            column: expr.span.column,
        }
        .into());
    };

    let mut value: Option<i64> = None;
    for p in m.row(row).iter() {
        for candidate in m.candidates(cat, p) {
            let Some(v) = table.row(candidate).numeric else {
                // A pairing through a non-numeric item stays unknown.
                return Ok(None);
            };
            match value {
                None => value = Some(v),
                Some(prev) if prev != v => return Ok(None),
                Some(_) => {}
            }
        }
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::puzzle::parser::parse_source;
    use crate::solver::check::SolvedMemo;
    use crate::solver::matrix::{Matrix, PositionSet, RowTable};
    use std::sync::Arc;

    const SOURCE: &str = "\
[categories]
name: ana, bo, cy
age: 10, 20, 30

[clues]
ana:age + bo:age == 40
ana:age diff bo:age == 10
ana:age / 0 == 1
";

    fn setup() -> (Matrix, Vec<crate::puzzle::ast::Expr>) {
        let parsed = parse_source(SOURCE).unwrap();
        let table = Arc::new(RowTable::build(parsed.categories).unwrap());
        (Matrix::new(table), parsed.clues)
    }

    fn operand(clue: &crate::puzzle::ast::Expr, left: bool) -> &crate::puzzle::ast::Expr {
        match &clue.kind {
            ExprKind::Relational { lhs, rhs, .. } => {
                if left {
                    lhs
                } else {
                    rhs
                }
            }
            other => panic!("expected relational clue, got {other:?}"),
        }
    }

    #[test]
    fn literals_and_sums_evaluate() {
        let (m, clues) = setup();
        let mut memo = SolvedMemo::new();
        let rhs = operand(&clues[0], false);
        assert_eq!(eval(rhs, &m, 1, &mut memo).unwrap(), Some(40));
    }

    #[test]
    fn unpinned_numeric_identifiers_are_unknown() {
        let (m, clues) = setup();
        let mut memo = SolvedMemo::new();
        let sum = operand(&clues[0], true);
        assert_eq!(eval(sum, &m, 1, &mut memo).unwrap(), None);
    }

    #[test]
    fn pinned_numeric_identifiers_evaluate() {
        let (mut m, clues) = setup();
        let table = m.table().clone();
        // Pin ana to position 1 and age 20 to position 1.
        m.restrict(table.lookup_key("name.ana").unwrap(), PositionSet::singleton(1));
        m.restrict(table.lookup_key("age.20").unwrap(), PositionSet::singleton(1));
        m.restrict(table.lookup_key("age.10").unwrap(), PositionSet::from_mask(0b101));
        m.restrict(table.lookup_key("age.30").unwrap(), PositionSet::from_mask(0b101));

        let mut memo = SolvedMemo::new();
        let sum = operand(&clues[0], true);
        // ana:age is now 20, bo:age still roams over 10 and 30.
        assert_eq!(eval(sum, &m, 1, &mut memo).unwrap(), None);

        match &sum.kind {
            ExprKind::Arith { lhs, .. } => {
                assert_eq!(eval(lhs, &m, 1, &mut memo).unwrap(), Some(20));
            }
            other => panic!("expected sum, got {other:?}"),
        }
    }

    #[test]
    fn agreeing_pairings_are_definite_despite_ambiguity() {
        let (mut m, clues) = setup();
        let table = m.table().clone();
        // ana roams over positions 0 and 1, but both hold age 10 or 20...
        m.restrict(table.lookup_key("name.ana").unwrap(), PositionSet::from_mask(0b011));
        m.restrict(table.lookup_key("age.30").unwrap(), PositionSet::singleton(2));
        m.restrict(table.lookup_key("age.10").unwrap(), PositionSet::from_mask(0b011));
        m.restrict(table.lookup_key("age.20").unwrap(), PositionSet::from_mask(0b011));

        let mut memo = SolvedMemo::new();
        let diff = operand(&clues[1], true);
        // ...so ana:age is still ambiguous (10 or 20) and diff is unknown.
        match &diff.kind {
            ExprKind::Arith { lhs, .. } => {
                assert_eq!(eval(lhs, &m, 1, &mut memo).unwrap(), None);
            }
            other => panic!("expected diff, got {other:?}"),
        }

        // Narrow both columns to a single age: every pairing now agrees.
        m.restrict(table.lookup_key("age.20").unwrap(), PositionSet::EMPTY);
        match &diff.kind {
            ExprKind::Arith { lhs, .. } => {
                assert_eq!(eval(lhs, &m, 1, &mut memo).unwrap(), Some(10));
            }
            other => panic!("expected diff, got {other:?}"),
        }
    }

    #[test]
    fn division_by_zero_is_unknown() {
        let (mut m, clues) = setup();
        let table = m.table().clone();
        m.restrict(table.lookup_key("name.ana").unwrap(), PositionSet::singleton(0));
        m.restrict(table.lookup_key("age.10").unwrap(), PositionSet::singleton(0));
        m.restrict(table.lookup_key("age.20").unwrap(), PositionSet::from_mask(0b110));
        m.restrict(table.lookup_key("age.30").unwrap(), PositionSet::from_mask(0b110));

        let mut memo = SolvedMemo::new();
        let quotient = operand(&clues[2], true);
        assert_eq!(eval(quotient, &m, 1, &mut memo).unwrap(), None);
    }
}
